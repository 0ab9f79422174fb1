use crate::dispatcher::{
    CommandError, Direction, Motion, Params, RecordedOutcome, RobotState, SeenCommands,
};
use crate::ports::{RobotError, RobotPort};
use std::sync::Arc;
use telebridge_core::{ControlMessage, RobotCommand, RobotResponse, TiltAngle, now_millis};
use tracing::{debug, info, warn};

pub const HOME_LOCATION: &str = "home base";
pub const DEFAULT_TILT_STEP: i64 = 10;

/// Результат обработки одной команды. Ответ отправляется раньше `followups`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dispatch {
    pub response: Option<RobotResponse>,
    pub followups: Vec<ControlMessage>,
}

struct Executed {
    message: String,
    followups: Vec<ControlMessage>,
}

impl Executed {
    fn say(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            followups: Vec::new(),
        }
    }

    fn with(mut self, msg: ControlMessage) -> Self {
        self.followups.push(msg);
        self
    }
}

/// Исполнитель команд зрителя.
/// Владеет состоянием робота (кэш локаций, поза, наклон) и сам ничего не отправляет:
/// всё, что нужно отправить, возвращается вызывающему.
pub struct Dispatcher {
    pub(crate) robot: Arc<dyn RobotPort>,
    pub(crate) state: RobotState,
    seen: SeenCommands,
}

impl Dispatcher {
    pub fn new(robot: Arc<dyn RobotPort>) -> Self {
        Self {
            robot,
            state: RobotState::default(),
            seen: SeenCommands::default(),
        }
    }

    pub fn state(&self) -> &RobotState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.robot_ready
    }

    pub fn handle(&mut self, cmd: &RobotCommand) -> Dispatch {
        let command_id = cmd.correlation_id().map(str::to_owned);

        if !self.state.robot_ready {
            warn!("Robot not ready for command: {}", cmd.command);
            return Dispatch {
                response: command_id
                    .map(|id| make_response(id, false, CommandError::NotReady.to_string())),
                followups: Vec::new(),
            };
        }

        if let Some(prev) = self.seen.get(cmd) {
            let id = command_id.unwrap_or_default();
            info!("Duplicate command {} ({}), replaying outcome", id, cmd.command);
            return Dispatch {
                response: Some(make_response(id, prev.success, prev.message.clone())),
                followups: Vec::new(),
            };
        }

        debug!("Executing robot command: {}", cmd.command);
        let (success, message, followups) = match self.execute(cmd) {
            Ok(done) => (true, done.message, done.followups),
            Err(e) => {
                warn!("Command {} failed: {}", cmd.command, e);
                (false, e.to_string(), Vec::new())
            }
        };

        self.seen.record(
            cmd,
            RecordedOutcome {
                success,
                message: message.clone(),
            },
        );
        let response = command_id.map(|id| make_response(id, success, message));

        Dispatch {
            response,
            followups,
        }
    }

    /// Новая сессия: `commandId` прежнего зрителя больше ничего не значат.
    pub fn begin_session(&mut self) {
        if !self.seen.is_empty() {
            debug!("Forgetting {} seen command ids", self.seen.len());
        }
        self.seen.clear();
    }

    /// Остановить робота, если он едет. Вызывается при остановке стрима.
    pub fn halt_motion(&mut self) -> Result<(), RobotError> {
        if !self.state.is_moving {
            return Ok(());
        }
        self.robot.stop_movement()?;
        self.state.is_moving = false;
        Ok(())
    }

    pub(crate) fn refresh_locations(&mut self) -> Result<(), RobotError> {
        self.state.locations = self.robot.locations()?;
        Ok(())
    }

    fn location_update(&self) -> ControlMessage {
        ControlMessage::LocationUpdate(self.state.location_update())
    }

    fn execute(&mut self, cmd: &RobotCommand) -> Result<Executed, CommandError> {
        let params = Params::of(cmd);

        match cmd.command.as_str() {
            "move" => {
                let raw = params.require_text("direction", "Direction")?;
                let direction: Direction = raw
                    .parse()
                    .map_err(|_| CommandError::InvalidDirection(raw.clone()))?;

                match direction.motion() {
                    Motion::Drive { linear, angular } => {
                        self.robot.skid_joy(linear, angular)?;
                        self.state.is_moving = true;
                    }
                    Motion::Turn(degrees) => self.robot.turn_by(degrees)?,
                }
                Ok(Executed::say(format!("Moving {direction}")))
            }

            "stop" => {
                self.robot.stop_movement()?;
                self.state.is_moving = false;
                Ok(Executed::say("Movement stopped"))
            }

            "speak" => {
                let text = params.require_text("text", "Text")?;
                self.robot.speak(&text, false)?;
                Ok(Executed::say(format!("Speaking: {text}")))
            }

            "go_to_location" => {
                let location = params.require_text("location", "Location")?;
                if !self.state.has_location(&location) {
                    return Err(CommandError::UnknownLocation(location));
                }
                self.robot.go_to(&location)?;
                Ok(Executed::say(format!("Navigating to {location}")))
            }

            "save_location" => {
                let name = match params.text("name")? {
                    Some(name) => name,
                    None => format!("custom_location_{}", now_millis()),
                };
                if !self.robot.save_location(&name)? {
                    return Err(CommandError::SaveFailed);
                }
                self.refresh_locations()?;
                Ok(Executed::say(format!("Location saved: {name}")).with(self.location_update()))
            }

            "delete_location" => {
                let location = params.require_text("location", "Location")?;
                if !self.robot.delete_location(&location)? {
                    return Err(CommandError::DeleteFailed);
                }
                self.refresh_locations()?;
                Ok(Executed::say(format!("Location deleted: {location}"))
                    .with(self.location_update()))
            }

            "get_locations" => {
                self.refresh_locations()?;
                let n = self.state.locations.len();
                Ok(Executed::say(format!("Location list updated ({n} locations)"))
                    .with(self.location_update()))
            }

            "tilt_up" => {
                let step = params.int("angle")?.unwrap_or(DEFAULT_TILT_STEP);
                self.apply_tilt(self.state.tilt.raised_by(step))
            }

            "tilt_down" => {
                let step = params.int("angle")?.unwrap_or(DEFAULT_TILT_STEP);
                self.apply_tilt(self.state.tilt.lowered_by(step))
            }

            "tilt_to_angle" => {
                let target = params.require_int("angle", "Angle")?;
                self.apply_tilt(TiltAngle::clamped(target))
            }

            "reset_tilt" => {
                self.robot.tilt_angle(TiltAngle::CENTER.degrees())?;
                self.state.tilt = TiltAngle::CENTER;
                Ok(Executed::say("Head tilt reset to center"))
            }

            "emergency_stop" => {
                // Сначала останов, потом речь: порядок важен
                self.robot.stop_movement()?;
                self.state.is_moving = false;
                self.robot.speak("Emergency stop activated", true)?;
                Ok(Executed::say("Emergency stop activated"))
            }

            "turn_around" => {
                self.robot.turn_by(180)?;
                Ok(Executed::say("Turning around"))
            }

            "turn_by" => {
                let degrees = params.require_int("degrees", "Degrees")?;
                let degrees = degrees.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
                self.robot.turn_by(degrees)?;
                Ok(Executed::say(format!("Turning by {degrees}°")))
            }

            "go_home" => {
                if self.state.has_location(HOME_LOCATION) {
                    self.robot.go_to(HOME_LOCATION)?;
                    return Ok(Executed::say("Going home"));
                }
                let Some(first) = self.state.locations.first().cloned() else {
                    return Err(CommandError::NoHomeLocation);
                };
                self.robot.go_to(&first)?;
                Ok(Executed::say(format!("Going to {first}")))
            }

            "set_volume" => {
                let level = params.require_int("level", "Volume level")?;
                let level = level.clamp(0, 100) as u8;
                self.robot.set_volume(level)?;
                Ok(Executed::say(format!("Volume set to {level}%")))
            }

            "follow_me" => {
                self.robot.speak("Follow me mode not available", false)?;
                Err(CommandError::FollowMeUnavailable)
            }

            "stop_follow" => {
                self.robot.stop_movement()?;
                Ok(Executed::say("Movement stopped"))
            }

            // Батарея в SDK недоступна, отвечаем заглушкой
            "get_battery_info" => Ok(Executed::say("Battery info requested - check robot display")),

            other => Err(CommandError::UnknownCommand(other.to_owned())),
        }
    }

    fn apply_tilt(&mut self, target: TiltAngle) -> Result<Executed, CommandError> {
        self.robot.tilt_angle(target.degrees())?;
        self.state.tilt = target;
        Ok(Executed::say(format!("Head tilted to {target}")))
    }
}

fn make_response(command_id: String, success: bool, message: String) -> RobotResponse {
    RobotResponse {
        command_id,
        success,
        message,
        timestamp_ms: now_millis(),
    }
}
