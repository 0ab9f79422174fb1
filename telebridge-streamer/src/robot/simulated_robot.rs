use crate::ports::{RobotError, RobotEvent, RobotPort};
use std::sync::{Mutex, MutexGuard};
use telebridge_core::Position;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Шаг симуляции на одну команду `skid_joy`.
const DRIVE_STEP: f32 = 0.1;

#[derive(Debug, Default)]
struct SimState {
    locations: Vec<String>,
    position: Position,
    tilt: i32,
    volume: u8,
}

/// Робот в памяти: для бинарника без SDK и для тестов.
pub struct SimulatedRobot {
    state: Mutex<SimState>,
    events: mpsc::Sender<RobotEvent>,
}

impl SimulatedRobot {
    pub fn new(events: mpsc::Sender<RobotEvent>) -> Self {
        Self {
            state: Mutex::new(SimState::default()),
            events,
        }
    }

    pub fn with_locations(self, locations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.locations = locations.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Аналог `onRobotReady(true)` из SDK.
    pub fn announce_ready(&self) {
        self.emit(RobotEvent::Ready(true));
    }

    pub fn tilt(&self) -> Option<i32> {
        self.state.lock().ok().map(|s| s.tilt)
    }

    pub fn volume(&self) -> Option<u8> {
        self.state.lock().ok().map(|s| s.volume)
    }

    fn state(&self) -> Result<MutexGuard<'_, SimState>, RobotError> {
        self.state
            .lock()
            .map_err(|_| RobotError::new("simulator state poisoned"))
    }

    fn emit(&self, event: RobotEvent) {
        if let Err(e) = self.events.try_send(event) {
            warn!("Robot event dropped: {}", e);
        }
    }

    fn emit_position(&self, position: Position) {
        self.emit(RobotEvent::PositionChanged(position));
    }
}

impl RobotPort for SimulatedRobot {
    fn speak(&self, text: &str, cutting: bool) -> Result<(), RobotError> {
        info!("[robot] speak (cutting={}): {}", cutting, text);
        Ok(())
    }

    fn skid_joy(&self, linear: f32, angular: f32) -> Result<(), RobotError> {
        let position = {
            let mut state = self.state()?;
            let p = &mut state.position;
            p.yaw += angular * DRIVE_STEP;
            p.x += linear * DRIVE_STEP * p.yaw.cos();
            p.y += linear * DRIVE_STEP * p.yaw.sin();
            *p
        };
        self.emit_position(position);
        Ok(())
    }

    fn turn_by(&self, degrees: i32) -> Result<(), RobotError> {
        let position = {
            let mut state = self.state()?;
            state.position.yaw += (degrees as f32).to_radians();
            state.position
        };
        self.emit_position(position);
        Ok(())
    }

    fn stop_movement(&self) -> Result<(), RobotError> {
        debug!("[robot] stop movement");
        self.emit(RobotEvent::MovementStatus {
            kind: "skidJoy".to_owned(),
            status: "idle".to_owned(),
        });
        Ok(())
    }

    fn go_to(&self, location: &str) -> Result<(), RobotError> {
        if !self.state()?.locations.iter().any(|l| l == location) {
            return Err(RobotError::new(format!("no such location: {location}")));
        }

        for status in ["start", "complete"] {
            self.emit(RobotEvent::GoToStatus {
                location: location.to_owned(),
                status: status.to_owned(),
                description: String::new(),
            });
        }
        Ok(())
    }

    fn locations(&self) -> Result<Vec<String>, RobotError> {
        Ok(self.state()?.locations.clone())
    }

    fn save_location(&self, name: &str) -> Result<bool, RobotError> {
        if name.trim().is_empty() {
            return Ok(false);
        }
        let mut state = self.state()?;
        if !state.locations.iter().any(|l| l == name) {
            state.locations.push(name.to_owned());
        }
        Ok(true)
    }

    fn delete_location(&self, name: &str) -> Result<bool, RobotError> {
        let mut state = self.state()?;
        let before = state.locations.len();
        state.locations.retain(|l| l != name);
        Ok(state.locations.len() != before)
    }

    fn tilt_angle(&self, degrees: i32) -> Result<(), RobotError> {
        self.state()?.tilt = degrees;
        Ok(())
    }

    fn set_volume(&self, level: u8) -> Result<(), RobotError> {
        self.state()?.volume = level;
        Ok(())
    }
}
