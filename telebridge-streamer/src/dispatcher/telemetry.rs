use crate::dispatcher::Dispatcher;
use crate::ports::RobotEvent;
use telebridge_core::{ControlMessage, NavigationStatus, PositionUpdate, TiltAngle, now_millis};
use tracing::{debug, info, warn};

const MOVEMENT_IDLE: &str = "idle";

impl Dispatcher {
    /// Колбэк робота -> сообщения для зрителя.
    /// Если канал управления закрыт, сессия их просто выбросит.
    pub fn on_robot_event(&mut self, event: RobotEvent) -> Vec<ControlMessage> {
        match event {
            RobotEvent::Ready(true) => {
                info!("Robot ready, loading locations");
                self.state.robot_ready = true;
                // Текущий наклон SDK не отдаёт, считаем что голова по центру
                self.state.tilt = TiltAngle::CENTER;
                if let Err(e) = self.refresh_locations() {
                    warn!("Failed to load saved locations: {}", e);
                }
                vec![ControlMessage::LocationUpdate(self.state.location_update())]
            }

            RobotEvent::Ready(false) => {
                info!("Robot not ready");
                self.state.robot_ready = false;
                Vec::new()
            }

            RobotEvent::GoToStatus {
                location,
                status,
                description,
            } => {
                debug!("Navigation status: {} to {} - {}", status, location, description);
                vec![ControlMessage::NavigationStatus(NavigationStatus {
                    location,
                    status,
                    description,
                    timestamp_ms: now_millis(),
                })]
            }

            RobotEvent::MovementStatus { kind, status } => {
                debug!("Movement status: {} - {}", kind, status);
                if status == MOVEMENT_IDLE {
                    self.state.is_moving = false;
                }
                Vec::new()
            }

            RobotEvent::PositionChanged(position) => {
                self.state.position = Some(position);
                vec![ControlMessage::PositionUpdate(PositionUpdate::new(
                    position,
                    self.state.tilt,
                    now_millis(),
                ))]
            }
        }
    }
}
