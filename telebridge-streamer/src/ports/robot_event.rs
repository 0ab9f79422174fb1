use telebridge_core::Position;

/// Колбэки робота, доставляемые в координатор через mpsc.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotEvent {
    Ready(bool),

    GoToStatus {
        location: String,
        status: String,
        description: String,
    },

    MovementStatus {
        kind: String,
        status: String,
    },

    PositionChanged(Position),
}
