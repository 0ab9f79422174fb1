use crate::ports::RobotError;
use thiserror::Error;

/// Причина отрицательного ответа. `Display` даёт ровно тот текст, что уходит зрителю.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Robot not ready")]
    NotReady,

    /// Метка параметра с заглавной буквы: `Direction`, `Volume level`.
    #[error("{0} parameter required")]
    MissingParam(&'static str),

    #[error("Invalid {0} parameter")]
    InvalidParam(&'static str),

    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    #[error("Location '{0}' not found")]
    UnknownLocation(String),

    #[error("No home location saved")]
    NoHomeLocation,

    #[error("Failed to save location")]
    SaveFailed,

    #[error("Failed to delete location")]
    DeleteFailed,

    #[error("Follow me mode not available")]
    FollowMeUnavailable,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Error: {0}")]
    Robot(#[from] RobotError),
}
