use thiserror::Error;

/// Ошибка SDK робота. Текст уходит зрителю как `Error: <msg>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RobotError(pub String);

impl RobotError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Исполнительные возможности робота.
/// Вызовы синхронные: долгие эффекты (навигация, движение) сообщаются через `RobotEvent`.
pub trait RobotPort: Send + Sync {
    /// `cutting = true` прерывает текущую речь.
    fn speak(&self, text: &str, cutting: bool) -> Result<(), RobotError>;

    fn skid_joy(&self, linear: f32, angular: f32) -> Result<(), RobotError>;

    fn turn_by(&self, degrees: i32) -> Result<(), RobotError>;

    fn stop_movement(&self) -> Result<(), RobotError>;

    fn go_to(&self, location: &str) -> Result<(), RobotError>;

    fn locations(&self) -> Result<Vec<String>, RobotError>;

    fn save_location(&self, name: &str) -> Result<bool, RobotError>;

    fn delete_location(&self, name: &str) -> Result<bool, RobotError>;

    fn tilt_angle(&self, degrees: i32) -> Result<(), RobotError>;

    fn set_volume(&self, level: u8) -> Result<(), RobotError>;
}
