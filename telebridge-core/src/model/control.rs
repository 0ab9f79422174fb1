use crate::model::position::{Position, TiltAngle};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Сообщения канала `robotControl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    RobotCommand(RobotCommand),
    RobotResponse(RobotResponse),
    LocationUpdate(LocationUpdate),
    NavigationStatus(NavigationStatus),
    PositionUpdate(PositionUpdate),
    /// Чужие кадры (чат и т.п.).
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotCommand {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(rename = "commandId", default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl RobotCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            params: None,
            command_id: None,
        }
    }

    pub fn with_id(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = Some(command_id.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Идентификатор корреляции; пустая строка считается отсутствием.
    pub fn correlation_id(&self) -> Option<&str> {
        self.command_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotResponse {
    #[serde(rename = "commandId")]
    pub command_id: String,
    pub success: bool,
    pub message: String,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub locations: Vec<String>,
    #[serde(
        rename = "currentPosition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_position: Option<PositionSnapshot>,
}

/// Поза робота и наклон головы внутри `location_update`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub x: f32,
    pub y: f32,
    pub yaw: f32,
    #[serde(rename = "tiltAngle")]
    pub tilt_angle: TiltAngle,
}

impl PositionSnapshot {
    pub fn new(position: Position, tilt_angle: TiltAngle) -> Self {
        Self {
            x: position.x,
            y: position.y,
            yaw: position.yaw,
            tilt_angle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStatus {
    pub location: String,
    pub status: String,
    pub description: String,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub x: f32,
    pub y: f32,
    pub yaw: f32,
    #[serde(rename = "tiltAngle")]
    pub tilt_angle: TiltAngle,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

impl PositionUpdate {
    pub fn new(position: Position, tilt_angle: TiltAngle, timestamp_ms: u64) -> Self {
        Self {
            x: position.x,
            y: position.y,
            yaw: position.yaw,
            tilt_angle,
            timestamp_ms,
        }
    }
}
