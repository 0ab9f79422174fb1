use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Последняя команда, прошедшая через брокер от зрителя.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastCommand {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub timestamp: u64,
}

/// Что брокер знает о роботе. Робот может дописывать свои поля через `robot_status_update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotStatus {
    pub connected: bool,
    pub streaming: bool,
    pub position: Option<Value>,
    pub battery: Option<Value>,
    pub last_command: Option<LastCommand>,
    pub command_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RobotStatus {
    /// Наложить поля из `update` поверх текущих. Поле неверного типа отклоняет всё обновление.
    pub fn merge(&mut self, update: &Map<String, Value>) -> Result<(), serde_json::Error> {
        let mut merged = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.extend(update.iter().map(|(k, v)| (k.clone(), v.clone())));
        *self = serde_json::from_value(Value::Object(merged))?;
        Ok(())
    }

    pub fn record_command(&mut self, command: LastCommand) {
        self.last_command = Some(command);
        self.command_count += 1;
    }
}
