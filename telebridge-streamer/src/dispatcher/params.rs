use crate::dispatcher::CommandError;
use serde_json::Value;
use telebridge_core::RobotCommand;

/// Доступ к `params` команды с приведением типов.
/// `null` считается отсутствующим параметром.
pub struct Params<'a> {
    cmd: &'a RobotCommand,
}

impl<'a> Params<'a> {
    pub fn of(cmd: &'a RobotCommand) -> Self {
        Self { cmd }
    }

    fn raw(&self, key: &str) -> Option<&'a Value> {
        self.cmd.param(key).filter(|v| !v.is_null())
    }

    /// Строковый параметр. Числа и булевы значения принимаются в текстовом виде.
    pub fn text(&self, key: &'static str) -> Result<Option<String>, CommandError> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
            Some(_) => Err(CommandError::InvalidParam(key)),
        }
    }

    pub fn require_text(&self, key: &'static str, label: &'static str) -> Result<String, CommandError> {
        self.text(key)?.ok_or(CommandError::MissingParam(label))
    }

    /// Целый параметр: целое, дробное (отбрасываем дробную часть) или числовая строка.
    pub fn int(&self, key: &'static str) -> Result<Option<i64>, CommandError> {
        let Some(value) = self.raw(key) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            _ => None,
        };

        parsed.map(Some).ok_or(CommandError::InvalidParam(key))
    }

    pub fn require_int(&self, key: &'static str, label: &'static str) -> Result<i64, CommandError> {
        self.int(key)?.ok_or(CommandError::MissingParam(label))
    }
}
