use serde::{Deserialize, Serialize};
use std::fmt;

/// Поза робота на карте.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub yaw: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, yaw: f32) -> Self {
        Self { x, y, yaw }
    }
}

/// Наклон головы в градусах. Любой конструктор зажимает значение в `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct TiltAngle(i32);

impl TiltAngle {
    pub const MIN: i32 = -25;
    pub const MAX: i32 = 55;
    pub const CENTER: TiltAngle = TiltAngle(0);

    pub fn clamped(degrees: i64) -> Self {
        Self(degrees.clamp(Self::MIN as i64, Self::MAX as i64) as i32)
    }

    pub fn degrees(self) -> i32 {
        self.0
    }

    pub fn raised_by(self, step: i64) -> Self {
        Self::clamped((self.0 as i64).saturating_add(step))
    }

    pub fn lowered_by(self, step: i64) -> Self {
        Self::clamped((self.0 as i64).saturating_sub(step))
    }
}

impl<'de> Deserialize<'de> for TiltAngle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(Self::clamped(raw))
    }
}

impl fmt::Display for TiltAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
