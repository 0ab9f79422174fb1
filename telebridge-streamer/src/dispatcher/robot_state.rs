use telebridge_core::{LocationUpdate, Position, PositionSnapshot, TiltAngle};

/// Что стример знает о роботе. Порт робота остаётся источником истины для списка локаций.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RobotState {
    pub robot_ready: bool,
    pub is_moving: bool,
    pub tilt: TiltAngle,
    /// Последняя известная поза; `None`, пока робот её не сообщил.
    pub position: Option<Position>,
    pub locations: Vec<String>,
}

impl RobotState {
    pub fn snapshot(&self) -> Option<PositionSnapshot> {
        self.position.map(|p| PositionSnapshot::new(p, self.tilt))
    }

    pub fn location_update(&self) -> LocationUpdate {
        LocationUpdate {
            locations: self.locations.clone(),
            current_position: self.snapshot(),
        }
    }

    pub fn has_location(&self, name: &str) -> bool {
        self.locations.iter().any(|l| l == name)
    }
}
