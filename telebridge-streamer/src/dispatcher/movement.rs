use std::fmt;
use std::str::FromStr;

pub const MOVE_SPEED: f32 = 0.5;
pub const TURN_STEP_DEGREES: i32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    TurnLeft,
    TurnRight,
}

/// Во что направление превращается на стороне робота.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Drive { linear: f32, angular: f32 },
    /// Поворот на месте, `isMoving` не выставляет.
    Turn(i32),
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::TurnLeft => "turn_left",
            Direction::TurnRight => "turn_right",
        }
    }

    pub fn motion(self) -> Motion {
        match self {
            Direction::Forward => Motion::Drive {
                linear: MOVE_SPEED,
                angular: 0.0,
            },
            Direction::Backward => Motion::Drive {
                linear: -MOVE_SPEED,
                angular: 0.0,
            },
            Direction::Left => Motion::Drive {
                linear: 0.0,
                angular: MOVE_SPEED,
            },
            Direction::Right => Motion::Drive {
                linear: 0.0,
                angular: -MOVE_SPEED,
            },
            Direction::TurnLeft => Motion::Turn(-TURN_STEP_DEGREES),
            Direction::TurnRight => Motion::Turn(TURN_STEP_DEGREES),
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "turn_left" => Ok(Direction::TurnLeft),
            "turn_right" => Ok(Direction::TurnRight),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
