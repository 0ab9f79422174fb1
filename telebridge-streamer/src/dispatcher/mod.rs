mod command_error;
mod dispatcher;
mod movement;
mod params;
mod robot_state;
mod seen_commands;
mod telemetry;

pub use command_error::*;
pub use dispatcher::*;
pub use movement::*;
pub use params::*;
pub use robot_state::*;
pub use seen_commands::*;
