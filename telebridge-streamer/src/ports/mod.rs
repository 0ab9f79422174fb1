mod media_port;
mod robot_event;
mod robot_port;

pub use media_port::*;
pub use robot_event::*;
pub use robot_port::*;
