mod bridge_config;
mod bridge_status;
mod coordinator;
mod coordinator_command;
mod coordinator_error;
mod coordinator_handle;

pub use bridge_config::*;
pub use bridge_status::*;
pub use coordinator::*;
pub use coordinator_command::*;
pub use coordinator_error::*;
pub use coordinator_handle::*;
