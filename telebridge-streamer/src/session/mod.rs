mod peer_event;
mod peer_state;
mod session;
mod session_error;

pub use peer_event::*;
pub use peer_state::*;
pub use session::*;
pub use session_error::*;
