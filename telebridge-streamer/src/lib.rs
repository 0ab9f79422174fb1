pub mod coordinator;
pub mod dispatcher;
pub mod ports;
pub mod robot;
pub mod session;
pub mod signaling;
pub mod transport;

pub use coordinator::*;
pub use dispatcher::*;
pub use ports::*;
pub use robot::*;
pub use session::*;
pub use signaling::*;
pub use transport::*;
