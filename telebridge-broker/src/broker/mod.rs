mod broker_notice;
mod broker_service;
mod command_log;
mod health;
mod http_api;
mod peer_role;
mod robot_status;
mod router;
mod ws_handler;

pub use broker_notice::*;
pub use broker_service::*;
pub use command_log::*;
pub use health::*;
pub use http_api::*;
pub use peer_role::*;
pub use robot_status::*;
pub use router::*;
pub use ws_handler::*;
