mod connection_wrapper;
mod local_tracks;
mod transport_config;

pub use connection_wrapper::*;
pub use local_tracks::*;
pub use transport_config::*;
