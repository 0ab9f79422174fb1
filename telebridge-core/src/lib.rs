pub mod codec;
pub mod model;
mod time;

pub use codec::CodecError;
pub use model::*;
pub use time::now_millis;
