mod codec_error;
mod json_codec;

pub use codec_error::CodecError;
pub use json_codec::*;
