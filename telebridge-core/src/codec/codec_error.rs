use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed JSON frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame has no `type` discriminator")]
    MissingType,
}
