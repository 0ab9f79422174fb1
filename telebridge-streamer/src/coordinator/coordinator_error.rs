use crate::session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("viewer and robot must both be ready")]
    NotReady,

    #[error("already streaming")]
    AlreadyStreaming,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("coordinator is stopped")]
    Stopped,
}
