use crate::session::PeerState;
use crate::signaling::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition { from: PeerState, to: PeerState },

    #[error("negotiation failed: {0}")]
    Negotiation(String),

    #[error("remote candidate applied before remote description")]
    CandidateBeforeRemoteDescription,

    #[error("signaling: {0}")]
    Transport(#[from] TransportError),
}
