use telebridge_core::{CodecError, SignalingMessage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("signaling channel is not open")]
    NotOpen,

    #[error("failed to encode signaling message: {0}")]
    Encode(#[from] CodecError),

    #[error("failed to connect to broker: {0}")]
    Connect(String),
}

/// Трейт, через который сессия отправляет сообщения брокеру (offer, ICE).
/// Отправка неблокирующая: сообщение ставится в очередь writer-задачи.
pub trait SignalingOutput: Send + Sync {
    fn send(&self, msg: SignalingMessage) -> Result<(), TransportError>;
}
