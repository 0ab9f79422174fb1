use telebridge_core::{IceCandidate, SessionId};
use tokio::sync::mpsc;

/// Состояние ICE-агента, как его видит сессия.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

/// События, которые медиа-соединение генерирует для координатора.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEventKind {
    /// Сгенерирован локальный ICE-кандидат, его нужно отправить зрителю через брокер.
    LocalCandidate(IceCandidate),
    IceConnectionState(IceState),
    ControlChannelOpen,
    ControlChannelClosed,
    /// Текстовый кадр из `robotControl`.
    ControlMessage(String),
    RenegotiationNeeded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeerEvent {
    pub session: SessionId,
    pub kind: PeerEventKind,
}

/// Единственное, что колбэки соединения знают о координаторе.
#[derive(Debug, Clone)]
pub struct PeerEventSink {
    session: SessionId,
    tx: mpsc::Sender<PeerEvent>,
}

impl PeerEventSink {
    pub fn new(session: SessionId, tx: mpsc::Sender<PeerEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Возвращает `false`, если координатор уже остановлен.
    pub async fn emit(&self, kind: PeerEventKind) -> bool {
        let event = PeerEvent {
            session: self.session,
            kind,
        };
        self.tx.send(event).await.is_ok()
    }
}
