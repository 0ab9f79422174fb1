use crate::session::PeerEventSink;
use crate::transport::IceConfig;
use anyhow::Result;
use async_trait::async_trait;
use telebridge_core::IceCandidate;

/// Одно установленное (или устанавливаемое) медиа-соединение с зрителем.
/// Локальные треки и канал `robotControl` создаются при подключении.
#[async_trait]
pub trait MediaPort: Send + Sync {
    /// Создать offer и выставить его как local description. Возвращает SDP.
    async fn create_offer(&self) -> Result<String>;

    async fn set_remote_answer(&self, sdp: String) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn send_control(&self, text: String) -> Result<()>;

    async fn close_control(&self) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Фабрика медиа-соединений. Колбэки соединения держат только `PeerEventSink`.
#[async_trait]
pub trait MediaConnector: Send + Sync {
    async fn connect(&self, ice: &IceConfig, events: PeerEventSink) -> Result<Box<dyn MediaPort>>;
}
