use crate::coordinator::{BridgeStatus, CoordinatorCommand, CoordinatorError};
use tokio::sync::{mpsc, oneshot};

/// Клонируемый хэндл координатора. Каждый вызов ждёт ответа актора.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    pub fn new(tx: mpsc::Sender<CoordinatorCommand>) -> Self {
        Self { tx }
    }

    pub async fn start(&self) -> Result<(), CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorCommand::Start { reply }).await?;
        rx.await.map_err(|_| CoordinatorError::Stopped)?
    }

    pub async fn stop(&self) -> Result<(), CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorCommand::Stop { reply }).await?;
        rx.await.map_err(|_| CoordinatorError::Stopped)
    }

    pub async fn status(&self) -> Result<BridgeStatus, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorCommand::Status { reply }).await?;
        rx.await.map_err(|_| CoordinatorError::Stopped)
    }

    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorCommand::Shutdown { reply }).await?;
        rx.await.map_err(|_| CoordinatorError::Stopped)
    }

    async fn send(&self, cmd: CoordinatorCommand) -> Result<(), CoordinatorError> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| CoordinatorError::Stopped)
    }
}
