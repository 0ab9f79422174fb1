use crate::coordinator::{BridgeStatus, CoordinatorError};
use tokio::sync::oneshot;

/// Команды, поступающие в координатор от локального пользователя (CLI, UI).
#[derive(Debug)]
pub enum CoordinatorCommand {
    Start {
        reply: oneshot::Sender<Result<(), CoordinatorError>>,
    },

    Stop {
        reply: oneshot::Sender<()>,
    },

    Status {
        reply: oneshot::Sender<BridgeStatus>,
    },

    /// Остановить сессию и завершить цикл координатора.
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}
