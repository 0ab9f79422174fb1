use telebridge_core::SignalingMessage;

/// События сигнального клиента для координатора.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalingEvent {
    /// Соединение установлено, регистрация `streamer` отправлена.
    Connected,
    Message(SignalingMessage),
    /// Соединение потеряно или не установилось.
    Disconnected(String),
}
