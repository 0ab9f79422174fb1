use crate::broker::{BrokerService, CommandRecord, RobotStatus};
use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connections {
    pub viewer: LinkState,
    pub streamer: LinkState,
}

/// Тело ответа `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    /// Epoch ms.
    pub timestamp: u64,
    pub connections: Connections,
    pub robot_status: RobotStatus,
    pub recent_commands: Vec<CommandRecord>,
    /// Секунды с запуска брокера.
    pub uptime: f64,
}

pub async fn health_handler(State(service): State<BrokerService>) -> Json<Health> {
    Json(service.health())
}
