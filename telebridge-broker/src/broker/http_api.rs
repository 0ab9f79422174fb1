use crate::broker::{BrokerService, CommandRecord, CommandSource, PeerRole, RobotStatus};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use telebridge_core::now_millis;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
const STATS_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    pub status: RobotStatus,
    /// Epoch ms.
    pub last_update: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReply {
    pub commands: Vec<CommandRecord>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presence {
    pub viewer: bool,
    pub streamer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReply {
    pub total_commands: usize,
    pub commands_last_hour: usize,
    pub command_breakdown: BTreeMap<String, usize>,
    pub current_status: RobotStatus,
    pub server_uptime: f64,
    pub connections: Presence,
}

/// Ответ POST-эндпоинтов: `message` при успехе, `error` при отказе.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiReply {
    fn sent(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        let reply = Self {
            success: true,
            message: Some(message.into()),
            error: None,
        };
        (StatusCode::OK, Json(reply))
    }

    fn failed(code: StatusCode, error: impl Into<String>) -> (StatusCode, Json<Self>) {
        let reply = Self {
            success: false,
            message: None,
            error: Some(error.into()),
        };
        (code, Json(reply))
    }

    fn robot_not_connected() -> (StatusCode, Json<Self>) {
        Self::failed(StatusCode::SERVICE_UNAVAILABLE, "Robot not connected")
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

impl HistoryQuery {
    /// Не число или не больше нуля: значение по умолчанию.
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiCommand {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

pub async fn robot_status_handler(State(service): State<BrokerService>) -> Json<StatusReply> {
    Json(StatusReply {
        status: service.robot_status(),
        last_update: now_millis(),
    })
}

pub async fn commands_handler(
    State(service): State<BrokerService>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryReply> {
    let (commands, total) = service.command_history(query.limit());
    Json(HistoryReply { commands, total })
}

pub async fn stats_handler(State(service): State<BrokerService>) -> Json<StatsReply> {
    let stats = service.command_stats(STATS_WINDOW);
    Json(StatsReply {
        total_commands: stats.total,
        commands_last_hour: stats.last_hour,
        command_breakdown: stats.breakdown,
        current_status: service.robot_status(),
        server_uptime: service.uptime().as_secs_f64(),
        connections: Presence {
            viewer: service.is_connected(PeerRole::Viewer),
            streamer: service.is_connected(PeerRole::Streamer),
        },
    })
}

pub async fn emergency_stop_handler(
    State(service): State<BrokerService>,
) -> (StatusCode, Json<ApiReply>) {
    let params = Value::Object(Map::new());
    if !service.inject_command("emergency_stop", params, CommandSource::ApiEmergency) {
        return ApiReply::robot_not_connected();
    }
    ApiReply::sent("Emergency stop command sent to robot")
}

pub async fn command_handler(
    State(service): State<BrokerService>,
    Json(body): Json<ApiCommand>,
) -> (StatusCode, Json<ApiReply>) {
    let Some(command) = body.command.filter(|c| !c.is_empty()) else {
        return ApiReply::failed(StatusCode::BAD_REQUEST, "Command is required");
    };
    let params = Value::Object(body.params.unwrap_or_default());

    if !service.inject_command(&command, params, CommandSource::Api) {
        return ApiReply::robot_not_connected();
    }
    ApiReply::sent(format!("Command \"{command}\" sent to robot"))
}
