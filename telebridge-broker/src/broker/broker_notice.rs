use crate::broker::{CommandRecord, RobotStatus};
use serde::Serialize;

pub const SERVER_VERSION: &str = "2.0.0";

/// Сообщения, которые брокер формирует сам, а не пересылает.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum BrokerNotice {
    #[serde(rename = "connection_established")]
    ConnectionEstablished {
        timestamp: u64,
        #[serde(rename = "serverVersion")]
        server_version: &'static str,
    },
    #[serde(rename = "viewer-ready")]
    ViewerReady,
    #[serde(rename = "streamer-ready")]
    StreamerReady,
    #[serde(rename = "viewer-disconnected")]
    ViewerDisconnected,
    #[serde(rename = "streamer-disconnected")]
    StreamerDisconnected,
    #[serde(rename = "pong")]
    Pong { timestamp: u64 },
    #[serde(rename = "robot_status")]
    RobotStatus { status: RobotStatus },
    #[serde(rename = "command_history")]
    CommandHistory { commands: Vec<CommandRecord> },
    /// Ответ зрителю, когда команду некому доставить.
    #[serde(rename = "robot_response")]
    RobotUnavailable {
        success: bool,
        error: &'static str,
        #[serde(rename = "commandId", skip_serializing_if = "Option::is_none")]
        command_id: Option<String>,
    },
}

impl BrokerNotice {
    pub fn robot_unavailable(command_id: Option<String>) -> Self {
        Self::RobotUnavailable {
            success: false,
            error: "Robot not connected",
            command_id,
        }
    }
}
