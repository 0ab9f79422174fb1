use crate::model::{RobotCommand, RobotResponse};
use serde::{Deserialize, Serialize};

/// Сообщения, которыми стример обменивается с брокером по WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalingMessage {
    /// Регистрация в роли стримера.
    Streamer,
    ViewerReady,
    ViewerDisconnected,
    Offer {
        offer: SessionDescription,
    },
    Answer {
        answer: SessionDescription,
    },
    Candidate {
        candidate: IceCandidate,
    },
    /// Команда через брокер: HTTP API брокера или зритель без канала данных.
    #[serde(rename = "robot_command")]
    RobotCommand(RobotCommand),
    /// Ответ на команду, пришедшую через брокер.
    #[serde(rename = "robot_response")]
    RobotResponse(RobotResponse),
    /// Любой незнакомый `type`.
    #[serde(other)]
    Unknown,
}

impl SignalingMessage {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self::Offer {
            offer: SessionDescription {
                kind: Some(SdpKind::Offer),
                sdp: sdp.into(),
            },
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self::Answer {
            answer: SessionDescription {
                kind: Some(SdpKind::Answer),
                sdp: sdp.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SdpKind>,
    pub sdp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    #[serde(rename = "sdpMid")]
    pub sdp_mid: String,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: u16,
    pub candidate: String,
}
