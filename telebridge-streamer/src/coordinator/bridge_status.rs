use crate::session::{ControlState, PeerState};
use telebridge_core::TiltAngle;

/// Снимок состояния координатора.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeStatus {
    pub signaling_connected: bool,
    pub viewer_ready: bool,
    pub robot_ready: bool,
    pub streaming: bool,
    pub peer_state: Option<PeerState>,
    pub control_state: Option<ControlState>,
    pub is_moving: bool,
    pub tilt: TiltAngle,
    pub locations: Vec<String>,
}

impl BridgeStatus {
    /// Можно ли сейчас нажать "старт".
    pub fn can_start(&self) -> bool {
        self.viewer_ready && self.robot_ready && !self.streaming
    }
}
