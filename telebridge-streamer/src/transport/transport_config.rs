/// Конфигурация ICE для WebRTC. Только STUN, TURN не используется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceConfig {
    pub stun_servers: Vec<String>,
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            stun_servers: vec![
                "stun:stun.l.google.com:19302".to_owned(),
                "stun:stun1.l.google.com:19302".to_owned(),
            ],
        }
    }
}
