use crate::signaling::ReconnectPolicy;
use crate::transport::IceConfig;

pub const DEFAULT_BROKER_URL: &str = "ws://127.0.0.1:3000/ws";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub broker_url: String,
    pub ice: IceConfig,
    pub reconnect: ReconnectPolicy,
    /// Стартовать стрим сам, как только готовы и зритель, и робот.
    pub auto_start: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            broker_url: DEFAULT_BROKER_URL.to_owned(),
            ice: IceConfig::default(),
            reconnect: ReconnectPolicy::default(),
            auto_start: false,
        }
    }
}
