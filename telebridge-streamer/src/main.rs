use anyhow::Result;
use clap::{ArgAction, Parser};
use std::sync::Arc;
use std::time::Duration;
use telebridge_streamer::{
    BridgeConfig, Coordinator, CoordinatorParts, DEFAULT_BROKER_URL, IceConfig, LocalTracks,
    ReconnectPolicy, SignalingClient, SimulatedRobot, WebRtcConnector,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "telebridge-streamer")]
#[command(about = "Robot-side WebRTC sender: streams to one viewer and executes its commands")]
struct Args {
    #[arg(long, env = "TELEBRIDGE_BROKER_URL", default_value = DEFAULT_BROKER_URL)]
    broker_url: String,

    /// STUN серверы через запятую. По умолчанию серверы Google.
    #[arg(long = "stun", env = "TELEBRIDGE_STUN", value_delimiter = ',')]
    stun: Vec<String>,

    #[arg(long, env = "TELEBRIDGE_AUTO_START", default_value_t = true, action = ArgAction::Set)]
    auto_start: bool,

    #[arg(long, env = "TELEBRIDGE_RECONNECT_ATTEMPTS", default_value_t = 0)]
    reconnect_attempts: u32,

    #[arg(long, default_value_t = 2000)]
    reconnect_delay_ms: u64,

    /// Сохранённые локации симулятора.
    #[arg(long, value_delimiter = ',', default_value = "home base")]
    locations: Vec<String>,
}

impl Args {
    fn bridge_config(&self) -> BridgeConfig {
        let ice = if self.stun.is_empty() {
            IceConfig::default()
        } else {
            IceConfig {
                stun_servers: self.stun.clone(),
            }
        };

        BridgeConfig {
            broker_url: self.broker_url.clone(),
            ice,
            reconnect: ReconnectPolicy::attempts(
                self.reconnect_attempts,
                Duration::from_millis(self.reconnect_delay_ms),
            ),
            auto_start: self.auto_start,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Логирование: уровень из RUST_LOG, по умолчанию info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.bridge_config();
    info!("Starting streamer, broker {}", config.broker_url);

    // 2. Робот (симулятор) и его колбэки
    let (robot_tx, robot_rx) = mpsc::channel(256);
    let robot = Arc::new(SimulatedRobot::new(robot_tx).with_locations(args.locations.clone()));

    // 3. Сигнальный клиент
    let (signaling_tx, signaling_rx) = mpsc::channel(256);
    let (signaling, signaling_task) =
        SignalingClient::spawn(config.broker_url.clone(), config.reconnect, signaling_tx);

    // 4. Медиа: треки пишет внешний конвейер захвата
    let media = WebRtcConnector::new(LocalTracks::new());

    let (coordinator, handle) = Coordinator::new(
        config,
        CoordinatorParts {
            robot: robot.clone(),
            media: Arc::new(media),
            signaling: Arc::new(signaling),
            signaling_rx,
            robot_rx,
        },
    );
    let coordinator_task = tokio::spawn(coordinator.run());

    robot.announce_ready();

    // 5. Ждём Ctrl+C
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    if let Err(e) = handle.shutdown().await {
        warn!("Coordinator already stopped: {}", e);
    }
    let _ = coordinator_task.await;
    signaling_task.abort();

    Ok(())
}
