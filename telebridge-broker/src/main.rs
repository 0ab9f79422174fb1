use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use telebridge_broker::{BrokerService, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "telebridge-broker")]
#[command(about = "Signaling broker pairing one robot streamer with one viewer")]
struct Args {
    #[arg(long, env = "TELEBRIDGE_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Логирование
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    // 2. Сервис держит сокеты и слоты ролей
    let service = BrokerService::new();
    let app = router(service);

    // 3. Запуск слушателя
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!("Signaling broker listening on ws://{}/ws", args.bind);
    info!("Health check: http://{}/health", args.bind);
    info!("Robot status: http://{}/robot/status", args.bind);
    info!("Emergency stop: POST http://{}/robot/emergency-stop", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("server error")?;

    Ok(())
}
