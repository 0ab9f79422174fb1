use crate::broker::{
    BrokerService, command_handler, commands_handler, emergency_stop_handler, health_handler,
    robot_status_handler, stats_handler, ws_handler,
};
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// HTTP-приложение брокера: `/ws` для сигналинга, остальное для мониторинга и внешних интеграций.
pub fn router(service: BrokerService) -> Router {
    // Зритель открывает страницу с другого origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/robot/status", get(robot_status_handler))
        .route("/robot/commands", get(commands_handler))
        .route("/robot/emergency-stop", post(emergency_stop_handler))
        .route("/robot/command", post(command_handler))
        .layer(cors)
        .with_state(service)
}

/// Обслуживать брокер на уже открытом сокете до ошибки.
pub async fn serve(listener: TcpListener, service: BrokerService) -> std::io::Result<()> {
    axum::serve(listener, router(service)).await
}
