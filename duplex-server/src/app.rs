use crate::{HubConfig, RoomManager, SignalingService, ws_handler};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub struct AppState {
    pub signaling: SignalingService,
    pub room_manager: RoomManager,
}

impl AppState {
    pub fn new(config: &HubConfig) -> Arc<Self> {
        let signaling = SignalingService::new(config.ice_servers.clone());
        let room_manager = RoomManager::new(config.room_capacity, Arc::new(signaling.clone()));

        Arc::new(Self {
            signaling,
            room_manager,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: HubConfig) -> anyhow::Result<()> {
    let state = AppState::new(&config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Signaling hub listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Signaling hub stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
