//! Server startup.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, task::JoinHandle, time::MissedTickBehavior};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    error::ServerError,
    ui::{
        handler::{get_room_detail, get_rooms, get_stats, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
    usecase::SweepUseCase,
};

/// Build the axum application.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/stats", get(get_stats))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{code}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    serve(listener, config, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sweep_interval = config.sweep_interval;
    let state = Arc::new(AppState::new(config));
    let sweeper = spawn_sweeper(
        SweepUseCase::new(state.repository.clone(), state.notifier.clone()),
        sweep_interval,
    );
    let app = create_app(state);

    tracing::info!("Listening on {}", listener.local_addr()?);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    sweeper.abort();
    tracing::info!("Server stopped");
    result.map_err(ServerError::from)
}

fn spawn_sweeper(sweep: SweepUseCase, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep.execute().await;
        }
    })
}
