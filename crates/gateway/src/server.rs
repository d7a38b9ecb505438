use {
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post},
    },
    std::{net::SocketAddr, sync::Arc},
    tokio::net::TcpListener,
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use crate::{routes, state::UtilsState};

/// Request body cap, JSON included.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Build the router. Exposed separately from [`start`] for tests.
pub fn build_app(state: Arc<UtilsState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/status", get(routes::status_handler))
        .route("/echo", post(routes::echo_handler))
        .route("/mock-webhook", post(routes::mock_webhook_handler))
        .route("/syncee/mock-webhook", post(routes::mock_webhook_handler))
        .route("/healthz", get(routes::healthz_handler));

    #[cfg(feature = "prometheus")]
    let router = router.route("/metrics", get(routes::prometheus_metrics_handler));

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind:port` and serve until the process is stopped.
pub async fn start(bind: &str, port: u16, state: UtilsState) -> anyhow::Result<()> {
    let listener = TcpListener::bind((bind, port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, service = %state.service_name, "utility server listening");

    let app = build_app(Arc::new(state));
    axum::serve(listener, app).await?;
    Ok(())
}
