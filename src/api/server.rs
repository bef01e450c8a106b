use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{decompression::RequestDecompressionLayer, trace::TraceLayer};
use tracing::info;

use super::{
    services::{delete_page, health, issue_nonce, list_pages, load_page, save_page, serve_page},
    state::AppState,
};
use crate::auth::StaticTokenAuth;
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Room for JSON escaping and the other fields around `html_content`
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Every route, bound to one shared state
pub fn router(state: AppState) -> Router {
    let content_limit = usize::try_from(state.config.editor.max_content_bytes.as_u64())
        .unwrap_or(usize::MAX);
    let body_limit = content_limit
        .saturating_mul(2)
        .saturating_add(BODY_OVERHEAD_BYTES);

    Router::new()
        .route("/custom-page/{name}", get(serve_page))
        .route("/custom-page/{name}/", get(serve_page))
        .route("/editor/nonce", get(issue_nonce))
        .route("/editor/pages", get(list_pages))
        .route("/editor/pages/save", post(save_page))
        .route("/editor/pages/load", post(load_page))
        .route("/editor/pages/delete", post(delete_page))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        // Handles Content-Encoding on request bodies before extractors run
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config, address: Option<SocketAddr>) -> Result<(), AnyError> {
    let address = address.unwrap_or(config.server.bind_addr);

    let auth = Arc::new(StaticTokenAuth::from_config(&config.auth));
    info!(users = config.auth.users.len(), "Loaded editor accounts");

    let state = AppState::new(config, auth);
    info!(root = %state.store.root().display(), "Opening page directory");
    state
        .store
        .ensure_dir()
        .await
        .map_err(|e| format!("Failed to prepare page directory: {}", e))?;

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "pagebox listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
