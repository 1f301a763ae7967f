use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::users;
use crate::db::repo::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users/ping", get(users::ping))
        .route("/users", get(users::get_users).post(users::add_user))
        .route("/users/{id}", get(users::get_single_user))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(store: UserStore, bind_addr: SocketAddr) -> std::io::Result<()> {
    let state = Arc::new(AppState { store });
    let app = router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    info!(addr = %listener.local_addr()?, "users service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
