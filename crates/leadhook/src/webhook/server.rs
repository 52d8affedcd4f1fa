use std::{sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::AppConfig,
    engine::Engine,
    graph::GraphClient,
    http_client::{HttpClientFactory, MAX_REQUEST_SIZE},
    notify::SheetNotifier,
    session::{sweep_loop, SessionStore},
};

use super::{
    handlers::{handle_events, handle_verify, health_check, metrics},
    processing::process_queue_loop,
    state::AppState,
};

/// Start the webhook server
pub async fn start_webhook_server(config: AppConfig) -> eyre::Result<()> {
    let port = config.port;
    let config = Arc::new(config);

    // Bounded queue between the webhook handlers and the conversation engine
    let (tx, rx) = mpsc::channel(100);

    let http_client_factory = HttpClientFactory::new();
    let client = http_client_factory.create_client()?;

    let sessions = Arc::new(SessionStore::new(Duration::from_secs(config.session_ttl_secs)));
    let replies = Arc::new(GraphClient::new(
        client.clone(),
        config.graph_api_base.clone(),
        config.ig_account_id.clone(),
        config.page_access_token.clone(),
    ));
    let leads = Arc::new(SheetNotifier::new(client, config.sheet_webhook_url.clone()));
    let engine = Arc::new(Engine::new(sessions.clone(), replies, leads));

    // Spawn background processor
    tokio::spawn(async move {
        process_queue_loop(rx, engine).await;
    });

    // Spawn session sweep task
    let sweep_sessions = sessions.clone();
    let sweep_interval = Duration::from_secs(config.sweep_interval_secs);
    tokio::spawn(async move {
        sweep_loop(sweep_sessions, sweep_interval).await;
    });

    // Create the router
    let app = create_router(AppState::new(config, tx));

    // Start the server
    let addr = format!("0.0.0.0:{}", port);
    info!("Webhook server listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;

    Ok(())
}

/// Create the Axum router with all routes and middleware
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(handle_verify).post(handle_events))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(MAX_REQUEST_SIZE))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
