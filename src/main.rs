use axum::{
    routing::{get, post},
    Extension, Router,
};
use distributed_calculator::agent;
use distributed_calculator::api::handlers::{
    handle_calculate, handle_expression_by_id, handle_expressions, handle_login, handle_register,
};
use distributed_calculator::config::Config;
use distributed_calculator::engine::dispatcher::Dispatcher;
use distributed_calculator::service::handlers::{handle_get_task, handle_submit_result};
use distributed_calculator::service::protocol::{ENDPOINT_GET_TASK, ENDPOINT_SUBMIT_RESULT};
use distributed_calculator::storage::memory::Storage;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(Config::from_env());
    let storage = Storage::new();
    let dispatcher = Dispatcher::new();

    // 1. Worker pool. Workers talk to the task service over HTTP exactly as
    //    an external agent process would; until the service is up they retry
    //    with their fixed backoff.
    agent::start(config.clone());

    // 2. Worker-facing task service:
    let task_app = Router::new()
        .route(ENDPOINT_GET_TASK, get(handle_get_task))
        .route(ENDPOINT_SUBMIT_RESULT, post(handle_submit_result))
        .layer(Extension(dispatcher.clone()))
        .layer(Extension(storage.clone()))
        .layer(Extension(config.clone()));

    let task_listener = tokio::net::TcpListener::bind(config.task_addr).await?;
    tracing::info!("task service listening on {}", config.task_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(task_listener, task_app).await {
            tracing::error!("task service stopped: {}", e);
        }
    });

    // 3. User-facing HTTP API:
    let api_app = Router::new()
        .route("/api/v1/register", post(handle_register))
        .route("/api/v1/login", post(handle_login))
        .route("/api/v1/calculate", post(handle_calculate))
        .route("/api/v1/expressions", get(handle_expressions))
        .route("/api/v1/expressions/:id", get(handle_expression_by_id))
        .layer(Extension(dispatcher))
        .layer(Extension(storage))
        .layer(Extension(config.clone()));

    let api_listener = tokio::net::TcpListener::bind(config.api_addr).await?;
    tracing::info!("HTTP API listening on {}", config.api_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(api_listener, api_app).await?;

    Ok(())
}
