use crate::config::Config;
use crate::details::{collect_repository_details, RepositoryDetails};
use crate::error::Result;
use crate::github::client::GitHubClient;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GitHubClient>,
    pub branch_concurrency: usize,
}

impl AppState {
    pub fn new(client: GitHubClient, branch_concurrency: usize) -> Self {
        Self {
            client: Arc::new(client),
            branch_concurrency,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/:username", get(user_repositories))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn user_repositories(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<RepositoryDetails>>> {
    let details =
        collect_repository_details(&state.client, &username, state.branch_concurrency).await?;
    tracing::info!(%username, repositories = details.len(), "resolved repositories");
    Ok(Json(details))
}

pub async fn serve(config: Config) -> Result<()> {
    let client = GitHubClient::new(&config.api_base_url, config.github_token.as_deref())?;
    let state = AppState::new(client, config.branch_concurrency());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, upstream = %config.api_base_url, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
