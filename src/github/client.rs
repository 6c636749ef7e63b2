use crate::error::{Result, ServiceError};
use crate::github::types::{Branch, Commit, Repository};
use axum::http::StatusCode;
use octocrab::Octocrab;
use urlencoding::encode;

/// Thin wrapper over the upstream REST API. Built once at startup and shared
/// by every request.
#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(base_url)
            .map_err(|e| ServiceError::Config(format!("invalid api_base_url {base_url}: {e}")))?;
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        let octo = builder
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self { octo })
    }

    pub async fn fetch_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let route = format!("/users/{}/repos", encode(username));
        tracing::debug!(%route, "fetching user repositories");
        Ok(self.octo.get(route, None::<&()>).await?)
    }

    pub async fn fetch_repo(&self, owner: &str, repo: &str) -> Result<Repository> {
        let route = repo_route(owner, repo, "");
        tracing::debug!(%route, "fetching repository");
        Ok(self.octo.get(route, None::<&()>).await?)
    }

    pub async fn fetch_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>> {
        let route = repo_route(owner, repo, "/branches");
        tracing::debug!(%route, "fetching branches");
        Ok(self.octo.get(route, None::<&()>).await?)
    }

    /// Commits reachable from `sha`, newest first.
    pub async fn fetch_commits(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<Commit>> {
        let route = repo_route(owner, repo, "/commits");
        tracing::debug!(%route, sha, "fetching commits");
        Ok(self.octo.get(route, Some(&[("sha", sha)])).await?)
    }
}

/// Path segments arrive percent-decoded from the inbound route, so they are
/// re-encoded before being spliced into the upstream path.
fn repo_route(owner: &str, repo: &str, suffix: &str) -> String {
    format!("/repos/{}/{}{suffix}", encode(owner), encode(repo))
}

pub fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(
        err,
        octocrab::Error::GitHub { source, .. } if source.status_code == StatusCode::NOT_FOUND
    )
}
