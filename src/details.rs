use crate::error::{Result, ServiceError};
use crate::github::client::{is_not_found, GitHubClient};
use crate::github::types::Repository;
use futures::{stream, StreamExt, TryStreamExt};
use serde::Serialize;

/// One entry of the `GET /{username}` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDetails {
    pub repo_name: String,
    pub owner_login: Option<String>,
    /// `"<branch>, <latest sha>"`, in upstream branch order.
    pub branches: Vec<String>,
}

/// Non-fork repositories of `username`. An unknown user maps to
/// [`ServiceError::UserNotFound`].
pub async fn list_repositories(client: &GitHubClient, username: &str) -> Result<Vec<Repository>> {
    let repos = match client.fetch_user_repos(username).await {
        Ok(repos) => repos,
        Err(ServiceError::Upstream(e)) if is_not_found(&e) => {
            tracing::info!(username, "user not found upstream");
            return Err(ServiceError::UserNotFound(username.to_string()));
        }
        Err(e) => return Err(e),
    };

    Ok(repos.into_iter().filter(|r| !r.fork).collect())
}

pub async fn owner_login(client: &GitHubClient, username: &str, repo: &str) -> Result<Option<String>> {
    let info = client.fetch_repo(username, repo).await?;
    Ok(info.owner.and_then(|o| o.login))
}

pub async fn latest_commit_sha(
    client: &GitHubClient,
    username: &str,
    repo: &str,
    branch: &str,
) -> Result<Option<String>> {
    let commits = client.fetch_commits(username, repo, branch).await?;
    Ok(commits.into_iter().next().map(|c| c.sha))
}

/// Branches of `repo` formatted as `"name, sha"`. At most `concurrency`
/// commit lookups are in flight; output order always follows upstream.
pub async fn branch_entries(
    client: &GitHubClient,
    username: &str,
    repo: &str,
    concurrency: usize,
) -> Result<Vec<String>> {
    let branches = client.fetch_branches(username, repo).await?;

    stream::iter(branches)
        .map(|branch| async move {
            let sha = latest_commit_sha(client, username, repo, &branch.name).await?;
            Ok::<_, ServiceError>(format_branch(&branch.name, sha.as_deref()))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

pub fn format_branch(name: &str, sha: Option<&str>) -> String {
    format!("{name}, {}", sha.unwrap_or("null"))
}

pub async fn collect_repository_details(
    client: &GitHubClient,
    username: &str,
    branch_concurrency: usize,
) -> Result<Vec<RepositoryDetails>> {
    let repos = list_repositories(client, username).await?;
    tracing::debug!(username, count = repos.len(), "resolving repositories");

    let mut details = Vec::with_capacity(repos.len());
    for repo in repos {
        let owner_login = owner_login(client, username, &repo.name).await?;
        let branches = branch_entries(client, username, &repo.name, branch_concurrency).await?;
        details.push(RepositoryDetails {
            repo_name: repo.name,
            owner_login,
            branches,
        });
    }

    Ok(details)
}
