#![cfg(test)]

use crate::github::client::GitHubClient;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

pub fn client_for(server: &ServerGuard) -> GitHubClient {
    GitHubClient::new(&server.url(), None).unwrap()
}

async fn json_mock(server: &mut ServerGuard, path: &str, body: serde_json::Value) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// `repos` is a list of `(name, fork)` pairs.
pub async fn mock_user_repos(server: &mut ServerGuard, user: &str, repos: &[(&str, bool)]) -> Mock {
    let body: Vec<_> = repos
        .iter()
        .map(|(name, fork)| {
            json!({
                "name": name,
                "fork": fork,
                "owner": { "login": user }
            })
        })
        .collect();
    json_mock(server, &format!("/users/{user}/repos"), json!(body)).await
}

pub async fn mock_repo(server: &mut ServerGuard, user: &str, repo: &str, owner: Option<&str>) -> Mock {
    let body = match owner {
        Some(login) => json!({ "name": repo, "fork": false, "owner": { "login": login } }),
        None => json!({ "name": repo, "fork": false }),
    };
    json_mock(server, &format!("/repos/{user}/{repo}"), body).await
}

pub async fn mock_branches(server: &mut ServerGuard, user: &str, repo: &str, names: &[&str]) -> Mock {
    let body: Vec<_> = names
        .iter()
        .map(|name| json!({ "name": name, "commit": { "sha": format!("{name}-head") } }))
        .collect();
    json_mock(server, &format!("/repos/{user}/{repo}/branches"), json!(body)).await
}

/// `shas` newest first, as upstream orders them.
pub async fn mock_commits(
    server: &mut ServerGuard,
    user: &str,
    repo: &str,
    branch: &str,
    shas: &[&str],
) -> Mock {
    let body: Vec<_> = shas.iter().map(|sha| json!({ "sha": sha })).collect();
    server
        .mock("GET", format!("/repos/{user}/{repo}/commits").as_str())
        .match_query(Matcher::UrlEncoded("sha".into(), branch.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!(body).to_string())
        .create_async()
        .await
}

pub async fn mock_user_not_found(server: &mut ServerGuard, user: &str) -> Mock {
    mock_upstream_failure(server, &format!("/users/{user}/repos"), 404).await
}

pub async fn mock_upstream_failure(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    let message = if status == 404 { "Not Found" } else { "API rate limit exceeded" };
    server
        .mock("GET", path)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            })
            .to_string(),
        )
        .create_async()
        .await
}

/// Mounts the single-repository `octocat` fixture.
pub async fn mock_octocat(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        mock_user_repos(server, "octocat", &[("Hello-World", false)]).await,
        mock_repo(server, "octocat", "Hello-World", Some("octocat")).await,
        mock_branches(server, "octocat", "Hello-World", &["master"]).await,
        mock_commits(server, "octocat", "Hello-World", "master", &["abc123", "0001"]).await,
    ]
}
