use serde::Deserialize;

/// Entry of `/users/{user}/repos` and body of `/repos/{owner}/{repo}`.
#[derive(Clone, Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub owner: Option<Owner>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Branch {
    pub name: String,
    #[allow(dead_code)]
    pub commit: BranchCommit,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BranchCommit {
    #[allow(dead_code)]
    pub sha: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Commit {
    pub sha: String,
}
