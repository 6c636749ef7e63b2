use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub api_base_url: String,
    pub github_token: Option<String>,
    #[serde(default = "default_branch_concurrency")]
    pub branch_concurrency: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("api_base_url", &self.api_base_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("branch_concurrency", &self.branch_concurrency)
            .finish()
    }
}

fn default_branch_concurrency() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_base_url: "https://api.github.com".to_string(),
            github_token: None,
            branch_concurrency: default_branch_concurrency(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `GHREPOS_*` / `GITHUB_TOKEN`, then
    /// the `--bind` flag.
    pub fn load(config_path: Option<PathBuf>, bind: Option<SocketAddr>) -> Self {
        let config_file = config_path.unwrap_or_else(default_config_file);

        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if config_file.exists() {
            figment = figment.merge(Toml::file(&config_file));
        }

        figment = figment.merge(Env::prefixed("GHREPOS_")).merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "github_token".into()),
        );

        if let Some(addr) = bind {
            figment = figment.merge(Serialized::default("bind_addr", addr));
        }

        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("config parse error, using defaults: {e}");
                Config::default()
            }
        }
    }

    pub fn branch_concurrency(&self) -> usize {
        self.branch_concurrency.max(1)
    }
}

/// `<platform config dir>/ghrepos/config.toml`, falling back to the working
/// directory when the platform has no config dir.
fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ghrepos")
        .join("config.toml")
}
