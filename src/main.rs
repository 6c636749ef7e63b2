mod config;
mod details;
mod error;
mod github;
mod server;
#[cfg(test)]
mod test_utils;

use clap::Parser;
use config::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ghrepos", about = "Serve a GitHub user's non-fork repositories with branch heads")]
struct Cli {
    #[arg(long, short, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(long, short, help = "Address to listen on, e.g. 0.0.0.0:8080")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load(cli.config, cli.bind);
    tracing::debug!(?config, "loaded config");

    if let Err(e) = server::serve(config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
