mod error;
mod routes;
mod server_config;
use server_config::AppConfig;

use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use log::info;

use realty_ledger::{PersistenceAdapter, config::DEFAULT_LOG_FILTER};

const SERVER_CONFIG: &str = "resources/server.toml";

#[derive(Parser, Debug)]
#[clap(version, about = "Serve realty ledgers over HTTP")]
struct Cli {
    /// Server config file
    #[clap(short, long, value_parser, default_value = SERVER_CONFIG)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(DEFAULT_LOG_FILTER));
    let args = Cli::parse();

    let config = AppConfig::read(&args.config)
        .with_context(|| format!("failed to read app configuration from {}", args.config.display()))?;
    // the remote client blocks while starting up, so build it off the runtime
    let storage = config.storage;
    let adapter = tokio::task::spawn_blocking(move || PersistenceAdapter::from_config(&storage)).await??;

    let addr = config.server.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", addr);

    axum::serve(listener, routes::router(adapter)).await?;
    Ok(())
}
