use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use strongbox_cache::SecretCache;
use strongbox_cli::{Cli, commands};
use strongbox_client::{SecretApiClient, SecretKeeper};
use strongbox_crypto::derive_key;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.config.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config;
    let key = derive_key(&config.crypto_key);

    let cache = SecretCache::open(&config.cache, key.clone())
        .with_context(|| format!("failed to open cache at {}", config.cache.display()))?;
    let cache = Arc::new(cache);
    if cache.is_wrong_key() {
        warn!(
            "cache at {} was written with a different CRYPTO_KEY; run `strongbox reset-cache` to discard it",
            config.cache.display()
        );
    }

    let client_config = config.client_config();
    let client = SecretApiClient::new(&client_config, key)?;
    debug!("using server {}", client.api_root());

    let keeper = SecretKeeper::new(Arc::new(client), Arc::clone(&cache))
        .with_config(&client_config);
    if let Some(token) = config.token {
        keeper.set_token(token).await;
    }

    let mut stdout = std::io::stdout();
    let result = commands::execute(cli.command, &keeper, &mut stdout).await;

    if let Err(e) = cache.close() {
        warn!("failed to close cache: {e}");
    }
    result
}
