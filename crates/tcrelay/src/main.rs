use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tcrelay::{logging, prelude::*};
use tcrelay_store::StoreBackend;

#[derive(Parser)]
#[command(
    name = "tcrelay",
    version,
    about = "Relay a game chat channel into a key-value message log"
)]
struct Cli {
    /// Path to the relay config
    #[arg(long, short, default_value = "tcrelay.toml")]
    config: PathBuf,
    /// Log at debug level (RUST_LOG still wins)
    #[arg(long, short)]
    verbose: bool,
    /// Play chat events back from a JSON-lines capture instead of a live
    /// server
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match RelayConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => return fail(&err.into()),
    };
    let version = match config.validate() {
        Ok(version) => version,
        Err(err) => return fail(&err.into()),
    };

    let Some(capture) = cli.replay.as_deref() else {
        return fail(&RelayError::NoClient);
    };

    // Config decides the log level, so nothing can be logged before here.
    logging::init(&config.logging, cli.verbose);
    tracing::debug!(path = %cli.config.display(), ?config, "config loaded");
    tracing::info!(%version, realm = %config.game.realm_name, "starting");

    match run(config, version, capture).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "relay stopped");
            fail(&err)
        }
    }
}

async fn run(
    config: RelayConfig,
    version: GameVersion,
    capture: &Path,
) -> Result<(), RelayError> {
    match config.store.backend {
        StoreBackend::Redis => {
            let kv = tcrelay_store::RedisStore::connect(&config.store).await?;
            relay(kv, config, version, capture).await
        }
        StoreBackend::Memory => {
            relay(MemoryStore::new(), config, version, capture).await
        }
    }
}

async fn relay<K: KvStore>(
    kv: K,
    config: RelayConfig,
    version: GameVersion,
    capture: &Path,
) -> Result<(), RelayError> {
    let store = Arc::new(MessageStore::new(kv, config.store.ttl()));
    let client = ReplayClient::new(
        capture,
        config.game.realm_name.clone(),
        vec![config.game.character.clone()],
    );
    Bridge::new(client, &config, version, store)
        .run(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn fail(err: &RelayError) -> ExitCode {
    eprintln!("tcrelay: {err}");
    ExitCode::from(err.exit_code())
}
