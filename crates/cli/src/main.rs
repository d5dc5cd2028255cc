use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use batchflow_core::{
    load_config, validate_config, Action, CommandAction, Orchestrator, CONFIG_PATH_ENV,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file used when none is given
const DEFAULT_CONFIG: &str = "batchflow.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("batchflow v{}", VERSION);

    let config_path = resolve_config_path(
        std::env::args().nth(1),
        std::env::var(CONFIG_PATH_ENV).ok(),
    );

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    debug!(
        "Effective configuration: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );

    let command = config
        .action
        .clone()
        .context("No [action] section configured")?;
    let action: Arc<dyn Action> = Arc::new(CommandAction::new(command));
    info!("Using action: {}", action.name());

    let summary = Orchestrator::new(config, action)
        .run()
        .await
        .context("Batch run failed")?;

    info!("{}", summary);
    Ok(())
}

/// Pick the config file: explicit argument, then environment, then default.
fn resolve_config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}
