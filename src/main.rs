//! roombridge daemon.
//!
//! Reads decoded IRC peer events, one JSON object per line, from stdin and
//! applies them to the chat store until EOF or Ctrl-C.

use roombridge::App;
use roombridge::config::{self, Config};
use tokio::io::BufReader;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    info!(
        bridge = %config.bridge.name,
        database = %config.database_path(),
        settings = config.settings.len(),
        permissions = config.permissions.len(),
        "Starting roombridge"
    );

    roombridge::metrics::init();

    let app = App::from_config(&config).await?;
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = app.bridge.run(stdin) => {
            let stats = result?;
            info!(handled = stats.handled, failed = stats.failed, "Bridge stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, shutting down");
        }
    }

    for (command, count) in app.bridge.registry().get_command_stats() {
        info!(command, count, "Peer event totals");
    }
    info!(tracked = app.rooms.presence.len(), "Presence cache at shutdown");
    debug!(metrics = %roombridge::metrics::gather_metrics(), "Metrics at shutdown");

    app.bridge.context().db.pool().close().await;
    Ok(())
}
