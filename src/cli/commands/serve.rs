//! Serve command implementation

use crate::config::{global, load_config, AppConfig};
use crate::domain::Result;
use crate::logging::{bootstrap_subscriber, init_logging, LogEntry, LogLevel, Logger};
use crate::server::{start_server, AppState};
use clap::Args;
use std::sync::Arc;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured port; BIND is ignored when set
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    ///
    /// Builds its own multi-threaded runtime so the worker count can follow
    /// the SERVER section.
    pub fn execute(&self, config_path: &str, log_level: Option<&str>) -> anyhow::Result<i32> {
        let bootstrap = bootstrap_subscriber(log_level.unwrap_or("info"), std::io::stdout)?;
        let mut config = match load_config_logged(config_path, bootstrap) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration file");
                eprintln!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Some(port) = self.port {
            config.server.port = port;
            config.server.bind = None;
        }

        let level = log_level.unwrap_or(&config.logging.level).to_string();
        let _guard = init_logging(&level, &config.logging)?;

        let config = global::install(config)?;
        let workers = config.server.worker_threads();

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            api_id = config.api_id,
            workers,
            "API Template starting"
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()?;

        runtime.block_on(run(config))
    }
}

/// Load the configuration with `subscriber` receiving the loader's messages
fn load_config_logged<S>(config_path: &str, subscriber: S) -> Result<AppConfig>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::with_default(subscriber, || load_config(config_path))
}

async fn run(config: Arc<AppConfig>) -> anyhow::Result<i32> {
    let logger = match Logger::from_config(config.api_id, &config.logging) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            eprintln!("❌ Failed to create the structured logger");
            eprintln!("   Error: {e}");
            return Ok(2);
        }
    };

    if let Err(e) = logger.prepare().await {
        logger.log_console(
            LogEntry::new(LogLevel::Error, 500, "Log sink is unreachable")
                .path("serve")
                .error(&e),
        );
        return Ok(4); // Connection error exit code
    }

    let state = Arc::new(AppState::new(config, Arc::clone(&logger)));
    start_server(state).await?;
    Ok(0)
}
