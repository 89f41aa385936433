//! Configuration management
//!
//! The service reads one INI file, applies environment overrides and
//! publishes the result process-wide.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use api_template::config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = config::global::get_or_load("config.ini")?;
//! println!("API {} listening on {}", config.api_id, config.server.bind_address());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```ini
//! [API]
//! ID = 1
//! DEBUG = false
//!
//! [FOLDER]
//! IN = ./data/in
//! OUT = ./data/out
//! TEST = ./data/test
//! CACHE = ./data/cache
//!
//! [SERVER]
//! PORT = 8080
//!
//! [LOGGING]
//! SINK = database
//! MODE = warning
//!
//! [DATABASE]
//! ENDPOINT = https://your-account.documents.azure.com:443/
//! KEY = ${COSMOS_KEY}
//! DATABASE = api
//! CONTAINER = logs
//! ```
//!
//! # Environment Variables
//!
//! - `${VAR_NAME}` placeholders are substituted before parsing
//! - `APP__<SECTION>__<OPTION>` sets any option
//! - `IS_LOCAL`, `HOST`, `PORT`, `BIND`, `TIMEOUT`, `WEB_CONCURRENCY`,
//!   `WORKERS_PER_CORE` and `LOG_LEVEL` are read directly

pub mod global;
pub mod ini;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use ini::IniDocument;
pub use loader::{from_document, load_config};
pub use schema::{AppConfig, DocumentDbConfig, FolderConfig, LoggingConfig, ServerConfig, SinkKind};
pub use secret::{secret_string, SecretString, SecretValue};
