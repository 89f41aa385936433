//! Configuration schema types
//!
//! Typed view of the INI file after environment overrides. The raw document
//! stays available on [`AppConfig::document`].

use crate::config::ini::IniDocument;
use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::{SocketAddr, ToSocketAddrs};

/// Process-wide service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Numeric API identifier, stamped on every log record
    pub api_id: i64,

    /// Contents of `version.txt`, or `UNKNOWN`
    pub api_version: String,

    /// Running from a source checkout (`IS_LOCAL=true`)
    pub is_local: bool,

    pub debug: bool,

    /// Data folders; `None` when the FOLDER section is incomplete
    pub folders: Option<FolderConfig>,

    pub server: ServerConfig,

    pub logging: LoggingConfig,

    /// Configuration dictionary with sensitive values hidden
    pub configuration_dict: Value,

    /// Raw INI document including overrides
    pub document: IniDocument,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Data folders from the FOLDER section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    #[serde(rename = "in")]
    pub in_folder: String,
    #[serde(rename = "out")]
    pub out_folder: String,
    #[serde(rename = "test")]
    pub test_folder: String,
    #[serde(rename = "cache")]
    pub cache_folder: String,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Full bind address; takes precedence over host and port
    #[serde(default)]
    pub bind: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Explicit number of runtime worker threads (0 = derive from cores)
    #[serde(default = "default_web_concurrency")]
    pub web_concurrency: usize,

    #[serde(default = "default_workers_per_core")]
    pub workers_per_core: f64,
}

impl ServerConfig {
    /// Defaults for a local checkout
    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8002,
            ..Self::default()
        }
    }

    /// Address to listen on as `host:port`; the host may be a name
    pub fn bind_address(&self) -> String {
        self.bind
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.host, self.port))
    }

    /// Resolve [`Self::bind_address`] to the first matching socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let addr = self.bind_address();
        addr.to_socket_addrs()
            .map_err(|e| format!("Invalid server address '{addr}': {e}"))?
            .next()
            .ok_or_else(|| format!("Server address '{addr}' did not resolve"))
    }

    /// Number of tokio worker threads
    pub fn worker_threads(&self) -> usize {
        if self.web_concurrency > 0 {
            return self.web_concurrency;
        }
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        ((self.workers_per_core * cores as f64) as usize).max(1)
    }

    fn validate(&self) -> Result<(), String> {
        if self.bind.is_none() && self.port == 0 {
            return Err("server.port must be between 1 and 65535".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("server.timeout must be > 0".to_string());
        }
        if self.workers_per_core <= 0.0 {
            return Err(format!(
                "server.workers_per_core must be > 0, got {}",
                self.workers_per_core
            ));
        }
        // Shape check only; names are resolved when the listener binds
        let addr = self.bind_address();
        match addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
            _ => Err(format!(
                "Invalid server address '{addr}': expected host:port"
            )),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bind: None,
            timeout_secs: default_timeout_secs(),
            web_concurrency: default_web_concurrency(),
            workers_per_core: default_workers_per_core(),
        }
    }
}

/// Destination of structured log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Console only
    #[default]
    Stdout,
    /// Console plus a JSON file
    File,
    /// Console plus a document database container
    Database,
}

impl std::str::FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "file" => Ok(Self::File),
            "database" | "mongodb" | "cosmosdb" => Ok(Self::Database),
            other => Err(format!(
                "Invalid logging.sink '{other}'. Must be one of: stdout, file, database"
            )),
        }
    }
}

/// Structured logger and tracing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub sink: SinkKind,

    /// Console verbosity of the structured logger (error, warning, info, debug)
    #[serde(default = "default_log_mode")]
    pub mode: String,

    /// Target of the file sink
    #[serde(default = "default_file_path")]
    pub file_path: String,

    /// Write numeric record fields as strings
    #[serde(default)]
    pub treat_all_args_as_string: bool,

    /// Directory for daily rolling JSON trace files
    #[serde(default)]
    pub trace_dir: Option<String>,

    /// Document database sink settings
    #[serde(default)]
    pub database: Option<DocumentDbConfig>,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "warning", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_modes = ["error", "warning", "info", "debug"];
        if !valid_modes.contains(&self.mode.as_str()) {
            return Err(format!(
                "Invalid logging.mode '{}'. Must be one of: {}",
                self.mode,
                valid_modes.join(", ")
            ));
        }

        if self.sink == SinkKind::File && self.file_path.is_empty() {
            return Err("logging.file_path cannot be empty for the file sink".to_string());
        }

        if self.sink == SinkKind::Database {
            match self.database {
                Some(ref db) => db.validate()?,
                None => {
                    return Err(
                        "DATABASE section is required when logging.sink = 'database'".to_string(),
                    )
                }
            }
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            sink: SinkKind::default(),
            mode: default_log_mode(),
            file_path: default_file_path(),
            treat_all_args_as_string: false,
            trace_dir: None,
            database: None,
        }
    }
}

/// Azure Cosmos DB container receiving log records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDbConfig {
    /// Account endpoint URL
    pub endpoint: String,

    /// Account key
    /// Stored securely in memory and automatically zeroized on drop
    pub key: SecretString,

    pub database: String,

    #[serde(default = "default_container")]
    pub container: String,
}

impl DocumentDbConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("database.endpoint is not a valid URL: {e}"))?;
        if url.scheme() != "https" {
            return Err("database.endpoint must start with https://".to_string());
        }

        if self.key.expose_secret().is_empty() {
            return Err("database.key cannot be empty".to_string());
        }

        if self.database.is_empty() {
            return Err("database.database cannot be empty".to_string());
        }

        if self.container.is_empty() {
            return Err("database.container cannot be empty".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_web_concurrency() -> usize {
    1
}

fn default_workers_per_core() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_mode() -> String {
    "info".to_string()
}

fn default_file_path() -> String {
    "./log.txt".to_string()
}

fn default_container() -> String {
    "logs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn cosmos(endpoint: &str) -> DocumentDbConfig {
        DocumentDbConfig {
            endpoint: endpoint.to_string(),
            key: secret_string("key".to_string()),
            database: "db".to_string(),
            container: "logs".to_string(),
        }
    }

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(server.worker_threads(), 1);

        let local = ServerConfig::local();
        assert_eq!(local.socket_addr().unwrap().to_string(), "127.0.0.1:8002");
    }

    #[test]
    fn test_bind_wins() {
        let server = ServerConfig {
            bind: Some("10.0.0.1:9000".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(server.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_worker_threads_from_cores() {
        let server = ServerConfig {
            web_concurrency: 0,
            workers_per_core: 0.01,
            ..ServerConfig::default()
        };
        assert_eq!(server.worker_threads(), 1);
    }

    #[test]
    fn test_host_name_is_valid() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8002,
            ..ServerConfig::default()
        };
        assert!(server.validate().is_ok());
        assert_eq!(server.bind_address(), "localhost:8002");
        assert_eq!(server.socket_addr().unwrap().port(), 8002);
    }

    #[test]
    fn test_invalid_bind() {
        for bind in ["localhost", ":8080", "localhost:http", "0.0.0.0:70000"] {
            let server = ServerConfig {
                bind: Some(bind.to_string()),
                ..ServerConfig::default()
            };
            assert!(server.validate().is_err(), "{bind} should be rejected");
        }
    }

    #[test]
    fn test_sink_kind_parse() {
        assert_eq!("FILE".parse::<SinkKind>(), Ok(SinkKind::File));
        assert_eq!("mongodb".parse::<SinkKind>(), Ok(SinkKind::Database));
        assert!("kafka".parse::<SinkKind>().is_err());
    }

    #[test]
    fn test_logging_validation() {
        assert!(LoggingConfig::default().validate().is_ok());

        let bad_mode = LoggingConfig {
            mode: "verbose".to_string(),
            ..LoggingConfig::default()
        };
        assert!(bad_mode.validate().is_err());

        let missing_db = LoggingConfig {
            sink: SinkKind::Database,
            ..LoggingConfig::default()
        };
        assert!(missing_db.validate().is_err());

        let with_db = LoggingConfig {
            sink: SinkKind::Database,
            database: Some(cosmos("https://acct.documents.azure.com:443/")),
            ..LoggingConfig::default()
        };
        assert!(with_db.validate().is_ok());
    }

    #[test]
    fn test_database_requires_https() {
        assert!(cosmos("http://acct.documents.azure.com").validate().is_err());
        assert!(cosmos("nonsense").validate().is_err());
    }
}
