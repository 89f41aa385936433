//! Configuration loader with INI parsing and environment variable overrides

use super::ini::IniDocument;
use super::schema::{AppConfig, DocumentDbConfig, FolderConfig, LoggingConfig, ServerConfig};
use super::secret_string;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use crate::logging::{LogEntry, LogLevel, LogMode, Logger};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Options hidden from the published configuration dictionary
pub const CONFIG_DICT_EXCLUDE: &[&str] = &["pwd", "password", "secret", "url", "key"];

/// Prefix of generic `APP__<SECTION>__<OPTION>` overrides
const OVERRIDE_PREFIX: &str = "APP__";

/// Loads configuration from an INI file
///
/// This function:
/// 1. Reads the INI file and substitutes `${VAR}` placeholders
/// 2. Applies `APP__<SECTION>__<OPTION>` overrides to the document
/// 3. Reads the API, FOLDER, SERVER, LOGGING and DATABASE sections
/// 4. Applies the server environment overrides (HOST, PORT, BIND, ...)
/// 5. Builds the anonymized configuration dictionary and validates
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read or parsed
/// - A referenced environment variable is not set
/// - `API.ID` is missing or not an integer
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use api_template::config::loader::load_config;
///
/// let config = load_config("config.ini").expect("Failed to load config");
/// println!("API {} v{}", config.api_id, config.api_version);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AppError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    let contents = substitute_env_vars(&contents)?;
    from_document(IniDocument::from_str(&contents)?)
}

/// Builds the configuration from an already parsed document
///
/// Runs every step of [`load_config`] after parsing: overrides, typed
/// sections and validation.
pub fn from_document(mut document: IniDocument) -> Result<AppConfig> {
    apply_document_overrides(&mut document);

    let is_local = read_is_local();

    let api_id = document
        .get("API", "ID")
        .ok_or_else(|| AppError::Configuration("Missing required option API.ID".to_string()))?;
    let api_id: i64 = api_id.trim().parse().map_err(|e| {
        AppError::Configuration(format!("API.ID must be an integer, got '{api_id}': {e}"))
    })?;

    let api_version = read_version(is_local);
    document.set("API", "version", &api_version);

    let debug_mode = match document.get("API", "DEBUG") {
        Some(value) => !value.trim().eq_ignore_ascii_case("false"),
        None => {
            tracing::warn!("API.DEBUG not set, debug mode enabled");
            true
        }
    };
    tracing::info!(debug_mode, "Debug mode");

    let folders = read_folders(&document, is_local, api_id);

    let mut server = read_server(&document, is_local)?;
    let mut logging = read_logging(&document)?;
    apply_env_overrides(&mut server, &mut logging);

    let configuration_dict = document.to_dict_anon(CONFIG_DICT_EXCLUDE, true)?;
    tracing::info!(
        configuration = %configuration_dict,
        "CONFIGURATION: (Some key/value pairs are anonymized or not present due to sensitive data)"
    );

    let config = AppConfig {
        api_id,
        api_version,
        is_local,
        debug: debug_mode,
        folders,
        server,
        logging,
        configuration_dict,
        document,
    };

    config.validate().map_err(|e| {
        AppError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Lines starting with `#` or `;` are comments and left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AppError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AppError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies `APP__<SECTION>__<OPTION>` variables to the document
fn apply_document_overrides(document: &mut IniDocument) {
    for (name, value) in std::env::vars() {
        let Some(rest) = name.strip_prefix(OVERRIDE_PREFIX) else {
            continue;
        };
        match rest.split_once("__") {
            Some((section, option)) if !section.is_empty() && !option.is_empty() => {
                tracing::debug!(section, option, "Applying configuration override");
                document.set(section, option, &value);
            }
            _ => tracing::warn!(variable = %name, "Ignoring malformed configuration override"),
        }
    }
}

fn read_is_local() -> bool {
    match std::env::var("IS_LOCAL") {
        Ok(value) => {
            let is_local = value.trim().eq_ignore_ascii_case("true");
            tracing::info!(is_local, "IS_LOCAL");
            is_local
        }
        Err(e) => {
            tracing::warn!(error = %e, "IS_LOCAL not set, assuming a deployed environment");
            false
        }
    }
}

fn read_version(is_local: bool) -> String {
    let path = if is_local {
        "../version.txt"
    } else {
        "./version.txt"
    };
    match fs::read_to_string(path) {
        Ok(version) => version.trim().to_string(),
        Err(e) => {
            tracing::warn!(path, error = %e, "Could not read the API version");
            "UNKNOWN".to_string()
        }
    }
}

fn read_folders(document: &IniDocument, is_local: bool, api_id: i64) -> Option<FolderConfig> {
    let folder = |name: &str| -> std::result::Result<String, String> {
        let value = document
            .get("FOLDER", name)
            .ok_or_else(|| format!("missing option FOLDER.{name}"))?;
        Ok(if is_local {
            format!(".{value}")
        } else {
            value.to_string()
        })
    };

    let folders = (|| {
        Ok::<_, String>(FolderConfig {
            in_folder: folder("IN")?,
            out_folder: folder("OUT")?,
            test_folder: folder("TEST")?,
            cache_folder: folder("CACHE")?,
        })
    })();

    match folders {
        Ok(folders) => Some(folders),
        Err(e) => {
            Logger::console(api_id, LogMode::Error).log_console(
                LogEntry::new(
                    LogLevel::Error,
                    500,
                    format!("Could not parse the config: {e}"),
                )
                .path("config::loader::read_folders"),
            );
            None
        }
    }
}

fn read_server(document: &IniDocument, is_local: bool) -> Result<ServerConfig> {
    let mut server = if is_local {
        ServerConfig::local()
    } else {
        ServerConfig::default()
    };

    if let Some(host) = document.get("SERVER", "HOST") {
        server.host = host.to_string();
    }
    if let Some(port) = parse_option(document, "SERVER", "PORT")? {
        server.port = port;
    }
    if let Some(bind) = document.get("SERVER", "BIND") {
        server.bind = Some(bind.to_string());
    }
    if let Some(timeout) = parse_option(document, "SERVER", "TIMEOUT")? {
        server.timeout_secs = timeout;
    }
    if let Some(concurrency) = parse_option(document, "SERVER", "WEB_CONCURRENCY")? {
        server.web_concurrency = concurrency;
    }
    if let Some(per_core) = parse_option(document, "SERVER", "WORKERS_PER_CORE")? {
        server.workers_per_core = per_core;
    }

    Ok(server)
}

fn read_logging(document: &IniDocument) -> Result<LoggingConfig> {
    let mut logging = LoggingConfig::default();

    if let Some(level) = document.get("LOGGING", "LEVEL") {
        logging.level = level.trim().to_lowercase();
    }
    if let Some(sink) = document.get("LOGGING", "SINK") {
        logging.sink = sink.parse().map_err(AppError::Configuration)?;
    }
    if let Some(mode) = document.get("LOGGING", "MODE") {
        logging.mode = mode.trim().to_lowercase();
    }
    if let Some(file_path) = document.get("LOGGING", "FILE_PATH") {
        logging.file_path = file_path.to_string();
    }
    if let Some(as_string) = parse_option(document, "LOGGING", "TREAT_ALL_ARGS_AS_STRING")? {
        logging.treat_all_args_as_string = as_string;
    }
    if let Some(trace_dir) = document.get("LOGGING", "TRACE_DIR") {
        logging.trace_dir = Some(trace_dir.to_string());
    }

    if document.has_section("DATABASE") {
        let required = |option: &str| -> Result<String> {
            document
                .get("DATABASE", option)
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::Configuration(format!("Missing required option DATABASE.{option}"))
                })
        };
        logging.database = Some(DocumentDbConfig {
            endpoint: required("ENDPOINT")?,
            key: secret_string(required("KEY")?),
            database: required("DATABASE")?,
            container: document
                .get("DATABASE", "CONTAINER")
                .map(str::to_string)
                .unwrap_or_else(|| "logs".to_string()),
        });
    }

    Ok(logging)
}

fn parse_option<T>(document: &IniDocument, section: &str, option: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    document
        .get(section, option)
        .map(|raw| {
            raw.trim().parse().map_err(|e| {
                AppError::Configuration(format!("Invalid value for {section}.{option}: {e}"))
            })
        })
        .transpose()
}

/// Applies the server environment variables
///
/// `BIND` wins over `HOST`/`PORT`. Unparseable values are ignored with a
/// warning.
fn apply_env_overrides(server: &mut ServerConfig, logging: &mut LoggingConfig) {
    fn parsed<T: FromStr>(name: &str) -> Option<T> {
        let raw = std::env::var(name).ok()?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(variable = name, value = %raw, "Ignoring unparseable override");
                None
            }
        }
    }

    if let Ok(val) = std::env::var("HOST") {
        server.host = val;
    }
    if let Some(port) = parsed("PORT") {
        server.port = port;
    }
    if let Ok(val) = std::env::var("BIND") {
        server.bind = Some(val);
    }
    if let Some(timeout) = parsed("TIMEOUT") {
        server.timeout_secs = timeout;
    }
    if let Some(concurrency) = parsed("WEB_CONCURRENCY") {
        server.web_concurrency = concurrency;
    }
    if let Some(per_core) = parsed("WORKERS_PER_CORE") {
        server.workers_per_core = per_core;
    }
    if let Ok(val) = std::env::var("LOG_LEVEL") {
        logging.level = val.trim().to_lowercase();
    }
}
