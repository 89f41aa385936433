//! Integration tests for configuration loading
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they
//! don't interfere with each other.

use api_template::config::{global, load_config, SinkKind};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const SERVER_VARS: &[&str] = &[
    "IS_LOCAL",
    "HOST",
    "PORT",
    "BIND",
    "TIMEOUT",
    "WEB_CONCURRENCY",
    "WORKERS_PER_CORE",
    "LOG_LEVEL",
    "APP__LOGGING__MODE",
    "TEST_COSMOS_KEY",
];

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in SERVER_VARS {
        std::env::remove_var(var);
    }
}

fn write_ini(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const FULL_INI: &str = r#"
; sample service configuration
[API]
ID = 12
DEBUG = false

[FOLDER]
IN = /data/in
OUT = /data/out
TEST = /data/test
CACHE = /data/cache

[SERVER]
HOST = 127.0.0.1
PORT = 9100
TIMEOUT = 15
WEB_CONCURRENCY = 3

[LOGGING]
SINK = database
MODE = warning
TREAT_ALL_ARGS_AS_STRING = true

[DATABASE]
ENDPOINT = https://example.documents.azure.com:443/
KEY = ${TEST_COSMOS_KEY}
DATABASE = api
"#;

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_COSMOS_KEY", "c2VjcmV0LWtleQ==");

    let file = write_ini(FULL_INI);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.api_id, 12);
    assert!(!config.debug);
    assert!(!config.is_local);

    let folders = config.folders.as_ref().unwrap();
    assert_eq!(folders.in_folder, "/data/in");
    assert_eq!(folders.cache_folder, "/data/cache");

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.timeout_secs, 15);
    assert_eq!(config.server.worker_threads(), 3);
    assert_eq!(
        config.server.socket_addr().unwrap().to_string(),
        "127.0.0.1:9100"
    );

    assert_eq!(config.logging.sink, SinkKind::Database);
    assert_eq!(config.logging.mode, "warning");
    assert!(config.logging.treat_all_args_as_string);
    let db = config.logging.database.as_ref().unwrap();
    assert_eq!(db.container, "logs");

    // The Cosmos key never reaches the published dictionary
    let dict = config.configuration_dict.to_string();
    assert!(!dict.contains("c2VjcmV0LWtleQ=="));

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_ini(FULL_INI);
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_COSMOS_KEY"));
}

#[test]
fn test_missing_folder_section_is_not_fatal() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_ini("[API]\nID = 3\n");
    let config = load_config(file.path()).unwrap();
    assert!(config.folders.is_none());
    assert!(config.debug);
}

#[test]
fn test_local_mode_prefixes_folders_and_binds_locally() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("IS_LOCAL", "True");

    let file = write_ini("[API]\nID = 3\n\n[FOLDER]\nIN = /in\nOUT = /out\nTEST = /test\nCACHE = /cache\n");
    let config = load_config(file.path()).unwrap();
    assert!(config.is_local);
    assert_eq!(config.folders.unwrap().in_folder, "./in");
    assert_eq!(config.server.host, "127.0.0.1");

    cleanup_env_vars();
}

#[test]
fn test_env_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PORT", "7000");
    std::env::set_var("TIMEOUT", "not-a-number");
    std::env::set_var("APP__LOGGING__MODE", "debug");

    let file = write_ini("[API]\nID = 3\n\n[SERVER]\nPORT = 9000\nTIMEOUT = 20\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.server.port, 7000);
    assert_eq!(config.server.timeout_secs, 20);
    assert_eq!(config.logging.mode, "debug");

    std::env::set_var("BIND", "0.0.0.0:7100");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.server.socket_addr().unwrap().port(), 7100);

    cleanup_env_vars();
}

#[test]
fn test_host_name_accepted() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_ini("[API]\nID = 3\n\n[SERVER]\nHOST = localhost\nPORT = 9000\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.server.bind_address(), "localhost:9000");

    std::env::set_var("HOST", "api.internal");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.server.bind_address(), "api.internal:9000");

    cleanup_env_vars();
}

#[test]
fn test_invalid_ini_value() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_ini("[API]\nID = 3\n\n[SERVER]\nPORT = http\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_global_config_published_once() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_ini("[API]\nID = 44\n");
    let first = global::get_or_load(file.path()).unwrap();
    assert_eq!(first.api_id, 44);

    let second = global::get_or_load("/does/not/exist.ini").unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(global::get().unwrap().api_id, 44);

    let again = load_config(file.path()).unwrap();
    assert!(global::install(again).is_err());
}
