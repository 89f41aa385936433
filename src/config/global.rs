//! Process-wide configuration
//!
//! The configuration is published once and shared as an `Arc` afterwards.
//! Concurrent first calls to [`get_or_load`] race to publish; every caller
//! gets the winner.

use super::loader::load_config;
use super::schema::AppConfig;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static CONFIG: OnceLock<Arc<AppConfig>> = OnceLock::new();

/// Publish the configuration
///
/// # Errors
///
/// Fails when a configuration has already been published.
pub fn install(config: AppConfig) -> Result<Arc<AppConfig>> {
    let config = Arc::new(config);
    CONFIG
        .set(Arc::clone(&config))
        .map_err(|_| AppError::Configuration("Configuration already initialized".to_string()))?;
    tracing::debug!(api_id = config.api_id, "Configuration published");
    Ok(config)
}

/// The published configuration, if any
pub fn get() -> Option<Arc<AppConfig>> {
    CONFIG.get().cloned()
}

/// Return the published configuration, loading it from `path` on first use
pub fn get_or_load(path: impl AsRef<Path>) -> Result<Arc<AppConfig>> {
    if let Some(config) = CONFIG.get() {
        return Ok(Arc::clone(config));
    }

    let loaded = Arc::new(load_config(path)?);
    // Another thread may have won the race; its value is the one kept.
    let _ = CONFIG.set(loaded);
    CONFIG
        .get()
        .cloned()
        .ok_or_else(|| AppError::Configuration("Configuration was not published".to_string()))
}
