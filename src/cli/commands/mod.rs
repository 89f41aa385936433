//! CLI command implementations
//!
//! Commands return the process exit code: 0 on success, 2 for configuration
//! errors, 4 when the log database cannot be reached, 5 for anything fatal.

pub mod anonymize;
pub mod serve;
pub mod validate;
