//! Domain models and types.
//!
//! The domain layer provides:
//! - **Error types** ([`AppError`], [`AnonymizationError`])
//! - **Result type alias** ([`Result`])
//! - **Request models** for the benchmark endpoints ([`Benchmark`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AppError>`]:
//!
//! ```rust,no_run
//! use api_template::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = api_template::config::load_config("config.ini")?;
//!     println!("API ID: {}", config.api_id);
//!     Ok(())
//! }
//! ```

pub mod benchmark;
pub mod errors;
pub mod result;

pub use benchmark::{Benchmark, BenchmarkNested};
pub use errors::{AnonymizationError, AppError};
pub use result::Result;
