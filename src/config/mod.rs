//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WatchdogConfig (validated, immutable)
//!     → BreakerConfig handed to RateCircuitBreaker
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a breaker keeps its config for life
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BreakerConfig;
pub use schema::WatchConfig;
pub use schema::WatchdogConfig;
pub use validation::ValidationError;
