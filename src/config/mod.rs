//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional settings file (loader.rs, TOML)
//!     → environment: token, org (loader.rs)
//!     → command-line overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → RegistrarConfig (immutable, passed to each phase)
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{build_config, ConfigError, Overrides};
pub use schema::RegistrarConfig;
pub use schema::{InfluxConfig, ReadinessConfig, SubmissionConfig, TelegrafConfig};
