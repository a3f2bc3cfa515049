//! Telegraf configuration registrar library.

pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod registration;
pub mod resilience;

pub use config::schema::RegistrarConfig;
pub use error::RegistrarError;
pub use registration::{Receipt, RegistrationRequest};
