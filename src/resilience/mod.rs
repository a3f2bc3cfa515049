//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream call (health probe, registration POST):
//!     → timeouts.rs (per-attempt deadline)
//!     → On failure: retries.rs (classify, pause, try again)
//!     → backoff.rs (fixed or exponential pause length)
//! ```

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{AttemptError, RetryError, RetryPolicy};
