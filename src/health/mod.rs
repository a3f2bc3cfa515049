//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! readiness.rs:
//!     GET <base_url>/health
//!     → 200: gate opens, registration may start
//!     → anything else: pause, probe again
//!     → budget spent: fatal, registration never starts
//! ```

pub mod readiness;

pub use readiness::ReadinessGate;
