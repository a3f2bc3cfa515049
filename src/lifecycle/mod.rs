//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve token → Load settings → Validate
//!     → Wait for InfluxDB → Read telegraf.conf → Register → Report
//! ```
//!
//! There is no shutdown coordination: the process exits as soon as the
//! last phase finishes, and termination signals keep their default action.

pub mod startup;

pub use startup::{prepare, run};
