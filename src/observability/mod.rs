//! Observability subsystem.
//!
//! Every phase emits `tracing` events with structured fields (`attempt`,
//! `status`, `url`, `error`); logging.rs decides how they are rendered.

pub mod logging;
