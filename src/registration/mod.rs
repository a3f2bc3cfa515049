//! Telegraf configuration registration.
//!
//! # Data Flow
//! ```text
//! telegraf.conf
//!     → payload.rs (read verbatim, wrap in RegistrationRequest)
//!     → submit.rs (POST /api/v2/telegrafs?org=<org>, bounded retries)
//!     → Receipt (status + body of the first success)
//! ```

pub mod payload;
pub mod submit;

pub use payload::{read_configuration, RegistrationRequest};
pub use submit::{Receipt, SubmitError, Submitter};
