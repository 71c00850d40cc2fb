//! Webhook authentication and payload routing.

pub mod payload;
pub mod signature;

pub use payload::{synthesized_job_name, validate};
pub use signature::{sign, verify, SIGNATURE_HEADER};
