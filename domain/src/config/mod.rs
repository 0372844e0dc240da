//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod interaction_mode;
mod output_format;
pub mod validation;

pub use interaction_mode::InteractionMode;
pub use output_format::OutputFormat;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
