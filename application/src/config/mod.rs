//! Application-level configuration.
//!
//! - [`DeliberationParams`]: round loop control (threshold, budgets, timeouts)

pub mod deliberation_params;

pub use deliberation_params::DeliberationParams;
