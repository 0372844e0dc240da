//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod metrics_store;
pub mod persona_gateway;
pub mod progress;
pub mod text_search;
pub mod user_channel;
