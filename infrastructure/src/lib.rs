//! Infrastructure layer for persona-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod metrics;
pub mod persona;
pub mod search;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDeliberationConfig, FileGathererConfig, FileInteractionConfig,
    FileOutputConfig, FilePersonasConfig, PERSONA_PLACEHOLDER,
};
pub use metrics::JsonlSummaryStore;
pub use persona::{CommandPersonaGateway, PERSONA_ENV_VAR};
pub use search::GrepTextSearch;
