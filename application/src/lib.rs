//! Application layer for persona-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DeliberationParams;
pub use ports::{
    metrics_store::MetricsStorePort,
    persona_gateway::{GatewayError, PersonaGateway},
    progress::{DeliberationProgress, NoProgress},
    text_search::{LookupError, TextSearchPort},
    user_channel::{
        NoAnswerChannel, PresetAnswerChannel, UserChannelError, UserChannelPort, UserPrompt,
        UserReply,
    },
};
pub use use_cases::ask_user::{AskUserError, AskUserUseCase};
pub use use_cases::gather_information::{GatherInformationUseCase, GatherOutcome};
pub use use_cases::run_deliberation::{
    DeliberationReport, RunDeliberationError, RunDeliberationInput, RunDeliberationUseCase,
};
