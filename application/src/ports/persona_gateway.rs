//! Persona gateway port
//!
//! Defines how the application layer obtains one persona's raw answer for a
//! round. The text is free-form; parsing it is a domain concern.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while consulting a persona
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Persona not available: {0}")]
    PersonaNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to the personas.
///
/// Implementations (adapters) live in the infrastructure layer. A gateway
/// holds no per-round state: each call is one independent consultation.
#[async_trait]
pub trait PersonaGateway: Send + Sync {
    /// Send `prompt` to `persona` and return its raw answer
    async fn generate(&self, persona: &str, prompt: &str) -> Result<String, GatewayError>;
}
