//! Persona gateway adapters

pub mod command_gateway;

pub use command_gateway::{CommandPersonaGateway, PERSONA_ENV_VAR};
