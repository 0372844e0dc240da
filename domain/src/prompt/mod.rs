//! Prompt domain
//!
//! Builds the text each persona receives at the start of a round.

pub mod round_context;

pub use round_context::{
    HISTORY_BLOCK_MARKER, REASONING_EXCERPT_CHARS, build_round_context,
    response_format_instructions,
};
