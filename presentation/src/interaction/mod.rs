//! Human-in-the-loop adapters

pub mod terminal;

pub use terminal::{TerminalUserChannel, interpret_input};
