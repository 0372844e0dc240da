//! Presentation layer for persona-council
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the terminal user channel.

pub mod cli;
pub mod interaction;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use interaction::TerminalUserChannel;
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use output::set_color_enabled;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
