//! Report formatting

pub mod console;
pub mod formatter;

/// Force colored output off (or back on) for the whole process
pub fn set_color_enabled(enabled: bool) {
    colored::control::set_override(enabled);
}
