//! Text search adapters

pub mod grep;

pub use grep::GrepTextSearch;
