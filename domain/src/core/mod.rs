//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: text helpers used by parsing and prompt building

pub mod error;
pub mod string;
