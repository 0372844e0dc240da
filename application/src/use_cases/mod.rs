//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ask_user;
pub mod gather_information;
pub mod run_deliberation;
pub(crate) mod shared;
