//! Regauth Shared Library
//!
//! This crate contains the wire types, error taxonomy and validation helpers
//! shared between the backend and any Rust client of the API.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{User, ADMIN_ROLE};
pub use types::*;
