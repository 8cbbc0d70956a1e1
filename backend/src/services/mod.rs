//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod auth;

pub use auth::{AuthError, AuthService, LoginOutcome, ResetLinkSettings};
