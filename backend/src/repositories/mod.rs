//! User repositories
//!
//! Provides the persistence port and its Postgres and in-memory adapters.

pub mod memory;
pub mod user;

pub use memory::InMemoryUserRepository;
pub use user::{NewUser, PgUserRepository, RepositoryError, UserRecord, UserRepository};
