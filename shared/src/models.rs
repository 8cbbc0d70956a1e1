//! Data models for the Regauth application

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role that unlocks the admin dashboard
pub const ADMIN_ROLE: &str = "admin";

/// Public view of a user account
///
/// The password hash never leaves the backend, so it has no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}
