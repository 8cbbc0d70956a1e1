//! Authentication module
//!
//! Password hashing, signed session/reset tokens and the cookie that carries
//! the session token.

mod cookie;
mod jwt;
mod middleware;
mod password;

pub use cookie::{
    create_session_cookie, extract_session_cookie, set_session_cookie, SESSION_COOKIE_NAME,
};
pub use jwt::{
    issue, verify, ResetClaims, SessionClaims, TokenClaims, TokenError, TokenKeys, TokenPurpose,
    TokenService,
};
pub use middleware::{AdminUser, SessionUser};
pub use password::{PasswordError, PasswordService};
