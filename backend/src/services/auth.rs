//! Authentication service
//!
//! Orchestrates the password hasher, token service, user repository and
//! notifier into the four account operations. Each operation is a straight
//! sequence of awaits: the password is hashed before anything is written and
//! a reset token is verified before the password is replaced.
//!
//! Known limitations:
//! - Session tokens stay valid until `exp`, even after a password change.
//! - A reset link can be used any number of times until it expires.

use crate::auth::{PasswordError, PasswordService, SessionClaims, TokenError, TokenService};
use crate::notify::{Notifier, ResetLinkMessage};
use crate::repositories::{NewUser, RepositoryError, UserRepository};
use regauth_shared::validation::{validate_request, validate_required};
use regauth_shared::{ErrorKind, RegisterRequest, User};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Failures of the auth operations
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("{0}")]
    NoSuchUser(String),

    #[error("The password is incorrect")]
    WrongPassword,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Failed to send reset link: {0}")]
    NotificationFailed(String),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Tag reported to API callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::ValidationError,
            AuthError::DuplicateEmail => ErrorKind::DuplicateEmail,
            AuthError::NoSuchUser(_) => ErrorKind::NoSuchUser,
            AuthError::WrongPassword => ErrorKind::WrongPassword,
            AuthError::Token(TokenError::Expired) => ErrorKind::TokenExpired,
            AuthError::Token(TokenError::Invalid(_)) => ErrorKind::TokenInvalid,
            AuthError::NotificationFailed(_) => ErrorKind::NotificationFailed,
            AuthError::Repository(_) => ErrorKind::RepositoryError,
            AuthError::Internal(_) => ErrorKind::InternalError,
        }
    }
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => AuthError::DuplicateEmail,
            other => AuthError::Repository(other),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.into())
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Session token to hand back as the `token` cookie
    pub token: String,
    pub role: String,
}

/// Settings the reset flow needs beyond keys and collaborators
#[derive(Debug, Clone)]
pub struct ResetLinkSettings {
    /// Front-end base URL, e.g. `http://localhost:5173`
    pub public_base_url: String,
    pub subject: String,
    /// Answer unknown emails as if a link had been sent
    pub conceal_unknown_accounts: bool,
}

impl ResetLinkSettings {
    /// `{base}/reset_password/{id}/{token}`
    pub fn reset_url(&self, user_id: Uuid, token: &str) -> String {
        format!(
            "{}/reset_password/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            user_id,
            token
        )
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
    passwords: PasswordService,
    tokens: TokenService,
    reset: Arc<ResetLinkSettings>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
        passwords: PasswordService,
        tokens: TokenService,
        reset: ResetLinkSettings,
    ) -> Self {
        Self {
            users,
            notifier,
            passwords,
            tokens,
            reset: Arc::new(reset),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user
    ///
    /// Uniqueness is left to the repository; a concurrent duplicate insert
    /// fails with `DuplicateEmail`.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AuthError> {
        validate_request(&req).map_err(AuthError::Validation)?;

        let password_hash = self.passwords.hash_async(req.password).await?;

        let result = self
            .users
            .create(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
                role: req.role,
            })
            .await;

        match result {
            Ok(record) => {
                info!(user_id = %record.id, role = %record.role, "User registered");
                metrics::counter!("regauth_register_total", "outcome" => "success").increment(1);
                Ok(record.to_user())
            }
            Err(e) => {
                let err = AuthError::from(e);
                warn!(kind = %err.kind(), "Registration failed");
                metrics::counter!("regauth_register_total", "outcome" => "failure").increment(1);
                Err(err)
            }
        }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let result = self.try_login(email, password).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(AuthError::NoSuchUser(_)) => "no_such_user",
            Err(AuthError::WrongPassword) => "wrong_password",
            Err(_) => "error",
        };
        metrics::counter!("regauth_login_total", "outcome" => outcome).increment(1);
        result
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NoSuchUser("No Record existed".to_string()))?;

        let valid =
            PasswordService::verify_async(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::WrongPassword);
        }

        let token = self.tokens.issue_session_token(&user.email, &user.role)?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            token,
            role: user.role,
        })
    }

    /// Mail a reset link to the account registered under `email`
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let result = self.try_request_password_reset(email).await;
        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!("regauth_password_reset_requests_total", "outcome" => outcome)
            .increment(1);
        result
    }

    async fn try_request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None if self.reset.conceal_unknown_accounts => {
                info!("Password reset requested for unknown email");
                return Ok(());
            }
            None => return Err(AuthError::NoSuchUser("User not existed".to_string())),
        };

        let token = self.tokens.issue_reset_token(user.id)?;
        let message = ResetLinkMessage {
            to: user.email.clone(),
            subject: self.reset.subject.clone(),
            reset_url: self.reset.reset_url(user.id, &token),
        };

        self.notifier.send_reset_link(&message).await.map_err(|e| {
            warn!(user_id = %user.id, error = %e, "Reset link delivery failed");
            AuthError::NotificationFailed(e.to_string())
        })?;

        info!(user_id = %user.id, "Password reset link sent");
        Ok(())
    }

    /// Replace the password of `user_id` using a mailed reset token
    ///
    /// The token must verify as a reset token. An identifier that does not
    /// resolve to an account is `NoSuchUser` even when the token is valid; a
    /// token minted for another account is `TokenInvalid`.
    pub async fn complete_password_reset(
        &self,
        user_id: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let result = self
            .try_complete_password_reset(user_id, token, new_password)
            .await;
        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!("regauth_password_resets_total", "outcome" => outcome).increment(1);
        result
    }

    async fn try_complete_password_reset(
        &self,
        user_id: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let claims = self.tokens.verify_reset_token(token)?;

        let no_such_user = || AuthError::NoSuchUser("User not found".to_string());
        let id = Uuid::parse_str(user_id).map_err(|_| no_such_user())?;
        if self.users.find_by_id(id).await?.is_none() {
            return Err(no_such_user());
        }
        if claims.sub != id.to_string() {
            warn!(user_id = %id, "Reset token was issued for another account");
            return Err(AuthError::Token(TokenError::Invalid(
                "token was not issued for this account".to_string(),
            )));
        }

        validate_required("password", new_password).map_err(AuthError::Validation)?;
        let password_hash = self.passwords.hash_async(new_password.to_string()).await?;

        if !self.users.update_password(id, &password_hash).await? {
            return Err(no_such_user());
        }

        info!(user_id = %id, "Password reset completed");
        Ok(())
    }

    /// Verify a session token and return its claims
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, AuthError> {
        Ok(self.tokens.verify_session_token(token)?)
    }
}
