//! Sign-in seam for the login form
//!
//! The [`Authenticator`] owns sessions and the post-login navigation; this
//! crate only forwards the submitted fields and interprets its failures.
//! An authenticator reports its own failures as [`AuthError`], whose
//! [`AuthErrorKind`] says what went wrong. Any other error type is foreign
//! and must be propagated untouched by callers.

use crate::core::form::FormData;
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

/// Name of the username/password sign-in method
pub const CREDENTIALS_PROVIDER: &str = "credentials";

/// Subtype carried by an [`AuthError`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The submitted credentials were rejected
    CredentialsSignin,
    /// The user may not sign in
    AccessDenied,
    /// The authenticator is misconfigured (e.g. unknown provider)
    Configuration,
    /// Any subtype this crate has no name for
    Other(String),
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            AuthErrorKind::CredentialsSignin => "CredentialsSignin",
            AuthErrorKind::AccessDenied => "AccessDenied",
            AuthErrorKind::Configuration => "Configuration",
            AuthErrorKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for AuthErrorKind {
    fn from(kind: &str) -> Self {
        match kind {
            "CredentialsSignin" => AuthErrorKind::CredentialsSignin,
            "AccessDenied" => AuthErrorKind::AccessDenied,
            "Configuration" => AuthErrorKind::Configuration,
            other => AuthErrorKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticator's own failure type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("authentication failed: {kind}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: impl Into<AuthErrorKind>) -> Self {
        Self { kind: kind.into() }
    }

    pub fn credentials_signin() -> Self {
        Self::new(AuthErrorKind::CredentialsSignin)
    }
}

/// What the login form forwards to the authenticator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInPayload {
    /// Fields exactly as submitted
    pub fields: FormData,
    /// Where to send the client once signed in
    pub redirect_to: String,
}

/// External sign-in provider
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Sign in with the named method.
    ///
    /// Returns the path the client should be sent to. Rejections are
    /// reported as [`AuthError`]; anything else is an unexpected failure.
    async fn sign_in(&self, provider: &str, payload: SignInPayload) -> anyhow::Result<String>;
}

/// Email and password read from the login form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6))]
    pub password: String,
}

impl Credentials {
    /// Read `email` and `password` from the form; `None` if either is absent
    pub fn from_form(form: &FormData) -> Option<Self> {
        Some(Self {
            email: form.get("email")?.to_string(),
            password: form.get("password")?.to_string(),
        })
    }
}

/// Hex SHA-256 digest of a password
pub fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Credentials authenticator backed by a fixed user table.
///
/// For development and tests: passwords are kept as unsalted digests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthenticator {
    users: HashMap<String, String>,
}

impl InMemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, email: impl Into<String>, password: &str) -> Self {
        self.users.insert(email.into(), password_digest(password));
        self
    }

    fn verify(&self, credentials: &Credentials) -> bool {
        self.users
            .get(&credentials.email)
            .is_some_and(|digest| *digest == password_digest(&credentials.password))
    }
}

#[async_trait]
impl Authenticator for InMemoryAuthenticator {
    async fn sign_in(&self, provider: &str, payload: SignInPayload) -> anyhow::Result<String> {
        if provider != CREDENTIALS_PROVIDER {
            return Err(AuthError::new(AuthErrorKind::Configuration).into());
        }

        let credentials = Credentials::from_form(&payload.fields)
            .filter(|c| c.validate().is_ok())
            .ok_or_else(AuthError::credentials_signin)?;

        if !self.verify(&credentials) {
            return Err(AuthError::credentials_signin().into());
        }

        tracing::info!(email = %credentials.email, "User signed in");
        Ok(payload.redirect_to)
    }
}
