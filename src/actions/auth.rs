//! Login form action

use crate::core::auth::{AuthError, AuthErrorKind, Authenticator, CREDENTIALS_PROVIDER, SignInPayload};
use crate::core::form::{FormData, Outcome};
use anyhow::Result;
use std::sync::Arc;

/// Destination handed to the authenticator for a successful sign-in
pub const AFTER_LOGIN_PATH: &str = "/dashboard";

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const MSG_SOMETHING_WRONG: &str = "Something went wrong.";

/// User-facing message for an authenticator failure
pub fn auth_error_message(kind: &AuthErrorKind) -> &'static str {
    match kind {
        AuthErrorKind::CredentialsSignin => MSG_INVALID_CREDENTIALS,
        _ => MSG_SOMETHING_WRONG,
    }
}

/// Sign-in action bound to an authenticator
#[derive(Clone)]
pub struct AuthActions {
    authenticator: Arc<dyn Authenticator>,
    provider: String,
    redirect_to: String,
}

impl AuthActions {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            provider: CREDENTIALS_PROVIDER.to_string(),
            redirect_to: AFTER_LOGIN_PATH.to_string(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }

    /// Sign in with the submitted credentials.
    ///
    /// `prev_state` is the message currently shown on the form; it is not
    /// read. Rejections reported as [`AuthError`] become a message; any
    /// other error is returned unchanged.
    pub async fn authenticate(
        &self,
        _prev_state: Option<&str>,
        form: &FormData,
    ) -> Result<Outcome<String>> {
        let payload = SignInPayload {
            fields: form.clone(),
            redirect_to: self.redirect_to.clone(),
        };

        match self.authenticator.sign_in(&self.provider, payload).await {
            Ok(destination) => Ok(Outcome::Redirect(destination)),
            Err(err) => match err.downcast_ref::<AuthError>() {
                Some(auth) => {
                    tracing::warn!(kind = %auth.kind, "Sign-in rejected");
                    Ok(Outcome::State(auth_error_message(&auth.kind).to_string()))
                }
                None => Err(err),
            },
        }
    }
}
