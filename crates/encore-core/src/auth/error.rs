//! Authorization errors

use super::pkce::PkceError;
use super::store::StoreError;
use crate::api::ApiError;

/// Errors raised by the authorization flow
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Exchange attempted with no in-flight verifier
    #[error("No code verifier in flight; start a new login")]
    MissingVerifier,

    /// Provider rejected the code, or the request never completed
    #[error("Token exchange failed{}: {message}", status_suffix(.status))]
    ExchangeFailed {
        status: Option<u16>,
        message: String,
    },

    /// Authenticated operation attempted while anonymous
    #[error("No active session")]
    NoSession,

    /// Provider redirected back with an `error` parameter
    #[error("Authorization denied by provider: {0}")]
    AuthorizationDenied(String),

    #[error(transparent)]
    Pkce(#[from] PkceError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),

    /// Profile lookup with a freshly resolved token failed
    #[error("Profile lookup failed: {0}")]
    Profile(#[from] ApiError),

    /// Provider response did not match the expected schema
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl AuthError {
    pub(crate) fn exchange(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ExchangeFailed {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_failed_display() {
        let with_status = AuthError::exchange(Some(400), "invalid_grant");
        assert_eq!(
            with_status.to_string(),
            "Token exchange failed (HTTP 400): invalid_grant"
        );

        let without_status = AuthError::exchange(None, "connection refused");
        assert_eq!(
            without_status.to_string(),
            "Token exchange failed: connection refused"
        );
    }
}
