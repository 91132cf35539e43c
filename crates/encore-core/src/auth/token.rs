//! Token pair issued by the provider and the bearer credential derived from it

use super::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access/refresh token pair held by the session store
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token presented to the API
    pub access_token: String,
    /// Refresh token, absent if the provider did not issue one
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiry reported by the provider, if any
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenPair {
    /// Pair without expiry information
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at: None,
        }
    }

    /// Whether the access token expires within `leeway` of `now`.
    ///
    /// Pairs without an expiry never report as expired.
    pub fn expires_within(&self, leeway: Duration, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at
                .checked_sub_signed(leeway)
                .is_none_or(|refresh_at| refresh_at <= now),
            None => false,
        }
    }

    /// Bearer credential for this pair
    pub fn bearer(&self) -> BearerToken {
        BearerToken::new(self.access_token.clone())
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response body
///
/// Only the fields this client relies on are declared; a body missing
/// `access_token` fails deserialization.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert into a pair, anchoring `expires_in` at `issued_at`.
    ///
    /// A refresh response may omit the refresh token, in which case
    /// `previous_refresh` is carried over. An `expires_in` that does not
    /// land on a representable instant is rejected.
    pub fn into_pair(
        self,
        issued_at: DateTime<Utc>,
        previous_refresh: Option<String>,
    ) -> Result<TokenPair, AuthError> {
        let expires_at = match self.expires_in {
            Some(secs) => Some(
                Duration::try_seconds(secs)
                    .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
                    .ok_or_else(|| {
                        AuthError::InvalidResponse(format!("expires_in out of range: {secs}"))
                    })?,
            ),
            None => None,
        };

        Ok(TokenPair {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at,
        })
    }
}

/// Credential handed to API collaborators
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}
