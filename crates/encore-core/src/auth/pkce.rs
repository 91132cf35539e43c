//! PKCE (Proof Key for Code Exchange) implementation
//!
//! RFC 7636: https://tools.ietf.org/html/rfc7636

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt;

/// Shortest verifier the provider accepts
pub const MIN_VERIFIER_LENGTH: usize = 43;

/// Longest verifier the provider accepts
pub const MAX_VERIFIER_LENGTH: usize = 128;

/// Challenge method sent alongside every challenge; must match `CodeChallenge::derive`
pub const CHALLENGE_METHOD: &str = "S256";

/// Unreserved URI characters (RFC 3986 section 2.3)
const VERIFIER_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// PKCE code verifier
#[derive(Clone, PartialEq, Eq)]
pub struct CodeVerifier {
    verifier: String,
}

impl CodeVerifier {
    /// Generate a random verifier of exactly `length` characters.
    ///
    /// Lengths outside 43..=128 are rejected rather than clamped.
    pub fn generate(length: usize) -> Result<Self, PkceError> {
        check_length(length)?;

        // thread_rng is a CSPRNG seeded from the OS
        let mut rng = rand::thread_rng();
        let verifier = (0..length)
            .map(|_| VERIFIER_ALPHABET[rng.gen_range(0..VERIFIER_ALPHABET.len())] as char)
            .collect();

        Ok(Self { verifier })
    }

    /// Rebuild a verifier from its persisted form
    pub fn from_string(verifier: String) -> Result<Self, PkceError> {
        check_length(verifier.len())?;

        if !verifier.bytes().all(is_unreserved) {
            return Err(PkceError::InvalidVerifierCharacters);
        }

        Ok(Self { verifier })
    }

    /// Get the verifier string
    pub fn as_str(&self) -> &str {
        &self.verifier
    }

    /// Derive the S256 challenge for this verifier
    pub fn challenge(&self) -> CodeChallenge {
        CodeChallenge::derive(self)
    }
}

impl fmt::Debug for CodeVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeVerifier")
            .field("len", &self.verifier.len())
            .finish_non_exhaustive()
    }
}

/// PKCE code challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge {
    challenge: String,
}

impl CodeChallenge {
    /// base64url(sha256(verifier)) with padding stripped
    pub fn derive(verifier: &CodeVerifier) -> Self {
        let digest = Sha256::digest(verifier.as_str().as_bytes());
        Self {
            challenge: URL_SAFE_NO_PAD.encode(digest),
        }
    }

    /// Get the challenge string
    pub fn as_str(&self) -> &str {
        &self.challenge
    }

    /// Get the challenge method
    pub fn method(&self) -> &'static str {
        CHALLENGE_METHOD
    }
}

fn check_length(length: usize) -> Result<(), PkceError> {
    if !(MIN_VERIFIER_LENGTH..=MAX_VERIFIER_LENGTH).contains(&length) {
        return Err(PkceError::InvalidVerifierLength(length));
    }
    Ok(())
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

/// PKCE errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PkceError {
    #[error("Invalid verifier length: {0} (must be 43-128)")]
    InvalidVerifierLength(usize),

    #[error("Invalid verifier characters (must be unreserved URI characters)")]
    InvalidVerifierCharacters,
}
