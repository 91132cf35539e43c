//! Authenticated Web API access
//!
//! Collaborators receive the session's [`BearerToken`](crate::auth::BearerToken)
//! and attach it to every request; a rejected token is reported as
//! [`ApiError::Unauthorized`] and left for the shell to act on.

mod client;
mod profile;

pub use client::{ApiError, ProfileSource, ProviderApi};
pub use profile::{ExternalUrls, Followers, Image, UserProfile};
