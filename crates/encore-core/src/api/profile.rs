//! Current-user profile

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user as returned by `GET /v1/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    pub uri: String,
    pub href: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub followers: Option<Followers>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl UserProfile {
    /// Display name, falling back to the account id
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        let profile: UserProfile = serde_json::from_str(
            r#"{
                "country": "SE",
                "display_name": "Ada",
                "email": "ada@example.com",
                "explicit_content": {"filter_enabled": false, "filter_locked": false},
                "external_urls": {"spotify": "https://open.spotify.com/user/ada"},
                "followers": {"href": null, "total": 12},
                "href": "https://api.spotify.com/v1/users/ada",
                "id": "ada",
                "images": [{"url": "https://i.example.com/a.jpg", "height": 64, "width": 64}],
                "product": "premium",
                "type": "user",
                "uri": "spotify:user:ada"
            }"#,
        )
        .unwrap();

        assert_eq!(profile.name(), "Ada");
        assert_eq!(profile.followers.map(|f| f.total), Some(12));
        assert_eq!(profile.images.len(), 1);
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id":"ada","display_name":null,"uri":"spotify:user:ada","href":"h"}"#,
        )
        .unwrap();
        assert_eq!(profile.name(), "ada");
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(serde_json::from_str::<UserProfile>(r#"{"uri":"u","href":"h"}"#).is_err());
    }
}
