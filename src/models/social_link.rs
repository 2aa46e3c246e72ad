use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::moc::Payload;

/// Known platforms with their icon name and profile base URL. Selecting one
/// of these in the admin UI pre-fills both fields.
const PLATFORM_DEFAULTS: &[(&str, &str, &str)] = &[
    ("GitHub", "github", "https://github.com/"),
    ("X (Twitter)", "x", "https://x.com/"),
    ("LinkedIn", "linkedin", "https://www.linkedin.com/in/"),
    ("Instagram", "instagram", "https://www.instagram.com/"),
    ("Facebook", "facebook", "https://www.facebook.com/"),
    ("YouTube", "youtube", "https://www.youtube.com/@"),
    ("TikTok", "tiktok", "https://www.tiktok.com/@"),
    ("Email", "mail", "mailto:"),
];

/// Icon name and base URL for a known platform.
pub fn platform_defaults(platform: &str) -> Option<(&'static str, &'static str)> {
    PLATFORM_DEFAULTS
        .iter()
        .find(|(name, _, _)| *name == platform)
        .map(|(_, icon, base_url)| (*icon, *base_url))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

impl SocialLink {
    /// A link pre-filled with the platform's defaults.
    pub fn for_platform(platform: &str) -> Self {
        let mut link = SocialLink {
            platform: platform.to_string(),
            url: String::new(),
            icon: String::new(),
        };
        if let Some((icon, base_url)) = platform_defaults(platform) {
            link.icon = icon.to_string();
            link.url = base_url.to_string();
        }
        link
    }

    /// Switch platforms: icon and URL snap to the new platform's defaults
    /// when the platform is known, otherwise the existing fields stay.
    pub fn set_platform(&mut self, platform: &str) {
        self.platform = platform.to_string();
        if let Some((icon, base_url)) = platform_defaults(platform) {
            self.icon = icon.to_string();
            self.url = base_url.to_string();
        }
    }
}

impl Payload for SocialLink {
    const TABLE: &'static str = "social_links";
    const ORDER_COLUMN: &'static str = "sort_order";
    const COLUMNS: &'static [&'static str] = &["platform", "url", "icon"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(SocialLink {
            platform: row.get("platform")?,
            url: row.get("url")?,
            icon: row.get("icon")?,
        })
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            self.platform.clone().into(),
            self.url.clone().into(),
            self.icon.clone().into(),
        ]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.platform.trim().is_empty() {
            return Err(ValidationError::new("platform", "platform is required"));
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::new("url", "url is required"));
        }
        Ok(())
    }
}
