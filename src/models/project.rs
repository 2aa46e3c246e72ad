use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::moc::Payload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
}

fn check_url(field: &'static str, url: &Option<String>) -> Result<(), ValidationError> {
    if let Some(url) = url
        && !url.is_empty()
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        return Err(ValidationError::new(field, "must be an http(s) URL"));
    }
    Ok(())
}

impl Payload for Project {
    const TABLE: &'static str = "projects";
    const ORDER_COLUMN: &'static str = "sort_order";
    const PUBLISH_COLUMN: Option<&'static str> = Some("is_published");
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "description",
        "image_url",
        "tags",
        "live_url",
        "repo_url",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let tags: String = row.get("tags")?;
        Ok(Project {
            title: row.get("title")?,
            description: row.get("description")?,
            image_url: row.get("image_url")?,
            tags: serde_json::from_str(&tags).unwrap_or_default(),
            live_url: row.get("live_url")?,
            repo_url: row.get("repo_url")?,
        })
    }

    fn bind_values(&self) -> Vec<Value> {
        let tags = serde_json::to_string(&self.tags).unwrap_or_else(|_| "[]".to_string());
        vec![
            self.title.clone().into(),
            self.description.clone().into(),
            self.image_url.clone().into(),
            tags.into(),
            self.live_url.clone().into(),
            self.repo_url.clone().into(),
        ]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::new("title", "title is required"));
        }
        check_url("live_url", &self.live_url)?;
        check_url("repo_url", &self.repo_url)?;
        Ok(())
    }
}
