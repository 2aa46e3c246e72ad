use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::moc::Payload;

/// An editable site page. `is_original_page` marks the pages shipped with
/// the site, which the admin UI protects from slug changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_original_page: bool,
}

impl Payload for Page {
    const TABLE: &'static str = "pages";
    const ORDER_COLUMN: &'static str = "\"order\"";
    const PUBLISH_COLUMN: Option<&'static str> = Some("is_published");
    const COLUMNS: &'static [&'static str] = &["slug", "title", "content", "is_original_page"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Page {
            slug: row.get("slug")?,
            title: row.get("title")?,
            content: row.get("content")?,
            is_original_page: row.get("is_original_page")?,
        })
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            self.slug.clone().into(),
            self.title.clone().into(),
            self.content.clone().into(),
            self.is_original_page.into(),
        ]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::new("title", "title is required"));
        }
        if self.slug.is_empty()
            || !self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::new(
                "slug",
                "slug must contain only lowercase letters, digits and hyphens",
            ));
        }
        Ok(())
    }
}
