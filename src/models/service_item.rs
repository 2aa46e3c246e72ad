use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::moc::Payload;

/// One entry of the services section. `icon` is the name of an icon in the
/// frontend's icon set, not a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl Payload for ServiceItem {
    const TABLE: &'static str = "services";
    const ORDER_COLUMN: &'static str = "sort_order";
    const PUBLISH_COLUMN: Option<&'static str> = Some("is_published");
    const COLUMNS: &'static [&'static str] = &["title", "description", "icon"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ServiceItem {
            title: row.get("title")?,
            description: row.get("description")?,
            icon: row.get("icon")?,
        })
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            self.description.clone().into(),
            self.icon.clone().into(),
        ]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::new("title", "title is required"));
        }
        Ok(())
    }
}
