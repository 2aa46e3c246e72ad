use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::moc::{Payload, SaveStrategy};

/// One slide of the hero carousel.
///
/// Saved with `ReplaceAll`: nothing references hero image ids, so the
/// collection trades stable identity for the simplest possible write path.
/// The data-loss window of delete-then-reinsert is covered by the session
/// staying Dirty until a retry converges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroImage {
    pub image_url: String,
}

impl Payload for HeroImage {
    const TABLE: &'static str = "hero_images";
    const ORDER_COLUMN: &'static str = "display_order";
    const COLUMNS: &'static [&'static str] = &["image_url"];
    const STRATEGY: SaveStrategy = SaveStrategy::ReplaceAll;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(HeroImage {
            image_url: row.get("image_url")?,
        })
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![self.image_url.clone().into()]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.image_url.trim().is_empty() {
            return Err(ValidationError::new("image_url", "image URL is required"));
        }
        Ok(())
    }
}
