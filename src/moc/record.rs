use rusqlite::Row;
use rusqlite::types::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// SQLite rowid of a persisted record.
pub type RecordId = i64;

/// How a collection converges remote state to local state on save.
///
/// `DiffByRecord` deletes only removed ids and upserts only changed rows,
/// preserving record identity across saves. `ReplaceAll` clears the table and
/// reinserts the whole list; ids are rewritten on every save and a failed
/// insert can leave the table holding only a prefix of the list. Pick
/// `ReplaceAll` only where nothing external references the ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStrategy {
    DiffByRecord,
    ReplaceAll,
}

/// A unit of a managed ordered collection.
///
/// `id == None` marks a pending record: created locally, never persisted.
/// Pending records are only ever inserted — never updated or deleted
/// remotely. `order` is the persisted sequence value; the vector position in
/// the owning collection is the display order, and the two are realigned
/// (order = index) on every successful save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedRecord<P> {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub payload: P,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// Domain shape of one collection: table layout, row mapping, validation.
///
/// Implementors are plain field structs (Page, Project, ...). The store
/// composes its SQL from the associated consts, so the same adapter serves
/// every collection.
pub trait Payload:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const TABLE: &'static str;
    /// Order column, already quoted where the name is an SQL keyword.
    const ORDER_COLUMN: &'static str;
    const PUBLISH_COLUMN: Option<&'static str> = None;
    /// Payload columns, in the order `bind_values` produces them.
    const COLUMNS: &'static [&'static str];
    const STRATEGY: SaveStrategy = SaveStrategy::DiffByRecord;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn bind_values(&self) -> Vec<Value>;

    /// Pre-flight check, run before any remote call.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl<P: Payload> OrderedRecord<P> {
    /// A record that exists only locally, pending its first insert.
    pub fn pending(payload: P, order: i64) -> Self {
        OrderedRecord {
            id: None,
            payload,
            order,
            published: P::PUBLISH_COLUMN.map(|_| false),
        }
    }
}
