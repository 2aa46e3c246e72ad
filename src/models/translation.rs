use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, ValidationError};

/// One UI string, unique per (key, language).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub key: String,
    pub value: String,
    pub language: String,
}

fn validate(t: &Translation) -> Result<(), ValidationError> {
    if t.key.trim().is_empty() {
        return Err(ValidationError::new("key", "key is required"));
    }
    if t.language.trim().is_empty() {
        return Err(ValidationError::new("language", "language is required"));
    }
    Ok(())
}

/// All translations, optionally restricted to one language.
pub fn find_all(conn: &Connection, language: Option<&str>) -> Result<Vec<Translation>, AppError> {
    let map_row = |row: &rusqlite::Row<'_>| {
        Ok(Translation {
            key: row.get("key")?,
            value: row.get("value")?,
            language: row.get("language")?,
        })
    };
    let translations = match language {
        Some(language) => {
            let mut stmt = conn.prepare(
                "SELECT key, value, language FROM translations \
                 WHERE language = ?1 ORDER BY key",
            )?;
            stmt.query_map(params![language], map_row)?
                .collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT key, value, language FROM translations ORDER BY language, key",
            )?;
            stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(translations)
}

pub fn upsert(conn: &Connection, t: &Translation) -> Result<(), AppError> {
    validate(t)?;
    conn.execute(
        "INSERT INTO translations (key, language, value) VALUES (?1, ?2, ?3) \
         ON CONFLICT(key, language) DO UPDATE SET value = excluded.value",
        params![t.key, t.language, t.value],
    )?;
    Ok(())
}

pub fn upsert_many(conn: &mut Connection, translations: &[Translation]) -> Result<(), AppError> {
    for t in translations {
        validate(t)?;
    }
    let tx = conn.transaction()?;
    for t in translations {
        tx.execute(
            "INSERT INTO translations (key, language, value) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key, language) DO UPDATE SET value = excluded.value",
            params![t.key, t.language, t.value],
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// Idempotent: deleting a missing key is not an error.
pub fn delete(conn: &Connection, key: &str, language: &str) -> Result<(), AppError> {
    conn.execute(
        "DELETE FROM translations WHERE key = ?1 AND language = ?2",
        params![key, language],
    )?;
    Ok(())
}
