use std::marker::PhantomData;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::db::DbPool;
use crate::errors::StoreError;
use crate::moc::record::{OrderedRecord, Payload, RecordId};

/// Remote-facing operations of one collection's table.
///
/// The reconciler and the optimistic mutators only talk to this trait, so
/// tests can wrap the real store with scripted failures. Implementations do
/// not retry; retry policy belongs to the caller.
pub trait RecordStore<P: Payload> {
    /// All records, ordered by the order column ascending (id breaks ties).
    /// An empty table is an empty collection, not an error.
    fn fetch_all(&self) -> Result<Vec<OrderedRecord<P>>, StoreError>;

    /// Insert a record and return the id the store assigned.
    fn insert(&self, record: &OrderedRecord<P>) -> Result<RecordId, StoreError>;

    /// Full-row update. `StoreError::NotFound` if the id no longer exists.
    fn update(&self, id: RecordId, record: &OrderedRecord<P>) -> Result<(), StoreError>;

    /// Partial update of the order value alone.
    fn update_order(&self, id: RecordId, order: i64) -> Result<(), StoreError>;

    /// Partial update of the publish flag alone.
    fn set_published(&self, id: RecordId, published: bool) -> Result<(), StoreError>;

    /// Idempotent: deleting an id that is already gone is not an error.
    fn delete_one(&self, id: RecordId) -> Result<(), StoreError>;

    fn delete_all(&self) -> Result<(), StoreError>;

    /// Batch upsert keyed on id, atomic at the single-call granularity
    /// (one transaction). Records without an id are inserted.
    fn upsert_many(&self, records: &[OrderedRecord<P>]) -> Result<(), StoreError>;
}

/// Pool-backed store for one collection table.
///
/// The pool is acquired before every operation; an acquisition failure is
/// `StoreError::Connection` and aborts before any statement is sent.
pub struct SqliteStore<P> {
    pool: DbPool,
    _payload: PhantomData<P>,
}

impl<P: Payload> SqliteStore<P> {
    pub fn new(pool: DbPool) -> Self {
        SqliteStore {
            pool,
            _payload: PhantomData,
        }
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        self.pool.get().map_err(StoreError::Connection)
    }

    fn select_sql() -> String {
        let mut cols = vec!["id".to_string(), format!("{} AS ord", P::ORDER_COLUMN)];
        if let Some(publish) = P::PUBLISH_COLUMN {
            cols.push(format!("{publish} AS published"));
        }
        cols.extend(P::COLUMNS.iter().map(|c| c.to_string()));
        format!(
            "SELECT {} FROM {} ORDER BY {} ASC, id ASC",
            cols.join(", "),
            P::TABLE,
            P::ORDER_COLUMN
        )
    }

    /// Writable columns in bind order: payload columns, order, publish flag.
    fn write_columns() -> Vec<&'static str> {
        let mut cols: Vec<&'static str> = P::COLUMNS.to_vec();
        cols.push(P::ORDER_COLUMN);
        if let Some(publish) = P::PUBLISH_COLUMN {
            cols.push(publish);
        }
        cols
    }

    fn write_values(record: &OrderedRecord<P>) -> Vec<Value> {
        let mut values = record.payload.bind_values();
        values.push(Value::Integer(record.order));
        if P::PUBLISH_COLUMN.is_some() {
            values.push(Value::Integer(record.published.unwrap_or(false) as i64));
        }
        values
    }

    fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderedRecord<P>> {
        Ok(OrderedRecord {
            id: Some(row.get("id")?),
            order: row.get("ord")?,
            published: match P::PUBLISH_COLUMN {
                Some(_) => Some(row.get("published")?),
                None => None,
            },
            payload: P::from_row(row)?,
        })
    }

    fn placeholders(n: usize) -> String {
        (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
    }
}

impl<P: Payload> RecordStore<P> for SqliteStore<P> {
    fn fetch_all(&self) -> Result<Vec<OrderedRecord<P>>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&Self::select_sql())?;
        let records = stmt
            .query_map([], |row| Self::record_from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn insert(&self, record: &OrderedRecord<P>) -> Result<RecordId, StoreError> {
        let conn = self.conn()?;
        let cols = Self::write_columns();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            P::TABLE,
            cols.join(", "),
            Self::placeholders(cols.len())
        );
        conn.execute(&sql, params_from_iter(Self::write_values(record)))?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, id: RecordId, record: &OrderedRecord<P>) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let cols = Self::write_columns();
        let assignments = cols
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{}",
            P::TABLE,
            cols.len() + 1
        );
        let mut values = Self::write_values(record);
        values.push(Value::Integer(id));
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn update_order(&self, id: RecordId, order: i64) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let sql = format!("UPDATE {} SET {} = ?1 WHERE id = ?2", P::TABLE, P::ORDER_COLUMN);
        let changed = conn.execute(&sql, rusqlite::params![order, id])?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn set_published(&self, id: RecordId, published: bool) -> Result<(), StoreError> {
        let Some(publish) = P::PUBLISH_COLUMN else {
            return Err(StoreError::Query(rusqlite::Error::InvalidQuery));
        };
        let conn = self.conn()?;
        let sql = format!("UPDATE {} SET {publish} = ?1 WHERE id = ?2", P::TABLE);
        let changed = conn.execute(&sql, rusqlite::params![published, id])?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn delete_one(&self, id: RecordId) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", P::TABLE);
        // Zero rows affected is fine: delete is idempotent.
        conn.execute(&sql, rusqlite::params![id])?;
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(&format!("DELETE FROM {}", P::TABLE), [])?;
        Ok(())
    }

    fn upsert_many(&self, records: &[OrderedRecord<P>]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let cols = Self::write_columns();
            let update_set = cols
                .iter()
                .map(|c| format!("{c} = excluded.{c}"))
                .collect::<Vec<_>>()
                .join(", ");
            let upsert_sql = format!(
                "INSERT INTO {} (id, {}) VALUES ({}) \
                 ON CONFLICT(id) DO UPDATE SET {update_set}",
                P::TABLE,
                cols.join(", "),
                Self::placeholders(cols.len() + 1)
            );
            let insert_sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                P::TABLE,
                cols.join(", "),
                Self::placeholders(cols.len())
            );
            for record in records {
                match record.id {
                    Some(id) => {
                        let mut values = vec![Value::Integer(id)];
                        values.extend(Self::write_values(record));
                        tx.execute(&upsert_sql, params_from_iter(values))?;
                    }
                    None => {
                        tx.execute(&insert_sql, params_from_iter(Self::write_values(record)))?;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}
