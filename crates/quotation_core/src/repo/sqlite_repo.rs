//! SQLite-backed quotation repository.
//!
//! Stores each document as JSON text in `quotations.document`. The
//! connection is shared behind a mutex so one repository can serve
//! concurrent requests.
//!
//! # Invariants
//! - Connections must come from `db::open_db*` (migrations applied).
//! - `put` is an upsert; `updated_at` moves on every write.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::quotation::QuotationId;
use crate::repo::quotation_repo::{decode_document, QuotationRepository, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

/// SQLite quotation repository.
pub struct SqliteQuotationRepository {
    conn: Mutex<Connection>,
}

impl SqliteQuotationRepository {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Returns `DbError::NotMigrated` when the connection is not at the
    ///   schema version this binary knows.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version != latest_version() {
            return Err(RepoError::Db(DbError::NotMigrated {
                db_version: version,
                expected: latest_version(),
            }));
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl QuotationRepository for SqliteQuotationRepository {
    fn put(&self, id: &QuotationId, document: &Value) -> RepoResult<()> {
        let encoded = serde_json::to_string(document).map_err(RepoError::Encode)?;
        self.lock()?.execute(
            "INSERT INTO quotations (id, document, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(id) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at;",
            params![id.as_str(), encoded],
        )?;
        Ok(())
    }

    fn get(&self, id: &QuotationId) -> RepoResult<Option<Value>> {
        let raw: Option<String> = self
            .lock()?
            .query_row(
                "SELECT document FROM quotations WHERE id = ?1;",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|text| decode_document(id, text.as_bytes()))
            .transpose()
    }

    fn delete(&self, id: &QuotationId) -> RepoResult<bool> {
        let changed = self
            .lock()?
            .execute("DELETE FROM quotations WHERE id = ?1;", [id.as_str()])?;
        Ok(changed > 0)
    }

    fn list_ids(&self) -> RepoResult<Vec<QuotationId>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id FROM quotations ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            match QuotationId::parse(&value) {
                Ok(id) => ids.push(id),
                Err(err) => debug!(
                    "event=quotation_list module=repo status=skip reason=invalid_id error={err}"
                ),
            }
        }
        Ok(ids)
    }
}
