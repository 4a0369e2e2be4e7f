//! Quotation repository contract.
//!
//! # Responsibility
//! - Define the storage interface request handling depends on.
//! - Keep backend details (files, SQL) out of the service layer.
//!
//! # Invariants
//! - Documents are stored and returned verbatim.
//! - `put` replaces any existing document under the same id.
//! - Absence is `Ok(None)` / `Ok(false)`, never an error.

use crate::db::DbError;
use crate::model::quotation::QuotationId;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage error for quotation persistence.
#[derive(Debug)]
pub enum RepoError {
    Io(std::io::Error),
    Db(DbError),
    /// Stored bytes are not a valid JSON document.
    InvalidData {
        id: QuotationId,
        message: String,
    },
    /// Document could not be encoded for storage.
    Encode(serde_json::Error),
    /// A previous holder of the connection panicked.
    LockPoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData { id, message } => {
                write!(f, "stored quotation `{id}` is not valid JSON: {message}")
            }
            Self::Encode(err) => write!(f, "failed to encode quotation: {err}"),
            Self::LockPoisoned => write!(f, "quotation store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidData { .. } | Self::LockPoisoned => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for quotation documents keyed by id.
pub trait QuotationRepository {
    /// Writes the document, replacing any existing one.
    fn put(&self, id: &QuotationId, document: &Value) -> RepoResult<()>;
    /// Reads one document; `None` when the id is unknown.
    fn get(&self, id: &QuotationId) -> RepoResult<Option<Value>>;
    /// Removes one document; `false` when the id is unknown.
    fn delete(&self, id: &QuotationId) -> RepoResult<bool>;
    /// Lists every stored id. Order is backend-defined.
    fn list_ids(&self) -> RepoResult<Vec<QuotationId>>;
}

pub(crate) fn decode_document(id: &QuotationId, raw: &[u8]) -> RepoResult<Value> {
    serde_json::from_slice(raw).map_err(|err| RepoError::InvalidData {
        id: id.clone(),
        message: err.to_string(),
    })
}
