//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the quotation storage contract.
//! - Provide JSON-file and SQLite implementations behind it.
//! - Build the configured backend at startup.

pub mod fs_repo;
pub mod quotation_repo;
pub mod sqlite_repo;

use crate::config::StorageConfig;
use crate::db::open_db;
use crate::model::quotation::QuotationId;
use fs_repo::FsQuotationRepository;
use quotation_repo::{QuotationRepository, RepoResult};
use serde_json::Value;
use sqlite_repo::SqliteQuotationRepository;

/// Backend selected by configuration.
pub enum ConfiguredRepository {
    JsonFiles(FsQuotationRepository),
    Sqlite(SqliteQuotationRepository),
}

impl ConfiguredRepository {
    /// Opens the backend described by `config`.
    pub fn open(config: &StorageConfig) -> RepoResult<Self> {
        match config {
            StorageConfig::JsonFiles { dir } => {
                FsQuotationRepository::open(dir.clone()).map(Self::JsonFiles)
            }
            StorageConfig::Sqlite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let conn = open_db(path)?;
                SqliteQuotationRepository::try_new(conn).map(Self::Sqlite)
            }
        }
    }

    fn inner(&self) -> &dyn QuotationRepository {
        match self {
            Self::JsonFiles(repo) => repo,
            Self::Sqlite(repo) => repo,
        }
    }
}

impl QuotationRepository for ConfiguredRepository {
    fn put(&self, id: &QuotationId, document: &Value) -> RepoResult<()> {
        self.inner().put(id, document)
    }

    fn get(&self, id: &QuotationId) -> RepoResult<Option<Value>> {
        self.inner().get(id)
    }

    fn delete(&self, id: &QuotationId) -> RepoResult<bool> {
        self.inner().delete(id)
    }

    fn list_ids(&self) -> RepoResult<Vec<QuotationId>> {
        self.inner().list_ids()
    }
}
