//! Core domain logic for the quotation service.
//! Storage, numbering and export rules live here; the HTTP crate only
//! translates requests and responses.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StorageConfig};
pub use export::{ExportError, ExportFormat, ExportedFile, SpreadsheetExport, TextExport};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::numbering::{generate_quotation_number, QuotationDraft};
pub use model::quotation::{
    Figure, IdError, LineItem, Quotation, QuotationId, QuotationSummary,
};
pub use repo::fs_repo::FsQuotationRepository;
pub use repo::quotation_repo::{QuotationRepository, RepoError, RepoResult};
pub use repo::sqlite_repo::SqliteQuotationRepository;
pub use repo::ConfiguredRepository;
pub use service::quotation_service::{QuotationService, ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
