//! Quotation use-case service.
//!
//! # Responsibility
//! - Provide list/save/load/delete/export entry points for request handlers.
//! - Translate storage outcomes into the error taxonomy callers report.
//!
//! # Invariants
//! - Save never writes when the identifier is missing or empty.
//! - Listing never fails because of one unreadable document.
//! - Documents are passed through verbatim; totals are never recomputed.

use crate::export::{
    ExportError, ExportFormat, ExportedFile, SpreadsheetExport, TextExport,
};
use crate::model::numbering::QuotationDraft;
use crate::model::quotation::{IdError, Quotation, QuotationId, QuotationSummary};
use crate::repo::quotation_repo::{QuotationRepository, RepoError};
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for quotation use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Save payload has no usable identifier or is not an object.
    Validation(IdError),
    /// No quotation is stored under the requested id.
    NotFound(String),
    /// Stored document cannot be read.
    Parse { id: QuotationId, message: String },
    /// Persistence-layer failure.
    Repo(RepoError),
    Export(ExportError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "quotation not found: {id}"),
            Self::Parse { id, message } => {
                write!(f, "stored quotation `{id}` cannot be read: {message}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::NotFound(_) | Self::Parse { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidData { id, message } => Self::Parse { id, message },
            other => Self::Repo(other),
        }
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Quotation service facade over a repository implementation.
pub struct QuotationService<R: QuotationRepository> {
    repo: R,
}

impl<R: QuotationRepository> QuotationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Number and date offered for a new, unsaved quotation.
    pub fn new_draft(&self) -> QuotationDraft {
        QuotationDraft::now()
    }

    /// Lists summaries of every readable stored quotation, newest id first.
    ///
    /// Documents that are not valid JSON, or not a JSON object, are skipped.
    pub fn list_quotations(&self) -> ServiceResult<Vec<QuotationSummary>> {
        let mut summaries = Vec::new();
        for id in self.repo.list_ids()? {
            let document = match self.repo.get(&id) {
                Ok(Some(document)) => document,
                // Removed between listing and reading.
                Ok(None) => continue,
                Err(RepoError::InvalidData { message, .. }) => {
                    debug!(
                        "event=quotation_list module=service status=skip id={id} reason=invalid_json error={message}"
                    );
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            match Quotation::from_document(&document) {
                Ok(quotation) => summaries.push(QuotationSummary::from_quotation(id, quotation)),
                Err(err) => debug!(
                    "event=quotation_list module=service status=skip id={id} reason=not_object error={err}"
                ),
            }
        }
        summaries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(summaries)
    }

    /// Stores `document` verbatim under its `quotation_number`.
    ///
    /// # Errors
    /// - `Validation` when `quotation_number` is missing, not a string,
    ///   empty, or not usable as a file name. Nothing is written.
    pub fn save(&self, document: &Value) -> ServiceResult<QuotationId> {
        let id = QuotationId::from_document(document).map_err(|err| {
            warn!("event=quotation_save module=service status=rejected error={err}");
            ServiceError::Validation(err)
        })?;
        self.repo.put(&id, document)?;
        info!("event=quotation_save module=service status=ok id={id}");
        Ok(id)
    }

    /// Returns the stored document verbatim.
    pub fn load(&self, id: &str) -> ServiceResult<Value> {
        let id = lookup_id(id)?;
        let document = self
            .repo
            .get(&id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        debug!("event=quotation_load module=service status=ok id={id}");
        Ok(document)
    }

    /// Removes the stored document.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = lookup_id(id)?;
        if !self.repo.delete(&id)? {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        info!("event=quotation_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Renders the stored quotation in format `F`.
    pub fn export<F: ExportFormat>(&self, id: &str) -> ServiceResult<ExportedFile> {
        let id = lookup_id(id)?;
        let document = self
            .repo
            .get(&id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        let quotation =
            Quotation::from_document(&document).map_err(|err| ServiceError::Parse {
                id: id.clone(),
                message: err.to_string(),
            })?;
        let file = ExportedFile::render::<F>(&id, &quotation)?;
        info!(
            "event=quotation_export module=service status=ok id={id} format={} bytes={}",
            F::EXTENSION,
            file.bytes.len()
        );
        Ok(file)
    }

    pub fn export_text(&self, id: &str) -> ServiceResult<ExportedFile> {
        self.export::<TextExport>(id)
    }

    pub fn export_spreadsheet(&self, id: &str) -> ServiceResult<ExportedFile> {
        self.export::<SpreadsheetExport>(id)
    }
}

/// Ids that cannot name a stored file are simply not found.
fn lookup_id(raw: &str) -> ServiceResult<QuotationId> {
    QuotationId::parse(raw).map_err(|_| ServiceError::NotFound(raw.to_string()))
}
