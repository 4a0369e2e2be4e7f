//! Quotation export renderers.
//!
//! # Responsibility
//! - Turn a typed quotation into downloadable bytes.
//! - Own file naming and content type for each format.
//!
//! # Invariants
//! - Layouts are fixed: labels, line order and cell positions are relied
//!   on by users who script against exported files.
//! - Renderers print figures as stored; nothing is recomputed.

pub mod spreadsheet;
pub mod text;

use crate::model::quotation::{Quotation, QuotationId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use spreadsheet::SpreadsheetExport;
pub use text::TextExport;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    /// Workbook writer rejected the sheet.
    Spreadsheet(rust_xlsxwriter::XlsxError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spreadsheet(err) => write!(f, "failed to render spreadsheet: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spreadsheet(err) => Some(err),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::Spreadsheet(value)
    }
}

/// One export format.
pub trait ExportFormat {
    /// File extension without the dot.
    const EXTENSION: &'static str;
    /// MIME type sent with the attachment.
    const CONTENT_TYPE: &'static str;

    fn render(quotation: &Quotation) -> ExportResult<Vec<u8>>;
}

/// Rendered attachment ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// `<id>.<extension>`
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Renders `quotation` in format `F`, naming the file after the storage id.
    pub fn render<F: ExportFormat>(id: &QuotationId, quotation: &Quotation) -> ExportResult<Self> {
        Ok(Self {
            file_name: format!("{id}.{}", F::EXTENSION),
            content_type: F::CONTENT_TYPE,
            bytes: F::render(quotation)?,
        })
    }
}
