//! Quotation domain model.
//!
//! # Responsibility
//! - Define the typed read view over stored quotation documents.
//! - Own identifier validation and new-number generation.
//!
//! # Invariants
//! - Stored documents are kept verbatim; the typed view never writes back.
//! - Every field has an explicit default so partial documents still read.

pub mod numbering;
pub mod quotation;
