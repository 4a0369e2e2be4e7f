//! Quotation document model.
//!
//! # Responsibility
//! - Define the canonical quotation/line-item read view used by listing
//!   and export renderers.
//! - Validate identifiers before they become storage keys.
//!
//! # Invariants
//! - Missing or `null` fields read as their declared default.
//! - Any object reads: scalars in text fields read as their JSON text, a
//!   non-array `items` reads as empty and non-object items are dropped.
//! - `grand_total` and `amount` are taken as supplied, never recomputed.
//! - A `QuotationId` never contains path separators, so it cannot address
//!   anything outside the storage directory.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Document key holding the quotation identifier.
pub const QUOTATION_NUMBER_FIELD: &str = "quotation_number";

/// Validated quotation identifier, also used as the storage key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QuotationId(String);

/// Identifier validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Identifier is missing or the empty string.
    Empty,
    /// Identifier would not map to a single file name.
    Unsafe(String),
}

impl Display for IdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "quotation number cannot be empty"),
            Self::Unsafe(value) => write!(f, "quotation number `{value}` is not a valid file name"),
        }
    }
}

impl Error for IdError {}

impl QuotationId {
    /// Parses and validates a caller-supplied identifier.
    ///
    /// The value is kept as-is (no trimming) so that the storage key matches
    /// what the caller saved.
    pub fn parse(value: &str) -> Result<Self, IdError> {
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        if value == "."
            || value == ".."
            || value.contains(['/', '\\', '\0'])
        {
            return Err(IdError::Unsafe(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// Reads `quotation_number` out of a raw document.
    ///
    /// Non-object documents and non-string identifiers read as empty.
    pub fn from_document(document: &Value) -> Result<Self, IdError> {
        let raw = document
            .get(QUOTATION_NUMBER_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self::parse(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuotationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric document field, printed exactly as it was written.
///
/// JSON numbers keep their written form; every other value reads as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Figure {
    Number(Number),
    Text(String),
}

impl Figure {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Number(number) => Self::Number(number),
            Value::Null => Self::default(),
            other => Self::Text(value_text(other)),
        }
    }

    /// Numeric value for spreadsheet cells. Text figures have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.as_f64(),
            Self::Text(_) => None,
        }
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::Number(Number::from(0))
    }
}

impl Display for Figure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for Figure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl From<i64> for Figure {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

/// One quotation line item. Has no identity outside its document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    pub quantity: Figure,
    pub unit_price: Figure,
    /// Expected to equal `quantity * unit_price`; not enforced.
    pub amount: Figure,
    /// Empty when the item carries no note.
    #[serde(deserialize_with = "lenient_text")]
    pub notes: String,
}

/// Typed read view of a stored quotation document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quotation {
    #[serde(deserialize_with = "lenient_text")]
    pub quotation_number: String,
    /// Free-form; the page pre-fills today's date but nothing enforces it.
    #[serde(deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(deserialize_with = "lenient_text")]
    pub customer: String,
    #[serde(deserialize_with = "lenient_text")]
    pub contact_person: String,
    #[serde(deserialize_with = "lenient_text")]
    pub address: String,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(deserialize_with = "lenient_items")]
    pub items: Vec<LineItem>,
    pub grand_total: Figure,
}

impl Quotation {
    /// Builds the typed view from a raw stored document.
    ///
    /// # Errors
    /// - Returns an error only when the document is not a JSON object.
    pub fn from_document(document: &Value) -> Result<Self, serde_json::Error> {
        if !document.is_object() {
            return Err(serde::de::Error::custom(
                "quotation document is not a JSON object",
            ));
        }
        Self::deserialize(document)
    }
}

/// Listing projection of one stored quotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationSummary {
    pub id: QuotationId,
    pub date: String,
    pub customer: String,
    pub total: Figure,
}

impl QuotationSummary {
    /// Projects a stored document under its storage key.
    pub fn from_quotation(id: QuotationId, quotation: Quotation) -> Self {
        Self {
            id,
            date: quotation.date,
            customer: quotation.customer,
            total: quotation.grand_total,
        }
    }
}

/// Text form of a JSON value: strings as-is, `null` as empty, anything
/// else as its compact JSON text.
fn value_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(value_text)
}

fn lenient_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LineItem>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| LineItem::deserialize(item).ok())
        .collect())
}
