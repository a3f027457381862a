//! Turns untrusted generation output into a [`ValidatedRecord`].
//!
//! Acceptance is all-or-nothing: the first field that fails its check rejects
//! the whole record, and nothing is ever defaulted.

mod extract;
mod schema;

pub use schema::{BudgetLine, Milestone, RiskEntry, Severity, ValidatedRecord};

use serde_json::{Map, Value};

/// Raised when generation output cannot be trusted as a plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("generation output contains no structured record")]
    NoRecord,
    #[error("structured record could not be decoded: {0}")]
    Malformed(String),
    #[error("invalid field {field}: {detail}")]
    InvalidField { field: &'static str, detail: String },
}

impl ParseError {
    pub(crate) fn field(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            detail: detail.into(),
        }
    }

    /// Top-level field that rejected the record, when one did.
    pub fn offending_field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Extract and validate the record embedded in `raw`.
pub fn parse_record(raw: &str) -> Result<ValidatedRecord, ParseError> {
    let candidate = extract::locate_record(raw).ok_or(ParseError::NoRecord)?;
    let record: Map<String, Value> =
        serde_json::from_str(candidate).map_err(|err| ParseError::Malformed(err.to_string()))?;
    schema::validate_record(&record)
}
