//! Errors that occur during writing

use font_types::Tag;

use crate::{graph::OffsetLen, validate::ValidationReport};

/// An error occured while writing a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ValidationFailed(ValidationReport),
    /// A resolved offset does not fit in its field.
    OffsetOverflow { len: OffsetLen, value: usize },
    /// A table required to encode the font is not present.
    TableIsMissing(Tag),
}

impl From<ValidationReport> for Error {
    fn from(value: ValidationReport) -> Self {
        Error::ValidationFailed(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ValidationFailed(report) => report.fmt(f),
            Error::OffsetOverflow { len, value } => {
                write!(f, "offset {value} does not fit in an {len}")
            }
            Error::TableIsMissing(tag) => write!(f, "the '{tag}' table is required"),
        }
    }
}

impl std::error::Error for Error {}
