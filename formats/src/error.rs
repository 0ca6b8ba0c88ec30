//! Error module
//!

use thiserror::Error;

/// Hard failures.  Bad rows are never errors, they are skipped.
///
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("No header row in input")]
    EmptyInput,
    #[error("Unreadable header row: {0}")]
    BadHeader(String),
}

/// Why a given data row was left out, for logging purposes only.
///
#[derive(Debug, Error, PartialEq)]
pub(crate) enum Skip {
    #[error("placeholder record")]
    Placeholder,
    #[error("only {0} columns")]
    TooShort(usize),
    #[error("no drone id")]
    NoDroneId,
    #[error("no timepoint")]
    NoTimepoint,
    #[error("bad drone id {0:?}")]
    BadDroneId(String),
}
