//! The CLI's own error type, wrapping I/O and configuration failures and
//! the core's `ParseError` for the process exit path.

use rowfilter_diagnostics::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },

    #[error("could not write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("invalid --filter expression:\n{}", .0.render(&.1))]
    Filter(ParseError, String),

    #[error("unknown column {name:?} in --columns")]
    UnknownColumn { name: String },

    #[error("row {line}: expected {expected} fields, found {found}")]
    FieldCountMismatch { line: usize, expected: usize, found: usize },
}
