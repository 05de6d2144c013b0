//! Error types for quire operations.

use thiserror::Error;

/// Errors that can occur while loading or converting a document.
///
/// Only structural problems are errors. Unknown elements, unresolved
/// references and unrecognized style hints are absorbed by the renderers
/// and reported through `tracing` instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Missing required section: {0}")]
    MissingSection(&'static str),

    #[error("Duplicate identifier '{id}' (in {first} and {second})")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
