//! Error types for the nfx-core library.

use thiserror::Error;

/// Main error type for the nfx library.
#[derive(Error, Debug)]
pub enum NfxError {
    /// Invoice extraction error.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Document store error.
    #[error("document store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading an invoice document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No document bytes were supplied.
    #[error("missing content: no invoice document was supplied")]
    InputMissing,

    /// The bytes are not well-formed XML.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A mandatory container or field is absent or blank.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),
}

/// Errors raised by a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store is not initialized or cannot be reached.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// Underlying storage I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Result type for the nfx library.
pub type Result<T> = std::result::Result<T, NfxError>;
