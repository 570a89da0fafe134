//! Fatal error types for page sources and document extraction.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Soft, per-region
//! outcomes are not errors; see [`tabgeom_core::SkipNote`].

use std::path::PathBuf;

use thiserror::Error;

/// Error type for [`PageSource`](crate::PageSource) implementations.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The dump file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dump file was read but is not a valid page dump.
    #[error("malformed page dump {}: {source}", path.display())]
    MalformedFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// In-memory JSON is not a valid page dump.
    #[error("malformed page dump: {0}")]
    Json(#[from] serde_json::Error),

    /// A page index beyond the end of the document was requested.
    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}

/// Error type for document-level extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Loading a page from the source failed.
    #[error("page {page}: {source}")]
    Page {
        /// Page number (1-based) being loaded.
        page: usize,
        #[source]
        source: SourceError,
    },
}
