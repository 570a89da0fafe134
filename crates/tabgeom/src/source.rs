//! Page sources: where tokens and drawings come from.
//!
//! Table inference does not read documents itself. A [`PageSource`] hands
//! it one [`PageContent`] per page; [`JsonDocument`] is the bundled source,
//! reading a page dump produced by any word-level PDF reader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabgeom_core::{BBox, Line, Rect, Token};

use crate::error::SourceError;

/// Everything the inference engine needs from one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-based). Zero in a dump means "use the page's position".
    #[serde(default)]
    pub page_number: usize,
    /// Positioned words.
    #[serde(default)]
    pub words: Vec<Token>,
    /// Drawn line segments.
    #[serde(default)]
    pub lines: Vec<Line>,
    /// Drawn rectangles.
    #[serde(default)]
    pub rects: Vec<Rect>,
    /// Table regions located by the reader, if it locates them.
    #[serde(default)]
    pub tables: Vec<BBox>,
}

/// A document that yields pages by 0-based index.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Load the page at `index` (0-based).
    fn page(&self, index: usize) -> Result<PageContent, SourceError>;

    /// Human-readable origin, used in logs.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// A page dump held in memory.
///
/// ```json
/// { "source": "report.pdf",
///   "pages": [ { "page_number": 1,
///                "words": [{"text": "LIFE", "x0": 12, "top": 40, "x1": 30, "bottom": 48}],
///                "lines": [], "rects": [], "tables": [] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    /// Name of the document the dump was taken from.
    #[serde(default)]
    pub source: Option<String>,
    pub pages: Vec<PageContent>,
}

impl JsonDocument {
    /// Read a dump from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read and
    /// [`SourceError::MalformedFile`] if it is not a valid dump.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc: JsonDocument =
            serde_json::from_str(&text).map_err(|source| SourceError::MalformedFile {
                path: path.to_path_buf(),
                source,
            })?;
        if doc.source.is_none() {
            doc.source = Some(path.display().to_string());
        }
        doc.number_pages();
        Ok(doc)
    }

    /// Parse a dump from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let mut doc: JsonDocument = serde_json::from_str(json)?;
        doc.number_pages();
        Ok(doc)
    }

    /// Wrap already-loaded pages.
    pub fn from_pages(pages: Vec<PageContent>) -> Self {
        let mut doc = JsonDocument {
            source: None,
            pages,
        };
        doc.number_pages();
        doc
    }

    fn number_pages(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            if page.page_number == 0 {
                page.page_number = i + 1;
            }
        }
    }
}

impl PageSource for JsonDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageContent, SourceError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(SourceError::PageOutOfRange {
                index,
                count: self.pages.len(),
            })
    }

    fn name(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
