//! tabgeom: Infer table structure from positioned words and ruling lines.
//!
//! This is the public API facade crate. It re-exports the data types and
//! algorithms of tabgeom-core and adds page sources, the per-page
//! pipeline, and document-level extraction.
//!
//! # Architecture
//!
//! - **tabgeom-core**: Backend-independent data types and inference algorithms
//! - **tabgeom** (this crate): Page sources, pipeline orchestration, fatal errors
//! - **tabgeom-cli**: The `tabgeom` command-line tool

pub mod error;
pub mod extractor;
pub mod source;

pub use tabgeom_core;

pub use error::{ExtractError, SourceError};
pub use extractor::{Extraction, PageColumns, PageTables, TableExtractor};
pub use source::{JsonDocument, PageContent, PageSource};
pub use tabgeom_core::{
    BBox, Cell, ColumnGroup, ColumnSet, Edge, EdgeSource, ExtractSettings, Grid, HeaderLayout, Line,
    Rect, SkipNote, SkipReason, Table, Token, UnicodeNorm,
};
