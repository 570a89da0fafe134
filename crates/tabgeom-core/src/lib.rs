//! tabgeom-core: Backend-independent data types and table-geometry inference.
//!
//! This crate takes positioned words and vector primitives from a page and
//! infers table structure from them: column boundaries (drawn and
//! text-aligned), rectangular cell grids, header spans and packed-value
//! repair. It knows nothing about where the page came from.

pub mod cluster;
pub mod columns;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod merged;
pub mod regions;
pub mod settings;
pub mod shapes;
pub mod table;
pub mod unicode_norm;
pub mod words;

pub use cluster::{Cluster, cluster_sorted, cluster_values};
pub use columns::{ColumnSet, discover_columns};
pub use edges::{Edge, EdgeSource, collect_vertical_edges};
pub use error::{SkipNote, SkipReason};
pub use geometry::BBox;
pub use grid::{Cell, Grid, assemble_by_boundaries, assemble_by_positions, group_rows, tokens_in_region};
pub use merged::{
    Choice, ColumnGroup, HeaderLayout, PackedReport, choose_better, detect_header_spans,
    detect_packed_values, has_packed_columns, is_numeric_like, is_packed_text,
};
pub use regions::find_regions;
pub use settings::ExtractSettings;
pub use shapes::{Line, Orientation, Rect};
pub use table::{Table, TableBuilder};
pub use unicode_norm::UnicodeNorm;
pub use words::{Token, normalize_tokens, sort_reading_order};
