//! The per-page pipeline and document-level extraction.

use tabgeom_core::{
    BBox, Choice, ColumnSet, Edge, ExtractSettings, Grid, SkipNote, SkipReason, Table, TableBuilder,
    Token, assemble_by_boundaries, assemble_by_positions, choose_better, collect_vertical_edges,
    detect_header_spans, detect_packed_values, discover_columns, find_regions, normalize_tokens,
};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::source::{PageContent, PageSource};

/// Tables and notes produced for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTables {
    /// Page number (1-based).
    pub page_number: usize,
    /// Tables in region order.
    pub tables: Vec<Table>,
    /// Regions skipped and rebuilds discarded.
    pub notes: Vec<SkipNote>,
}

/// Column boundaries for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageColumns {
    /// Page number (1-based).
    pub page_number: usize,
    /// Edges taken from the drawing, before merging with text.
    pub drawn: Vec<Edge>,
    /// Drawn and inferred edges after merging.
    pub columns: ColumnSet,
}

/// Everything extracted from a document, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub tables: Vec<Table>,
    pub notes: Vec<SkipNote>,
    /// Number of pages processed.
    pub pages: usize,
}

impl Extraction {
    fn push(&mut self, page: PageTables) {
        self.pages += 1;
        self.tables.extend(page.tables);
        self.notes.extend(page.notes);
    }
}

/// Runs table inference over pages.
///
/// # Example
///
/// ```ignore
/// let doc = JsonDocument::from_path("report.json")?;
/// let extraction = TableExtractor::default().extract_document(&doc)?;
/// for table in &extraction.tables {
///     println!("page {} table {}: {} rows", table.page_number, table.index_on_page, table.row_count());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    settings: ExtractSettings,
}

impl TableExtractor {
    pub fn new(settings: ExtractSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExtractSettings {
        &self.settings
    }

    /// Discover the column boundaries of a page without assembling tables.
    pub fn page_columns(&self, page: &PageContent) -> PageColumns {
        let drawn = collect_vertical_edges(&page.lines, &page.rects, &self.settings);
        let columns = discover_columns(&page.words, &drawn, &self.settings);
        PageColumns {
            page_number: page.page_number,
            drawn,
            columns,
        }
    }

    /// Run the full pipeline over one page.
    ///
    /// Never fails: regions that yield nothing are recorded in
    /// [`PageTables::notes`].
    pub fn extract_page(&self, page: &PageContent) -> PageTables {
        let settings = &self.settings;
        let page_number = page.page_number;
        let mut out = PageTables {
            page_number,
            ..PageTables::default()
        };

        let tokens = normalize_tokens(&page.words, settings.unicode_norm);
        let drawn = collect_vertical_edges(&page.lines, &page.rects, settings);
        let columns = discover_columns(&tokens, &drawn, settings);
        debug!(
            page = page_number,
            drawn = drawn.len(),
            boundaries = columns.len(),
            positions = ?columns.positions(),
            "column boundaries discovered"
        );

        if !columns.is_usable() {
            self.skip(&mut out, SkipNote::page(page_number, SkipReason::DegenerateColumnSet));
            return out;
        }

        let regions = self.regions(page, &tokens);
        if regions.is_empty() {
            self.skip(&mut out, SkipNote::page(page_number, SkipReason::InputTooSparse));
            return out;
        }

        let mut builder = TableBuilder::new(page_number);
        for (i, region) in regions.iter().enumerate() {
            let region_index = i + 1;
            let Some(naive) = assemble_by_boundaries(&tokens, region, &columns, settings) else {
                self.skip(
                    &mut out,
                    SkipNote::region(page_number, region_index, SkipReason::InputTooSparse),
                );
                continue;
            };

            let choice = self.repair_packed(&tokens, region, naive, page_number, region_index);
            if let Choice::Regressed { .. } = choice {
                self.skip(
                    &mut out,
                    SkipNote::region(page_number, region_index, SkipReason::MergeRebuildRegression),
                );
            }

            let rebuilt = choice.is_rebuilt();
            let grid = choice.into_grid();
            let layout = detect_header_spans(&grid, settings);
            match builder.build(&grid, &layout, *region, rebuilt) {
                Some(table) => {
                    debug!(
                        page = page_number,
                        region = region_index,
                        rows = table.row_count(),
                        columns = table.column_count,
                        header_rows = table.header_rows,
                        groups = table.column_groups.len(),
                        "table built"
                    );
                    out.tables.push(table);
                }
                None => self.skip(
                    &mut out,
                    SkipNote::region(page_number, region_index, SkipReason::InputTooSparse),
                ),
            }
        }

        out
    }

    /// Extract every page of `source`, in page order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExtractError`] the source raises; pages after it
    /// are not processed.
    pub fn extract_document<S>(&self, source: &S) -> Result<Extraction, ExtractError>
    where
        S: PageSource + ?Sized,
    {
        let indices: Vec<usize> = (0..source.page_count()).collect();
        self.extract_pages(source, &indices)
    }

    /// Extract the pages at the given 0-based indices, in the order given.
    pub fn extract_pages<S>(&self, source: &S, indices: &[usize]) -> Result<Extraction, ExtractError>
    where
        S: PageSource + ?Sized,
    {
        let mut extraction = Extraction::default();
        for &index in indices {
            extraction.push(self.load_and_extract(source, index)?);
        }
        Ok(extraction)
    }

    /// Extract every page concurrently using rayon.
    ///
    /// Results are reassembled in page order and are identical to
    /// [`extract_document`](Self::extract_document).
    #[cfg(feature = "parallel")]
    pub fn extract_document_parallel<S>(&self, source: &S) -> Result<Extraction, ExtractError>
    where
        S: PageSource + Sync + ?Sized,
    {
        let indices: Vec<usize> = (0..source.page_count()).collect();
        self.extract_pages_parallel(source, &indices)
    }

    /// Concurrent counterpart of [`extract_pages`](Self::extract_pages).
    #[cfg(feature = "parallel")]
    pub fn extract_pages_parallel<S>(
        &self,
        source: &S,
        indices: &[usize],
    ) -> Result<Extraction, ExtractError>
    where
        S: PageSource + Sync + ?Sized,
    {
        use rayon::prelude::*;

        let pages: Vec<Result<PageTables, ExtractError>> = indices
            .par_iter()
            .map(|&index| self.load_and_extract(source, index))
            .collect();

        let mut extraction = Extraction::default();
        for page in pages {
            extraction.push(page?);
        }
        Ok(extraction)
    }

    fn load_and_extract<S>(&self, source: &S, index: usize) -> Result<PageTables, ExtractError>
    where
        S: PageSource + ?Sized,
    {
        let page = source.page(index).map_err(|err| {
            warn!(
                source = source.name().unwrap_or("<memory>"),
                page = index + 1,
                error = %err,
                "failed to load page"
            );
            ExtractError::Page {
                page: index + 1,
                source: err,
            }
        })?;
        Ok(self.extract_page(&page))
    }

    /// Regions to assemble, in priority order: reader-supplied boxes, boxes
    /// found from ruling lines, then one box around every token.
    fn regions(&self, page: &PageContent, tokens: &[Token]) -> Vec<BBox> {
        if !page.tables.is_empty() {
            return page.tables.clone();
        }
        let found = find_regions(&page.lines, &page.rects, &self.settings);
        if !found.is_empty() {
            debug!(page = page.page_number, regions = found.len(), "regions found from rulings");
            return found;
        }
        BBox::enclosing(tokens.iter().map(|t| &t.bbox))
            .into_iter()
            .collect()
    }

    /// Rebuild a grid from token positions when its cells hold packed numbers.
    fn repair_packed(
        &self,
        tokens: &[Token],
        region: &BBox,
        naive: Grid,
        page: usize,
        region_index: usize,
    ) -> Choice {
        let report = detect_packed_values(&naive, &self.settings);
        if !report.exceeds(self.settings.packed_ratio_threshold) {
            return Choice::Naive(naive);
        }

        let rebuilt = assemble_by_positions(tokens, region, &self.settings);
        let naive_columns = naive.column_count();
        let choice = choose_better(naive, rebuilt);
        match &choice {
            Choice::Rebuilt(grid) => debug!(
                page,
                region = region_index,
                packed = report.packed,
                checked = report.checked,
                from = naive_columns,
                to = grid.column_count(),
                "packed columns rebuilt from positions"
            ),
            Choice::Regressed {
                rebuilt_columns, ..
            } => debug!(
                page,
                region = region_index,
                naive = naive_columns,
                rebuilt = rebuilt_columns,
                "position rebuild discarded"
            ),
            Choice::Naive(_) => debug!(
                page,
                region = region_index,
                "packed columns detected but no rebuild possible"
            ),
        }
        choice
    }

    fn skip(&self, out: &mut PageTables, note: SkipNote) {
        debug!(
            page = note.page,
            region = ?note.region,
            reason = %note.reason,
            "region skipped"
        );
        out.notes.push(note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JsonDocument;
    use tabgeom_core::Rect;

    /// A bordered box holding label/value/value rows; the two value columns
    /// share the box with no ruling between them.
    fn insurance_page(page_number: usize) -> PageContent {
        let mut words = vec![
            Token::new("Line", 12.0, 30.0, 30.0, 38.0),
            Token::new("2023", 45.0, 30.0, 58.0, 38.0),
            Token::new("2024", 85.0, 30.0, 98.0, 38.0),
        ];
        for (i, label) in ["LIFE", "PENSION", "HEALTH", "VAR.INS"].iter().enumerate() {
            let top = 45.0 + i as f64 * 12.0;
            words.push(Token::new(*label, 12.0, top, 35.0, top + 8.0));
            words.push(Token::new("10", 45.0, top, 55.0, top + 8.0));
            words.push(Token::new("20", 85.0, top, 95.0, top + 8.0));
        }
        PageContent {
            page_number,
            words,
            rects: vec![Rect::new(10.0, 25.0, 120.0, 100.0)],
            ..PageContent::default()
        }
    }

    #[test]
    fn inferred_subcolumns_become_grid_columns() {
        let result = TableExtractor::default().extract_page(&insurance_page(1));
        assert!(result.notes.is_empty(), "{:?}", result.notes);
        assert_eq!(result.tables.len(), 1);

        let table = &result.tables[0];
        assert_eq!(table.column_count, 3);
        assert_eq!(table.rows[0], vec!["Line", "2023", "2024"]);
        assert_eq!(table.rows[1], vec!["LIFE", "10", "20"]);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.index_on_page, 1);
        assert!(!table.rebuilt);
        for row in &table.rows {
            assert_eq!(row.len(), table.column_count);
        }
    }

    #[test]
    fn page_without_columns_is_skipped() {
        let page = PageContent {
            page_number: 2,
            words: vec![Token::new("Title", 100.0, 10.0, 150.0, 20.0)],
            ..PageContent::default()
        };
        let result = TableExtractor::default().extract_page(&page);
        assert!(result.tables.is_empty());
        assert_eq!(result.notes, vec![SkipNote::page(2, SkipReason::DegenerateColumnSet)]);
    }

    #[test]
    fn sparse_region_is_noted_and_others_continue() {
        let mut page = insurance_page(1);
        page.tables = vec![
            BBox::new(300.0, 300.0, 400.0, 400.0),
            BBox::new(10.0, 25.0, 120.0, 100.0),
        ];
        let result = TableExtractor::default().extract_page(&page);
        assert_eq!(
            result.notes,
            vec![SkipNote::region(1, 1, SkipReason::InputTooSparse)]
        );
        assert_eq!(result.tables.len(), 1);
        assert_eq!(result.tables[0].index_on_page, 1);
    }

    #[test]
    fn packed_cells_are_rebuilt_from_positions() {
        // Only the outer border is drawn and the numbers are too few per
        // cluster to infer boundaries, so the naive grid packs them together.
        let mut words = Vec::new();
        for i in 0..8 {
            let top = 20.0 + i as f64 * 12.0;
            words.push(Token::new(format!("item{i}"), 15.0, top, 45.0, top + 8.0));
            words.push(Token::new("1,000", 100.0, top, 125.0, top + 8.0));
            words.push(Token::new("(25)", 160.0, top, 180.0, top + 8.0));
        }
        let page = PageContent {
            page_number: 1,
            words,
            rects: vec![Rect::new(10.0, 15.0, 90.0, 120.0), Rect::new(90.0, 15.0, 200.0, 120.0)],
            ..PageContent::default()
        };
        let settings = ExtractSettings {
            min_column_support: 100,
            ..ExtractSettings::default()
        };

        let result = TableExtractor::new(settings).extract_page(&page);
        let table = &result.tables[0];
        assert!(table.rebuilt);
        assert_eq!(table.column_count, 3);
        assert_eq!(table.rows[7], vec!["item7", "1,000", "(25)"]);
    }

    #[test]
    fn document_pages_come_out_in_order() {
        let doc = JsonDocument::from_pages(vec![insurance_page(1), insurance_page(2)]);
        let extraction = TableExtractor::default().extract_document(&doc).unwrap();
        assert_eq!(extraction.pages, 2);
        let pages: Vec<usize> = extraction.tables.iter().map(|t| t.page_number).collect();
        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn bad_page_index_aborts_with_context() {
        let doc = JsonDocument::from_pages(vec![insurance_page(1)]);
        let err = TableExtractor::default()
            .extract_pages(&doc, &[0, 4])
            .unwrap_err();
        assert!(matches!(err, ExtractError::Page { page: 5, .. }));
    }

    #[test]
    fn page_columns_reports_drawn_and_merged() {
        let cols = TableExtractor::default().page_columns(&insurance_page(1));
        assert_eq!(cols.drawn.len(), 2);
        assert_eq!(cols.columns.positions(), vec![10.0, 42.0, 82.0, 120.0]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let pages = (1..=6).map(insurance_page).collect();
        let doc = JsonDocument::from_pages(pages);
        let extractor = TableExtractor::default();
        assert_eq!(
            extractor.extract_document_parallel(&doc).unwrap(),
            extractor.extract_document(&doc).unwrap()
        );
    }
}
