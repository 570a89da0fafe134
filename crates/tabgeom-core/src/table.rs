//! Table records and the builder that turns grids into them.
//!
//! A [`Table`] is the final, presentation-free result for one region: the
//! cell texts, where it came from, and the header structure detected over
//! it. [`TableBuilder`] numbers tables within a page and drops grids that
//! carry no text.

use crate::geometry::BBox;
use crate::grid::Grid;
use crate::merged::{ColumnGroup, HeaderLayout};

/// An extracted table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// Trimmed cell texts, top-to-bottom. Every row has `column_count` cells.
    pub rows: Vec<Vec<String>>,
    /// Page the table was found on (1-based).
    pub page_number: usize,
    /// Position among the tables emitted for the page (1-based).
    pub index_on_page: usize,
    /// Width of every row.
    pub column_count: usize,
    /// How many leading rows are header rows (1 ..= row count).
    pub header_rows: usize,
    /// Header cells spanning several sub-columns.
    pub column_groups: Vec<ColumnGroup>,
    /// Region the table was assembled from.
    pub bbox: BBox,
    /// Whether columns were rebuilt from token positions.
    pub rebuilt: bool,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Leading header rows.
    pub fn header(&self) -> &[Vec<String>] {
        &self.rows[..self.header_rows.min(self.rows.len())]
    }

    /// Rows after the header.
    pub fn body(&self) -> &[Vec<String>] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }
}

/// Builds the [`Table`] records for one page.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    page_number: usize,
    emitted: usize,
}

impl TableBuilder {
    /// Create a builder for the given page (1-based).
    pub fn new(page_number: usize) -> Self {
        Self {
            page_number,
            emitted: 0,
        }
    }

    /// Turn an assembled grid into a table record.
    ///
    /// Rows whose cells are all empty or whitespace are dropped and cell
    /// text is trimmed. The header layout is re-expressed over the
    /// surviving rows: `header_rows` counts the surviving rows among the
    /// original header rows (at least 1), and group rows are renumbered.
    ///
    /// Returns `None`, without consuming an index, when no row survives.
    pub fn build(&mut self, grid: &Grid, layout: &HeaderLayout, bbox: BBox, rebuilt: bool) -> Option<Table> {
        // new_row[i] is the 1-based surviving row number of grid row i.
        let mut new_row: Vec<Option<usize>> = Vec::with_capacity(grid.row_count());
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in grid.rows() {
            if row.iter().all(|c| c.is_blank()) {
                new_row.push(None);
                continue;
            }
            rows.push(row.iter().map(|c| c.text.trim().to_string()).collect());
            new_row.push(Some(rows.len()));
        }

        if rows.is_empty() {
            return None;
        }

        let header_rows = new_row
            .iter()
            .take(layout.header_rows)
            .filter(|r| r.is_some())
            .count()
            .clamp(1, rows.len());

        let column_groups = layout
            .groups
            .iter()
            .filter_map(|g| {
                let row = new_row.get(g.row.checked_sub(1)?).copied().flatten()?;
                Some(ColumnGroup { row, ..g.clone() })
            })
            .collect();

        self.emitted += 1;
        Some(Table {
            column_count: grid.column_count(),
            rows,
            page_number: self.page_number,
            index_on_page: self.emitted,
            header_rows,
            column_groups,
            bbox,
            rebuilt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> BBox {
        BBox::new(10.0, 20.0, 200.0, 300.0)
    }

    // --- TableBuilder tests ---

    #[test]
    fn test_build_trims_and_numbers_tables() {
        let grid = Grid::from_text_rows(vec![vec![" Life ", "10 "], vec!["Health", " 20"]]);
        let mut builder = TableBuilder::new(4);

        let first = builder
            .build(&grid, &HeaderLayout::default(), region(), false)
            .unwrap();
        assert_eq!(first.rows, vec![vec!["Life", "10"], vec!["Health", "20"]]);
        assert_eq!(first.page_number, 4);
        assert_eq!(first.index_on_page, 1);
        assert_eq!(first.column_count, 2);
        assert_eq!(first.header_rows, 1);
        assert_eq!(first.bbox, region());

        let second = builder
            .build(&grid, &HeaderLayout::default(), region(), true)
            .unwrap();
        assert_eq!(second.index_on_page, 2);
        assert!(second.rebuilt);
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let grid = Grid::from_text_rows(vec![vec!["a", "b"], vec!["", "  "], vec!["c", ""]]);
        let table = TableBuilder::new(1)
            .build(&grid, &HeaderLayout::default(), region(), false)
            .unwrap();
        assert_eq!(table.rows, vec![vec!["a", "b"], vec!["c", ""]]);
        for row in &table.rows {
            assert_eq!(row.len(), table.column_count);
        }
    }

    #[test]
    fn test_empty_grid_yields_nothing_and_keeps_index() {
        let blank = Grid::from_text_rows(vec![vec!["", " "], vec!["", ""]]);
        let mut builder = TableBuilder::new(1);
        assert!(builder
            .build(&blank, &HeaderLayout::default(), region(), false)
            .is_none());
        assert!(builder
            .build(&Grid::default(), &HeaderLayout::default(), region(), false)
            .is_none());

        let grid = Grid::from_text_rows(vec![vec!["x"]]);
        let table = builder
            .build(&grid, &HeaderLayout::default(), region(), false)
            .unwrap();
        assert_eq!(table.index_on_page, 1);
    }

    #[test]
    fn test_header_layout_follows_surviving_rows() {
        let grid = Grid::from_text_rows(vec![
            vec!["", "", ""],
            vec!["Linked", "", "Other"],
            vec!["Life", "Pension", "Other"],
            vec!["1", "2", "3"],
        ]);
        let layout = HeaderLayout {
            header_rows: 3,
            groups: vec![ColumnGroup {
                row: 2,
                start_col: 1,
                end_col: 2,
                label: "Linked".to_string(),
            }],
        };
        let table = TableBuilder::new(1)
            .build(&grid, &layout, region(), false)
            .unwrap();
        assert_eq!(table.header_rows, 2);
        assert_eq!(table.column_groups[0].row, 1);
        assert_eq!(table.header().len(), 2);
        assert_eq!(table.body(), &[vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_header_rows_never_exceed_row_count() {
        let grid = Grid::from_text_rows(vec![vec!["Sub", ""], vec!["1", "2"]]);
        let layout = HeaderLayout {
            header_rows: 4,
            groups: Vec::new(),
        };
        let table = TableBuilder::new(1)
            .build(&grid, &layout, region(), false)
            .unwrap();
        assert_eq!(table.header_rows, 2);
        assert!(table.body().is_empty());
    }
}
