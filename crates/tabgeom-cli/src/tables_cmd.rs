use std::path::Path;

use tabgeom::{PageSource, SkipNote, Table, TableExtractor};

use crate::cli::{OutputFormat, TuningArgs};
use crate::shared::{ProgressReporter, build_settings, open_dump, resolve_pages, tables_to_csv};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    tuning: &TuningArgs,
) -> Result<(), i32> {
    let doc = open_dump(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let extractor = TableExtractor::new(build_settings(tuning)?);

    let progress = ProgressReporter::new(page_indices.len());
    let mut tables = Vec::new();
    let mut notes = Vec::new();
    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);
        let page = doc.page(idx).map_err(|e| {
            progress.finish();
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        let result = extractor.extract_page(&page);
        tables.extend(result.tables);
        notes.extend(result.notes);
    }
    progress.finish();

    match format {
        OutputFormat::Text => write_grid(&tables),
        OutputFormat::Json => write_json(&tables, &notes),
        OutputFormat::Csv => write_csv(&tables),
    }
}

fn write_grid(tables: &[Table]) -> Result<(), i32> {
    for (n, table) in tables.iter().enumerate() {
        println!(
            "--- Table {} (page {}, #{}, bbox: [{:.1}, {:.1}, {:.1}, {:.1}]{}) ---",
            n + 1,
            table.page_number,
            table.index_on_page,
            table.bbox.x0,
            table.bbox.top,
            table.bbox.x1,
            table.bbox.bottom,
            if table.rebuilt { ", rebuilt" } else { "" },
        );
        for group in &table.column_groups {
            println!(
                "group: '{}' spans columns {}-{} (row {})",
                group.label, group.start_col, group.end_col, group.row
            );
        }
        print!("{}", render_grid(table));
        println!();
    }

    if tables.is_empty() {
        println!("No tables found.");
    }

    Ok(())
}

/// Aligned `| a | b |` rows with a rule under the header rows.
fn render_grid(table: &Table) -> String {
    let mut col_widths = vec![1usize; table.column_count];
    for row in &table.rows {
        for (ci, text) in row.iter().enumerate() {
            col_widths[ci] = col_widths[ci].max(text.chars().count());
        }
    }

    let line = |row: &[String]| {
        let cells: Vec<String> = row
            .iter()
            .zip(&col_widths)
            .map(|(text, &width)| format!("{text:<width$}"))
            .collect();
        format!("| {} |\n", cells.join(" | "))
    };

    let mut out: String = table.header().iter().map(|row| line(row)).collect();
    let body = table.body();
    if !body.is_empty() {
        let rule: Vec<String> = col_widths.iter().map(|&w| "-".repeat(w)).collect();
        out.push_str(&format!("|-{}-|\n", rule.join("-|-")));
    }
    out.extend(body.iter().map(|row| line(row)));
    out
}

fn write_json(tables: &[Table], notes: &[SkipNote]) -> Result<(), i32> {
    let value = serde_json::json!({
        "tables": tables,
        "skipped": notes,
    });
    let json_str = serde_json::to_string_pretty(&value).map_err(|e| {
        eprintln!("Error: failed to serialize tables: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}

fn write_csv(tables: &[Table]) -> Result<(), i32> {
    let csv = tables_to_csv(tables).map_err(|e| {
        eprintln!("Error: failed to write CSV: {e}");
        1
    })?;
    print!("{csv}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabgeom::BBox;

    #[test]
    fn grid_pads_columns_and_rules_header() {
        let table = Table {
            rows: vec![
                vec!["Line".to_string(), "2024".to_string()],
                vec!["LIFE".to_string(), "10".to_string()],
            ],
            page_number: 1,
            index_on_page: 1,
            column_count: 2,
            header_rows: 1,
            column_groups: Vec::new(),
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            rebuilt: false,
        };
        assert_eq!(
            render_grid(&table),
            "| Line | 2024 |\n|------|------|\n| LIFE | 10   |\n"
        );
    }

    #[test]
    fn header_only_table_has_no_rule() {
        let table = Table {
            rows: vec![vec!["Linked Business".to_string(), String::new()]],
            page_number: 1,
            index_on_page: 1,
            column_count: 2,
            header_rows: 1,
            column_groups: Vec::new(),
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            rebuilt: false,
        };
        assert_eq!(render_grid(&table), "| Linked Business |   |\n");
    }
}
