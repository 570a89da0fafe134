use std::path::Path;

use tabgeom::{EdgeSource, PageColumns, PageSource, TableExtractor};

use crate::cli::{TextFormat, TuningArgs};
use crate::shared::{build_settings, open_dump, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &TextFormat,
    tuning: &TuningArgs,
) -> Result<(), i32> {
    let doc = open_dump(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let extractor = TableExtractor::new(build_settings(tuning)?);

    let mut results = Vec::with_capacity(page_indices.len());
    for &idx in &page_indices {
        let page = doc.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        results.push(extractor.page_columns(&page));
    }

    match format {
        TextFormat::Text => {
            for page in &results {
                print!("{}", render_text(page));
            }
            Ok(())
        }
        TextFormat::Json => write_json(&results),
    }
}

fn render_text(page: &PageColumns) -> String {
    let mut out = format!(
        "Page {}: {} drawn, {} boundaries{}\n",
        page.page_number,
        page.drawn.len(),
        page.columns.len(),
        if page.columns.is_usable() { "" } else { " (too few for a table)" },
    );
    for edge in page.columns.edges() {
        let source = match edge.source {
            EdgeSource::Drawn => "drawn",
            EdgeSource::Inferred => "inferred",
        };
        out.push_str(&format!(
            "  x={:<8.1} {:<8} support={}\n",
            edge.x, source, edge.support
        ));
    }
    out
}

fn write_json(results: &[PageColumns]) -> Result<(), i32> {
    let pages: Vec<serde_json::Value> = results
        .iter()
        .map(|page| {
            serde_json::json!({
                "page": page.page_number,
                "drawn": page.drawn,
                "boundaries": page.columns.edges(),
                "usable": page.columns.is_usable(),
            })
        })
        .collect();

    let json_str = serde_json::to_string_pretty(&pages).map_err(|e| {
        eprintln!("Error: failed to serialize columns: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}
