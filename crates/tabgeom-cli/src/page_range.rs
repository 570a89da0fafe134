/// Parse a page selection like "1,3-5,8-" into sorted, deduplicated 0-indexed pages.
///
/// Pages are 1-indexed on input. `N-` runs to the last page. Page 0,
/// pages past the end, and reversed ranges are rejected.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) if b.trim().is_empty() => (page_number(a, page_count)?, page_count),
            Some((a, b)) => (page_number(a, page_count)?, page_number(b, page_count)?),
            None => {
                let p = page_number(part, page_count)?;
                (p, p)
            }
        };
        if start > end {
            return Err(format!("range '{part}' runs backwards"));
        }
        pages.extend((start - 1)..end);
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page > page_count {
        return Err(format!("page {page} exceeds document page count ({page_count})"));
    }
    Ok(page)
}
