use super::*;

pub(super) fn read_pages(pages_file: &Path, max_pages: Option<usize>) -> Result<Vec<String>> {
    let raw = fs::read(pages_file)
        .with_context(|| format!("failed to read pages file {}", pages_file.display()))?;
    let text = String::from_utf8_lossy(&raw);
    Ok(split_pages(&text, max_pages))
}

/// Splits pdftotext output on form feeds, dropping NULs and trailing blank pages.
pub(super) fn split_pages(raw: &str, max_pages: Option<usize>) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    if let Some(max_pages) = max_pages {
        pages.truncate(max_pages);
    }

    pages
}

pub(super) fn default_source_id(pages_file: &Path) -> String {
    pages_file
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| pages_file.display().to_string())
}
