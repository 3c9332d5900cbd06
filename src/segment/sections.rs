use std::collections::HashMap;

use crate::model::{DOCUMENT_SECTION_ID, Heading, HeadingKind, Section};

use super::headings::detect_headings;
use super::patterns::Patterns;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStrategy {
    /// Every `Section N N N` heading in the document.
    SectionStyle,
    /// Numbered headings of the smallest depth present (`1`, `2`, ... but not `1.1`).
    ShallowestNumbered,
}

/// Evaluated in order; the first strategy that selects anything wins. When none does the
/// document becomes a single `sec:document` section.
pub const HEADING_POLICY: [HeadingStrategy; 2] = [
    HeadingStrategy::SectionStyle,
    HeadingStrategy::ShallowestNumbered,
];

impl HeadingStrategy {
    fn select(self, headings: &[Heading]) -> Vec<Heading> {
        match self {
            HeadingStrategy::SectionStyle => headings
                .iter()
                .filter(|heading| heading.kind == HeadingKind::Section)
                .cloned()
                .collect(),
            HeadingStrategy::ShallowestNumbered => {
                let numbered = headings
                    .iter()
                    .filter(|heading| heading.kind == HeadingKind::Numbered);
                let Some(min_depth) = numbered.clone().map(Heading::depth).min() else {
                    return Vec::new();
                };
                numbered
                    .filter(|heading| heading.depth() == min_depth)
                    .cloned()
                    .collect()
            }
        }
    }
}

/// Applies [`HEADING_POLICY`] and returns the chosen headings in document order.
pub fn select_headings(headings: &[Heading]) -> Vec<Heading> {
    for strategy in HEADING_POLICY {
        let mut selected = strategy.select(headings);
        if selected.is_empty() {
            continue;
        }
        selected.sort_by_key(|heading| (heading.page, heading.line));
        return selected;
    }

    Vec::new()
}

pub fn build_sections(patterns: &Patterns, pages: &[String]) -> Vec<Section> {
    let headings = select_headings(&detect_headings(patterns, pages));
    sections_from_headings(patterns, pages, &headings)
}

/// Joins `lines` without the blank lines at either end. Returns the text and the page of
/// every kept line (empty when `line_pages` does not cover `lines`).
pub(crate) fn join_trimmed(lines: &[&str], line_pages: &[usize]) -> (String, Vec<usize>) {
    let Some(first) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return (String::new(), Vec::new());
    };
    let last = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(first);

    let text = lines[first..=last].join("\n").trim().to_string();
    let pages = line_pages
        .get(first..=last)
        .map(<[usize]>::to_vec)
        .unwrap_or_default();
    (text, pages)
}

/// First and last page of a line run, or `fallback` when the run carries no pages.
pub(crate) fn page_span(line_pages: &[usize], fallback: (usize, usize)) -> (usize, usize) {
    match (line_pages.first(), line_pages.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => fallback,
    }
}

/// Carves sections line-by-line between consecutive headings, which must already be in
/// document order. Lines ahead of the first heading belong to the first section.
pub fn sections_from_headings(
    patterns: &Patterns,
    pages: &[String],
    headings: &[Heading],
) -> Vec<Section> {
    let page_count = pages.len().max(1);

    let mut lines = Vec::<&str>::new();
    let mut line_pages = Vec::<usize>::new();
    let mut page_offsets = Vec::<usize>::with_capacity(pages.len());
    for (page_index, page) in pages.iter().enumerate() {
        page_offsets.push(lines.len());
        for line in page.lines() {
            lines.push(line);
            line_pages.push(page_index + 1);
        }
    }

    if headings.is_empty() {
        let (text, text_pages) = join_trimmed(&lines, &line_pages);
        return vec![Section {
            id: DOCUMENT_SECTION_ID.to_string(),
            title: "Document".to_string(),
            start_page: 1,
            end_page: page_count,
            text,
            line_pages: text_pages,
        }];
    }

    let position = |heading: &Heading| -> usize {
        let page_offset = page_offsets
            .get(heading.page.saturating_sub(1))
            .copied()
            .unwrap_or(lines.len());
        (page_offset + heading.line.saturating_sub(1)).min(lines.len())
    };

    let mut sections = Vec::with_capacity(headings.len());
    let mut id_counts = HashMap::<String, usize>::new();

    for (index, heading) in headings.iter().enumerate() {
        let next = headings.get(index + 1);
        let start = if index == 0 { 0 } else { position(heading) };
        let end = next.map(position).unwrap_or(lines.len()).max(start);

        let start_page = if index == 0 { 1 } else { heading.page };
        let end_page = match next {
            Some(next) if next.line <= 1 => next.page.saturating_sub(1).max(start_page),
            Some(next) => next.page.max(start_page),
            None => page_count.max(start_page),
        };

        let body = &lines[start..end];
        let kept = body
            .iter()
            .position(|line| patterns.is_end_of_section(line))
            .unwrap_or(body.len());
        let (text, text_pages) = join_trimmed(&body[..kept], &line_pages[start..start + kept]);

        let seen = id_counts.entry(heading.code.clone()).or_insert(0);
        *seen += 1;
        let id = if *seen == 1 {
            heading.code.clone()
        } else {
            format!("{}#{}", heading.code, seen)
        };

        sections.push(Section {
            id,
            title: heading.title.clone(),
            start_page,
            end_page,
            text,
            line_pages: text_pages,
        });
    }

    sections
}
