use crate::model::{Part, Section};

use super::patterns::Patterns;
use super::sections::{join_trimmed, page_span};

pub fn default_part_title(part_no: u8) -> &'static str {
    match part_no {
        2 => "PRODUCT",
        3 => "EXECUTION",
        _ => "GENERAL",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartMarker {
    pub line_index: usize,
    pub part_no: u8,
    pub title: String,
}

pub fn find_part_markers(patterns: &Patterns, lines: &[&str]) -> Vec<PartMarker> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(line_index, line)| {
            let captures = patterns.part_marker.captures(line)?;
            let part_no = captures.get(1)?.as_str().parse::<u8>().ok()?;
            let title = captures
                .get(2)
                .map(|value| value.as_str().to_ascii_uppercase())
                .unwrap_or_else(|| default_part_title(part_no).to_string());
            Some(PartMarker {
                line_index,
                part_no,
                title,
            })
        })
        .collect()
}

pub fn build_parts(patterns: &Patterns, sections: &[Section]) -> Vec<Part> {
    sections
        .iter()
        .flat_map(|section| split_section(patterns, section))
        .collect()
}

pub fn split_section(patterns: &Patterns, section: &Section) -> Vec<Part> {
    let lines = section.text.lines().collect::<Vec<&str>>();
    let markers = find_part_markers(patterns, &lines);

    if markers.is_empty() {
        return vec![Part {
            section_id: section.id.clone(),
            part_no: 1,
            title: default_part_title(1).to_string(),
            start_page: section.start_page,
            end_page: section.end_page,
            text: section.text.clone(),
            explicit: false,
            line_pages: section.line_pages.clone(),
        }];
    }

    let mut parts = Vec::<Part>::with_capacity(markers.len());
    for (index, marker) in markers.iter().enumerate() {
        let end = markers
            .get(index + 1)
            .map(|next| next.line_index)
            .unwrap_or(lines.len());
        let body = marker.line_index + 1..end;
        let (text, text_pages) = join_trimmed(
            &lines[body.clone()],
            section.line_pages.get(body).unwrap_or_default(),
        );
        let (start_page, end_page) =
            page_span(&text_pages, (section.start_page, section.end_page));

        if let Some(existing) = parts.iter_mut().find(|part| part.part_no == marker.part_no) {
            if !text.is_empty() {
                if !existing.text.is_empty() {
                    existing.text.push('\n');
                }
                existing.text.push_str(&text);
                existing.line_pages.extend(text_pages);
                existing.end_page = existing.end_page.max(end_page);
            }
            continue;
        }

        parts.push(Part {
            section_id: section.id.clone(),
            part_no: marker.part_no,
            title: marker.title.clone(),
            start_page,
            end_page,
            text,
            explicit: true,
            line_pages: text_pages,
        });
    }

    parts
}
