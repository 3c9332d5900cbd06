use std::collections::HashMap;

use crate::model::{Part, Subsection};

use super::headings::clean_title;
use super::patterns::Patterns;
use super::sections::{join_trimmed, page_span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsectionMark {
    pub line_index: usize,
    pub code: String,
    pub title: String,
}

impl SubsectionMark {
    pub fn depth(&self) -> usize {
        self.code.split('.').count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStrategy {
    /// `n.n.n` marks only; deeper marks stay inside their owner.
    LevelThree,
    /// Shallow documents: every numeric mark is a boundary.
    AllMarks,
    /// No marks at all: the whole part is one subsection without codes.
    PassThrough,
}

pub const MARK_POLICY: [MarkStrategy; 3] = [
    MarkStrategy::LevelThree,
    MarkStrategy::AllMarks,
    MarkStrategy::PassThrough,
];

pub fn find_marks(patterns: &Patterns, lines: &[&str]) -> Vec<SubsectionMark> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(line_index, line)| {
            let captures = patterns.subsection_mark.captures(line)?;
            let code = captures.name("code")?.as_str().to_string();
            let title = captures
                .name("title")
                .map(|value| clean_title(value.as_str()))
                .unwrap_or_default();
            Some(SubsectionMark {
                line_index,
                code,
                title,
            })
        })
        .collect()
}

/// Builds subsections for every part. When the document carries explicit PART markers,
/// Part 1 is left out.
pub fn build_subsections(patterns: &Patterns, parts: &[Part]) -> Vec<Subsection> {
    let has_part_markers = parts.iter().any(|part| part.explicit);

    parts
        .iter()
        .filter(|part| !(has_part_markers && part.part_no == 1))
        .flat_map(|part| part_subsections(patterns, part))
        .collect()
}

pub fn part_subsections(patterns: &Patterns, part: &Part) -> Vec<Subsection> {
    let lines = part.text.lines().collect::<Vec<&str>>();
    let marks = find_marks(patterns, &lines);

    for strategy in MARK_POLICY {
        let boundaries = match strategy {
            MarkStrategy::LevelThree => marks
                .iter()
                .filter(|mark| mark.depth() == 3)
                .collect::<Vec<&SubsectionMark>>(),
            MarkStrategy::AllMarks => marks.iter().collect(),
            MarkStrategy::PassThrough => return pass_through(part),
        };
        if boundaries.is_empty() {
            continue;
        }
        return subsections_between(part, &lines, &marks, &boundaries);
    }

    Vec::new()
}

fn pass_through(part: &Part) -> Vec<Subsection> {
    if part.text.trim().is_empty() {
        return Vec::new();
    }

    vec![Subsection {
        section_id: part.section_id.clone(),
        part_no: part.part_no,
        level2_code: None,
        level3_code: None,
        level2_title: None,
        level3_title: None,
        title: part.title.clone(),
        start_page: part.start_page,
        end_page: part.end_page,
        text: part.text.trim().to_string(),
    }]
}

fn subsections_between(
    part: &Part,
    lines: &[&str],
    all_marks: &[SubsectionMark],
    boundaries: &[&SubsectionMark],
) -> Vec<Subsection> {
    let title_for = |code: &str| -> Option<String> {
        all_marks
            .iter()
            .find(|mark| mark.code == code)
            .map(|mark| mark.title.clone())
            .filter(|title| !title.is_empty())
    };

    let mut subsections = Vec::<Subsection>::new();
    let mut by_level3 = HashMap::<String, usize>::new();

    for (index, mark) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(index + 1)
            .map(|next| next.line_index)
            .unwrap_or(lines.len());

        let level2_code = truncate_code(&mark.code, 2);
        let level3_code = truncate_code(&mark.code, 3);
        let existing = by_level3.get(&level3_code).copied();

        // A mark deeper than its level-3 owner, or a repeated owner, keeps its own line.
        let start = if existing.is_some() || mark.depth() > 3 {
            mark.line_index
        } else {
            mark.line_index + 1
        };
        let (text, text_pages) = join_trimmed(
            &lines[start..end],
            part.line_pages.get(start..end).unwrap_or_default(),
        );
        let mark_page = part
            .line_pages
            .get(mark.line_index)
            .map(|page| (*page, *page))
            .unwrap_or((part.start_page, part.end_page));
        let (start_page, end_page) = page_span(&text_pages, mark_page);

        if let Some(existing) = existing {
            let target = &mut subsections[existing];
            if !text.is_empty() {
                if !target.text.is_empty() {
                    target.text.push('\n');
                }
                target.text.push_str(&text);
            }
            target.end_page = target.end_page.max(end_page);
            continue;
        }

        let level2_title = title_for(&level2_code);
        let level3_title = title_for(&level3_code);
        let title = if mark.title.is_empty() {
            level2_title.clone().unwrap_or_else(|| part.title.clone())
        } else {
            mark.title.clone()
        };

        by_level3.insert(level3_code.clone(), subsections.len());
        subsections.push(Subsection {
            section_id: part.section_id.clone(),
            part_no: part.part_no,
            level2_code: Some(level2_code),
            level3_code: Some(level3_code),
            level2_title,
            level3_title,
            title,
            start_page,
            end_page,
            text,
        });
    }

    subsections
}

pub fn truncate_code(code: &str, depth: usize) -> String {
    code.split('.').take(depth).collect::<Vec<&str>>().join(".")
}
