use crate::model::{Heading, HeadingKind};

use super::patterns::Patterns;

/// One recogniser hit for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingMatch {
    /// `Section 26 24 13 [title]`; `title` is None when the title sits on the next line.
    Section { code: String, title: Option<String> },
    /// `1.2.3 Title`
    Numbered { code: String, title: String },
}

pub fn detect_headings(patterns: &Patterns, pages: &[String]) -> Vec<Heading> {
    let mut headings = Vec::new();

    for (page_index, page_text) in pages.iter().enumerate() {
        let lines = page_text.lines().collect::<Vec<&str>>();
        for (line_index, line) in lines.iter().enumerate() {
            let Some(found) = match_heading_line(patterns, line) else {
                continue;
            };

            let (kind, code, title) = match found {
                HeadingMatch::Section { code, title } => {
                    let title = title.unwrap_or_else(|| next_title_line(&lines[line_index + 1..]));
                    (HeadingKind::Section, code, title)
                }
                HeadingMatch::Numbered { code, title } => (HeadingKind::Numbered, code, title),
            };

            headings.push(Heading {
                kind,
                page: page_index + 1,
                line: line_index + 1,
                code,
                title,
            });
        }
    }

    headings
}

/// Section-style wins over numbered when a line satisfies both.
pub fn match_heading_line(patterns: &Patterns, line: &str) -> Option<HeadingMatch> {
    if let Some(captures) = patterns.section_heading.captures(line) {
        let code = [captures.get(1), captures.get(2), captures.get(3)]
            .into_iter()
            .flatten()
            .map(|value| value.as_str())
            .collect::<Vec<&str>>()
            .join(" ");
        let rest = captures
            .name("rest")
            .map(|value| clean_title(value.as_str()))
            .unwrap_or_default();

        let starts_lowercase = rest
            .chars()
            .next()
            .map(|ch| ch.is_lowercase())
            .unwrap_or(false);
        if !starts_lowercase {
            let title = (!rest.is_empty()).then_some(rest);
            return Some(HeadingMatch::Section { code, title });
        }
    }

    let captures = patterns.numbered_heading.captures(line)?;
    let code = captures.get(1)?.as_str().to_string();
    let title = captures.get(2)?.as_str().trim().to_string();
    if !title.chars().any(char::is_alphabetic) {
        return None;
    }

    Some(HeadingMatch::Numbered { code, title })
}

fn next_title_line(following: &[&str]) -> String {
    following
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(|ch: char| {
            matches!(ch, '-' | '–' | '—' | ':' | '.' | ')') || ch.is_whitespace()
        })
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
