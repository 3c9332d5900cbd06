use std::collections::{HashMap, HashSet};

use crate::model::{SectionStdRefRelation, StdRef};

use super::enrich::clause_span;
use super::patterns::Patterns;

/// Document-wide standard reference table plus the per-section relation table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    std_refs: Vec<StdRef>,
    ref_index: HashMap<String, usize>,
    relations: Vec<SectionStdRefRelation>,
    seen_relations: HashSet<(String, String)>,
}

impl ReferenceRegistry {
    pub fn record(&mut self, section_id: &str, id: &str, title: Option<String>) {
        match self.ref_index.get(id) {
            Some(&index) => {
                let existing = &mut self.std_refs[index];
                if existing.title.is_none() {
                    existing.title = title;
                }
            }
            None => {
                self.ref_index.insert(id.to_string(), self.std_refs.len());
                self.std_refs.push(StdRef {
                    id: id.to_string(),
                    title,
                });
            }
        }

        if self
            .seen_relations
            .insert((section_id.to_string(), id.to_string()))
        {
            self.relations.push(SectionStdRefRelation {
                section_id: section_id.to_string(),
                reference_id: id.to_string(),
            });
        }
    }

    pub fn std_refs(&self) -> &[StdRef] {
        &self.std_refs
    }

    pub fn relations(&self) -> &[SectionStdRefRelation] {
        &self.relations
    }

    pub fn into_tables(self) -> (Vec<StdRef>, Vec<SectionStdRefRelation>) {
        (self.std_refs, self.relations)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceLine {
    Code {
        id: String,
        title: Option<String>,
        /// Trailing `/`: the title comes from the next code line.
        continues: bool,
    },
    Blank,
    Other,
}

pub fn classify_reference_line(patterns: &Patterns, line: &str) -> ReferenceLine {
    if line.trim().is_empty() {
        return ReferenceLine::Blank;
    }

    let Some(captures) = patterns.reference_line.captures(line) else {
        return ReferenceLine::Other;
    };
    let (Some(prefix), Some(code)) = (captures.name("prefix"), captures.name("code")) else {
        return ReferenceLine::Other;
    };

    let rest = captures
        .name("rest")
        .map(|value| value.as_str().trim())
        .unwrap_or_default();
    let continues = rest.ends_with('/');
    let title = reference_title(rest.trim_end_matches('/'));

    ReferenceLine::Code {
        id: normalize_reference_id(patterns, prefix.as_str(), code.as_str()),
        title,
        continues,
    }
}

pub fn normalize_reference_id(patterns: &Patterns, prefix: &str, code: &str) -> String {
    let tidy = |raw: &str| -> String {
        let joined = patterns.joiner_spacing.replace_all(raw.trim(), "${1}");
        joined.split_whitespace().collect::<Vec<&str>>().join(" ")
    };
    let code = tidy(code);
    format!("{} {}", tidy(prefix), code.trim_end_matches(':'))
}

fn reference_title(raw: &str) -> Option<String> {
    let title = raw
        .trim()
        .trim_start_matches(|ch: char| {
            matches!(ch, '-' | '–' | '—' | ':' | ',' | '/') || ch.is_whitespace()
        })
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");

    title.chars().any(char::is_alphabetic).then_some(title)
}

/// Resolves the lines of a reference block into `(id, title)` pairs, applying the shared
/// title of a `/`-terminated run to every entry of the run.
pub fn parse_reference_block(patterns: &Patterns, text: &str) -> Vec<(String, Option<String>)> {
    let mut entries = Vec::new();
    let mut pending = Vec::<(String, Option<String>)>::new();

    for line in text.lines() {
        match classify_reference_line(patterns, line) {
            ReferenceLine::Blank => {}
            ReferenceLine::Other => entries.append(&mut pending),
            ReferenceLine::Code {
                id,
                title,
                continues: true,
            } => pending.push((id, title)),
            ReferenceLine::Code {
                id,
                title,
                continues: false,
            } => {
                for (pending_id, own_title) in pending.drain(..) {
                    entries.push((pending_id, title.clone().or(own_title)));
                }
                entries.push((id, title));
            }
        }
    }
    entries.append(&mut pending);

    entries
}

/// Mines the `1.3` to `1.4` span of a Part-1 text.
pub fn mine_references(
    patterns: &Patterns,
    section_id: &str,
    part_one_text: &str,
    registry: &mut ReferenceRegistry,
) -> usize {
    let Some(span) = clause_span(patterns, part_one_text, "1.3", "1.4") else {
        return 0;
    };

    let entries = parse_reference_block(patterns, span);
    let found = entries.len();
    for (id, title) in entries {
        registry.record(section_id, &id, title);
    }

    found
}
