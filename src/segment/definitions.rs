use std::collections::{HashMap, HashSet};

use crate::model::{Definition, SectionDefinitionRelation};

use super::enrich::clause_span;
use super::patterns::Patterns;

#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: Vec<Definition>,
    definition_index: HashMap<String, usize>,
    relations: Vec<SectionDefinitionRelation>,
    seen_relations: HashSet<(String, String)>,
}

impl DefinitionRegistry {
    /// First definition seen for an abbreviation is kept.
    pub fn record(&mut self, section_id: &str, abbreviation: &str, definition: &str) {
        if !self.definition_index.contains_key(abbreviation) {
            self.definition_index
                .insert(abbreviation.to_string(), self.definitions.len());
            self.definitions.push(Definition {
                id: abbreviation.to_string(),
                definition: definition.to_string(),
            });
        }

        if self
            .seen_relations
            .insert((section_id.to_string(), abbreviation.to_string()))
        {
            self.relations.push(SectionDefinitionRelation {
                section_id: section_id.to_string(),
                definition_id: abbreviation.to_string(),
            });
        }
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn relations(&self) -> &[SectionDefinitionRelation] {
        &self.relations
    }

    pub fn into_tables(self) -> (Vec<Definition>, Vec<SectionDefinitionRelation>) {
        (self.definitions, self.relations)
    }
}

/// `(MV)`, `KEMA`, `AC`: parenthesised or fully upper-case tokens.
pub fn is_abbreviation_shaped(token: &str) -> bool {
    let inner = token
        .strip_prefix('(')
        .and_then(|value| value.strip_suffix(')'))
        .unwrap_or(token);

    inner.chars().any(char::is_alphabetic) && !inner.chars().any(char::is_lowercase)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Splits a columnar definition line into `(abbreviation, definition)`.
pub fn parse_definition_line(patterns: &Patterns, line: &str) -> Option<(String, String)> {
    let mut columns = patterns
        .column_split
        .split(line.trim())
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .collect::<Vec<&str>>();

    if columns
        .first()
        .map(|column| patterns.list_marker.is_match(column) && column.len() <= 3)
        .unwrap_or(false)
    {
        columns.remove(0);
    }
    if columns.len() < 2 {
        return None;
    }

    let first = patterns.list_marker.replace(columns[0], "");
    let first = first.trim();
    if patterns.clause_code.is_match(first) || !first.chars().any(char::is_alphanumeric) {
        return None;
    }

    let mut abbreviation = collapse_whitespace(first);
    let mut rest = &columns[1..];
    if rest.len() >= 2 && is_abbreviation_shaped(rest[0]) {
        abbreviation.push(' ');
        abbreviation.push_str(&collapse_whitespace(rest[0]));
        rest = &rest[1..];
    }

    let abbreviation = abbreviation.trim_end_matches(':').trim().to_string();
    let definition = collapse_whitespace(&rest.join(" "));
    if abbreviation.is_empty() || definition.is_empty() {
        return None;
    }

    Some((abbreviation, definition))
}

/// Mines the `1.6` to `1.7` span of a Part-1 text.
pub fn mine_definitions(
    patterns: &Patterns,
    section_id: &str,
    part_one_text: &str,
    registry: &mut DefinitionRegistry,
) -> usize {
    let Some(span) = clause_span(patterns, part_one_text, "1.6", "1.7") else {
        return 0;
    };

    let mut found = 0usize;
    for line in span.lines() {
        if let Some((abbreviation, definition)) = parse_definition_line(patterns, line) {
            registry.record(section_id, &abbreviation, &definition);
            found += 1;
        }
    }

    found
}
