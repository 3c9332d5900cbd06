use std::collections::HashSet;

use crate::model::SectionRelation;

use super::enrich::clause_span;
use super::patterns::Patterns;

#[derive(Debug, Clone, Default)]
pub struct RelationRegistry {
    relations: Vec<SectionRelation>,
    seen: HashSet<(String, String)>,
}

impl RelationRegistry {
    /// Self relations and repeated pairs are dropped.
    pub fn record(&mut self, section_id: &str, related_section_id: &str) -> bool {
        if section_id == related_section_id {
            return false;
        }
        if !self
            .seen
            .insert((section_id.to_string(), related_section_id.to_string()))
        {
            return false;
        }

        self.relations.push(SectionRelation {
            section_id: section_id.to_string(),
            related_section_id: related_section_id.to_string(),
        });
        true
    }

    pub fn relations(&self) -> &[SectionRelation] {
        &self.relations
    }

    pub fn into_relations(self) -> Vec<SectionRelation> {
        self.relations
    }
}

/// Every `Section N N N` mention, as a space-joined section id.
pub fn section_mentions(patterns: &Patterns, text: &str) -> Vec<String> {
    patterns
        .section_mention
        .captures_iter(text)
        .filter_map(|captures| {
            Some(format!(
                "{} {} {}",
                captures.get(1)?.as_str(),
                captures.get(2)?.as_str(),
                captures.get(3)?.as_str()
            ))
        })
        .collect()
}

/// Mines the `1.2` to `1.3` span of a Part-1 text.
pub fn mine_relations(
    patterns: &Patterns,
    section_id: &str,
    part_one_text: &str,
    registry: &mut RelationRegistry,
) -> usize {
    let Some(span) = clause_span(patterns, part_one_text, "1.2", "1.3") else {
        return 0;
    };

    section_mentions(patterns, span)
        .into_iter()
        .filter(|target| registry.record(section_id, target))
        .count()
}
