//! Structure recovery for "Section N N N / PART n / n.n.n" specification documents.
//!
//! Stages run leaf-first: headings, sections, parts, subsections, then the Part-1
//! enrichment and miners, and finally chunking. Every stage is a pure function over the
//! page text and the records of the previous stage.

use anyhow::Result;
use tracing::{debug, info};

use crate::model::DocumentStructure;

pub mod chunk;
pub mod definitions;
pub mod enrich;
pub mod headings;
pub mod parts;
pub mod patterns;
pub mod references;
pub mod relations;
pub mod sections;
pub mod subsections;

pub use chunk::{ChunkOptions, ChunkUnit, DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS};
pub use definitions::DefinitionRegistry;
pub use patterns::Patterns;
pub use references::ReferenceRegistry;
pub use relations::RelationRegistry;

#[derive(Debug)]
pub struct Segmenter {
    patterns: Patterns,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: Patterns::new()?,
        })
    }

    /// Runs every stage over one document. Never fails; missing structure degrades to
    /// coarser records.
    pub fn segment(&self, pages: &[String], options: &ChunkOptions) -> DocumentStructure {
        let patterns = &self.patterns;

        let headings = headings::detect_headings(patterns, pages);
        let selected = sections::select_headings(&headings);
        let sections = sections::sections_from_headings(patterns, pages, &selected);
        debug!(
            detected = headings.len(),
            selected = selected.len(),
            sections = sections.len(),
            "built sections"
        );

        let parts = parts::build_parts(patterns, &sections);
        let subsections = subsections::build_subsections(patterns, &parts);
        let enriched = enrich::enrich_sections(patterns, &sections, &parts);

        let mut references = ReferenceRegistry::default();
        let mut definitions = DefinitionRegistry::default();
        let mut relations = RelationRegistry::default();
        for section in &sections {
            let Some(part_one) = enrich::part_one(&parts, &section.id) else {
                continue;
            };
            let reference_count =
                references::mine_references(patterns, &section.id, &part_one.text, &mut references);
            let definition_count = definitions::mine_definitions(
                patterns,
                &section.id,
                &part_one.text,
                &mut definitions,
            );
            let relation_count =
                relations::mine_relations(patterns, &section.id, &part_one.text, &mut relations);
            debug!(
                section_id = %section.id,
                references = reference_count,
                definitions = definition_count,
                relations = relation_count,
                "mined part 1"
            );
        }

        let chunks = chunk::chunk_document(patterns, &sections, &subsections, options);

        let (std_refs, std_ref_relations) = references.into_tables();
        let (definitions, definition_relations) = definitions.into_tables();
        let section_relations = relations.into_relations();

        info!(
            source_id = %options.source_id,
            pages = pages.len(),
            sections = enriched.len(),
            parts = parts.len(),
            subsections = subsections.len(),
            chunks = chunks.len(),
            std_refs = std_refs.len(),
            definitions = definitions.len(),
            section_relations = section_relations.len(),
            "segmented document"
        );

        DocumentStructure {
            page_count: pages.len(),
            sections: enriched,
            parts,
            subsections,
            chunks,
            std_refs,
            std_ref_relations,
            definitions,
            definition_relations,
            section_relations,
        }
    }
}
