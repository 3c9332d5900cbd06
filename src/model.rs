use serde::{Deserialize, Serialize};

pub const DOCUMENT_SECTION_ID: &str = "sec:document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingKind {
    Section,
    Numbered,
}

/// A heading line found in the page text. `line` is 1-based within `page`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub kind: HeadingKind,
    pub page: usize,
    pub line: usize,
    pub code: String,
    pub title: String,
}

impl Heading {
    pub fn depth(&self) -> usize {
        match self.kind {
            HeadingKind::Section => self.code.split_whitespace().count(),
            HeadingKind::Numbered => self.code.split('.').count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub start_page: usize,
    pub end_page: usize,
    pub text: String,
    /// Page of every line of `text`; empty when the record was not built from pages.
    #[serde(skip)]
    pub line_pages: Vec<usize>,
}

/// A section plus the clause fields lifted out of its Part 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSection {
    #[serde(flatten)]
    pub section: Section,
    pub overview: Option<String>,
    pub p14: Option<String>,
    pub p15: Option<String>,
    pub p17: Option<String>,
    pub p18: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub section_id: String,
    pub part_no: u8,
    pub title: String,
    pub start_page: usize,
    pub end_page: usize,
    pub text: String,
    /// False for the default Part 1 of a section without PART marker lines.
    pub explicit: bool,
    #[serde(skip)]
    pub line_pages: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    pub section_id: String,
    pub part_no: u8,
    pub level2_code: Option<String>,
    pub level3_code: Option<String>,
    pub level2_title: Option<String>,
    pub level3_title: Option<String>,
    pub title: String,
    pub start_page: usize,
    pub end_page: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdRef {
    pub id: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStdRefRelation {
    pub section_id: String,
    pub reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub id: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDefinitionRelation {
    pub section_id: String,
    pub definition_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRelation {
    pub section_id: String,
    pub related_section_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: String,
    pub source_id: String,
    pub section_id: String,
    pub part_no: Option<u8>,
    pub level2_code: Option<String>,
    pub level3_code: Option<String>,
    pub level2_title: Option<String>,
    pub level3_title: Option<String>,
    pub title: String,
    pub start_page: usize,
    pub end_page: usize,
    pub text: String,
}

/// Everything recovered from one document run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStructure {
    pub page_count: usize,
    pub sections: Vec<EnrichedSection>,
    pub parts: Vec<Part>,
    pub subsections: Vec<Subsection>,
    pub chunks: Vec<Chunk>,
    pub std_refs: Vec<StdRef>,
    pub std_ref_relations: Vec<SectionStdRefRelation>,
    pub definitions: Vec<Definition>,
    pub definition_relations: Vec<SectionDefinitionRelation>,
    pub section_relations: Vec<SectionRelation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentPaths {
    pub pages_file: String,
    pub output_path: String,
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SegmentCounts {
    pub page_count: usize,
    pub section_count: usize,
    pub part_count: usize,
    pub subsection_count: usize,
    pub chunk_count: usize,
    pub std_ref_count: usize,
    pub definition_count: usize,
    pub section_relation_count: usize,
    pub chunks_upserted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub source_id: String,
    pub source_sha256: String,
    pub max_chars: usize,
    pub min_chars: usize,
    pub paths: SegmentPaths,
    pub counts: SegmentCounts,
    pub warnings: Vec<String>,
}
