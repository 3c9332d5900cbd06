use std::path::PathBuf;

use super::*;

const SAMPLE_PAGES: &str = "SECTION 26 24 13 - SWITCHBOARDS
PART 1 - GENERAL
1.2 RELATED SECTIONS
A. Section 26 05 00 - Common Work Results
1.3 REFERENCES
UL 891 - Switchboards
1.6 DEFINITIONS
LV   Low voltage
1.7 DELIVERY
A. Deliver in crates.\u{000C}PART 2 - PRODUCTS
2.1 MATERIALS
2.1.1 Copper Bus
A. Tin plated.
2.1.2 Enclosures
B. Steel.
END OF SECTION 26 24 13\u{000C}\u{000C}  \n";

fn sample_structure() -> DocumentStructure {
    let pages = split_pages(SAMPLE_PAGES, None);
    let options = ChunkOptions {
        source_id: "switchboards.txt".to_string(),
        ..ChunkOptions::default()
    };
    Segmenter::new()
        .expect("segmenter")
        .segment(&pages, &options)
}

fn table_counts(connection: &Connection) -> Vec<i64> {
    [
        "SELECT COUNT(*) FROM sections",
        "SELECT COUNT(*) FROM parts",
        "SELECT COUNT(*) FROM subsections",
        "SELECT COUNT(*) FROM chunks",
        "SELECT COUNT(*) FROM std_refs",
        "SELECT COUNT(*) FROM section_std_ref_relations",
        "SELECT COUNT(*) FROM definitions",
        "SELECT COUNT(*) FROM section_definition_relations",
        "SELECT COUNT(*) FROM section_relations",
    ]
    .into_iter()
    .map(|sql| count_rows(connection, sql).expect("count rows"))
    .collect()
}

#[test]
fn split_pages_drops_trailing_blank_pages_and_nuls() {
    let pages = split_pages("first\u{0000}\u{000C}second\u{000C}\u{000C}  \n", None);
    assert_eq!(pages, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn split_pages_keeps_interior_blank_pages() {
    let pages = split_pages("first\u{000C}\u{000C}third", None);
    assert_eq!(pages.len(), 3);
    assert!(pages[1].is_empty());
}

#[test]
fn split_pages_honors_max_pages() {
    let pages = split_pages("a\u{000C}b\u{000C}c", Some(2));
    assert_eq!(pages, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn default_source_id_uses_file_name() {
    assert_eq!(
        default_source_id(&PathBuf::from("/tmp/specs/26 24 13.txt")),
        "26 24 13.txt"
    );
}

#[test]
fn sanitize_for_file_name_collapses_separators() {
    assert_eq!(sanitize_for_file_name("26 24 13.txt"), "26_24_13_txt");
    assert_eq!(sanitize_for_file_name("--"), "document");
}

#[test]
fn sample_pages_segment_into_expected_tables() {
    let structure = sample_structure();

    assert_eq!(structure.page_count, 2);
    assert_eq!(structure.sections.len(), 1);
    assert_eq!(structure.subsections.len(), 2);
    assert_eq!(structure.std_refs.len(), 1);
    assert_eq!(structure.std_refs[0].id, "UL 891");
    assert_eq!(structure.definitions.len(), 1);
    assert_eq!(structure.section_relations.len(), 1);
}

#[test]
fn upserting_the_same_structure_twice_does_not_duplicate_rows() {
    let structure = sample_structure();
    let mut connection = Connection::open_in_memory().expect("open in-memory db");
    ensure_schema(&connection).expect("create schema");

    let first = upsert_structure(&mut connection, &structure).expect("first upsert");
    let after_first = table_counts(&connection);
    let second = upsert_structure(&mut connection, &structure).expect("second upsert");
    let after_second = table_counts(&connection);

    assert_eq!(first, structure.chunks.len());
    assert_eq!(second, first);
    assert_eq!(after_first, after_second);
    assert_eq!(after_first[3], structure.chunks.len() as i64);
    assert_eq!(after_first[2], 2);
}

#[test]
fn upsert_keeps_an_existing_reference_title() {
    let mut structure = sample_structure();
    let mut connection = Connection::open_in_memory().expect("open in-memory db");
    ensure_schema(&connection).expect("create schema");
    upsert_structure(&mut connection, &structure).expect("first upsert");

    structure.std_refs[0].title = None;
    upsert_structure(&mut connection, &structure).expect("second upsert");

    let title: Option<String> = connection
        .query_row(
            "SELECT title FROM std_refs WHERE id = ?1",
            params!["UL 891"],
            |row| row.get(0),
        )
        .expect("title row");
    assert_eq!(title.as_deref(), Some("Switchboards"));
}
