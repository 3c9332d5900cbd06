use crate::model::{EnrichedSection, Part, Section, Subsection};

use super::patterns::Patterns;
use super::subsections::part_subsections;

/// Part-1 clause fields copied onto each section: (start code, end code).
pub const AUXILIARY_CLAUSES: [(&str, &str); 4] =
    [("1.4", "1.5"), ("1.5", "1.6"), ("1.7", "1.8"), ("1.8", "1.9")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseStrategy {
    /// Start heading up to the nearest end candidate.
    DirectSlice,
    /// Part-1 subsections whose level-2 code is the start code.
    SubsectionFallback,
    /// Start heading up to the end of the part.
    OpenEndedSlice,
}

pub const CLAUSE_POLICY: [ClauseStrategy; 3] = [
    ClauseStrategy::DirectSlice,
    ClauseStrategy::SubsectionFallback,
    ClauseStrategy::OpenEndedSlice,
];

/// Byte offsets of the line starts of every `a.b` clause heading, with the parsed code.
pub fn clause_headings(patterns: &Patterns, text: &str) -> Vec<(usize, (u32, u32))> {
    patterns
        .clause_heading
        .captures_iter(text)
        .filter_map(|captures| {
            let offset = captures.get(0)?.start();
            let major = captures.get(1)?.as_str().parse::<u32>().ok()?;
            let minor = captures.get(2)?.as_str().parse::<u32>().ok()?;
            Some((offset, (major, minor)))
        })
        .collect()
}

fn parse_clause_code(code: &str) -> Option<(u32, u32)> {
    let (major, minor) = code.split_once('.')?;
    Some((major.trim().parse().ok()?, minor.trim().parse().ok()?))
}

pub fn find_clause(patterns: &Patterns, text: &str, code: &str) -> Option<usize> {
    let wanted = parse_clause_code(code)?;
    clause_headings(patterns, text)
        .into_iter()
        .find(|(_, parsed)| *parsed == wanted)
        .map(|(offset, _)| offset)
}

/// Smallest offset after `after` among the end-code heading, a PART 2 marker and an
/// END OF SECTION marker.
pub fn nearest_end(patterns: &Patterns, text: &str, after: usize, end_code: &str) -> Option<usize> {
    let wanted = parse_clause_code(end_code);
    let heading = clause_headings(patterns, text)
        .into_iter()
        .find(|(offset, parsed)| *offset > after && Some(*parsed) == wanted)
        .map(|(offset, _)| offset);
    let part_two = patterns
        .part_two
        .find_iter(text)
        .map(|found| found.start())
        .find(|offset| *offset > after);
    let end_of_section = patterns
        .end_of_section
        .find_iter(text)
        .map(|found| found.start())
        .find(|offset| *offset > after);

    [heading, part_two, end_of_section].into_iter().flatten().min()
}

pub fn direct_slice<'a>(
    patterns: &Patterns,
    text: &'a str,
    start_code: &str,
    end_code: &str,
) -> Option<&'a str> {
    let start = find_clause(patterns, text, start_code)?;
    let end = nearest_end(patterns, text, start, end_code)?;
    Some(text[start..end].trim())
}

/// Slice used by the miners: a direct slice, or from the start heading to the end of the
/// text when no end candidate exists.
pub fn clause_span<'a>(
    patterns: &Patterns,
    text: &'a str,
    start_code: &str,
    end_code: &str,
) -> Option<&'a str> {
    let start = find_clause(patterns, text, start_code)?;
    let end = nearest_end(patterns, text, start, end_code).unwrap_or(text.len());
    Some(text[start..end].trim())
}

pub fn overview(patterns: &Patterns, part_one_text: &str) -> String {
    let end = find_clause(patterns, part_one_text, "1.2").unwrap_or(part_one_text.len());
    part_one_text[..end].trim().to_string()
}

pub fn resolve_clause(
    patterns: &Patterns,
    part_one_text: &str,
    part_one_subsections: &[Subsection],
    start_code: &str,
    end_code: &str,
) -> Option<String> {
    for strategy in CLAUSE_POLICY {
        let resolved = match strategy {
            ClauseStrategy::DirectSlice => {
                direct_slice(patterns, part_one_text, start_code, end_code).map(str::to_string)
            }
            ClauseStrategy::SubsectionFallback => {
                subsection_clause(part_one_subsections, start_code)
            }
            ClauseStrategy::OpenEndedSlice => {
                clause_span(patterns, part_one_text, start_code, end_code).map(str::to_string)
            }
        };
        if let Some(value) = resolved.filter(|value| !value.is_empty()) {
            return Some(value);
        }
    }

    None
}

fn subsection_clause(subsections: &[Subsection], level2_code: &str) -> Option<String> {
    let blocks = subsections
        .iter()
        .filter(|subsection| subsection.level2_code.as_deref() == Some(level2_code))
        .map(|subsection| {
            let code = subsection.level3_code.as_deref().unwrap_or(level2_code);
            format!("{} {}\n{}", code, subsection.title, subsection.text)
                .trim()
                .to_string()
        })
        .collect::<Vec<String>>();

    (!blocks.is_empty()).then(|| blocks.join("\n\n"))
}

pub fn part_one<'a>(parts: &'a [Part], section_id: &str) -> Option<&'a Part> {
    parts
        .iter()
        .find(|part| part.section_id == section_id && part.part_no == 1)
}

pub fn enrich_sections(
    patterns: &Patterns,
    sections: &[Section],
    parts: &[Part],
) -> Vec<EnrichedSection> {
    sections
        .iter()
        .map(|section| enrich_section(patterns, section, part_one(parts, &section.id)))
        .collect()
}

pub fn enrich_section(
    patterns: &Patterns,
    section: &Section,
    part_one: Option<&Part>,
) -> EnrichedSection {
    let Some(part_one) = part_one else {
        return EnrichedSection {
            section: section.clone(),
            overview: Some(section.text.clone()).filter(|text| !text.is_empty()),
            p14: None,
            p15: None,
            p17: None,
            p18: None,
        };
    };

    let subsections = part_subsections(patterns, part_one);
    let [p14, p15, p17, p18] = AUXILIARY_CLAUSES.map(|(start, end)| {
        resolve_clause(patterns, &part_one.text, &subsections, start, end)
    });

    EnrichedSection {
        section: section.clone(),
        overview: Some(overview(patterns, &part_one.text)).filter(|text| !text.is_empty()),
        p14,
        p15,
        p17,
        p18,
    }
}
