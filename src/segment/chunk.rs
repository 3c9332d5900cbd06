use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::{Chunk, Section, Subsection};

use super::patterns::Patterns;

pub const DEFAULT_MAX_CHARS: usize = 4000;
pub const DEFAULT_MIN_CHARS: usize = 1500;
const PREFIX_DISCRIMINATOR_CHARS: usize = 64;
const CHUNK_ID_HEX_CHARS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkOptions {
    pub source_id: String,
    pub max_chars: usize,
    pub min_chars: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            source_id: "unknown".to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

/// Borrowed view of whatever is being chunked: a subsection, or a whole section that has
/// no subsections.
#[derive(Debug, Clone, Copy)]
pub struct ChunkUnit<'a> {
    pub section_id: &'a str,
    pub part_no: Option<u8>,
    pub level2_code: Option<&'a str>,
    pub level3_code: Option<&'a str>,
    pub level2_title: Option<&'a str>,
    pub level3_title: Option<&'a str>,
    pub title: &'a str,
    pub start_page: usize,
    pub end_page: usize,
    pub text: &'a str,
}

impl<'a> From<&'a Subsection> for ChunkUnit<'a> {
    fn from(subsection: &'a Subsection) -> Self {
        Self {
            section_id: &subsection.section_id,
            part_no: Some(subsection.part_no),
            level2_code: subsection.level2_code.as_deref(),
            level3_code: subsection.level3_code.as_deref(),
            level2_title: subsection.level2_title.as_deref(),
            level3_title: subsection.level3_title.as_deref(),
            title: &subsection.title,
            start_page: subsection.start_page,
            end_page: subsection.end_page,
            text: &subsection.text,
        }
    }
}

impl<'a> From<&'a Section> for ChunkUnit<'a> {
    fn from(section: &'a Section) -> Self {
        Self {
            section_id: &section.id,
            part_no: None,
            level2_code: None,
            level3_code: None,
            level2_title: None,
            level3_title: None,
            title: &section.title,
            start_page: section.start_page,
            end_page: section.end_page,
            text: &section.text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Fits in `max_chars`: emitted as is.
    Whole,
    /// Greedy packing of `n.n.n.n` blocks, never splitting a block.
    LevelFourBlocks,
    /// Fixed `max_chars` slices with an undersized tail folded into its predecessor.
    FixedSlices,
}

pub const SPLIT_POLICY: [SplitStrategy; 3] = [
    SplitStrategy::Whole,
    SplitStrategy::LevelFourBlocks,
    SplitStrategy::FixedSlices,
];

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn normalize_chunk_text(patterns: &Patterns, text: &str) -> String {
    patterns
        .excess_newlines
        .replace_all(text, "\n\n")
        .trim()
        .to_string()
}

pub fn chunk_id(
    source_id: &str,
    section_id: &str,
    level2_code: Option<&str>,
    level3_code: Option<&str>,
    discriminator: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(
        format!(
            "{}:{}:{}:{}:{}",
            source_id,
            section_id,
            level2_code.unwrap_or_default(),
            level3_code.unwrap_or_default(),
            discriminator
        )
        .as_bytes(),
    );
    let digest = format!("{:x}", hasher.finalize());
    format!("ch:{}", &digest[..CHUNK_ID_HEX_CHARS])
}

/// Chunks every section: its subsections when it has any, the section itself otherwise.
pub fn chunk_document(
    patterns: &Patterns,
    sections: &[Section],
    subsections: &[Subsection],
    options: &ChunkOptions,
) -> Vec<Chunk> {
    let mut units = Vec::<ChunkUnit<'_>>::new();
    for section in sections {
        let before = units.len();
        units.extend(
            subsections
                .iter()
                .filter(|subsection| subsection.section_id == section.id)
                .map(ChunkUnit::from),
        );
        if units.len() == before {
            units.push(ChunkUnit::from(section));
        }
    }

    chunk_units(patterns, &units, options)
}

pub fn chunk_units(
    patterns: &Patterns,
    units: &[ChunkUnit<'_>],
    options: &ChunkOptions,
) -> Vec<Chunk> {
    units
        .iter()
        .flat_map(|unit| chunk_unit(patterns, unit, options))
        .collect()
}

pub fn chunk_unit(
    patterns: &Patterns,
    unit: &ChunkUnit<'_>,
    options: &ChunkOptions,
) -> Vec<Chunk> {
    let text = normalize_chunk_text(patterns, unit.text);
    if text.is_empty() {
        return Vec::new();
    }
    let max_chars = options.max_chars.max(1);

    for strategy in SPLIT_POLICY {
        let pieces = match strategy {
            SplitStrategy::Whole => (char_len(&text) <= max_chars).then(|| {
                let prefix = text
                    .chars()
                    .take(PREFIX_DISCRIMINATOR_CHARS)
                    .collect::<String>();
                vec![(prefix, text.clone())]
            }),
            SplitStrategy::LevelFourBlocks => level_four_blocks(patterns, &text).map(|blocks| {
                pack_blocks(blocks, max_chars)
                    .into_iter()
                    .enumerate()
                    .map(|(index, piece)| (index.to_string(), piece))
                    .collect()
            }),
            SplitStrategy::FixedSlices => Some(
                fixed_slices(&text, max_chars, options.min_chars)
                    .into_iter()
                    .map(|(offset, piece)| (offset.to_string(), piece))
                    .collect(),
            ),
        };

        if let Some(pieces) = pieces {
            return pieces
                .into_iter()
                .map(|(discriminator, piece)| build_chunk(unit, options, &discriminator, piece))
                .collect();
        }
    }

    Vec::new()
}

fn build_chunk(
    unit: &ChunkUnit<'_>,
    options: &ChunkOptions,
    discriminator: &str,
    text: String,
) -> Chunk {
    // Codeless subsections of different parts share every other id input.
    let discriminator = match unit.part_no {
        Some(part_no) => format!("p{part_no}:{discriminator}"),
        None => discriminator.to_string(),
    };

    Chunk {
        id: chunk_id(
            &options.source_id,
            unit.section_id,
            unit.level2_code,
            unit.level3_code,
            &discriminator,
        ),
        source_id: options.source_id.clone(),
        section_id: unit.section_id.to_string(),
        part_no: unit.part_no,
        level2_code: unit.level2_code.map(str::to_string),
        level3_code: unit.level3_code.map(str::to_string),
        level2_title: unit.level2_title.map(str::to_string),
        level3_title: unit.level3_title.map(str::to_string),
        title: unit.title.to_string(),
        start_page: unit.start_page,
        end_page: unit.end_page,
        text,
    }
}

/// Splits text into the preamble ahead of the first `n.n.n.n` line followed by one block
/// per level-4 heading. None when the text has no level-4 heading.
pub fn level_four_blocks(patterns: &Patterns, text: &str) -> Option<Vec<String>> {
    let lines = text.lines().collect::<Vec<&str>>();
    let starts = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| patterns.level_four.is_match(line))
        .map(|(index, _)| index)
        .collect::<Vec<usize>>();
    let first = *starts.first()?;

    let mut blocks = Vec::with_capacity(starts.len() + 1);
    let preamble = lines[..first].join("\n").trim().to_string();
    if !preamble.is_empty() {
        blocks.push(preamble);
    }
    for (index, start) in starts.iter().enumerate() {
        let end = starts.get(index + 1).copied().unwrap_or(lines.len());
        blocks.push(lines[*start..end].join("\n").trim().to_string());
    }

    Some(blocks)
}

/// Greedy packing; a block larger than `max_chars` becomes a chunk of its own.
pub fn pack_blocks(blocks: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut packed = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for block in blocks {
        let block_len = char_len(&block);
        if current.is_empty() {
            current = block;
            current_len = block_len;
            continue;
        }

        if current_len + 1 + block_len > max_chars {
            packed.push(std::mem::take(&mut current));
            current = block;
            current_len = block_len;
            continue;
        }

        current.push('\n');
        current.push_str(&block);
        current_len += 1 + block_len;
    }

    if !current.is_empty() {
        packed.push(current);
    }

    packed
}

/// `(char offset, slice)` pairs. A final slice shorter than `min_chars` is appended to the
/// previous slice instead of standing alone.
pub fn fixed_slices(text: &str, max_chars: usize, min_chars: usize) -> Vec<(usize, String)> {
    let max_chars = max_chars.max(1);
    let chars = text.chars().collect::<Vec<char>>();
    let mut slices = Vec::<(usize, String)>::new();
    let mut offset = 0usize;

    while offset < chars.len() {
        let end = (offset + max_chars).min(chars.len());
        let slice = chars[offset..end].iter().collect::<String>();

        if end == chars.len() && end - offset < min_chars {
            if let Some((_, previous)) = slices.last_mut() {
                previous.push_str(&slice);
                break;
            }
        }

        slices.push((offset, slice));
        offset = end;
    }

    slices
}
