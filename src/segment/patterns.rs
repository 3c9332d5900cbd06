use anyhow::{Context, Result};
use regex::Regex;

/// Compiled line patterns shared by every segmentation stage.
#[derive(Debug)]
pub struct Patterns {
    pub(crate) section_heading: Regex,
    pub(crate) numbered_heading: Regex,
    pub(crate) end_of_section: Regex,
    pub(crate) part_marker: Regex,
    pub(crate) part_two: Regex,
    pub(crate) clause_heading: Regex,
    pub(crate) subsection_mark: Regex,
    pub(crate) level_four: Regex,
    pub(crate) reference_line: Regex,
    pub(crate) joiner_spacing: Regex,
    pub(crate) column_split: Regex,
    pub(crate) list_marker: Regex,
    pub(crate) clause_code: Regex,
    pub(crate) section_mention: Regex,
    pub(crate) excess_newlines: Regex,
}

impl Patterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            section_heading: Regex::new(
                r"(?i)^\s*section\s+(\d{1,3})\s+(\d{1,3})(?:\s+(\d{1,3}))?(?P<rest>\s.*)?$",
            )
            .context("failed to compile section heading regex")?,
            numbered_heading: Regex::new(r"^\s*(\d+(?:\.\d+){0,3})[.)]?\s+(.{2,80})$")
                .context("failed to compile numbered heading regex")?,
            end_of_section: Regex::new(r"(?im)^[ \t]*END[ \t]+OF[ \t]+SECTION\b")
                .context("failed to compile end-of-section regex")?,
            part_marker: Regex::new(
                r"(?i)^\s*PART\s+([123])\b\s*[-–—:.]?\s*(GENERAL|PRODUCTS?|EXECUTION)?\s*[-–—:.]?\s*$",
            )
            .context("failed to compile part marker regex")?,
            part_two: Regex::new(r"(?im)^[ \t]*PART[ \t]+2\b")
                .context("failed to compile part two regex")?,
            clause_heading: Regex::new(r"(?m)^[ \t]*(\d+)[ \t]*\.[ \t]*(\d+)\.?(?:[ \t)]|$)")
                .context("failed to compile clause heading regex")?,
            subsection_mark: Regex::new(
                r"^\s*(?P<code>\d+(?:\.\d+){0,3})(?:[.)]\s*|\s+|$)(?P<title>.*)$",
            )
            .context("failed to compile subsection mark regex")?,
            level_four: Regex::new(r"^\s*\d+\.\d+\.\d+\.\d+[.)]?\s+\S")
                .context("failed to compile level-4 heading regex")?,
            reference_line: Regex::new(
                r"(?x)
                ^\s*
                (?:(?:[A-Za-z]|\d{1,2})[.)]\s+|[-•*]\s+)?
                (?P<prefix>[A-Z]{2,}(?:\s*/\s*[A-Z]{2,})*(?:\s+[A-Z]{2,}(?:\s*/\s*[A-Z]{2,})*)*)
                \s+
                (?P<code>[A-Z]{0,3}\d[A-Za-z0-9]*(?:[-/.][A-Za-z0-9]+|\s+-\s+\d[A-Za-z0-9]*)*(?::\d{4})?)
                :?
                (?P<rest>(?:[\s/:,–—-].*)?)
                $",
            )
            .context("failed to compile standard reference regex")?,
            joiner_spacing: Regex::new(r"\s*([-/])\s*")
                .context("failed to compile joiner spacing regex")?,
            column_split: Regex::new(r"[ \t]{3,}|\t+")
                .context("failed to compile column split regex")?,
            list_marker: Regex::new(r"^(?:[A-Za-z]|\d{1,2})[.)](?:\s+|$)")
                .context("failed to compile list marker regex")?,
            clause_code: Regex::new(r"^\d+(?:\.\d+)*\.?$")
                .context("failed to compile clause code regex")?,
            section_mention: Regex::new(r"(?i)\bSection[ \t]+(\d+)[ \t]+(\d+)[ \t]+(\d+)\b")
                .context("failed to compile section mention regex")?,
            excess_newlines: Regex::new(r"\n{3,}")
                .context("failed to compile newline collapse regex")?,
        })
    }

    pub(crate) fn is_end_of_section(&self, line: &str) -> bool {
        self.end_of_section.is_match(line)
    }
}
