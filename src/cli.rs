use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use specseg::segment::{DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS};

#[derive(Parser, Debug)]
#[command(
    name = "specseg",
    version,
    about = "Section, part and subsection recovery and chunking for specification documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Segment(SegmentArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SegmentArgs {
    /// Extracted page text, one page per form feed (pdftotext layout).
    #[arg(long)]
    pub pages_file: PathBuf,

    /// Defaults to the pages file name.
    #[arg(long)]
    pub source_id: Option<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
    pub max_chars: usize,

    #[arg(long, default_value_t = DEFAULT_MIN_CHARS)]
    pub min_chars: usize,

    #[arg(long)]
    pub max_pages: Option<usize>,

    #[arg(long, default_value = ".cache/specseg")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub output_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
