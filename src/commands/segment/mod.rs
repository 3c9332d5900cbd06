use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};
use tracing::{info, warn};

use specseg::model::{DocumentStructure, SegmentCounts, SegmentPaths, SegmentRunManifest};
use specseg::{ChunkOptions, Segmenter};

use crate::cli::SegmentArgs;
use crate::util::{
    ensure_directory, now_utc_string, sanitize_for_file_name, sha256_file, utc_compact_string,
    write_json_pretty,
};

mod page_input;
mod run;
mod store;
#[cfg(test)]
mod tests;

pub use run::run;

use page_input::*;
use store::*;
