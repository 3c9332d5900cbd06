pub mod model;
pub mod segment;

pub use segment::{ChunkOptions, Segmenter};
