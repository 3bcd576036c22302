//! Run orchestration — input discovery and the sequential per-file pass.
//!
//! # Architecture
//!
//! ```text
//! discover(input_dir)            sorted regular files
//!        │
//!        ▼  per file, strictly sequential
//! Session::parse(filename)       Geometry | Silence | fatal
//!        │
//!        ▼
//! SampleBuffer::open → calibrate → ChunkIter
//!        │
//!        ▼  per chunk
//! DatasetWriter::write_chunk     rotate + differential + subsample
//! ```
//!
//! The only state shared across files is the seedable subsampling RNG,
//! created once per [`run`].

pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{discover, run, PipelineError, RunSummary};
