//! # doa-dataprep
//!
//! Converts long raw microphone-array recordings into many small
//! fixed-size labeled audio chunks for supervised DOA training.
//!
//! Each recording carries its session geometry (source angle, elevation,
//! distance) in its filename; the dedicated `output-silence*.raw`
//! recording populates the "no active source" class.  For every usable
//! chunk of a geometry recording the tool emits one channel-rotated,
//! differentially-encoded variant per microphone, multiplying the training
//! angles covered by a single physical session by the channel count.
//!
//! # Pipeline
//!
//! ```text
//! input dir → Session (filename schema) → SampleBuffer (mmap)
//!          → calibrate (noise floor) → ChunkIter (Signal | Silence)
//!          → DatasetWriter (rotate → differential → subsample → persist)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use doa_dataprep::{config::OUT_DROP_PERCENT, pipeline};
//! use std::path::Path;
//!
//! let summary = pipeline::run(
//!     Path::new("recordings/"),
//!     Path::new("dataset/"),
//!     42, // subsampling seed — fix it for reproducible output sets
//!     OUT_DROP_PERCENT,
//! )?;
//! println!("{} dataset file(s) written", summary.files_written);
//! # Ok::<(), doa_dataprep::pipeline::PipelineError>(())
//! ```
//!
//! The input format is fixed at build time: 8-channel interleaved S32LE
//! PCM at 24 kHz (see [`config`]).

pub mod audio;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod session;

// Re-export main types
pub use audio::{calibrate, Calibration, ChunkClass, ChunkIter, SampleBuffer};
pub use output::DatasetWriter;
pub use pipeline::{run, PipelineError, RunSummary};
pub use session::Session;
