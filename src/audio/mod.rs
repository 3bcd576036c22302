//! Audio processing — mapped sample access → noise-floor calibration →
//! chunk segmentation.
//!
//! # Pipeline
//!
//! ```text
//! raw S32LE file → SampleBuffer (mmap) → calibrate (noise floor)
//!               → ChunkIter → ClassifiedChunk (Signal | Silence)
//! ```

pub mod buffer;
pub mod calibrate;
pub mod segment;

pub use buffer::{BufferError, SampleBuffer};
pub use calibrate::{calibrate, Calibration, CalibrationError};
pub use segment::{classify, ChunkClass, ChunkIter, ClassifiedChunk, MIN_VALID_SAMPLES};
