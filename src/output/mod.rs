//! Augmentation and dataset persistence.
//!
//! ```text
//! ClassifiedChunk → rotate_channels (×NCHANNELS) → differential_encode
//!                → subsample draw → {angle}/{elev}/{distance}/stem_offset
//! ```
//!
//! The silence session bypasses the transforms entirely and lands in the
//! reserved `silence/` class.

pub mod transform;
pub mod writer;

pub use transform::{differential_encode, rotate_channels};
pub use writer::{DatasetWriter, WriteError};
