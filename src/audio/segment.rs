//! Non-overlapping chunk segmentation and silence/signal classification.
//!
//! [`ChunkIter`] walks the buffer from the end of the calibration window in
//! fixed [`CHUNK_WORDS`] strides and classifies each chunk by counting the
//! samples whose magnitude reaches the calibrated threshold.
//!
//! Counting — rather than taking the peak or the mean — is deliberately
//! tolerant of transient noise and of short pauses inside speech, while
//! still rejecting chunks that are pure inter-word silence.

use crate::audio::buffer::SampleBuffer;
use crate::audio::calibrate::Calibration;
use crate::config::{CHUNK_WORDS, VALID_SAMPLES_PERCENT};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Outcome of classifying one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkClass {
    /// Enough loud samples — usable training signal.
    Signal,
    /// Mostly below the noise floor — inter-word silence.
    Silence,
}

/// Minimum number of above-threshold samples for a chunk to classify as
/// [`ChunkClass::Signal`]: `ceil(CHUNK_WORDS × VALID_SAMPLES_PERCENT / 100)`.
pub const MIN_VALID_SAMPLES: usize = (CHUNK_WORDS * VALID_SAMPLES_PERCENT).div_ceil(100);

/// Classify a chunk against the calibrated `threshold`.
///
/// The boundary is inclusive: a chunk with exactly [`MIN_VALID_SAMPLES`]
/// qualifying samples is signal.
pub fn classify(words: &[i32], threshold: i64) -> ChunkClass {
    let valid = words
        .iter()
        .filter(|&&w| (w as i64).abs() >= threshold)
        .count();

    if valid >= MIN_VALID_SAMPLES {
        ChunkClass::Signal
    } else {
        ChunkClass::Silence
    }
}

// ---------------------------------------------------------------------------
// ChunkIter
// ---------------------------------------------------------------------------

/// One classified chunk, borrowed from the source buffer.
#[derive(Debug)]
pub struct ClassifiedChunk<'a> {
    /// Word offset of the chunk within the source buffer.  Used as the
    /// stable per-file identity of the chunk in output filenames.
    pub offset: usize,
    /// The chunk's `CHUNK_WORDS` interleaved words.
    pub words: &'a [i32],
    /// Silence/signal classification.
    pub class: ChunkClass,
}

/// Iterator over the non-overlapping chunks of one recording.
///
/// Starts at [`Calibration::data_start`] and stops when fewer than one full
/// chunk remains.  Chunks are emitted one at a time; the file's chunk list
/// is never materialised.
pub struct ChunkIter<'a> {
    words: &'a [i32],
    pos: usize,
    threshold: i64,
}

impl<'a> ChunkIter<'a> {
    /// Create an iterator over `buf` using the thresholds in `cal`.
    pub fn new(buf: &'a SampleBuffer, cal: &Calibration) -> Self {
        ChunkIter {
            words: buf.words(),
            pos: cal.data_start,
            threshold: cal.threshold,
        }
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = ClassifiedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos + CHUNK_WORDS > self.words.len() {
            return None;
        }

        let offset = self.pos;
        let words = &self.words[offset..offset + CHUNK_WORDS];
        self.pos += CHUNK_WORDS;

        Some(ClassifiedChunk {
            offset,
            words,
            class: classify(words, self.threshold),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
