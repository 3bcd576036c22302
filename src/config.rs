//! Build-time constants describing the recording format and the
//! segmentation parameters.
//!
//! The collection rig always records the same way — 8 microphones,
//! signed 32-bit little-endian PCM at 24 kHz — so none of these are
//! runtime-configurable.  Changing the rig means recompiling the tool.

// ---------------------------------------------------------------------------
// Recording format
// ---------------------------------------------------------------------------

/// Number of interleaved microphone channels per frame.
pub const NCHANNELS: usize = 8;

/// Sample width in bits (S32LE).
pub const BITS_PER_SAMPLE: usize = 32;

/// Sample width in bytes — one interleaved word.
pub const SAMPLE_WIDTH: usize = BITS_PER_SAMPLE / 8;

/// Frames per second.
pub const SAMPLE_RATE: usize = 24_000;

// ---------------------------------------------------------------------------
// Segmentation parameters
// ---------------------------------------------------------------------------

/// Recordings start with a loud glitch from the USB microphone firmware;
/// skip this much before calibrating.
pub const INITIAL_SKIP_SECS: f64 = 0.5;

/// Duration of known true silence (the playback source emits digital zero)
/// used to measure the per-file noise floor.
pub const SILENCE_CAL_SECS: f64 = 1.0;

/// The classification threshold is the calibration-window peak scaled by
/// this factor.
pub const OVER_SILENCE_FACTOR: f64 = 1.1;

/// Minimum percentage of above-threshold samples for a chunk to count as
/// signal rather than silence.
pub const VALID_SAMPLES_PERCENT: usize = 10;

/// Frames per output chunk — the network's input length.
pub const OUT_NSAMPLES: usize = 512;

/// Words per output chunk (`OUT_NSAMPLES` frames × `NCHANNELS`).
pub const CHUNK_WORDS: usize = OUT_NSAMPLES * NCHANNELS;

/// Default percentage of candidate output files to drop at random.  The raw
/// recordings oversample some geometries heavily; dropping caps the dataset
/// size without biasing which physical chunks survive.
pub const OUT_DROP_PERCENT: u32 = 95;

/// Output class directory for the dedicated silence session.
pub const SILENCE_CLASS_DIR: &str = "silence";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a duration in seconds to a word offset into the interleaved
/// sample stream.
///
/// The frame count is floored first, so the result always lands on a frame
/// boundary: `floor(SAMPLE_RATE × secs) × NCHANNELS`.
pub fn secs_to_words(secs: f64) -> usize {
    (SAMPLE_RATE as f64 * secs).floor() as usize * NCHANNELS
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_second_skip_offset() {
        // 0.5 s × 24000 Hz = 12000 frames = 96000 words
        assert_eq!(secs_to_words(INITIAL_SKIP_SECS), 96_000);
    }

    #[test]
    fn one_second_window_offset() {
        assert_eq!(secs_to_words(SILENCE_CAL_SECS), 192_000);
    }

    #[test]
    fn fractional_seconds_floor_to_frame_boundary() {
        // 24000 × 0.0001 = 2.4 frames → floor → 2 frames = 16 words
        assert_eq!(secs_to_words(0.0001), 16);
    }

    #[test]
    fn chunk_words_consistent() {
        assert_eq!(CHUNK_WORDS, 4096);
        assert_eq!(CHUNK_WORDS % NCHANNELS, 0);
    }
}
