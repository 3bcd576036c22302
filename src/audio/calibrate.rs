//! Per-file noise-floor calibration.
//!
//! Every recording session plays digital zero for the first couple of
//! seconds, so the only energy in that window is the microphone gain and
//! the ambient room noise.  Measuring the *observed* peak there — instead
//! of assuming a hardcoded floor — calibrates the silence threshold to the
//! session.
//!
//! The first [`INITIAL_SKIP_SECS`](crate::config::INITIAL_SKIP_SECS) are
//! skipped entirely: the USB microphones emit a loud glitch right after
//! capture starts.

use thiserror::Error;

use crate::audio::buffer::SampleBuffer;
use crate::config::{secs_to_words, INITIAL_SKIP_SECS, OVER_SILENCE_FACTOR, SILENCE_CAL_SECS};

// ---------------------------------------------------------------------------
// CalibrationError
// ---------------------------------------------------------------------------

/// Calibration failure — the recording is unusable.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The recording ends inside (or before) the calibration window.
    #[error("recording too short to calibrate: {len} words, need more than {required}")]
    RecordingTooShort { len: usize, required: usize },
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// Result of scanning one file's calibration window.
///
/// Scoped to a single file's processing pass; never persisted.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    /// Maximum absolute sample magnitude observed in the window.
    pub peak: i64,
    /// Classification threshold: `peak × OVER_SILENCE_FACTOR`, truncated.
    pub threshold: i64,
    /// Word offset where chunk segmentation starts (end of the window).
    pub data_start: usize,
}

/// Scan the known-silent window of `buf` and derive the classification
/// threshold.
///
/// The window is `[skip, skip + window)` in words, both offsets converted
/// from elapsed seconds.  Fails when the buffer has no data past the
/// window — a recording that short is an operator error.
pub fn calibrate(buf: &SampleBuffer) -> Result<Calibration, CalibrationError> {
    let skip = secs_to_words(INITIAL_SKIP_SECS);
    let window_end = skip + secs_to_words(SILENCE_CAL_SECS);

    if skip >= buf.len() || window_end >= buf.len() {
        return Err(CalibrationError::RecordingTooShort {
            len: buf.len(),
            required: window_end,
        });
    }

    // Widen to i64 before abs() so i32::MIN cannot overflow.
    let peak = buf.words()[skip..window_end]
        .iter()
        .map(|&w| (w as i64).abs())
        .max()
        .unwrap_or(0);

    Ok(Calibration {
        peak,
        threshold: (peak as f64 * OVER_SILENCE_FACTOR) as i64,
        data_start: window_end,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Write `words` to a temp file and open it as a SampleBuffer.
    fn buffer_of(dir: &tempfile::TempDir, words: &[i32]) -> SampleBuffer {
        let path = dir.path().join("cal.raw");
        let mut f = std::fs::File::create(&path).unwrap();
        for w in words {
            f.write_all(&w.to_le_bytes()).unwrap();
        }
        SampleBuffer::open(&path).unwrap()
    }

    /// skip + window + `extra` words, with the calibration window filled by
    /// `fill` and everything else zero.
    fn calibration_signal(fill: i32, extra: usize) -> Vec<i32> {
        let skip = secs_to_words(INITIAL_SKIP_SECS);
        let window = secs_to_words(SILENCE_CAL_SECS);
        let mut v = vec![0_i32; skip];
        v.extend(std::iter::repeat(fill).take(window));
        v.extend(std::iter::repeat(0_i32).take(extra));
        v
    }

    #[test]
    fn peak_scaled_by_factor() {
        let dir = tempfile::tempdir().unwrap();
        let buf = buffer_of(&dir, &calibration_signal(1000, 8));

        let cal = calibrate(&buf).unwrap();
        assert_eq!(cal.peak, 1000);
        assert_eq!(cal.threshold, 1100);
        assert_eq!(
            cal.data_start,
            secs_to_words(INITIAL_SKIP_SECS) + secs_to_words(SILENCE_CAL_SECS)
        );
    }

    #[test]
    fn peak_uses_absolute_magnitude() {
        let dir = tempfile::tempdir().unwrap();
        let buf = buffer_of(&dir, &calibration_signal(-2000, 8));

        let cal = calibrate(&buf).unwrap();
        assert_eq!(cal.peak, 2000);
    }

    #[test]
    fn glitch_before_window_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut words = calibration_signal(100, 8);
        // Loud glitch inside the skip region must not affect the peak.
        words[0] = i32::MAX;
        let buf = buffer_of(&dir, &words);

        let cal = calibrate(&buf).unwrap();
        assert_eq!(cal.peak, 100);
    }

    #[test]
    fn too_short_recording_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // Ends exactly at the window boundary — still too short.
        let skip = secs_to_words(INITIAL_SKIP_SECS);
        let window = secs_to_words(SILENCE_CAL_SECS);
        let buf = buffer_of(&dir, &vec![0_i32; skip + window]);

        let err = calibrate(&buf).unwrap_err();
        assert!(matches!(err, CalibrationError::RecordingTooShort { .. }));
    }
}
