//! Pure chunk transforms: channel rotation and differential encoding.
//!
//! The physical rig only records source angles inside the sector between
//! two adjacent microphones.  Rotating the channel assignment relabels the
//! same capture as if it had been taken from every adjacent microphone
//! pair, multiplying the usable training angles by the channel count from
//! one physical session.
//!
//! Differential encoding then subtracts the (rotated) channel-0 word from
//! every other channel at each frame.  Channel 0 keeps its raw waveform —
//! the network needs its amplitude to detect silence — while the remaining
//! channels carry only the inter-channel (delay-bearing) difference that
//! encodes direction.

use crate::config::NCHANNELS;

/// Rotate the channel assignment of `src` by `offset` into `dst`.
///
/// Frame-wise: destination channel `(c + offset) % NCHANNELS` receives the
/// word originally on channel `c`.  A bijection on channel indices for
/// every offset.
///
/// # Panics
///
/// Panics if the slices differ in length or are not a whole number of
/// frames.
pub fn rotate_channels(src: &[i32], dst: &mut [i32], offset: usize) {
    assert_eq!(src.len(), dst.len());
    assert_eq!(src.len() % NCHANNELS, 0);

    for (src_frame, dst_frame) in src.chunks_exact(NCHANNELS).zip(dst.chunks_exact_mut(NCHANNELS))
    {
        for (c, &word) in src_frame.iter().enumerate() {
            dst_frame[(c + offset) % NCHANNELS] = word;
        }
    }
}

/// Differentially encode `chunk` in place: subtract channel 0 from
/// channels `1..NCHANNELS` at every frame, leaving channel 0 raw.
///
/// Not idempotent — channels ≠ 0 lose their absolute values after one
/// pass.  Decode with `raw[c] = diff[c] + raw[0]`.
///
/// # Panics
///
/// Panics if `chunk` is not a whole number of frames.
pub fn differential_encode(chunk: &mut [i32]) {
    assert_eq!(chunk.len() % NCHANNELS, 0);

    for frame in chunk.chunks_exact_mut(NCHANNELS) {
        let base = frame[0];
        for word in &mut frame[1..] {
            // Wrapping keeps extreme-amplitude frames well-defined; decode
            // wraps back symmetrically.
            *word = word.wrapping_sub(base);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
