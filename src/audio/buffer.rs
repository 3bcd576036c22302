//! Read-only memory-mapped view over a raw S32LE recording file.
//!
//! A recording is a single flat file of interleaved signed 32-bit
//! little-endian words.  [`SampleBuffer::open`] maps the file shared and
//! read-only and exposes it as a `&[i32]` slice, truncated to a whole
//! number of words.  The mapping is released when the buffer is dropped.
//!
//! Because the mapped bytes are reinterpreted in place as host-order `i32`
//! words, big-endian hosts are rejected at open time.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};
use thiserror::Error;

use crate::config::SAMPLE_WIDTH;

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// All errors that can arise from opening a recording file.
///
/// Every variant reflects an operator error (bad path, unsupported host,
/// truncated copy); none is retryable, so they all abort the run.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The file could not be opened for reading.
    #[error("failed to open recording {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file metadata could not be read.
    #[error("failed to stat recording {path}: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The read-only mapping failed (includes zero-length recordings).
    #[error("failed to map recording {path}: {source}")]
    Map {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The words view assumes little-endian sample memory.
    #[error("big-endian hosts are not supported")]
    UnsupportedByteOrder,
}

// ---------------------------------------------------------------------------
// SampleBuffer
// ---------------------------------------------------------------------------

/// Immutable sequence of interleaved S32LE samples backed by a shared
/// read-only file mapping.
///
/// The usable length is `file_size - (file_size % 4)` bytes; a trailing
/// partial word (from an interrupted recording) is silently ignored.
#[derive(Debug)]
pub struct SampleBuffer {
    map: Mmap,
    /// Usable length in words.
    len: usize,
}

impl SampleBuffer {
    /// Map `path` read-only and advise the OS of sequential access.
    ///
    /// Fails when the file cannot be opened, stat'ed or mapped, or when the
    /// host is big-endian.  All failures are fatal to the run.
    pub fn open(path: &Path) -> Result<SampleBuffer, BufferError> {
        if cfg!(target_endian = "big") {
            return Err(BufferError::UnsupportedByteOrder);
        }

        let file = File::open(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let file_size = file
            .metadata()
            .map_err(|source| BufferError::Stat {
                path: path.to_path_buf(),
                source,
            })?
            .len() as usize;

        let usable = file_size - (file_size % SAMPLE_WIDTH);

        // Mapping zero bytes is an OS-level error; let it surface as Map.
        let map = unsafe {
            MmapOptions::new()
                .len(usable)
                .map(&file)
                .map_err(|source| BufferError::Map {
                    path: path.to_path_buf(),
                    source,
                })?
        };

        #[cfg(unix)]
        let _ = map.advise(memmap2::Advice::Sequential);

        Ok(SampleBuffer {
            map,
            len: usable / SAMPLE_WIDTH,
        })
    }

    /// Total number of usable words.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the buffer holds no complete word.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The whole buffer as a word slice.  Zero-copy: the slice points into
    /// the mapping (page-aligned, so the cast is always valid).
    pub fn words(&self) -> &[i32] {
        bytemuck::cast_slice(&self.map[..self.len * SAMPLE_WIDTH])
    }

    /// Bounds-checked single-word read.
    pub fn get(&self, idx: usize) -> Option<i32> {
        self.words().get(idx).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
