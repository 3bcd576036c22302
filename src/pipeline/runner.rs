//! Sequential per-file processing pass and input discovery.
//!
//! One file at a time: open the mapped buffer, calibrate the noise floor,
//! walk the chunks, hand each to the writer.  Nothing overlaps — no file
//! is opened before the previous one is fully processed, and no chunk is
//! written before the previous write returns.
//!
//! A failure on any file aborts the whole run.  A malformed input is a
//! corpus-integrity problem the operator must fix; skipping it would
//! silently bias the dataset.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::audio::{calibrate, BufferError, CalibrationError, ChunkIter, SampleBuffer};
use crate::config::CHUNK_WORDS;
use crate::output::{DatasetWriter, WriteError};
use crate::session::{Session, SessionError};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Any failure that aborts a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input directory could not be read.
    #[error("failed to read input directory {path}: {source}")]
    Discover {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A filename is not valid UTF-8 and cannot match either shape.
    #[error("{0:?} is not a valid UTF-8 filename")]
    NonUtf8Name(PathBuf),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

// ---------------------------------------------------------------------------
// Run entry point
// ---------------------------------------------------------------------------

/// Totals for one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Input files processed.
    pub files: usize,
    /// Chunks accepted for output across all files (before subsampling).
    pub chunks_accepted: usize,
    /// Dataset files actually persisted (after subsampling).
    pub files_written: usize,
}

/// Process every recording in `input_dir` into the dataset tree under
/// `output_dir`.
///
/// `seed` initialises the single run-wide subsampling RNG; `drop_percent`
/// is the per-write drop probability in percent.  Two runs with the same
/// seed over the same corpus produce byte-identical output sets.
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    seed: u64,
    drop_percent: u32,
) -> Result<RunSummary, PipelineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut summary = RunSummary {
        files: 0,
        chunks_accepted: 0,
        files_written: 0,
    };

    for path in discover(input_dir)? {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PipelineError::NonUtf8Name(path.clone()))?;
        let session = Session::parse(filename)?;

        let stats = process_file(&path, &session, output_dir, drop_percent, &mut rng)?;
        summary.files += 1;
        summary.chunks_accepted += stats.chunks_accepted;
        summary.files_written += stats.files_written;
    }

    Ok(summary)
}

/// Collect the regular files of `input_dir`, sorted by name.
///
/// Subdirectories are ignored; every file found must later parse as a
/// [`Session`].  Sorting keeps the processing order — and with it the RNG
/// draw sequence — deterministic for a given corpus and seed.
pub fn discover(input_dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let entries = std::fs::read_dir(input_dir).map_err(|source| PipelineError::Discover {
        path: input_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::Discover {
            path: input_dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Per-file pass
// ---------------------------------------------------------------------------

struct FileStats {
    chunks_accepted: usize,
    files_written: usize,
}

/// Calibrate and segment one recording, writing its surviving chunks.
fn process_file(
    path: &Path,
    session: &Session,
    output_dir: &Path,
    drop_percent: u32,
    rng: &mut StdRng,
) -> Result<FileStats, PipelineError> {
    log::info!("Processing {} ...", path.display());

    let buf = SampleBuffer::open(path)?;
    let cal = calibrate(&buf)?;

    log::debug!("    max silence sample: {:#x}", cal.peak);
    log::debug!("    silence threshold:  {}", cal.threshold);
    log::debug!("    data scan index:    {}", cal.data_start);

    let mut writer = DatasetWriter::new(output_dir, path, drop_percent);
    let mut chunks_accepted = 0_usize;

    for chunk in ChunkIter::new(&buf, &cal) {
        if writer.write_chunk(session, &chunk, rng)? {
            chunks_accepted += 1;
        }
    }

    let coverage = if buf.len() > 0 {
        chunks_accepted * CHUNK_WORDS * 100 / buf.len()
    } else {
        0
    };
    log::info!(
        "    chunks accepted: {chunks_accepted} ({coverage}% of the recording), \
         files written: {}",
        writer.files_written()
    );

    Ok(FileStats {
        chunks_accepted,
        files_written: writer.files_written(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
