//! Dataset persistence with per-session output policy and probabilistic
//! subsampling.
//!
//! One [`DatasetWriter`] serves one input file.  The policy is decided by
//! the file's [`Session`] descriptor:
//!
//! * silence session — every chunk is written once, unmodified, into the
//!   reserved silence class; its own classification is irrelevant because
//!   the recording exists precisely to populate the "no active source"
//!   class;
//! * geometry session — silence-classified chunks are discarded (the
//!   dedicated silence session already covers that class), and each signal
//!   chunk is written [`NCHANNELS`] times: once per rotation offset,
//!   differentially encoded, under that offset's precomputed label
//!   directory.
//!
//! Every individual file write first passes a uniform keep/drop draw from
//! the run-wide RNG, independently per write, so the rotation variants of
//! one chunk survive or vanish independently.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

use crate::audio::segment::{ChunkClass, ClassifiedChunk};
use crate::config::{CHUNK_WORDS, NCHANNELS, SILENCE_CLASS_DIR};
use crate::output::transform::{differential_encode, rotate_channels};
use crate::session::Session;

// ---------------------------------------------------------------------------
// WriteError
// ---------------------------------------------------------------------------

/// Output-tree I/O failures.  Fatal: the destination is broken, not the
/// input corpus, but the run cannot usefully continue either way.
#[derive(Debug, Error)]
pub enum WriteError {
    /// `create_dir_all` on the class directory failed.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Creating or writing a dataset file failed.
    #[error("failed to write dataset file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// DatasetWriter
// ---------------------------------------------------------------------------

/// Persists the output variants of one input file's chunks.
pub struct DatasetWriter {
    out_root: PathBuf,
    /// Source filename stem — the identity prefix of every output file.
    stem: String,
    /// Percentage of candidate writes to drop, `0..=100`.
    drop_percent: u32,
    /// Reused rotation scratch buffer.
    scratch: Vec<i32>,
    files_written: usize,
}

impl DatasetWriter {
    /// Create a writer rooted at `out_root` for chunks of `src_path`.
    pub fn new(out_root: &Path, src_path: &Path, drop_percent: u32) -> DatasetWriter {
        let stem = src_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        DatasetWriter {
            out_root: out_root.to_path_buf(),
            stem,
            drop_percent,
            scratch: vec![0_i32; CHUNK_WORDS],
            files_written: 0,
        }
    }

    /// Number of dataset files actually persisted so far (post-subsampling).
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    /// Apply the session's output policy to one classified chunk.
    ///
    /// Returns `true` when the chunk was accepted for output — even if
    /// every variant was then dropped by subsampling — and `false` when the
    /// policy discarded it (geometry session, silence chunk).
    pub fn write_chunk(
        &mut self,
        session: &Session,
        chunk: &ClassifiedChunk<'_>,
        rng: &mut StdRng,
    ) -> Result<bool, WriteError> {
        match session {
            Session::Silence => {
                // The chunk's own classification doesn't matter here.
                let dir = self.out_root.join(SILENCE_CLASS_DIR);
                if self.save(&dir, chunk.words, chunk.offset, rng)? {
                    self.files_written += 1;
                }
                Ok(true)
            }

            Session::Geometry(geometry) => {
                if chunk.class == ChunkClass::Silence {
                    return Ok(false);
                }

                for k in 0..NCHANNELS {
                    rotate_channels(chunk.words, &mut self.scratch, k);
                    differential_encode(&mut self.scratch);

                    let dir = self.out_root.join(geometry.class_dir(k));
                    if self.save(&dir, &self.scratch, chunk.offset, rng)? {
                        self.files_written += 1;
                    }
                }
                Ok(true)
            }
        }
    }

    /// Subsample, then persist `words` as `{dir}/{stem}_{offset}`.
    ///
    /// Returns `false` when the write was dropped by the subsampling draw.
    /// Directory creation is idempotent; the file is fully written and
    /// closed before returning.
    fn save(
        &self,
        dir: &Path,
        words: &[i32],
        offset: usize,
        rng: &mut StdRng,
    ) -> Result<bool, WriteError> {
        if rng.random_range(0..100_u32) < self.drop_percent {
            return Ok(false);
        }

        std::fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(format!("{}_{}", self.stem, offset));
        let write = |path: &Path| -> std::io::Result<()> {
            let mut f = File::create(path)?;
            f.write_all(bytemuck::cast_slice(words))
        };
        write(&path).map_err(|source| WriteError::WriteFile { path, source })?;

        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Source chunk with channel `c` carrying `10_000 + 100c` in every
    /// frame — loud enough to classify as signal against any small
    /// threshold, distinct per channel.
    fn source_words() -> Vec<i32> {
        let mut v = Vec::with_capacity(CHUNK_WORDS);
        for _ in 0..CHUNK_WORDS / NCHANNELS {
            for c in 0..NCHANNELS as i32 {
                v.push(10_000 + 100 * c);
            }
        }
        v
    }

    fn chunk<'a>(words: &'a [i32], class: ChunkClass) -> ClassifiedChunk<'a> {
        ClassifiedChunk {
            offset: 288_000,
            words,
            class,
        }
    }

    fn geometry_session() -> Session {
        Session::parse("output-05.625deg-0elev-2.0m.raw").unwrap()
    }

    fn read_words(path: &Path) -> Vec<i32> {
        let bytes = std::fs::read(path).unwrap();
        bytes
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes(b.try_into().unwrap()))
            .collect()
    }

    // ---- Geometry session --------------------------------------------------

    #[test]
    fn signal_chunk_yields_one_variant_per_offset() {
        let dir = tempfile::tempdir().unwrap();
        let words = source_words();
        let session = geometry_session();
        let mut rng = StdRng::seed_from_u64(1);
        let mut writer = DatasetWriter::new(
            dir.path(),
            Path::new("output-05.625deg-0elev-2.0m.raw"),
            0, // always keep
        );

        let accepted = writer
            .write_chunk(&session, &chunk(&words, ChunkClass::Signal), &mut rng)
            .unwrap();
        assert!(accepted);
        assert_eq!(writer.files_written(), NCHANNELS);

        for k in 0..NCHANNELS {
            let expected_angle = 5.625 + k as f32 * 45.0;
            let path = dir
                .path()
                .join(format!("{expected_angle:.3}"))
                .join("0.0")
                .join("2.0")
                .join("output-05.625deg-0elev-2.0m_288000");
            assert!(path.is_file(), "missing variant {k}");
        }
    }

    #[test]
    fn variants_are_rotated_then_differential() {
        let dir = tempfile::tempdir().unwrap();
        let words = source_words();
        let session = geometry_session();
        let mut rng = StdRng::seed_from_u64(1);
        let mut writer = DatasetWriter::new(
            dir.path(),
            Path::new("output-05.625deg-0elev-2.0m.raw"),
            0,
        );
        writer
            .write_chunk(&session, &chunk(&words, ChunkClass::Signal), &mut rng)
            .unwrap();

        for k in 0..NCHANNELS {
            let expected_angle = 5.625 + k as f32 * 45.0;
            let path = dir
                .path()
                .join(format!("{expected_angle:.3}"))
                .join("0.0")
                .join("2.0")
                .join("output-05.625deg-0elev-2.0m_288000");
            let out = read_words(&path);
            assert_eq!(out.len(), CHUNK_WORDS);

            // Rotated channel 0 carries source channel (N - k) % N, raw.
            let src0 = 10_000 + 100 * ((NCHANNELS - k) % NCHANNELS) as i32;
            assert_eq!(out[0], src0);

            // Remaining channels are their rotated source minus channel 0.
            for c in 1..NCHANNELS {
                let src = 10_000 + 100 * ((c + NCHANNELS - k) % NCHANNELS) as i32;
                assert_eq!(out[c], src - src0, "offset {k} channel {c}");
            }
        }
    }

    #[test]
    fn silence_chunk_from_geometry_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let words = vec![0_i32; CHUNK_WORDS];
        let session = geometry_session();
        let mut rng = StdRng::seed_from_u64(1);
        let mut writer = DatasetWriter::new(
            dir.path(),
            Path::new("output-05.625deg-0elev-2.0m.raw"),
            0,
        );

        let accepted = writer
            .write_chunk(&session, &chunk(&words, ChunkClass::Silence), &mut rng)
            .unwrap();
        assert!(!accepted);
        assert_eq!(writer.files_written(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    // ---- Silence session ---------------------------------------------------

    #[test]
    fn silence_session_writes_unmodified_regardless_of_class() {
        let dir = tempfile::tempdir().unwrap();
        let words = source_words();
        let mut rng = StdRng::seed_from_u64(1);
        let mut writer =
            DatasetWriter::new(dir.path(), Path::new("output-silence.raw"), 0);

        for class in [ChunkClass::Signal, ChunkClass::Silence] {
            let accepted = writer
                .write_chunk(&Session::Silence, &chunk(&words, class), &mut rng)
                .unwrap();
            assert!(accepted);
        }

        let path = dir
            .path()
            .join(SILENCE_CLASS_DIR)
            .join("output-silence_288000");
        assert_eq!(read_words(&path), words); // no rotation, no differential
    }

    // ---- Subsampling -------------------------------------------------------

    #[test]
    fn full_drop_percent_writes_nothing_but_accepts_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let words = source_words();
        let session = geometry_session();
        let mut rng = StdRng::seed_from_u64(1);
        let mut writer = DatasetWriter::new(
            dir.path(),
            Path::new("output-05.625deg-0elev-2.0m.raw"),
            100,
        );

        let accepted = writer
            .write_chunk(&session, &chunk(&words, ChunkClass::Signal), &mut rng)
            .unwrap();
        assert!(accepted);
        assert_eq!(writer.files_written(), 0);
    }

    #[test]
    fn same_seed_same_keep_drop_sequence() {
        let words = source_words();
        let session = geometry_session();

        let survivors = |seed: u64| -> Vec<String> {
            let dir = tempfile::tempdir().unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut writer = DatasetWriter::new(
                dir.path(),
                Path::new("output-05.625deg-0elev-2.0m.raw"),
                50,
            );
            for offset in 0..4 {
                let c = ClassifiedChunk {
                    offset: offset * CHUNK_WORDS,
                    words: &words,
                    class: ChunkClass::Signal,
                };
                writer.write_chunk(&session, &c, &mut rng).unwrap();
            }
            let mut found = Vec::new();
            collect_files(dir.path(), dir.path(), &mut found);
            found.sort();
            found
        };

        assert_eq!(survivors(99), survivors(99));
    }

    fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            if path.is_dir() {
                collect_files(root, &path, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().display().to_string());
            }
        }
    }
}
