//! Recording-session descriptors parsed from filenames.
//!
//! The collection rig encodes each recording's physical geometry in its
//! filename; the filename *is* the schema.  Two shapes are recognised:
//!
//! * geometry form — `output-{angle}deg-{elev}elev-{distance}m.raw`,
//!   e.g. `output-05.625deg-0elev-1.0m.raw`;
//! * silence form — `output-silence*.raw`, the dedicated recording used to
//!   populate the "no active source" class.
//!
//! Anything else is a corpus-integrity error: upstream collection tooling
//! guarantees the naming, so a mismatch aborts the run instead of being
//! skipped.
//!
//! For the geometry form the per-channel output-path prefixes are computed
//! once here and reused for every chunk of the file (§ channel rotation in
//! [`crate::output`]).

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config::{NCHANNELS, SILENCE_CLASS_DIR};

// ---------------------------------------------------------------------------
// Filename patterns
// ---------------------------------------------------------------------------

/// Geometry form: literal prefix, float angle, `deg-`, integer elevation,
/// `elev-`, float distance, `m`, extension.
static GEOMETRY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^output-([0-9]+(?:\.[0-9]+)?)deg-([0-9]+)elev-([0-9]+(?:\.[0-9]+)?)m\.raw$")
        .unwrap()
});

/// Silence form: no embedded fields; the suffix after the literal prefix is
/// free-form so several takes (`output-silence-2.raw` …) land in the same
/// class.
static SILENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^output-silence.*\.raw$").unwrap());

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors from descriptor parsing.  Both are fatal to the run.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The filename matches neither recognised shape.
    #[error("{0:?} is not a recognised recording filename")]
    UnrecognizedName(String),

    /// A geometry label collides with the reserved silence class directory.
    #[error("geometry label for {0:?} collides with the silence output class")]
    SilenceClassCollision(String),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Descriptor for one recording file.
///
/// Closed variant set — exactly one of the two shapes holds, decided once
/// per file at parse time.
#[derive(Debug, Clone)]
pub enum Session {
    /// The dedicated silence recording; no geometry applies.
    Silence,
    /// A recording tagged with angle/elevation/distance.
    Geometry(Geometry),
}

/// Geometry parameters of a recording session, plus the precomputed output
/// class directory for every channel-rotation offset.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Source angle between microphone 0 and 1, in degrees.
    pub sub_angle: f32,
    /// Source elevation in metres.  Captured as an integer field but stored
    /// as a float for uniform label formatting.
    pub elevation: f32,
    /// Source distance in metres.
    pub distance: f32,
    /// `{angle}/{elevation}/{distance}` path prefix per channel offset.
    class_dirs: [PathBuf; NCHANNELS],
}

impl Geometry {
    /// Relative output directory for rotation offset `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= NCHANNELS`.
    pub fn class_dir(&self, k: usize) -> &Path {
        &self.class_dirs[k]
    }

    /// Label angle for rotation offset `k`:
    /// `(sub_angle + k × 360/NCHANNELS) mod 360`.
    pub fn label_angle(&self, k: usize) -> f32 {
        (self.sub_angle + k as f32 * (360.0 / NCHANNELS as f32)) % 360.0
    }
}

impl Session {
    /// Parse a recording filename into a descriptor.
    ///
    /// The silence form is checked first; a name matching neither shape is
    /// fatal.  For the geometry form all three numeric fields must parse,
    /// and the derived labels are checked once against the reserved silence
    /// class directory.
    pub fn parse(filename: &str) -> Result<Session, SessionError> {
        if SILENCE_PATTERN.is_match(filename) {
            return Ok(Session::Silence);
        }

        let caps = GEOMETRY_PATTERN
            .captures(filename)
            .ok_or_else(|| SessionError::UnrecognizedName(filename.to_string()))?;

        // The pattern only admits digit runs, so the field parses cannot
        // fail; map errors anyway rather than unwrap.
        let parse = |i: usize| -> Result<f32, SessionError> {
            caps[i]
                .parse::<f32>()
                .map_err(|_| SessionError::UnrecognizedName(filename.to_string()))
        };
        let sub_angle = parse(1)?;
        let elevation = caps[2]
            .parse::<i64>()
            .map_err(|_| SessionError::UnrecognizedName(filename.to_string()))?
            as f32;
        let distance = parse(3)?;

        let mut geometry = Geometry {
            sub_angle,
            elevation,
            distance,
            class_dirs: std::array::from_fn(|_| PathBuf::new()),
        };

        for k in 0..NCHANNELS {
            let dir = PathBuf::from(format!("{:.3}", geometry.label_angle(k)))
                .join(format!("{:.1}", geometry.elevation))
                .join(format!("{:.1}", geometry.distance));
            if dir.starts_with(SILENCE_CLASS_DIR) {
                return Err(SessionError::SilenceClassCollision(filename.to_string()));
            }
            geometry.class_dirs[k] = dir;
        }

        Ok(Session::Geometry(geometry))
    }

    /// Returns `true` for the dedicated silence session.
    pub fn is_silence(&self) -> bool {
        matches!(self, Session::Silence)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
