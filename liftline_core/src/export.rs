//! # Stage Dumps
//!
//! Optional hook for capturing intermediate pipeline output. A front end or
//! test installs a [`StageSink`] on the session; after each pipeline stage
//! the engine hands the sink a tab-separated text block of that stage's
//! arrays. Without a sink the pipeline produces no diagnostic output and
//! touches no fixed filesystem paths.

use std::fs;
use std::path::PathBuf;

use crate::errors::{WingError, WingResult};

/// Identifies which pipeline stage a dump belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Accepted run parameters
    Parameters,
    /// Angle-of-attack sweep values (deg, rad)
    AngleSweep,
    /// Interpolated semi-span stations
    Interpolated,
    /// Mirrored full-span stations with phi and mu
    FullSpan,
    /// Coefficient matrix rows, keyed by control-station span
    EquationsLhs,
    /// Right-hand sides, one column per angle of attack
    EquationsRhs,
    /// Solved Fourier coefficients, one column per angle of attack
    FourierTerms,
}

impl PipelineStage {
    /// Short lowercase name, usable as a file stem.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Parameters => "parameters",
            PipelineStage::AngleSweep => "aoa",
            PipelineStage::Interpolated => "interpolated",
            PipelineStage::FullSpan => "fullspan",
            PipelineStage::EquationsLhs => "lhs",
            PipelineStage::EquationsRhs => "rhs",
            PipelineStage::FourierTerms => "terms",
        }
    }
}

/// Receiver for per-stage diagnostic dumps.
pub trait StageSink {
    /// Called once per stage per computation run.
    fn write_stage(&mut self, stage: PipelineStage, contents: &str);
}

/// A [`StageSink`] that writes each stage into `<dir>/<stage>.txt`.
///
/// Write failures are collected instead of aborting the computation; the
/// caller can inspect them after the run.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    errors: Vec<WingError>,
}

impl DirectorySink {
    /// Create a sink rooted at `dir`, creating the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> WingResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            WingError::file_error("create dump dir", dir.display().to_string(), e.to_string())
        })?;
        Ok(DirectorySink {
            dir,
            errors: Vec::new(),
        })
    }

    /// Errors collected from failed stage writes.
    pub fn errors(&self) -> &[WingError] {
        &self.errors
    }
}

impl StageSink for DirectorySink {
    fn write_stage(&mut self, stage: PipelineStage, contents: &str) {
        let path = self.dir.join(format!("{}.txt", stage.name()));
        if let Err(e) = fs::write(&path, contents) {
            self.errors.push(WingError::file_error(
                "write stage dump",
                path.display().to_string(),
                e.to_string(),
            ));
        }
    }
}
