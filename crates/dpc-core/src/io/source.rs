use std::fmt;

use ndarray::Array2;

/// Loader-side failure for a single coordinate. Both variants carry the
/// same orchestrator policy (record zero and continue) — see
/// `orchestrator::CellOutcome`.
#[derive(Debug, Clone)]
pub enum LoadError {
    /// The coordinate could not be resolved to any frame.
    NotFound,
    /// The coordinate resolved, but decoding the frame raised.
    Decode(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "frame not found"),
            LoadError::Decode(msg) => write!(f, "frame decode failed: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Resolves a scan-grid coordinate, or the designated reference position,
/// to a 2-D unsigned-integer pixel array. Three reference implementations
/// are provided: file-per-frame, single in-memory 3-D stack, and
/// opaque-identifier catalog lookup.
pub trait FrameSource: Send + Sync {
    /// Load the frame at grid coordinate `(row, col)`.
    fn load_cell(&self, row: usize, col: usize) -> Result<Array2<u32>, LoadError>;

    /// Load the designated reference frame (outside the scan grid in
    /// general — e.g. a path or index configured independently of rows/cols).
    fn load_reference(&self) -> Result<Array2<u32>, LoadError>;
}
