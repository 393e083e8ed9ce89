use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_LIVE_UPDATE_INTERVAL_MS, DEFAULT_MAX_ITERS, DEFAULT_SOLVER_TOL, DEFAULT_START_POINT,
    ENERGY_WAVELENGTH_CONST,
};
use crate::error::{DpcError, Result};
use crate::types::Roi;

/// Immutable record describing one reconstruction run. Created before any
/// worker runs and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default = "one")]
    pub mosaic_x: usize,
    #[serde(default = "one")]
    pub mosaic_y: usize,

    /// Detector pixel pitch, micron.
    pub pixel_size: f64,
    /// Focus-to-detector distance, micron.
    pub focus_to_det: f64,
    /// Scan step size, x axis, micron.
    pub dx: f64,
    /// Scan step size, y axis, micron.
    pub dy: f64,
    /// Photon energy, keV.
    pub energy: f64,

    #[serde(default)]
    pub roi: Option<Roi>,
    #[serde(default)]
    pub bad_pixels: Vec<(u32, u32)>,

    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    #[serde(default = "default_start_point")]
    pub start_point: [f64; 2],
    #[serde(default = "default_solver_tol")]
    pub solver_tol: f64,
    /// Which fitting algorithm to run. Nelder-Mead is the only
    /// implementation today; the field exists so the config surface's shape
    /// matches spec even before an alternative solver is added.
    #[serde(default)]
    pub solver: Solver,

    #[serde(default = "one_f64")]
    pub reverse_x: f64,
    #[serde(default = "one_f64")]
    pub reverse_y: f64,
    #[serde(default)]
    pub swap: bool,
    #[serde(default)]
    pub pyramid: bool,

    #[serde(default = "one")]
    pub workers: usize,
    #[serde(default)]
    pub pad: bool,
    #[serde(default = "one_f64")]
    pub gradient_weight: f64,

    /// Shuffle cell dispatch order within a tile when a live-update sink is
    /// attached (mirrors the reference implementation's `random` flag).
    #[serde(default)]
    pub randomize_preview_order: bool,
    #[serde(default = "default_live_update_interval_ms")]
    pub live_update_interval_ms: u64,

    /// Batch-layer configuration the core round-trips but never reads.
    #[serde(default)]
    pub batch: BatchHints,
}

fn one() -> usize {
    1
}
fn one_f64() -> f64 {
    1.0
}
fn default_max_iters() -> usize {
    DEFAULT_MAX_ITERS
}
fn default_start_point() -> [f64; 2] {
    DEFAULT_START_POINT
}
fn default_solver_tol() -> f64 {
    DEFAULT_SOLVER_TOL
}
fn default_live_update_interval_ms() -> u64 {
    DEFAULT_LIVE_UPDATE_INTERVAL_MS
}

/// Solver choice (spec's Run configuration record). Nelder-Mead is the
/// reference implementation; alternatives may be added as further variants
/// without changing the shape of `RunConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    NelderMead,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::NelderMead
    }
}

impl Default for RunConfig {
    /// A template configuration meant to be edited, not run as-is: `rows`
    /// and `cols` are left at 1 so `validate()` still passes on an untouched
    /// default.
    fn default() -> Self {
        RunConfig {
            rows: 1,
            cols: 1,
            mosaic_x: 1,
            mosaic_y: 1,
            pixel_size: 55.0,
            focus_to_det: 1.46,
            dx: 0.1,
            dy: 0.1,
            energy: 19.5,
            roi: None,
            bad_pixels: vec![],
            max_iters: default_max_iters(),
            start_point: default_start_point(),
            solver_tol: default_solver_tol(),
            solver: Solver::default(),
            reverse_x: 1.0,
            reverse_y: 1.0,
            swap: false,
            pyramid: false,
            workers: 1,
            pad: false,
            gradient_weight: 1.0,
            randomize_preview_order: false,
            live_update_interval_ms: default_live_update_interval_ms(),
            batch: BatchHints::default(),
        }
    }
}

impl RunConfig {
    /// Fatal, pre-dispatch validation: mosaic shape must divide the grid
    /// shape, and the ROI (if any) must be well-formed.
    pub fn validate(&self) -> Result<()> {
        if self.mosaic_y == 0 || self.mosaic_x == 0 {
            return Err(DpcError::ConfigInvalid("mosaic shape must be nonzero".into()));
        }
        if self.rows % self.mosaic_y != 0 || self.cols % self.mosaic_x != 0 {
            return Err(DpcError::ConfigInvalid(format!(
                "mosaic shape ({}, {}) does not divide grid shape ({}, {})",
                self.mosaic_x, self.mosaic_y, self.cols, self.rows
            )));
        }
        if let Some(roi) = self.roi {
            roi.validated()?;
        }
        Ok(())
    }

    /// g_factor = N_axis * pixel_size / (lambda * focus_to_det * 1e6),
    /// lambda = 12.4e-4 / energy. Converts a fitted Fourier-ramp shift into
    /// reciprocal micrometers.
    pub fn g_factor(&self, axis_len: usize) -> f64 {
        let lambda = ENERGY_WAVELENGTH_CONST / self.energy;
        axis_len as f64 * self.pixel_size / (lambda * self.focus_to_det * 1e6)
    }
}

/// Configuration keys that live at the batch-script layer only (spec's Open
/// Question iii): the core accepts and round-trips them through config
/// files for caller convenience, but never reads or acts on them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BatchHints {
    pub scan_range: Option<(usize, usize)>,
    pub every_nth_scan: Option<usize>,
    #[serde(default)]
    pub get_data_from_datastore: bool,
    pub file_store_key: Option<String>,
    pub data_directory: Option<PathBuf>,
    pub file_format: Option<String>,
    pub parameter_file: Option<PathBuf>,
    #[serde(default)]
    pub read_params_from_datastore: bool,
    pub processes: Option<usize>,
    pub save_path: Option<PathBuf>,
    pub save_filename: Option<String>,
    #[serde(default)]
    pub save_pngs: bool,
    #[serde(default)]
    pub save_txt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> RunConfig {
        RunConfig {
            rows: 4,
            cols: 6,
            mosaic_x: 1,
            mosaic_y: 1,
            pixel_size: 55.0,
            focus_to_det: 1.46,
            dx: 0.1,
            dy: 0.1,
            energy: 19.5,
            roi: None,
            bad_pixels: vec![],
            max_iters: 1000,
            start_point: [1.0, 0.0],
            solver_tol: 1e-6,
            solver: Solver::NelderMead,
            reverse_x: 1.0,
            reverse_y: 1.0,
            swap: false,
            pyramid: false,
            workers: 2,
            pad: false,
            gradient_weight: 1.0,
            randomize_preview_order: false,
            live_update_interval_ms: 1000,
            batch: BatchHints::default(),
        }
    }

    #[test]
    fn rejects_mosaic_not_dividing_grid() {
        let mut cfg = base_config();
        cfg.mosaic_x = 4;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn accepts_divisor_mosaic() {
        let mut cfg = base_config();
        cfg.mosaic_x = 2;
        cfg.mosaic_y = 2;
        cfg.rows = 4;
        cfg.cols = 4;
        assert!(cfg.validate().is_ok());
    }
}
