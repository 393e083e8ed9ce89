//! Scan Orchestrator (component D): enumerates the scan grid tile by tile,
//! dispatches per-cell estimation to a worker pool, applies mosaic/pyramid/
//! swap placement, drives the live-update callback, and hands the finished
//! gradient grids to the integrator.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ndarray::Array2;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::beta::BetaCache;
use crate::config::RunConfig;
use crate::consts::SENTINEL_SHAPE_MISMATCH;
use crate::error::{DpcError, Result};
use crate::estimator::{estimate_frame, EstimatorParams};
use crate::integrator::integrate_phase;
use crate::io::FrameSource;
use crate::pool::WorkerPool;
use crate::preprocess::{preprocess, Projections};
use crate::results::{ResultGrids, ResultSnapshot};

/// Five converted per-cell values, already placed at their storage
/// coordinate (pyramid/swap resolved) and ready for `ResultGrids::write_cell`.
struct CellValues {
    a: f64,
    gx: f64,
    gy: f64,
    rx: f64,
    ry: f64,
}

impl CellValues {
    fn zero() -> Self {
        CellValues { a: 0.0, gx: 0.0, gy: 0.0, rx: 0.0, ry: 0.0 }
    }

    fn sentinel() -> Self {
        CellValues {
            a: SENTINEL_SHAPE_MISMATCH,
            gx: SENTINEL_SHAPE_MISMATCH,
            gy: SENTINEL_SHAPE_MISMATCH,
            rx: SENTINEL_SHAPE_MISMATCH,
            ry: SENTINEL_SHAPE_MISMATCH,
        }
    }
}

struct CellJobResult {
    store_row: usize,
    store_col: usize,
    values: CellValues,
}

/// Final product of a completed (non-cancelled) run.
pub struct RunOutcome {
    pub a: Array2<f64>,
    pub gx: Array2<f64>,
    pub gy: Array2<f64>,
    pub rx: Array2<f64>,
    pub ry: Array2<f64>,
    pub phi: Option<Array2<f64>>,
    pub cancelled: bool,
}

/// Run one full reconstruction. `cancel` is polled cooperatively between
/// tiles and while waiting on in-flight results; `on_update`, if present, is
/// invoked with a read-only snapshot no more often than
/// `config.live_update_interval_ms`.
pub fn run(
    config: &RunConfig,
    source: Arc<dyn FrameSource>,
    cancel: &AtomicBool,
    mut on_update: Option<&mut dyn FnMut(&ResultSnapshot)>,
) -> Result<RunOutcome> {
    config.validate()?;
    info!(
        rows = config.rows,
        cols = config.cols,
        workers = config.workers,
        solver = ?config.solver,
        "starting dpc run"
    );

    let raw_ref = source
        .load_reference()
        .map_err(|e| DpcError::ConfigInvalid(format!("reference frame unavailable: {e}")))?;
    let (ref_cropped, ref_proj) = preprocess(&raw_ref, config.roi, &config.bad_pixels);
    let ref_shape = ref_cropped.dim();
    let ref_proj = Arc::new(ref_proj);

    let gx_factor = config.g_factor(ref_proj.fx.len());
    let gy_factor = config.g_factor(ref_proj.fy.len());

    let grids = ResultGrids::new(config.rows, config.cols);
    let beta_cache = Arc::new(BetaCache::new());
    let params = EstimatorParams {
        start_point: config.start_point,
        tol: config.solver_tol,
        max_iters: config.max_iters,
        reverse_x: config.reverse_x,
        reverse_y: config.reverse_y,
    };

    let pool: WorkerPool<CellJobResult> = WorkerPool::new(config.workers);
    let mrows = config.rows / config.mosaic_y;
    let mcols = config.cols / config.mosaic_x;

    let mut cancelled = false;
    let mut rng = rand::rng();

    'tiles: for tile_row in 0..config.mosaic_y {
        for tile_col in 0..config.mosaic_x {
            if cancel.load(Ordering::SeqCst) {
                cancelled = true;
                break 'tiles;
            }

            let mut cells: Vec<(usize, usize)> = (0..mrows)
                .flat_map(|ti| (0..mcols).map(move |tj| (ti, tj)))
                .collect();
            if on_update.is_some() && config.randomize_preview_order {
                cells.shuffle(&mut rng);
            }

            for (ti, tj) in &cells {
                let (ti, tj) = (*ti, *tj);
                let row = tile_row * mrows + ti;
                let col = tile_col * mcols + tj;

                let store_col = if config.pyramid && ti % 2 == 1 {
                    tile_col * mcols + (mcols - tj - 1)
                } else {
                    col
                };

                let source = source.clone();
                let ref_proj = ref_proj.clone();
                let beta_cache = beta_cache.clone();
                let roi = config.roi;
                let bad_pixels = config.bad_pixels.clone();
                let swap = config.swap;

                pool.submit(move || {
                    let values = match source.load_cell(row, col) {
                        Err(e) => {
                            warn!(row, col, error = %e, "frame unavailable");
                            CellValues::zero()
                        }
                        Ok(frame) => {
                            let (cropped, proj) = preprocess(&frame, roi, &bad_pixels);
                            if cropped.dim() != ref_shape {
                                warn!(row, col, "frame shape mismatch");
                                CellValues::sentinel()
                            } else {
                                let fit = estimate_frame(&beta_cache, &ref_proj, &proj, &params);
                                let (gx, gy) = if swap {
                                    (fit.gy * gy_factor, fit.gx * gx_factor)
                                } else {
                                    (fit.gx * gx_factor, fit.gy * gy_factor)
                                };
                                CellValues { a: fit.a, gx, gy, rx: fit.rx, ry: fit.ry }
                            }
                        }
                    };
                    CellJobResult { store_row: row, store_col, values }
                });
            }

            let mut remaining = cells.len();
            let mut last_emit = Instant::now();
            while remaining > 0 {
                if cancel.load(Ordering::SeqCst) {
                    cancelled = true;
                    break;
                }
                if let Some(result) = pool.recv_timeout(Duration::from_millis(50)) {
                    let v = &result.values;
                    grids.write_cell(result.store_row, result.store_col, v.a, v.gx, v.gy, v.rx, v.ry);
                    remaining -= 1;
                }
                if let Some(cb) = on_update.as_deref_mut() {
                    if last_emit.elapsed() >= Duration::from_millis(config.live_update_interval_ms) {
                        let snap = grids.snapshot();
                        if catch_unwind(AssertUnwindSafe(|| cb(&snap))).is_err() {
                            warn!("live-update callback panicked, ignoring");
                        }
                        last_emit = Instant::now();
                    }
                }
            }
            debug!(tile_row, tile_col, "tile complete");
            if cancelled {
                break 'tiles;
            }
        }
    }

    if cancelled {
        info!("run cancelled, shutting down pool");
        pool.shutdown();
        let (a, gx, gy, rx, ry, _) = grids.into_grids();
        return Ok(RunOutcome { a, gx, gy, rx, ry, phi: None, cancelled: true });
    }

    pool.shutdown();

    if config.rows > 1 && config.cols > 1 {
        let pad = if config.pad { 3 } else { 1 };
        let phi = integrate_phase(&grids.gx_ref(), &grids.gy_ref(), config.dx, config.dy, pad, config.gradient_weight);
        grids.set_phi(phi);
    }

    info!("run complete");
    let (a, gx, gy, rx, ry, phi) = grids.into_grids();
    Ok(RunOutcome { a, gx, gy, rx, ry, phi, cancelled: false })
}
