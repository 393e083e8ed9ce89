/// Minimum pixel count (h*w) to use row-level Rayon parallelism in FFT passes.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default Nelder-Mead iteration cap, matching the reference solver's default.
pub const DEFAULT_MAX_ITERS: usize = 1000;

/// Default Nelder-Mead convergence tolerance (applied to both function and vertex spread).
pub const DEFAULT_SOLVER_TOL: f64 = 1e-6;

/// Default simplex starting point (amplitude = 1, shift = 0).
pub const DEFAULT_START_POINT: [f64; 2] = [1.0, 0.0];

/// Sentinel value written to all five per-cell grids on a shape mismatch.
pub const SENTINEL_SHAPE_MISMATCH: f64 = 1e-5;

/// Polling interval for "hang" (wait-for-file) frame sources.
pub const FILE_POLL_INTERVAL_MS: u64 = 100;

/// Default interval between live-update snapshots.
pub const DEFAULT_LIVE_UPDATE_INTERVAL_MS: u64 = 1000;

/// Wavelength conversion constant: lambda (micron) = ENERGY_WAVELENGTH_CONST / energy (keV).
pub const ENERGY_WAVELENGTH_CONST: f64 = 12.4e-4;
