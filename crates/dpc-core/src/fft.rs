//! 1-D and 2-D FFT helpers, plus the fftshift / ifftshift conventions used
//! throughout the estimator and integrator. Mirrors the row-then-column,
//! rayon-gated approach used elsewhere in this crate for 2-D transforms.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rayon::prelude::*;
use rustfft::FftPlanner;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Inverse DFT of a real 1-D signal, normalized by `1/N` (numpy's `ifft` convention).
pub fn ifft_1d(data: &Array1<f64>) -> Array1<Complex64> {
    let n = data.len();
    let mut buf: Vec<Complex64> = data.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut buf);
    let scale = 1.0 / n as f64;
    Array1::from_vec(buf.into_iter().map(|c| c * scale).collect())
}

/// `numpy.fft.fftshift` for a 1-D array: rolls by `n / 2`.
pub fn fftshift_1d(data: &Array1<Complex64>) -> Array1<Complex64> {
    roll_1d(data, data.len() / 2)
}

/// `numpy.fft.ifftshift` for a 1-D array: rolls by `-(n / 2)`.
pub fn ifftshift_1d(data: &Array1<Complex64>) -> Array1<Complex64> {
    let n = data.len();
    roll_1d(data, n - n / 2)
}

fn roll_1d(data: &Array1<Complex64>, shift: usize) -> Array1<Complex64> {
    let n = data.len();
    if n == 0 {
        return data.clone();
    }
    Array1::from_shape_fn(n, |i| data[(i + n - shift % n) % n])
}

/// Forward 2-D FFT of a real array, unnormalized (rustfft convention).
pub fn fft2(data: &Array2<f64>) -> Array2<Complex64> {
    let (h, w) = data.dim();
    let complex = data.mapv(|v| Complex64::new(v, 0.0));
    transform_2d(complex, h, w, true)
}

/// Inverse 2-D FFT, normalized by `1/(h*w)`, returning the full complex result.
pub fn ifft2_complex(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (h, w) = data.dim();
    let result = transform_2d(data.clone(), h, w, false);
    let scale = 1.0 / (h * w) as f64;
    result.mapv(|c| c * scale)
}

fn transform_2d(mut data: Array2<Complex64>, h: usize, w: usize, forward: bool) -> Array2<Complex64> {
    let mut planner = FftPlanner::new();
    let row_plan = if forward {
        planner.plan_fft_forward(w)
    } else {
        planner.plan_fft_inverse(w)
    };
    let col_plan = if forward {
        planner.plan_fft_forward(h)
    } else {
        planner.plan_fft_inverse(h)
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let processed_rows: Vec<Vec<Complex64>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut row_data: Vec<Complex64> = (0..w).map(|c| data[[row, c]]).collect();
                row_plan.process(&mut row_data);
                row_data
            })
            .collect();
        for (row, row_data) in processed_rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }

        let processed_cols: Vec<Vec<Complex64>> = (0..w)
            .into_par_iter()
            .map(|col| {
                let mut col_data: Vec<Complex64> = (0..h).map(|r| data[[r, col]]).collect();
                col_plan.process(&mut col_data);
                col_data
            })
            .collect();
        for (col, col_data) in processed_cols.into_iter().enumerate() {
            for (row, val) in col_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    } else {
        for row in 0..h {
            let mut row_data: Vec<Complex64> = (0..w).map(|c| data[[row, c]]).collect();
            row_plan.process(&mut row_data);
            for (col, val) in row_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
        for col in 0..w {
            let mut col_data: Vec<Complex64> = (0..h).map(|r| data[[r, col]]).collect();
            col_plan.process(&mut col_data);
            for (row, val) in col_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    }

    data
}

/// `numpy.fft.fftshift` for a 2-D array (both axes rolled by `dim / 2`).
pub fn fftshift2(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (h, w) = data.dim();
    let (sh, sw) = (h / 2, w / 2);
    Array2::from_shape_fn((h, w), |(r, c)| data[[(r + h - sh) % h, (c + w - sw) % w]])
}

/// `numpy.fft.ifftshift` for a 2-D array.
pub fn ifftshift2(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (h, w) = data.dim();
    let (sh, sw) = (h - h / 2, w - w / 2);
    Array2::from_shape_fn((h, w), |(r, c)| data[[(r + h - sh) % h, (c + w - sw) % w]])
}
