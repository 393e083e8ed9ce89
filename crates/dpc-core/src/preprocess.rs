//! Frame Preprocessor: bad-pixel masking, ROI crop, and the row/column
//! projections whose centered inverse-DFTs feed the Fourier-shift estimator.

use ndarray::{s, Array1, Array2, Axis};
use num_complex::Complex64;

use crate::fft::{fftshift_1d, ifft_1d};
use crate::types::Roi;

/// Centered inverse-DFT projections of a preprocessed frame.
#[derive(Clone, Debug)]
pub struct Projections {
    pub fx: Array1<Complex64>,
    pub fy: Array1<Complex64>,
}

/// Zero bad pixels, crop to the ROI, and compute the projections.
///
/// `bad_pixels` coordinates are `(x, y)` and index the uncropped frame,
/// as required by the data model.
pub fn preprocess(raw: &Array2<u32>, roi: Option<Roi>, bad_pixels: &[(u32, u32)]) -> (Array2<f64>, Projections) {
    let mut img = raw.mapv(|v| v as f64);

    for &(x, y) in bad_pixels {
        let (x, y) = (x as usize, y as usize);
        if y < img.nrows() && x < img.ncols() {
            img[[y, x]] = 0.0;
        }
    }

    let cropped = match roi {
        Some(roi) => img
            .slice(s![roi.y1..=roi.y2, roi.x1..=roi.x2])
            .to_owned(),
        None => img,
    };

    let xline = cropped.sum_axis(Axis(0));
    let yline = cropped.sum_axis(Axis(1));

    let fx = fftshift_1d(&ifft_1d(&xline));
    let fy = fftshift_1d(&ifft_1d(&yline));

    (cropped, Projections { fx, fy })
}
