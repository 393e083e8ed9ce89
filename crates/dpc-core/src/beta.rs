//! Read-mostly cache of the beta vector keyed by projection length. A
//! concurrent map with a brief write lock on insert; a stale double-compute
//! on a cache miss race is harmless since beta depends only on length.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use ndarray::Array1;
use num_complex::Complex64;

#[derive(Default)]
pub struct BetaCache {
    inner: RwLock<HashMap<usize, Arc<Array1<Complex64>>>>,
}

impl BetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, length: usize) -> Arc<Array1<Complex64>> {
        if let Some(beta) = self.inner.read().unwrap().get(&length) {
            return beta.clone();
        }
        let beta = Arc::new(compute_beta(length));
        self.inner.write().unwrap().insert(length, beta.clone());
        beta
    }
}

fn compute_beta(length: usize) -> Array1<Complex64> {
    let half = (length as f64 / 2.0).floor();
    Array1::from_iter((0..length).map(|k| Complex64::new(0.0, k as f64 - half)))
}
