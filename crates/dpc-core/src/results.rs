//! Result Aggregator (component F): owns the five per-pixel result grids
//! and the final phase grid. Each cell is written exactly once by the
//! orchestrator; synchronization here only publishes that write to later
//! readers (the live-update sink, and the integrator at hand-off).

use std::sync::RwLock;

use ndarray::Array2;

pub struct ResultGrids {
    a: RwLock<Array2<f64>>,
    gx: RwLock<Array2<f64>>,
    gy: RwLock<Array2<f64>>,
    rx: RwLock<Array2<f64>>,
    ry: RwLock<Array2<f64>>,
    phi: RwLock<Option<Array2<f64>>>,
}

/// A defensive, point-in-time copy handed to the live-update callback.
#[derive(Clone)]
pub struct ResultSnapshot {
    pub a: Array2<f64>,
    pub gx: Array2<f64>,
    pub gy: Array2<f64>,
    pub rx: Array2<f64>,
    pub ry: Array2<f64>,
    pub phi: Option<Array2<f64>>,
}

impl ResultGrids {
    pub fn new(rows: usize, cols: usize) -> Self {
        let zeros = || RwLock::new(Array2::<f64>::zeros((rows, cols)));
        Self {
            a: zeros(),
            gx: zeros(),
            gy: zeros(),
            rx: zeros(),
            ry: zeros(),
            phi: RwLock::new(None),
        }
    }

    pub fn write_cell(&self, row: usize, col: usize, a: f64, gx: f64, gy: f64, rx: f64, ry: f64) {
        self.a.write().unwrap()[[row, col]] = a;
        self.gx.write().unwrap()[[row, col]] = gx;
        self.gy.write().unwrap()[[row, col]] = gy;
        self.rx.write().unwrap()[[row, col]] = rx;
        self.ry.write().unwrap()[[row, col]] = ry;
    }

    pub fn set_phi(&self, phi: Array2<f64>) {
        *self.phi.write().unwrap() = Some(phi);
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        ResultSnapshot {
            a: self.a.read().unwrap().clone(),
            gx: self.gx.read().unwrap().clone(),
            gy: self.gy.read().unwrap().clone(),
            rx: self.rx.read().unwrap().clone(),
            ry: self.ry.read().unwrap().clone(),
            phi: self.phi.read().unwrap().clone(),
        }
    }

    /// Consume the aggregator, returning the five result grids plus the
    /// phase grid (if the integrator has run).
    pub fn into_grids(self) -> (Array2<f64>, Array2<f64>, Array2<f64>, Array2<f64>, Array2<f64>, Option<Array2<f64>>) {
        (
            self.a.into_inner().unwrap(),
            self.gx.into_inner().unwrap(),
            self.gy.into_inner().unwrap(),
            self.rx.into_inner().unwrap(),
            self.ry.into_inner().unwrap(),
            self.phi.into_inner().unwrap(),
        )
    }

    pub fn gx_ref(&self) -> Array2<f64> {
        self.gx.read().unwrap().clone()
    }

    pub fn gy_ref(&self) -> Array2<f64> {
        self.gy.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_roundtrips() {
        let grids = ResultGrids::new(2, 2);
        grids.write_cell(0, 1, 1.0, 2.0, 3.0, 4.0, 5.0);
        let snap = grids.snapshot();
        assert_eq!(snap.a[[0, 1]], 1.0);
        assert_eq!(snap.gy[[0, 1]], 3.0);
        assert_eq!(snap.phi, None);
    }
}
