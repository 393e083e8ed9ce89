use crate::error::{DpcError, Result};

/// Inclusive pixel rectangle cropped from every frame before projection.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Roi {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl Roi {
    pub fn validated(self) -> Result<Self> {
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(DpcError::ConfigInvalid(format!(
                "ROI out of range: ({}, {})-({}, {})",
                self.x1, self.y1, self.x2, self.y2
            )));
        }
        Ok(self)
    }

    pub fn width(&self) -> usize {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> usize {
        self.y2 - self.y1 + 1
    }
}
