//! Single in-memory 3-D stack `FrameSource`, standing in for an HDF5
//! dataset at `entry/instrument/detector/data`: frame index selects a
//! slice of the stack's leading axis.

use ndarray::{Array2, Array3, Axis};

use crate::io::source::{FrameSource, LoadError};

pub struct StackFrameSource {
    /// Shape (frame, row, col).
    pub stack: Array3<u32>,
    /// Linear scan index of the grid's (0, 0) cell (1-based, matching the
    /// reference convention).
    pub first_image: usize,
    pub cols: usize,
    /// 1-based index of the designated reference frame within the stack.
    pub reference_frame_number: usize,
}

impl StackFrameSource {
    fn slice(&self, index: usize) -> Result<Array2<u32>, LoadError> {
        if index >= self.stack.len_of(Axis(0)) {
            return Err(LoadError::NotFound);
        }
        Ok(self.stack.index_axis(Axis(0), index).to_owned())
    }
}

impl FrameSource for StackFrameSource {
    fn load_cell(&self, row: usize, col: usize) -> Result<Array2<u32>, LoadError> {
        let frame_num = self.first_image + row * self.cols + col - 1;
        self.slice(frame_num)
    }

    fn load_reference(&self) -> Result<Array2<u32>, LoadError> {
        self.slice(self.reference_frame_number - 1)
    }
}
