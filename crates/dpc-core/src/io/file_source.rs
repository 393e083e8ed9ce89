//! File-per-frame `FrameSource`: path derived from a zero-padded frame
//! number, with optional poll-for-existence ("hang") behavior.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use image::ImageReader;
use ndarray::Array2;

use crate::consts::FILE_POLL_INTERVAL_MS;
use crate::io::source::{FrameSource, LoadError};

pub struct FileFrameSource {
    pub directory: PathBuf,
    pub prefix: String,
    pub extension: String,
    /// Zero-padding width for the frame number (e.g. 5 for `SOFC_00001.tif`).
    pub width: usize,
    /// Linear scan index of the grid's (0, 0) cell.
    pub first_image: usize,
    pub cols: usize,
    /// Linear index of the designated reference frame.
    pub reference_frame_number: usize,
    /// Poll for the file to appear rather than failing immediately.
    pub hang: bool,
    /// Give up waiting after this long (`None` waits forever).
    pub poll_timeout: Option<Duration>,
}

impl FileFrameSource {
    fn frame_path(&self, n: usize) -> PathBuf {
        self.directory
            .join(format!("{}{:0width$}.{}", self.prefix, n, self.extension, width = self.width))
    }

    fn wait_for_file(&self, path: &Path) -> Result<(), LoadError> {
        if !self.hang || path.exists() {
            return Ok(());
        }
        let start = Instant::now();
        while !path.exists() {
            if let Some(timeout) = self.poll_timeout {
                if start.elapsed() >= timeout {
                    return Err(LoadError::NotFound);
                }
            }
            thread::sleep(Duration::from_millis(FILE_POLL_INTERVAL_MS));
        }
        Ok(())
    }

    fn load_path(&self, path: &Path) -> Result<Array2<u32>, LoadError> {
        self.wait_for_file(path)?;
        if !path.exists() {
            return Err(LoadError::NotFound);
        }
        let img = ImageReader::open(path)
            .map_err(|e| LoadError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| LoadError::Decode(e.to_string()))?;
        let luma = img.to_luma16();
        let (w, h) = (luma.width() as usize, luma.height() as usize);
        Ok(Array2::from_shape_fn((h, w), |(r, c)| luma.get_pixel(c as u32, r as u32).0[0] as u32))
    }
}

impl FrameSource for FileFrameSource {
    fn load_cell(&self, row: usize, col: usize) -> Result<Array2<u32>, LoadError> {
        let frame_num = self.first_image + row * self.cols + col;
        self.load_path(&self.frame_path(frame_num))
    }

    fn load_reference(&self) -> Result<Array2<u32>, LoadError> {
        self.load_path(&self.frame_path(self.reference_frame_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};
    use tempfile::tempdir;

    fn source(dir: &Path, hang: bool, poll_timeout: Option<Duration>) -> FileFrameSource {
        FileFrameSource {
            directory: dir.to_path_buf(),
            prefix: "frame_".into(),
            extension: "png".into(),
            width: 3,
            first_image: 1,
            cols: 2,
            reference_frame_number: 1,
            hang,
            poll_timeout,
        }
    }

    fn write_fixture(path: &Path, value: u16) {
        let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(2, 2, |_, _| Luma([value]));
        img.save(path).expect("write test fixture");
    }

    #[test]
    fn decodes_an_existing_file() {
        let dir = tempdir().unwrap();
        let src = source(dir.path(), false, None);
        write_fixture(&src.frame_path(1), 42);

        let frame = src.load_reference().unwrap();
        assert_eq!(frame.dim(), (2, 2));
        assert_eq!(frame[[0, 0]], 42);
    }

    #[test]
    fn missing_file_without_hang_fails_immediately() {
        let dir = tempdir().unwrap();
        let src = source(dir.path(), false, None);
        assert!(matches!(src.load_cell(0, 0), Err(LoadError::NotFound)));
    }

    #[test]
    fn hang_mode_picks_up_a_file_written_after_a_delay() {
        let dir = tempdir().unwrap();
        let src = source(dir.path(), true, Some(Duration::from_secs(5)));
        let path = src.frame_path(1);

        let writer_path = path.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            write_fixture(&writer_path, 7);
        });

        let frame = src.load_reference().unwrap();
        assert_eq!(frame[[0, 0]], 7);
    }

    #[test]
    fn hang_mode_gives_up_after_poll_timeout() {
        let dir = tempdir().unwrap();
        let src = source(dir.path(), true, Some(Duration::from_millis(200)));
        assert!(matches!(src.load_reference(), Err(LoadError::NotFound)));
    }
}
