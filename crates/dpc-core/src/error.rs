use thiserror::Error;

#[derive(Error, Debug)]
pub enum DpcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "file-loader")]
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
}

pub type Result<T> = std::result::Result<T, DpcError>;
