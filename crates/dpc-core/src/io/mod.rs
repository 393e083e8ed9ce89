pub mod catalog_source;
#[cfg(feature = "file-loader")]
pub mod file_source;
pub mod source;
pub mod stack_source;

pub use source::{FrameSource, LoadError};
