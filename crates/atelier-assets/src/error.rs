use std::path::PathBuf;

use crate::ktx2::Ktx2Error;
use crate::texture::PixelFormat;

/// Errors that can occur while loading an asset from its source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error reading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to decode image '{0}': {1}")]
    ImageDecode(PathBuf, String),

    #[error("invalid KTX2 container '{0}': {1}")]
    Ktx2(PathBuf, #[source] Ktx2Error),

    #[error("failed to load model '{0}': {1}")]
    Model(PathBuf, String),

    #[error("network error: {0}")]
    Network(String),
}

/// Errors a repair operation can report.
///
/// These replace exception-based control flow: an expected, recoverable
/// problem comes back as a value the caller inspects, never as a panic.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FixError {
    #[error(
        "pixel payload of {actual} bytes does not match {width}x{height} {format:?} ({expected} expected)"
    )]
    PayloadMismatch {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },

    #[error("texture '{name}' has degenerate dimensions {width}x{height}")]
    Degenerate { name: String, width: u32, height: u32 },
}
