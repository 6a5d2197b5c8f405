//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and generate. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, statically
//! linked, no system dependencies.

use super::params::VariantParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported source format: {0}")]
    Unsupported(String),
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend instance can serve concurrent resolutions.
pub trait ImageBackend: Sync {
    /// Get source image dimensions without a full decode where possible.
    ///
    /// Returns [`BackendError::Unsupported`] when the file cannot be decoded
    /// as a raster image.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the source, resize, and encode one variant to disk.
    fn generate(&self, params: &VariantParams) -> Result<(), BackendError>;
}
