//! Pure Rust image processing backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify (JPEG, PNG, TIFF, WebP) | `image::image_dimensions` |
//! | Decode | `image` crate (pure Rust decoders) |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{OutputFormat, VariantParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn map_image_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io) => BackendError::Io(io),
        // Unknown container or a decoder we don't compile in — either way the
        // source is not a raster image this backend can read.
        ImageError::Unsupported(e) => {
            BackendError::Unsupported(format!("{}: {}", path.display(), e))
        }
        ImageError::Decoding(e) => BackendError::Unsupported(format!("{}: {}", path.display(), e)),
        other => BackendError::ProcessingFailed(format!("{}: {}", path.display(), other)),
    }
}

/// Load and decode a source image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| map_image_error(path, e))
}

/// Encode a resized image to the output path in the requested format.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    quality: u32,
) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);

    match format {
        OutputFormat::Avif => {
            let encoder =
                image::codecs::avif::AvifEncoder::new_with_speed_quality(writer, 6, quality as u8);
            img.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("AVIF encode failed: {}", e)))
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel; flatten RGBA sources before encoding.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
            rgb.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
        }
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| map_image_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn generate(&self, params: &VariantParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.format, params.quality.value())
    }
}
