//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | Lanczos3 resampling |
//! | **Encode → AVIF** | rav1e via `image::codecs::avif` |
//! | **Encode → JPEG** | `image::codecs::jpeg` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing variant operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{VariantDims, plan_variant_dims, scaled_height};
pub use params::{OutputFormat, Quality, VariantParams};
pub use rust_backend::RustBackend;
