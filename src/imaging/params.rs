//! Parameter types for variant generation.
//!
//! These structs describe *what* to generate, not *how*. They are the
//! interface between the [`resolve`](crate::resolve) module (which decides
//! which variants a page needs) and the [`backend`](super::backend) (which
//! does the actual pixel work). The separation allows swapping backends
//! (e.g. a recording mock in tests) without touching resolution logic.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output encoding for a generated variant.
///
/// Declaration order is selection preference: the modern compressed format
/// first, the universally supported fallback last. `Ord` follows declaration
/// order, so sorting a format list yields the order `<source>` elements must
/// appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Avif,
    Jpeg,
}

impl OutputFormat {
    /// File extension used for generated variant filenames.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// MIME type for the `<source type=...>` attribute.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Avif => "image/avif",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Full specification for one variant generation: source, output path,
/// target dimensions, encoding format, quality.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: Quality,
}
