//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Dimensions of one variant to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDims {
    /// Output width — also the `w` descriptor in the emitted srcset.
    pub width: u32,
    /// Output height, scaled to preserve the source aspect ratio.
    pub height: u32,
}

/// Height of a variant at `target_width`, preserving the source aspect ratio.
pub fn scaled_height(native: (u32, u32), target_width: u32) -> u32 {
    let (native_w, native_h) = native;
    (native_h as f64 * target_width as f64 / native_w as f64).round() as u32
}

/// Calculate which variant widths to generate for a source image.
///
/// Requested widths larger than the source's native width are dropped —
/// upscaling never improves quality, it only wastes bytes. If every
/// requested width exceeds the native width, the native dimensions are
/// returned as the single variant so the caller always has something to
/// reference. Duplicate widths collapse to one variant; output is sorted
/// ascending.
pub fn plan_variant_dims(native: (u32, u32), widths: &[u32]) -> Vec<VariantDims> {
    let (native_w, native_h) = native;

    let mut eligible: Vec<u32> = widths
        .iter()
        .copied()
        .filter(|&w| w > 0 && w <= native_w)
        .collect();
    eligible.sort_unstable();
    eligible.dedup();

    if eligible.is_empty() {
        return vec![VariantDims {
            width: native_w,
            height: native_h,
        }];
    }

    eligible
        .into_iter()
        .map(|width| VariantDims {
            width,
            height: scaled_height(native, width),
        })
        .collect()
}
