//! # Respix
//!
//! Responsive image pipeline for static-site shortcodes. Given a source
//! image reference authored in a page, respix generates resized variants at
//! configured widths and formats, caches them content-addressed, and emits
//! a `<picture>` fragment (or its structured equivalent) with width
//! descriptors, a sizing hint, and lazy/async hints.
//!
//! ```no_run
//! use respix::{ImageSource, PageContext, Resolver, ResolverConfig, VariantCache};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::new(
//!     ResolverConfig::default(),
//!     VariantCache::load("dist"),
//! );
//!
//! let page = PageContext::new("content/posts/hello.md", "dist/posts/hello", "/posts/hello/");
//! let descriptor = resolver.resolve(
//!     &page,
//!     &ImageSource::new("cat.jpg", "A cat sleeping on a windowsill"),
//! )?;
//!
//! let fragment = descriptor.to_html().into_string();
//! resolver.save_cache()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | The resolver: path resolution, variant planning, cache-or-encode, descriptor assembly; eager and deferred call policies |
//! | [`config`] | `ResolverConfig`: widths, formats, quality, descriptor defaults; TOML loading and validation |
//! | [`cache`] | Content-addressed variant cache, persisted as a JSON manifest in the output directory |
//! | [`markup`] | `MarkupDescriptor` and Maud HTML rendering |
//! | [`imaging`] | Pure-Rust image operations behind the `ImageBackend` trait |
//!
//! # Design Decisions
//!
//! ## Explicit Page Context
//!
//! Image references are authored relative to the page that contains them,
//! and variants are served under that page's URL. Rather than reading that
//! state from an ambient "current page" (the shortcode-host pattern this
//! crate replaced), every resolve call takes a [`PageContext`] — no hidden
//! globals, and the resolver stays re-entrant.
//!
//! ## AVIF First, JPEG Fallback
//!
//! Generated sources are ordered most-modern-first, so a client selecting
//! the first supported entry gets the best compression. AVIF has had
//! [100% browser support since September 2023](https://caniuse.com/avif);
//! JPEG remains the universal fallback referenced by the `<img>` element.
//!
//! ## Never Upscale
//!
//! Configured widths above the source's native width are skipped: an
//! upscaled variant costs bytes and gains nothing. When every configured
//! width exceeds the native width, the native size is emitted as the single
//! variant per format so the descriptor always renders.
//!
//! ## Content-Addressed Caching
//!
//! Variants are cached by SHA-256 of the source bytes plus the encoding
//! parameters. Page renames and rebuilds reuse cached output unconditionally;
//! only content or parameter changes re-encode. See [`cache`].
//!
//! ## One Pipeline, Two Policies
//!
//! [`Resolver::resolve`] is synchronous and complete on return;
//! [`Resolver::resolve_deferred`] runs the identical pipeline on tokio's
//! blocking pool so a build can overlap many pages' resolutions. Identical
//! inputs produce byte-identical variants under either policy.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resizing (Lanczos3), and encoding (rav1e for AVIF) come from
//! the `image` crate ecosystem — no ImageMagick, no system dependencies,
//! a single self-contained binary for the site build.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod markup;
pub mod resolve;

pub use cache::VariantCache;
pub use config::{ConfigError, ResolverConfig};
pub use imaging::{ImageBackend, OutputFormat, RustBackend};
pub use markup::{Loading, MarkupDescriptor};
pub use resolve::{ImageSource, PageContext, ResolveError, Resolver};
