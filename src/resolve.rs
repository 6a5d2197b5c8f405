//! Responsive image resolution.
//!
//! The [`Resolver`] takes one authored image reference at a time and turns
//! it into generated variant files plus a [`MarkupDescriptor`]. The flow per
//! call:
//!
//! ```text
//! 1. Resolve the source path against the authoring file's directory
//! 2. gif/svg?  → copy through, emit a direct reference
//! 3. Identify native dimensions, drop widths that would upscale
//! 4. Per (width, format): cache hit → reuse, else encode via the backend
//! 5. Assemble the <picture> descriptor (modern format first)
//! ```
//!
//! ## Call policies
//!
//! - **Eager**: [`Resolver::resolve`] — synchronous; variants are fully
//!   written before the descriptor is returned. For render paths with no
//!   follow-up pass (e.g. markdown rendered server-side).
//! - **Deferred**: [`Resolver::resolve_deferred`] — async; the same pipeline
//!   runs on the blocking pool, so one page's build awaits its own images
//!   while other pages' resolutions proceed. Both policies run identical
//!   code and produce byte-identical output.
//!
//! Failure is atomic per call: if any single variant fails, the whole
//! resolution fails and no descriptor is returned. Whether to abort or skip
//! the page is the calling build pipeline's decision.

use crate::cache::{self, VariantCache};
use crate::config::ResolverConfig;
use crate::imaging::{
    BackendError, ImageBackend, Quality, RustBackend, VariantParams, plan_variant_dims,
};
use crate::markup::{
    Fallback, ImageAttributes, Loading, MarkupDescriptor, SourceSet, SrcsetEntry,
};
use log::{debug, trace};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("cannot decode {path} as a raster image: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[error("variant generation failed: {0}")]
    Generation(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("deferred resolution task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Per-page context for a resolution.
///
/// Pages live in a nested content tree and image references are authored
/// relative to the authoring file, so the base directory is an explicit
/// parameter here rather than implicit caller state.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Path of the authoring file (the page source). Image references are
    /// resolved against its parent directory.
    pub input_path: PathBuf,
    /// Directory generated variants are written to. Nothing is written
    /// outside it.
    pub output_dir: PathBuf,
    /// URL path the output directory is served under, e.g. `/posts/hello/`.
    pub url_path: String,
}

impl PageContext {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        url_path: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            url_path: url_path.into(),
        }
    }

    /// Directory that relative source references are resolved against.
    fn source_base(&self) -> &Path {
        self.input_path.parent().unwrap_or(Path::new(""))
    }

    /// Serving URL for a file in this page's output directory.
    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_path.trim_end_matches('/'), file_name)
    }
}

/// One authored image reference.
///
/// Alt text is a required constructor argument — an empty string is a valid,
/// deliberate choice for decorative images, but it must be explicit.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub src: String,
    pub alt: String,
    pub sizes: Option<String>,
    pub loading: Option<Loading>,
}

impl ImageSource {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            sizes: None,
            loading: None,
        }
    }

    /// Set the sizing hint for this reference.
    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    /// Override the configured default loading mode.
    pub fn with_loading(mut self, loading: Loading) -> Self {
        self.loading = Some(loading);
        self
    }
}

/// Extensions that bypass variant generation: animated or vector formats
/// that are already scalable or already optimized for their use.
fn is_passthrough(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif") || e.eq_ignore_ascii_case("svg"))
}

/// The responsive image resolver.
///
/// Holds the variant configuration, an [`ImageBackend`], and the shared
/// content-addressed cache. Re-entrant: `resolve` takes `&self` and the only
/// cross-call mutable state is the cache, which is internally synchronized.
pub struct Resolver<B = RustBackend> {
    config: ResolverConfig,
    backend: B,
    cache: VariantCache,
}

impl Resolver<RustBackend> {
    pub fn new(config: ResolverConfig, cache: VariantCache) -> Self {
        Self::with_backend(config, RustBackend::new(), cache)
    }
}

impl<B: ImageBackend> Resolver<B> {
    /// Construct with a specific backend (allows testing with a mock).
    pub fn with_backend(config: ResolverConfig, backend: B, cache: VariantCache) -> Self {
        Self {
            config,
            backend,
            cache,
        }
    }

    /// Persist the variant cache manifest alongside the generated output.
    pub fn save_cache(&self) -> io::Result<()> {
        self.cache.save()
    }

    /// Eager policy: resolve one image reference, generating (or reusing)
    /// every variant before the descriptor is returned.
    pub fn resolve(
        &self,
        page: &PageContext,
        source: &ImageSource,
    ) -> Result<MarkupDescriptor, ResolveError> {
        let source_path = page.source_base().join(&source.src);
        if !source_path.is_file() {
            return Err(ResolveError::SourceNotFound(source_path));
        }

        let attributes = ImageAttributes::new(
            source.alt.clone(),
            source
                .sizes
                .clone()
                .unwrap_or_else(|| self.config.default_sizes.clone()),
            source.loading.unwrap_or(self.config.default_loading),
        );

        if is_passthrough(&source_path) {
            return self.pass_through(page, &source_path, attributes);
        }

        let dims = self.backend.identify(&source_path).map_err(|e| match e {
            BackendError::Unsupported(reason) => ResolveError::UnsupportedFormat {
                path: source_path.clone(),
                reason,
            },
            other => ResolveError::Generation(other),
        })?;

        let plan = plan_variant_dims((dims.width, dims.height), &self.config.widths);
        trace!(
            "planned {} width(s) for {} (native {}x{})",
            plan.len(),
            source_path.display(),
            dims.width,
            dims.height
        );

        // Modern format first; duplicates in config collapse.
        let mut formats = self.config.formats.clone();
        formats.sort_unstable();
        formats.dedup();

        let stem = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        let quality = Quality::new(self.config.quality);
        let source_hash = cache::hash_file(&source_path)?;

        std::fs::create_dir_all(&page.output_dir)?;

        let mut sources = Vec::with_capacity(formats.len());
        for &format in &formats {
            let mut entries = Vec::with_capacity(plan.len());
            for d in &plan {
                let file_name = format!("{}-{}w.{}", stem, d.width, format.extension());
                let output_path = page.output_dir.join(&file_name);
                let params_hash = cache::hash_variant_params(d.width, format, quality.value());

                match self.cache.find(&source_hash, &params_hash) {
                    Some(cached) if cached == output_path => {
                        debug!("cache hit: {}", output_path.display());
                    }
                    Some(cached) => {
                        // Same content, different page: copy instead of re-encode.
                        debug!(
                            "cache copy: {} -> {}",
                            cached.display(),
                            output_path.display()
                        );
                        std::fs::copy(&cached, &output_path)?;
                        self.cache
                            .record(&output_path, source_hash.clone(), params_hash);
                    }
                    None => {
                        debug!("encoding {}", output_path.display());
                        self.backend.generate(&VariantParams {
                            source: source_path.clone(),
                            output: output_path.clone(),
                            width: d.width,
                            height: d.height,
                            format,
                            quality,
                        })?;
                        self.cache
                            .record(&output_path, source_hash.clone(), params_hash);
                    }
                }

                entries.push(SrcsetEntry {
                    url: page.url_for(&file_name),
                    width: d.width,
                });
            }
            sources.push(SourceSet { format, entries });
        }

        // Fallback <img>: largest variant of the last (most compatible) format.
        let fallback_set = sources.last().expect("formats validated non-empty");
        let largest = fallback_set.entries.last().expect("plan is never empty");
        let fallback = Fallback {
            url: largest.url.clone(),
            width: largest.width,
            height: plan.last().expect("plan is never empty").height,
        };

        Ok(MarkupDescriptor::Picture {
            sources,
            fallback,
            attributes,
        })
    }

    /// Deferred policy: same pipeline, run on the blocking pool so the
    /// calling page build can overlap independent resolutions.
    pub async fn resolve_deferred(
        self: Arc<Self>,
        page: PageContext,
        source: ImageSource,
    ) -> Result<MarkupDescriptor, ResolveError>
    where
        B: Send + Sync + 'static,
    {
        tokio::task::spawn_blocking(move || self.resolve(&page, &source)).await?
    }

    /// Copy an animated/vector source through unchanged and emit a direct
    /// reference. No resizing or re-encoding is attempted.
    fn pass_through(
        &self,
        page: &PageContext,
        source_path: &Path,
        attributes: ImageAttributes,
    ) -> Result<MarkupDescriptor, ResolveError> {
        let file_name = source_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        std::fs::create_dir_all(&page.output_dir)?;
        std::fs::copy(source_path, page.output_dir.join(&file_name))?;
        debug!("passed through {}", source_path.display());

        Ok(MarkupDescriptor::Direct {
            url: page.url_for(&file_name),
            attributes,
        })
    }
}
