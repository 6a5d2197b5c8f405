//! Content-addressed variant cache.
//!
//! AVIF encoding dominates resolve time, so repeated builds and repeated
//! references to the same image must not re-encode identical variants.
//!
//! # Design
//!
//! The cache is **content-addressed**: lookups are by the combination of
//! `source_hash` and `params_hash`, never by output file path. Page moves
//! and renames therefore do not invalidate the cache — only actual image
//! content or encoding parameter changes do.
//!
//! - **`source_hash`**: SHA-256 of the source file contents. Content-based
//!   rather than mtime-based so it survives `git checkout` (which resets
//!   modification times). Computed once per resolve and shared across all
//!   of the source's variants.
//!
//! - **`params_hash`**: SHA-256 of the encoding parameters (target width,
//!   output format, quality). If any config value changes, the params hash
//!   changes and the variant is re-encoded.
//!
//! A cache hit requires an entry with matching hashes **and** the
//! previously-written file still on disk. When a hit points at a different
//! output path than the caller needs (page moved), the cached file is
//! copied instead of re-encoded.
//!
//! There is no explicit invalidation: a key mismatch *is* the invalidation.
//!
//! # Storage
//!
//! [`VariantCache`] is the shared handle: a manifest behind a `Mutex`, safe
//! for concurrent resolutions. The manifest persists as JSON at
//! `<root>/.variant-cache.json`, alongside the generated variants, so it
//! travels with the output directory when cached in CI.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::imaging::OutputFormat;

/// Name of the cache manifest file within the cache root.
const MANIFEST_FILENAME: &str = ".variant-cache.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// A single cached output file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk manifest mapping root-relative output paths to cache entries.
///
/// Lookups go through a runtime `content_index` mapping
/// `"{source_hash}:{params_hash}"` to the stored output path. Built at load
/// time, maintained on insert, never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheManifest {
    version: u32,
    entries: HashMap<String, CacheEntry>,
    #[serde(skip)]
    content_index: HashMap<String, String>,
}

impl CacheManifest {
    fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
            content_index: HashMap::new(),
        }
    }

    fn insert(&mut self, output_path: String, source_hash: String, params_hash: String) {
        let content_key = format!("{}:{}", source_hash, params_hash);

        // Remove stale entry if content moved to a new path
        if let Some(old_path) = self.content_index.get(&content_key)
            && *old_path != output_path
        {
            self.entries.remove(old_path.as_str());
        }

        self.content_index.insert(content_key, output_path.clone());
        self.entries.insert(
            output_path,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }
}

fn build_content_index(entries: &HashMap<String, CacheEntry>) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(output_path, entry)| {
            let content_key = format!("{}:{}", entry.source_hash, entry.params_hash);
            (content_key, output_path.clone())
        })
        .collect()
}

/// Shared cache handle used by concurrent resolutions.
///
/// `root` anchors the relative paths stored in the manifest; generated
/// variants are expected to live under it.
#[derive(Debug)]
pub struct VariantCache {
    root: PathBuf,
    inner: Mutex<CacheManifest>,
}

impl VariantCache {
    /// Create an empty in-memory cache rooted at `root` (first build, or
    /// cache deliberately disabled).
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inner: Mutex::new(CacheManifest::empty()),
        }
    }

    /// Load the manifest from `root`. A missing, corrupt, or
    /// version-mismatched manifest yields an empty cache.
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let path = root.join(MANIFEST_FILENAME);
        let manifest = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<CacheManifest>(&content) {
                Ok(mut m) if m.version == MANIFEST_VERSION => {
                    m.content_index = build_content_index(&m.entries);
                    m
                }
                _ => CacheManifest::empty(),
            },
            Err(_) => CacheManifest::empty(),
        };
        Self {
            root,
            inner: Mutex::new(manifest),
        }
    }

    /// Persist the manifest to `<root>/.variant-cache.json`.
    pub fn save(&self) -> io::Result<()> {
        let manifest = self.inner.lock().expect("cache lock poisoned");
        let json = serde_json::to_string_pretty(&*manifest)?;
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.root.join(MANIFEST_FILENAME), json)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a cached output file by content hashes.
    ///
    /// Returns the absolute path of the previously written file if an entry
    /// with matching hashes exists **and** the file is still on disk. The
    /// returned path may differ from the caller's intended output path; the
    /// caller copies the file in that case.
    pub fn find(&self, source_hash: &str, params_hash: &str) -> Option<PathBuf> {
        let manifest = self.inner.lock().expect("cache lock poisoned");
        let content_key = format!("{}:{}", source_hash, params_hash);
        let stored = manifest.content_index.get(&content_key)?;
        let absolute = self.root.join(stored);
        absolute.exists().then_some(absolute)
    }

    /// Record a cache entry for a freshly written output file.
    ///
    /// Concurrent records of the same key are last-writer-wins; since keys
    /// are content-derived, both writers produced identical content.
    pub fn record(&self, output_path: &Path, source_hash: String, params_hash: String) {
        let relative = output_path
            .strip_prefix(&self.root)
            .unwrap_or(output_path)
            .to_string_lossy()
            .to_string();
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .insert(relative, source_hash, params_hash);
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// SHA-256 hash of encoding parameters for one variant.
///
/// Inputs: target width, output format, quality. If any of these change,
/// the previously cached output is invalid.
pub fn hash_variant_params(width: u32, format: OutputFormat, quality: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"variant\0");
    hasher.update(width.to_le_bytes());
    hasher.update(format.extension().as_bytes());
    hasher.update(quality.to_le_bytes());
    format!("{:x}", hasher.finalize())
}
