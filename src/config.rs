//! Resolver configuration.
//!
//! Handles loading and validating resolver settings. Stock defaults match
//! the configuration this crate replaced: widths 300/600/900, AVIF + JPEG
//! output, lazy loading.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! widths = [300, 600, 900]      # Target widths in pixels
//! formats = ["avif", "jpeg"]    # Output formats (avif and/or jpeg)
//! quality = 80                  # Lossy encoding quality (1-100)
//! default_sizes = "100vw"       # Sizing hint when a call supplies none
//! default_loading = "lazy"      # "lazy" or "eager"; calls may override
//! ```
//!
//! Config files are sparse — override just the values you want. Unknown
//! keys are rejected to catch typos early.

use crate::imaging::OutputFormat;
use crate::markup::Loading;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resolver configuration.
///
/// Per-site settings: which variants to produce and the descriptor defaults.
/// Per-page values (source base, output directory, URL path) travel on
/// [`PageContext`](crate::resolve::PageContext) instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Target variant widths in pixels. Widths above a source's native
    /// width are skipped at resolve time (no upscaling).
    pub widths: Vec<u32>,
    /// Output formats to generate. Emission order is always modern-first
    /// regardless of the order given here.
    pub formats: Vec<OutputFormat>,
    /// Lossy encoding quality (1-100).
    pub quality: u32,
    /// Sizing hint used when a resolve call does not supply one.
    pub default_sizes: String,
    /// Loading mode used when a resolve call does not supply one.
    pub default_loading: Loading,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            widths: vec![300, 600, 900],
            formats: vec![OutputFormat::Avif, OutputFormat::Jpeg],
            quality: 80,
            default_sizes: "100vw".to_string(),
            default_loading: Loading::Lazy,
        }
    }
}

impl ResolverConfig {
    /// Load from a TOML file, applying defaults for absent keys.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from a TOML string, applying defaults for absent keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.widths.is_empty() {
            return Err(ConfigError::Validation("widths must not be empty".into()));
        }
        if self.widths.contains(&0) {
            return Err(ConfigError::Validation("widths must be positive".into()));
        }
        let mut sorted = self.widths.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != self.widths.len() {
            return Err(ConfigError::Validation(
                "widths must be distinct".into(),
            ));
        }
        if self.formats.is_empty() {
            return Err(ConfigError::Validation("formats must not be empty".into()));
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        Ok(())
    }
}
