//! Markup descriptors and HTML rendering.
//!
//! A resolution produces a [`MarkupDescriptor`]: a structured account of the
//! generated variants and their selection hints. Callers embedding into a
//! templating pipeline can consume the structure directly; shortcode-style
//! callers get the final HTML fragment from [`MarkupDescriptor::to_html`].
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/): compile-time
//! checked, type-safe, auto-escaped. Alt text in particular passes through
//! maud's escaping, so author-supplied strings cannot break the fragment.

use crate::imaging::OutputFormat;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// Browser loading hint for the emitted `<img>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    Lazy,
    Eager,
}

impl Loading {
    pub fn as_str(self) -> &'static str {
        match self {
            Loading::Lazy => "lazy",
            Loading::Eager => "eager",
        }
    }
}

/// Attributes carried on every emitted image element.
///
/// `decoding` is always `"async"`; it is kept as a field so serialized
/// descriptors are complete without knowledge of rendering defaults.
#[derive(Debug, Clone, Serialize)]
pub struct ImageAttributes {
    /// Alt text, exactly as the author supplied it (may be empty).
    pub alt: String,
    /// Sizing hint, e.g. `"(max-width: 640px) 100vw, 50vw"`.
    pub sizes: String,
    pub loading: Loading,
    pub decoding: &'static str,
}

impl ImageAttributes {
    pub fn new(alt: impl Into<String>, sizes: impl Into<String>, loading: Loading) -> Self {
        Self {
            alt: alt.into(),
            sizes: sizes.into(),
            loading,
            decoding: "async",
        }
    }
}

/// One srcset candidate: a variant URL with its width descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrcsetEntry {
    pub url: String,
    pub width: u32,
}

/// All candidates for one output format, rendered as one `<source>` element.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSet {
    pub format: OutputFormat,
    pub entries: Vec<SrcsetEntry>,
}

impl SourceSet {
    /// The srcset attribute value: `"a.avif 300w, b.avif 600w"`.
    pub fn srcset(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} {}w", e.url, e.width))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The fallback `<img>` inside a `<picture>`: the largest variant of the
/// universally supported format, with intrinsic dimensions to avoid layout
/// shift.
#[derive(Debug, Clone, Serialize)]
pub struct Fallback {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Structured output of one resolution, ready to render or serialize.
#[derive(Debug, Clone, Serialize)]
pub enum MarkupDescriptor {
    /// Multi-variant output: `<picture>` with one `<source>` per format
    /// (modern format first) and a fallback `<img>`.
    Picture {
        sources: Vec<SourceSet>,
        fallback: Fallback,
        attributes: ImageAttributes,
    },
    /// Single direct reference, used for sources that bypass variant
    /// generation (animated or vector formats).
    Direct {
        url: String,
        attributes: ImageAttributes,
    },
}

impl MarkupDescriptor {
    pub fn attributes(&self) -> &ImageAttributes {
        match self {
            MarkupDescriptor::Picture { attributes, .. } => attributes,
            MarkupDescriptor::Direct { attributes, .. } => attributes,
        }
    }

    /// Render the final HTML fragment.
    pub fn to_html(&self) -> Markup {
        match self {
            MarkupDescriptor::Picture {
                sources,
                fallback,
                attributes,
            } => html! {
                picture {
                    @for source in sources {
                        source type=(source.format.mime_type())
                            srcset=(source.srcset())
                            sizes=(attributes.sizes);
                    }
                    img src=(fallback.url)
                        width=(fallback.width)
                        height=(fallback.height)
                        alt=(attributes.alt)
                        loading=(attributes.loading.as_str())
                        decoding=(attributes.decoding);
                }
            },
            MarkupDescriptor::Direct { url, attributes } => html! {
                img src=(url)
                    alt=(attributes.alt)
                    loading=(attributes.loading.as_str())
                    decoding=(attributes.decoding);
            },
        }
    }
}
