//! End-to-end resolution through the real pure-Rust backend.
//!
//! These tests encode actual pixels, so they use small synthetic sources
//! and narrow width sets to stay fast.

use image::{ImageEncoder, RgbImage};
use respix::{
    ImageSource, Loading, MarkupDescriptor, OutputFormat, PageContext, ResolveError, Resolver,
    ResolverConfig, VariantCache,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn small_config() -> ResolverConfig {
    ResolverConfig {
        widths: vec![100, 200],
        quality: 60,
        ..ResolverConfig::default()
    }
}

fn page(tmp: &TempDir, slug: &str) -> PageContext {
    PageContext::new(
        tmp.path().join("content/posts/hello.md"),
        tmp.path().join("dist").join(slug),
        format!("/{slug}/"),
    )
}

fn source_jpeg(tmp: &TempDir) -> PathBuf {
    let path = tmp.path().join("content/posts/cat.jpg");
    create_test_jpeg(&path, 400, 300);
    path
}

#[test]
fn resolve_writes_variants_and_renders_markup() {
    let tmp = TempDir::new().unwrap();
    source_jpeg(&tmp);
    let resolver = Resolver::new(small_config(), VariantCache::empty(tmp.path().join("dist")));

    let descriptor = resolver
        .resolve(
            &page(&tmp, "hello"),
            &ImageSource::new("cat.jpg", "A cat").with_sizes("100vw"),
        )
        .unwrap();

    let out = tmp.path().join("dist/hello");
    for name in [
        "cat-100w.avif",
        "cat-200w.avif",
        "cat-100w.jpeg",
        "cat-200w.jpeg",
    ] {
        let path = out.join(name);
        assert!(path.exists(), "missing variant {name}");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    // Generated variants have the planned dimensions.
    let (w, h) = image::image_dimensions(out.join("cat-200w.jpeg")).unwrap();
    assert_eq!((w, h), (200, 150));

    let html = descriptor.to_html().into_string();
    assert!(html.contains(r#"srcset="/hello/cat-100w.avif 100w, /hello/cat-200w.avif 200w""#));
    assert!(html.find("image/avif").unwrap() < html.find("image/jpeg").unwrap());
    assert!(html.contains(r#"src="/hello/cat-200w.jpeg""#));
    assert!(html.contains(r#"loading="lazy""#));
    assert!(html.contains(r#"decoding="async""#));
}

#[test]
fn cache_manifest_survives_resolver_restarts() {
    let tmp = TempDir::new().unwrap();
    source_jpeg(&tmp);
    let root = tmp.path().join("dist");
    let source = ImageSource::new("cat.jpg", "A cat");

    let first = Resolver::new(small_config(), VariantCache::empty(&root));
    first.resolve(&page(&tmp, "hello"), &source).unwrap();
    first.save_cache().unwrap();

    // Plant a sentinel: a cache hit must leave the existing file untouched.
    let variant = root.join("hello/cat-100w.jpeg");
    std::fs::write(&variant, "sentinel").unwrap();

    let second = Resolver::new(small_config(), VariantCache::load(&root));
    second.resolve(&page(&tmp, "hello"), &source).unwrap();

    assert_eq!(std::fs::read(&variant).unwrap(), b"sentinel");
}

#[test]
fn undecodable_source_is_unsupported_format() {
    let tmp = TempDir::new().unwrap();
    let fake = tmp.path().join("content/posts/fake.jpg");
    std::fs::create_dir_all(fake.parent().unwrap()).unwrap();
    std::fs::write(&fake, "these are not pixels").unwrap();

    let resolver = Resolver::new(small_config(), VariantCache::empty(tmp.path().join("dist")));
    let result = resolver.resolve(&page(&tmp, "hello"), &ImageSource::new("fake.jpg", "x"));

    assert!(matches!(
        result,
        Err(ResolveError::UnsupportedFormat { .. })
    ));
}

#[test]
fn missing_source_writes_no_files() {
    let tmp = TempDir::new().unwrap();
    let resolver = Resolver::new(small_config(), VariantCache::empty(tmp.path().join("dist")));

    let result = resolver.resolve(
        &page(&tmp, "hello"),
        &ImageSource::new("missing.jpg", "x").with_sizes("100vw"),
    );

    assert!(matches!(result, Err(ResolveError::SourceNotFound(_))));
    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn gif_passthrough_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let gif = tmp.path().join("content/posts/anim.gif");
    std::fs::create_dir_all(gif.parent().unwrap()).unwrap();
    std::fs::write(&gif, b"GIF89a fake payload").unwrap();

    let resolver = Resolver::new(small_config(), VariantCache::empty(tmp.path().join("dist")));
    let descriptor = resolver
        .resolve(&page(&tmp, "hello"), &ImageSource::new("anim.gif", "A spinner"))
        .unwrap();

    assert!(matches!(descriptor, MarkupDescriptor::Direct { .. }));
    assert_eq!(descriptor.attributes().loading, Loading::Lazy);
    let copied = tmp.path().join("dist/hello/anim.gif");
    assert_eq!(std::fs::read(&copied).unwrap(), b"GIF89a fake payload");

    let html = descriptor.to_html().into_string();
    assert!(html.contains(r#"src="/hello/anim.gif""#));
    assert!(!html.contains("srcset"));
}

#[tokio::test(flavor = "multi_thread")]
async fn eager_and_deferred_policies_produce_identical_bytes() {
    let tmp = TempDir::new().unwrap();
    source_jpeg(&tmp);
    // JPEG-only keeps the comparison about the two call policies.
    let config = ResolverConfig {
        formats: vec![OutputFormat::Jpeg],
        ..small_config()
    };

    let eager = Resolver::new(
        config.clone(),
        VariantCache::empty(tmp.path().join("dist-eager")),
    );
    let eager_page = PageContext::new(
        tmp.path().join("content/posts/hello.md"),
        tmp.path().join("dist-eager/hello"),
        "/hello/",
    );
    eager
        .resolve(&eager_page, &ImageSource::new("cat.jpg", "A cat"))
        .unwrap();

    let deferred = std::sync::Arc::new(Resolver::new(
        config,
        VariantCache::empty(tmp.path().join("dist-deferred")),
    ));
    let deferred_page = PageContext::new(
        tmp.path().join("content/posts/hello.md"),
        tmp.path().join("dist-deferred/hello"),
        "/hello/",
    );
    deferred
        .resolve_deferred(deferred_page, ImageSource::new("cat.jpg", "A cat"))
        .await
        .unwrap();

    for name in ["cat-100w.jpeg", "cat-200w.jpeg"] {
        let a = std::fs::read(tmp.path().join("dist-eager/hello").join(name)).unwrap();
        let b = std::fs::read(tmp.path().join("dist-deferred/hello").join(name)).unwrap();
        assert_eq!(a, b, "policy outputs differ for {name}");
    }
}
