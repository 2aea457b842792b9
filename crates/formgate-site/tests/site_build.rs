use formgate_site::{ImageFormat, SiteConfig, SitePipeline};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, content).expect("write fixture");
}

#[test]
fn build_mirrors_tree_and_applies_layout() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    write_file(
        &root.join("site.yaml"),
        "markdown:\n  layout: layout.html\n  highlight:\n    theme: nord\n",
    );
    write_file(
        &root.join("layout.html"),
        "<html><body>{{ content }}</body></html>\n",
    );
    write_file(&root.join("src/contact-me.md"), "# Contact me\n\nSay hi.\n");
    write_file(
        &root.join("src/blog/first.md"),
        "## Setup\n\n```rust\nfn main() {}\n```\n\n![shot](shot.png)\n",
    );
    write_file(&root.join("src/blog/shot.png"), "not really a png");

    let config = SiteConfig::load(&root.join("site.yaml")).expect("load config");
    let pipeline = SitePipeline::with_plain_highlighter(config).expect("pipeline");
    let out = root.join("dist");
    let report = pipeline.build(&root.join("src"), &out).expect("build");

    assert_eq!(
        report.pages,
        vec![PathBuf::from("blog/first.html"), PathBuf::from("contact-me.html")]
    );
    assert_eq!(report.assets, vec![PathBuf::from("blog/shot.png")]);
    assert_eq!(report.images.len(), 1);
    assert_eq!(report.images[0].path, PathBuf::from("blog/shot.png"));
    assert_eq!(report.images[0].formats, vec![ImageFormat::Avif, ImageFormat::Webp]);
    assert_eq!(report.images[0].widths.first(), Some(&640));

    let contact = fs::read_to_string(out.join("contact-me.html")).unwrap();
    assert!(contact.starts_with("<html><body><h1 id=\"contact-me\">Contact me</h1>"));
    assert!(contact.trim_end().ends_with("</body></html>"));

    let post = fs::read_to_string(out.join("blog/first.html")).unwrap();
    assert!(post.contains("<h2 id=\"setup\">Setup</h2>"));
    assert!(post.contains("data-theme=\"nord\""));
    assert!(post.contains("class=\"language-rust\""));
    assert!(!post.contains("<p><img"));

    assert_eq!(
        fs::read_to_string(out.join("blog/shot.png")).unwrap(),
        "not really a png"
    );
}

#[test]
fn missing_source_dir_is_an_error() {
    let tmp = tempdir().expect("tempdir");
    let pipeline = SitePipeline::with_plain_highlighter(SiteConfig::default()).unwrap();
    let err = pipeline
        .build(&tmp.path().join("nope"), &tmp.path().join("dist"))
        .unwrap_err();
    assert!(err.to_string().contains("nope"));
}
