//! Site configuration, parsed from a YAML file.

use crate::error::SiteError;
use crate::images::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level site configuration. Every key is optional.
///
/// ```yaml
/// markdown:
///   extensions: [".md"]
///   layout: "layouts/page.html"
///   highlight:
///     theme: "github-dark"
///   unwrap_images: true
///   heading_slugs: true
///
/// adapter:
///   images:
///     sizes: [640, 828, 1200, 1920, 3840]
///     formats: ["image/avif", "image/webp"]
///     minimum_cache_ttl: 300
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub markdown: MarkdownOptions,
    pub adapter: AdapterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownOptions {
    /// File extensions rendered as pages. Everything else is copied as-is.
    pub extensions: Vec<String>,
    /// HTML layout wrapping each page; must contain the content slot.
    pub layout: Option<PathBuf>,
    pub highlight: HighlightConfig,
    /// Drop the `<p>` around paragraphs that hold nothing but images.
    pub unwrap_images: bool,
    /// Give headings slug `id`s.
    pub heading_slugs: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".md".to_string()],
            layout: None,
            highlight: HighlightConfig::default(),
            unwrap_images: true,
            heading_slugs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    pub theme: String,
    /// Language used for fences without an info string.
    pub default_lang: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "github-dark".to_string(),
            default_lang: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    pub images: ImageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Candidate widths in pixels, strictly ascending.
    pub sizes: Vec<u32>,
    /// Preferred output formats, best first.
    pub formats: Vec<ImageFormat>,
    /// Seconds.
    pub minimum_cache_ttl: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            sizes: vec![640, 828, 1200, 1920, 3840],
            formats: vec![ImageFormat::Avif, ImageFormat::Webp],
            minimum_cache_ttl: 300,
        }
    }
}

impl SiteConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SiteError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| SiteError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate. A relative `layout` is resolved against the
    /// config file's directory.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let text = std::fs::read_to_string(path).map_err(|source| SiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&text)?;
        if let Some(layout) = config.markdown.layout.as_mut() {
            if layout.is_relative() {
                if let Some(dir) = path.parent() {
                    *layout = dir.join(&*layout);
                }
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SiteError> {
        let invalid = |reason: String| Err(SiteError::Invalid { reason });

        if self.markdown.extensions.is_empty() {
            return invalid("markdown.extensions must not be empty".to_string());
        }
        for ext in &self.markdown.extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return invalid(format!("extension {ext:?} must look like \".md\""));
            }
        }

        let images = &self.adapter.images;
        if images.sizes.is_empty() {
            return invalid("adapter.images.sizes must not be empty".to_string());
        }
        if images.sizes.contains(&0) {
            return invalid("adapter.images.sizes must be non-zero".to_string());
        }
        if images.sizes.windows(2).any(|w| w[0] >= w[1]) {
            return invalid("adapter.images.sizes must be strictly ascending".to_string());
        }
        if images.formats.is_empty() {
            return invalid("adapter.images.formats must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_site_setup() {
        let config = SiteConfig::from_yaml_str("{}").expect("parse config");
        assert_eq!(config.markdown.extensions, vec![".md"]);
        assert_eq!(config.markdown.highlight.theme, "github-dark");
        assert!(config.markdown.unwrap_images);
        assert!(config.markdown.heading_slugs);
        assert_eq!(config.adapter.images.sizes, vec![640, 828, 1200, 1920, 3840]);
        assert_eq!(
            config.adapter.images.formats,
            vec![ImageFormat::Avif, ImageFormat::Webp]
        );
        assert_eq!(config.adapter.images.minimum_cache_ttl, 300);
    }

    #[test]
    fn parse_overrides() {
        let yaml = r#"
markdown:
  extensions: [".md", ".markdown"]
  highlight:
    theme: "solarized-light"
  unwrap_images: false
adapter:
  images:
    sizes: [320, 640]
    formats: ["image/webp"]
    minimum_cache_ttl: 60
"#;
        let config = SiteConfig::from_yaml_str(yaml).expect("parse config");
        assert_eq!(config.markdown.extensions.len(), 2);
        assert_eq!(config.markdown.highlight.theme, "solarized-light");
        assert_eq!(config.markdown.highlight.default_lang, "text");
        assert!(!config.markdown.unwrap_images);
        assert_eq!(config.adapter.images.formats, vec![ImageFormat::Webp]);
    }

    #[test]
    fn rejects_unsorted_sizes() {
        let err = SiteConfig::from_yaml_str("adapter:\n  images:\n    sizes: [828, 640]\n")
            .unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn rejects_bad_extension_and_unknown_keys() {
        let err = SiteConfig::from_yaml_str("markdown:\n  extensions: [md]\n").unwrap_err();
        assert!(matches!(err, SiteError::Invalid { .. }));
        let err = SiteConfig::from_yaml_str("kit:\n  adapter: vercel\n").unwrap_err();
        assert!(matches!(err, SiteError::Parse { .. }));
    }

    #[test]
    fn load_resolves_layout_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.yaml");
        std::fs::write(&path, "markdown:\n  layout: layouts/page.html\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(
            config.markdown.layout,
            Some(dir.path().join("layouts/page.html"))
        );
    }
}
