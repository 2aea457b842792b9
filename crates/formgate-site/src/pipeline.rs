//! Site build: render every page under a source tree, copy everything else.

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::highlight::{Highlighter, PlainHighlighter};
use crate::images::{ImageAdapter, ImageVariants};
use crate::markdown::render_markdown;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Placeholder in a layout file replaced by the rendered page.
pub const CONTENT_SLOT: &str = "{{ content }}";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rendered pages, relative to the output directory.
    pub pages: Vec<PathBuf>,
    /// Files copied verbatim, relative to the output directory.
    pub assets: Vec<PathBuf>,
    /// Image assets among `assets` with the variants the adapter will serve.
    pub images: Vec<ImageVariants>,
}

pub struct SitePipeline {
    config: SiteConfig,
    highlighter: Box<dyn Highlighter>,
    layout: Option<String>,
    pages: GlobSet,
    images: ImageAdapter,
}

impl std::fmt::Debug for SitePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SitePipeline")
            .field("config", &self.config)
            .field("layout", &self.layout.is_some())
            .finish_non_exhaustive()
    }
}

impl SitePipeline {
    pub fn new(config: SiteConfig, highlighter: Box<dyn Highlighter>) -> Result<Self, SiteError> {
        config.validate()?;

        let mut builder = GlobSetBuilder::new();
        for ext in &config.markdown.extensions {
            let glob = Glob::new(&format!("**/*{ext}")).map_err(|e| SiteError::Invalid {
                reason: format!("extension {ext:?}: {e}"),
            })?;
            builder.add(glob);
        }
        let pages = builder.build().map_err(|e| SiteError::Invalid {
            reason: e.to_string(),
        })?;

        let layout = match &config.markdown.layout {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| SiteError::Read {
                    path: path.clone(),
                    source,
                })?;
                if !text.contains(CONTENT_SLOT) {
                    return Err(SiteError::LayoutSlot {
                        path: path.clone(),
                        slot: CONTENT_SLOT,
                    });
                }
                Some(text)
            }
            None => None,
        };

        let images = ImageAdapter::new(config.adapter.images.clone());
        Ok(Self {
            config,
            highlighter,
            layout,
            pages,
            images,
        })
    }

    /// Pipeline using [`PlainHighlighter`] with the configured theme.
    pub fn with_plain_highlighter(config: SiteConfig) -> Result<Self, SiteError> {
        let highlighter = PlainHighlighter::from_config(&config.markdown.highlight);
        Self::new(config, Box::new(highlighter))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn images(&self) -> &ImageAdapter {
        &self.images
    }

    pub fn is_page(&self, relative: &Path) -> bool {
        self.pages.is_match(relative)
    }

    /// Render one page body and wrap it in the layout, if any.
    pub fn render_page(&self, source: &str) -> String {
        let body = render_markdown(source, &self.config.markdown, self.highlighter.as_ref());
        match &self.layout {
            Some(layout) => layout.replacen(CONTENT_SLOT, &body, 1),
            None => body,
        }
    }

    pub fn build(&self, src_dir: &Path, out_dir: &Path) -> Result<BuildReport, SiteError> {
        let mut files = Vec::new();
        collect_files(src_dir, src_dir, &mut files)?;
        files.sort();

        let mut report = BuildReport::default();
        for relative in files {
            let src = src_dir.join(&relative);
            if self.is_page(&relative) {
                let source = std::fs::read_to_string(&src)
                    .map_err(|source| SiteError::Read { path: src.clone(), source })?;
                let out_rel = relative.with_extension("html");
                write_output(&out_dir.join(&out_rel), self.render_page(&source).as_bytes())?;
                tracing::debug!(page = %out_rel.display(), "rendered page");
                report.pages.push(out_rel);
            } else {
                let bytes = std::fs::read(&src)
                    .map_err(|source| SiteError::Read { path: src.clone(), source })?;
                write_output(&out_dir.join(&relative), &bytes)?;
                if let Some(variants) = self.images.variants(&relative) {
                    report.images.push(variants);
                }
                report.assets.push(relative);
            }
        }

        tracing::info!(
            pages = report.pages.len(),
            assets = report.assets.len(),
            images = report.images.len(),
            out = %out_dir.display(),
            "site build complete"
        );
        Ok(report)
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SiteError> {
    let entries = std::fs::read_dir(dir).map_err(|source| SiteError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| SiteError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| SiteError::Read {
            path: path.clone(),
            source,
        })?;
        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if file_type.is_file() {
            if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), SiteError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SiteError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| SiteError::Write {
        path: path.to_path_buf(),
        source,
    })
}
