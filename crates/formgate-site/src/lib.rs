//! Build-time site configuration and the markdown page pipeline.
//!
//! Everything is wired explicitly: a [`SiteConfig`] and a [`Highlighter`]
//! are handed to [`SitePipeline::new`] at startup. There is no process-wide
//! highlighter or config.

pub mod config;
pub mod error;
pub mod highlight;
pub mod images;
pub mod markdown;
pub mod pipeline;

pub use config::{AdapterConfig, HighlightConfig, ImageConfig, MarkdownOptions, SiteConfig};
pub use error::SiteError;
pub use highlight::{Highlighter, PlainHighlighter};
pub use images::{ImageAdapter, ImageFormat, ImagePlan, ImageVariants};
pub use markdown::render_markdown;
pub use pipeline::{BuildReport, SitePipeline, CONTENT_SLOT};
