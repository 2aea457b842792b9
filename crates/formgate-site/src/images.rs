//! Image adapter: output format negotiation, width selection, cache headers.

use crate::config::ImageConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Asset extensions the adapter resizes and re-encodes.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "avif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    #[serde(rename = "image/avif")]
    Avif,
    #[serde(rename = "image/webp")]
    Webp,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl ImageFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Avif => "image/avif",
            Self::Webp => "image/webp",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// What to serve for one image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    /// `None` means serve the original encoding.
    pub format: Option<ImageFormat>,
    pub width: u32,
    pub cache_control: String,
}

/// Widths and encodings an image asset is offered in after a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageVariants {
    /// Relative to the output directory.
    pub path: PathBuf,
    pub widths: Vec<u32>,
    pub formats: Vec<ImageFormat>,
    pub cache_control: String,
}

#[derive(Debug, Clone)]
pub struct ImageAdapter {
    config: ImageConfig,
}

impl ImageAdapter {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn plan(&self, accept: &str, requested_width: u32) -> ImagePlan {
        ImagePlan {
            format: negotiate_format(accept, &self.config.formats),
            width: select_width(requested_width, &self.config.sizes),
            cache_control: cache_control(self.config.minimum_cache_ttl),
        }
    }

    pub fn is_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                RASTER_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Variants planned for `path`, or `None` when it is not a raster image.
    pub fn variants(&self, path: &Path) -> Option<ImageVariants> {
        Self::is_image(path).then(|| ImageVariants {
            path: path.to_path_buf(),
            widths: self.config.sizes.clone(),
            formats: self.config.formats.clone(),
            cache_control: cache_control(self.config.minimum_cache_ttl),
        })
    }
}

struct MediaRange<'a> {
    kind: &'a str,
    subtype: &'a str,
    q: f32,
}

impl MediaRange<'_> {
    /// 2 = exact, 1 = `type/*`, 0 = `*/*`.
    fn specificity(&self, mime: &str) -> Option<u8> {
        let (kind, subtype) = mime.split_once('/')?;
        match (self.kind, self.subtype) {
            ("*", "*") => Some(0),
            (k, "*") if k.eq_ignore_ascii_case(kind) => Some(1),
            (k, s) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(subtype) => Some(2),
            _ => None,
        }
    }
}

fn parse_accept(accept: &str) -> Vec<MediaRange<'_>> {
    accept
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let (kind, subtype) = parts.next()?.trim().split_once('/')?;
            let mut q = 1.0;
            for param in parts {
                if let Some((key, value)) = param.trim().split_once('=') {
                    if key.trim().eq_ignore_ascii_case("q") {
                        q = value.trim().parse().unwrap_or(0.0);
                    }
                }
            }
            Some(MediaRange {
                kind: kind.trim(),
                subtype: subtype.trim(),
                q,
            })
        })
        .collect()
}

/// First configured format the `Accept` header admits.
///
/// The most specific matching range decides the quality, so
/// `image/*, image/avif;q=0` admits webp but not avif.
pub fn negotiate_format(accept: &str, formats: &[ImageFormat]) -> Option<ImageFormat> {
    let ranges = parse_accept(accept);
    formats.iter().copied().find(|format| {
        ranges
            .iter()
            .filter_map(|range| range.specificity(format.mime()).map(|s| (s, range.q)))
            .max_by_key(|(specificity, _)| *specificity)
            .is_some_and(|(_, q)| q > 0.0)
    })
}

/// Smallest configured width covering the request, else the largest.
pub fn select_width(requested: u32, sizes: &[u32]) -> u32 {
    sizes
        .iter()
        .copied()
        .find(|&size| size >= requested)
        .or_else(|| sizes.last().copied())
        .unwrap_or(requested)
}

pub fn cache_control(ttl_secs: u64) -> String {
    format!("public, max-age={ttl_secs}, must-revalidate")
}
