use serde::{Deserialize, Serialize};
use std::path::Path;

/// Formats the pipeline recognizes. Encode/decode decisions dispatch on this
/// enum rather than on raw extension strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Avif,
    Svg,
}

impl ImageFormat {
    /// Extensions the optimization passes will pick up as candidates.
    /// SVG and AVIF are deliberately absent: SVG is never resized, and AVIF
    /// files are this pipeline's own output.
    pub const RASTER_EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg", "png", "webp"];

    /// Extensions the resolution index recognizes.
    pub const INDEXED_EXTENSIONS: &'static [&'static str] =
        &["jpg", "jpeg", "png", "webp", "svg"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "avif" => Some(Self::Avif),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Avif => "avif",
            Self::Svg => "svg",
        }
    }

    /// SVG is vector data; everything else can be decoded and resized.
    pub fn is_resizable(&self) -> bool {
        !matches!(self, Self::Svg)
    }
}
