use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::ImageFormat;

/// Reserved infix for pristine pre-optimization copies
/// (`photo.jpg` -> `photo.original.jpg`).
pub const BACKUP_INFIX: &str = "original";

/// A raster image discovered in the source tree, identified by its path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ImageAsset {
    pub fn new(path: PathBuf, size_bytes: u64) -> Self {
        Self { path, size_bytes }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// File stem with extension and any format-variant suffix stripped
    /// (`photo.tmp.webp` -> `photo`). This is the key into the usage policy.
    pub fn base_name(&self) -> String {
        base_name_of(&self.path)
    }

    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_path(&self.path)
    }

    /// Sibling path holding the untouched original bytes.
    pub fn backup_path(&self) -> PathBuf {
        let stem = stem_of(&self.path);
        let ext = extension_of(&self.path);
        self.path
            .with_file_name(format!("{stem}.{BACKUP_INFIX}.{ext}"))
    }

    /// Sibling path for a modern-format derivative sharing the base name.
    pub fn derivative_path(&self, format: ImageFormat) -> PathBuf {
        let stem = stem_of(&self.path);
        self.path
            .with_file_name(format!("{stem}.{}", format.extension()))
    }

    /// Sibling path for a breakpoint-scaled derivative
    /// (`photo.jpg` + 640 -> `photo@640w.webp`).
    pub fn variant_path(&self, width: u32, format: ImageFormat) -> PathBuf {
        let stem = stem_of(&self.path);
        self.path
            .with_file_name(format!("{stem}@{width}w.{}", format.extension()))
    }
}

/// A derived file produced by the variant generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub width: u32,
    pub height: u32,
    /// File name relative to the source asset's directory.
    pub rel_path: String,
    pub size_bytes: u64,
}

/// True for files carrying the reserved backup infix before the extension.
pub fn is_backup_path(path: &Path) -> bool {
    stem_of(path).ends_with(&format!(".{BACKUP_INFIX}"))
}

/// True for files named with the breakpoint width-suffix convention.
pub fn is_variant_path(path: &Path) -> bool {
    let stem = stem_of(path);
    match stem.rsplit_once('@') {
        Some((_, tail)) => {
            tail.ends_with('w') && tail.len() > 1 && tail[..tail.len() - 1].chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn base_name_of(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}
