//! Build-time asset resolution map.
//!
//! Turns logical asset references used by presentation code into resolved
//! physical descriptors carrying natural dimensions. Built once, eagerly,
//! from the full local-asset tree; immutable and lock-free to read
//! afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;
use walkdir::WalkDir;

use assetpress_core::ImageFormat;
use assetpress_core::asset::is_backup_path;
use assetpress_discover::ExcludeList;

/// The concrete location a logical reference maps to, with natural
/// dimensions so consumers can emit explicit width/height and avoid layout
/// shift. SVG entries carry 0x0 (dimensions unknown, never resized).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Outcome of resolving one logical reference. Consumers pattern-match;
/// there is no field-probing fallback and no silently broken path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local(ResolvedAsset),
    /// Remote URL or conventionally-prefixed public path, verbatim.
    External(String),
    /// Dangling reference: a build-integrity problem the caller must report.
    Unresolved,
}

/// Eager, immutable index of every recognized local asset, keyed by
/// root-relative path. `BTreeMap` keys iterate in lexicographic order, which
/// pins the suffix-match tie-break deterministically for a given tree.
pub struct AssetIndex {
    entries: BTreeMap<String, ResolvedAsset>,
    public_prefixes: Vec<String>,
}

impl AssetIndex {
    /// Walk the asset roots once and probe dimensions for every entry.
    /// Backup files and excluded directories are not indexed.
    pub fn build(roots: &[PathBuf], public_prefixes: Vec<String>) -> Self {
        let exclude = ExcludeList::default();
        let mut entries = BTreeMap::new();

        for root in roots.iter().filter(|r| r.is_dir()) {
            let walk = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| {
                    !(e.file_type().is_dir()
                        && exclude.is_excluded(&e.file_name().to_string_lossy()))
                });
            for entry in walk {
                let entry = match entry {
                    Ok(e) if e.file_type().is_file() => e,
                    Ok(_) => continue,
                    Err(err) => {
                        warn!("skipping unreadable entry: {err}");
                        continue;
                    }
                };
                let path = entry.path();
                let Some(format) = recognized_format(path) else {
                    continue;
                };
                if is_backup_path(path) {
                    continue;
                }
                let key = relative_key(root, path);
                let (width, height) = probe(path, format);
                entries.insert(
                    key,
                    ResolvedAsset {
                        path: path.to_path_buf(),
                        width,
                        height,
                    },
                );
            }
        }

        Self {
            entries,
            public_prefixes,
        }
    }

    /// Index over pre-resolved entries. Used by tests and by callers that
    /// already hold asset metadata.
    pub fn from_entries(
        entries: BTreeMap<String, ResolvedAsset>,
        public_prefixes: Vec<String>,
    ) -> Self {
        Self {
            entries,
            public_prefixes,
        }
    }

    /// Resolve a logical reference. Precedence: network scheme, public
    /// prefix, exact key match, then suffix match in stable key order.
    pub fn resolve(&self, logical: &str) -> Resolution {
        if logical.is_empty() {
            return Resolution::Unresolved;
        }
        if logical.starts_with("http://") || logical.starts_with("https://") {
            return Resolution::External(logical.to_string());
        }
        if self
            .public_prefixes
            .iter()
            .any(|prefix| logical.starts_with(prefix.as_str()))
        {
            return Resolution::External(logical.to_string());
        }

        let normalized = normalize(logical);
        if let Some(found) = self.entries.get(normalized.as_str()) {
            return Resolution::Local(found.clone());
        }

        // Fallback for references missing their leading folders: match on
        // whole trailing path segments, first key in stable order wins.
        let suffix = format!("/{normalized}");
        if let Some(found) = self
            .entries
            .iter()
            .find(|(key, _)| key.ends_with(&suffix))
            .map(|(_, v)| v)
        {
            return Resolution::Local(found.clone());
        }

        Resolution::Unresolved
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ResolvedAsset)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn recognized_format(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !ImageFormat::INDEXED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    ImageFormat::from_extension(&ext)
}

fn probe(path: &Path, format: ImageFormat) -> (u32, u32) {
    if !format.is_resizable() {
        return (0, 0);
    }
    let reader = match image::ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(err) => {
            warn!("cannot open {}: {err}", path.display());
            return (0, 0);
        }
    };
    match reader.into_dimensions() {
        Ok(dims) => dims,
        Err(err) => {
            warn!("no dimensions for {}: {err}", path.display());
            (0, 0)
        }
    }
}

/// Root-relative key with forward slashes regardless of platform.
fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip the leading slash and any `assets/` mount prefix, matching how
/// presentation code writes references.
fn normalize(logical: &str) -> String {
    let trimmed = logical.trim_start_matches('/');
    let trimmed = trimmed.strip_prefix("assets/").unwrap_or(trimmed);
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn entry(path: &str, width: u32, height: u32) -> (String, ResolvedAsset) {
        (
            path.to_string(),
            ResolvedAsset {
                path: PathBuf::from(path),
                width,
                height,
            },
        )
    }

    fn index(entries: Vec<(String, ResolvedAsset)>) -> AssetIndex {
        AssetIndex::from_entries(entries.into_iter().collect(), vec![])
    }

    #[test]
    fn test_external_passthrough_is_verbatim() {
        let idx = index(vec![entry("a/img.webp", 10, 10)]);
        let url = "https://example.com/x.jpg";
        assert_eq!(idx.resolve(url), Resolution::External(url.to_string()));
    }

    #[test]
    fn test_public_prefix_passthrough() {
        let idx = AssetIndex::from_entries(
            BTreeMap::new(),
            vec!["/videos/".to_string()],
        );
        let reference = "/videos/testimonial-1.mp4";
        assert_eq!(
            idx.resolve(reference),
            Resolution::External(reference.to_string())
        );
    }

    #[test]
    fn test_exact_match_beats_suffix_match() {
        let idx = index(vec![
            entry("a/b/img.webp", 100, 50),
            entry("c/b/img.webp", 200, 80),
        ]);
        // A suffix match against "b/img.webp" could ambiguously hit either;
        // the exact key must win.
        match idx.resolve("a/b/img.webp") {
            Resolution::Local(asset) => assert_eq!(asset.width, 100),
            other => panic!("expected local resolution, got {other:?}"),
        }
    }

    #[test]
    fn test_suffix_fallback_is_deterministic() {
        let idx = index(vec![
            entry("z/late/img.webp", 1, 1),
            entry("a/early/img.webp", 2, 2),
        ]);
        // No exact key "img.webp"; the first suffix match in key order wins.
        match idx.resolve("img.webp") {
            Resolution::Local(asset) => assert_eq!(asset.path, PathBuf::from("a/early/img.webp")),
            other => panic!("expected local resolution, got {other:?}"),
        }
    }

    #[test]
    fn test_suffix_matches_whole_segments_only() {
        let idx = index(vec![entry("portfolio/night-img.webp", 1, 1)]);
        assert_eq!(idx.resolve("img.webp"), Resolution::Unresolved);
    }

    #[test]
    fn test_mount_prefix_and_leading_slash_stripped() {
        let idx = index(vec![entry("portfolio/img.webp", 30, 20)]);
        for reference in [
            "portfolio/img.webp",
            "/portfolio/img.webp",
            "/assets/portfolio/img.webp",
            "assets/portfolio/img.webp",
        ] {
            assert!(
                matches!(idx.resolve(reference), Resolution::Local(_)),
                "failed for {reference}"
            );
        }
    }

    #[test]
    fn test_unresolved_is_explicit() {
        let idx = index(vec![entry("a/img.webp", 1, 1)]);
        assert_eq!(idx.resolve("missing.webp"), Resolution::Unresolved);
        assert_eq!(idx.resolve(""), Resolution::Unresolved);
    }

    #[test]
    fn test_build_probes_dimensions_and_skips_backups() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("portfolio");
        fs::create_dir_all(&dir).unwrap();

        DynamicImage::ImageRgb8(RgbImage::new(64, 48))
            .save_with_format(dir.join("photo.png"), image::ImageFormat::Png)
            .unwrap();
        fs::write(dir.join("photo.original.png"), b"backup").unwrap();
        fs::write(dir.join("logo.svg"), b"<svg></svg>").unwrap();
        fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let idx = AssetIndex::build(&[tmp.path().to_path_buf()], vec![]);
        assert_eq!(idx.len(), 2);

        match idx.resolve("portfolio/photo.png") {
            Resolution::Local(asset) => {
                assert_eq!((asset.width, asset.height), (64, 48));
            }
            other => panic!("expected local resolution, got {other:?}"),
        }
        match idx.resolve("portfolio/logo.svg") {
            Resolution::Local(asset) => assert_eq!((asset.width, asset.height), (0, 0)),
            other => panic!("expected local resolution, got {other:?}"),
        }
        assert_eq!(idx.resolve("portfolio/photo.original.png"), Resolution::Unresolved);
    }
}
