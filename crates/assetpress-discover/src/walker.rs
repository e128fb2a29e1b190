use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use assetpress_core::ImageAsset;
use assetpress_core::asset::{is_backup_path, is_variant_path};
use assetpress_core::format::ImageFormat;

use crate::exclude::ExcludeList;

pub struct DiscoverOptions {
    /// Files below this size are not worth touching. Each run mode carries
    /// its own threshold.
    pub min_bytes: u64,
    pub exclude: ExcludeList,
}

/// Walk the given roots and yield optimization candidates lazily.
///
/// Roots that do not exist are skipped. Excluded directories are pruned
/// whole. An unreadable directory is logged and its subtree skipped; the
/// walk itself never aborts. Entries are visited in file-name order, so
/// re-walking an unchanged tree yields the same sequence.
pub fn discover<'a>(
    roots: &'a [PathBuf],
    options: &'a DiscoverOptions,
) -> impl Iterator<Item = ImageAsset> + 'a {
    roots
        .iter()
        .filter(|root| root.is_dir())
        .flat_map(move |root| {
            WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(move |entry| {
                    !(entry.file_type().is_dir()
                        && options
                            .exclude
                            .is_excluded(&entry.file_name().to_string_lossy()))
                })
                .filter_map(move |entry| match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        select(entry.path(), options)
                    }
                    Ok(_) => None,
                    Err(err) => {
                        warn!("skipping unreadable entry: {err}");
                        None
                    }
                })
        })
}

fn select(path: &Path, options: &DiscoverOptions) -> Option<ImageAsset> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !ImageFormat::RASTER_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }

    // Never feed the pipeline its own outputs back in.
    if is_backup_path(path) || is_variant_path(path) {
        return None;
    }

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) => {
            warn!("skipping unreadable file {}: {err}", path.display());
            return None;
        }
    };

    if metadata.len() < options.min_bytes {
        debug!(
            "skipping {} ({} bytes, below threshold)",
            path.display(),
            metadata.len()
        );
        return None;
    }

    Some(ImageAsset::new(path.to_path_buf(), metadata.len()))
}
