use std::fs;

use image::imageops::FilterType;
use tracing::{info, warn};

use assetpress_core::{FileOutcome, ImageAsset, SkipReason};

use crate::backup::BackupGuard;
use crate::codec::{decode, encode, probe_dimensions};
use crate::orient::normalized;
use crate::replace::write_atomic;

/// Destructively downscale an asset to its policy width and re-encode it as
/// WebP at `quality`, replacing the bytes at the original path.
///
/// Skips without touching the file when the natural width is already at or
/// below `target_width`, which makes a rerun a no-op. All failures are
/// per-file: the returned outcome says what happened, nothing propagates.
pub fn resize_in_place(
    asset: &ImageAsset,
    target_width: u32,
    quality: u8,
    guard: &BackupGuard,
) -> FileOutcome {
    let skip = |reason: SkipReason| {
        warn!("SKIP {}: {reason}", asset.file_name());
        FileOutcome::Skipped {
            path: asset.path.clone(),
            reason,
        }
    };

    let bytes = match fs::read(&asset.path) {
        Ok(bytes) => bytes,
        Err(e) => return skip(SkipReason::DecodeFailed(e.to_string())),
    };

    let Some((width, height)) = probe_dimensions(&bytes) else {
        return skip(SkipReason::UnreadableMetadata);
    };

    // No upscaling, no shrink-then-grow. This check is also what makes a
    // second run against an already-resized file a no-op.
    if width <= target_width {
        return skip(SkipReason::AlreadyFits {
            width,
            target: target_width,
        });
    }

    if let Err(e) = guard.ensure(asset) {
        return skip(SkipReason::BackupFailed(e.to_string()));
    }

    let image = match decode(&bytes) {
        Ok(image) => normalized(image, &bytes),
        Err(e) => return skip(SkipReason::DecodeFailed(e.to_string())),
    };

    let new_height = (height as f64 * target_width as f64 / width as f64).round() as u32;
    let resized = image.resize_to_fill(target_width, new_height, FilterType::Lanczos3);

    let encoded = match encode(&resized, assetpress_core::ImageFormat::Webp, quality) {
        Ok(encoded) => encoded,
        Err(e) => return skip(SkipReason::EncodeFailed(e.to_string())),
    };

    if let Err(e) = write_atomic(&asset.path, &encoded) {
        return skip(SkipReason::EncodeFailed(e.to_string()));
    }

    let outcome = FileOutcome::Processed {
        path: asset.path.clone(),
        original_bytes: asset.size_bytes,
        optimized_bytes: encoded.len() as u64,
    };
    info!(
        "resized {}: {width}x{height} -> {target_width}x{new_height} (-{}%)",
        asset.file_name(),
        outcome.savings_percent()
    );
    outcome
}
