use std::fs;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{info, warn};

use assetpress_core::{FileOutcome, ImageAsset, ImageFormat, SkipReason, VariantDescriptor};

use crate::backup::BackupGuard;
use crate::codec::{decode, encode};
use crate::orient::normalized;
use crate::replace::write_atomic;

pub struct VariantConfig {
    /// Device-tier target widths, e.g. mobile/tablet/desktop.
    pub breakpoints: Vec<u32>,
    pub webp_quality: u8,
    pub avif_quality: u8,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![640, 1024, 1440],
            webp_quality: 75,
            avif_quality: 65,
        }
    }
}

/// Everything the non-destructive pass produced for one asset.
#[derive(Debug, Clone)]
pub struct VariantSet {
    /// The WebP derivative every consumer can rely on.
    pub primary: VariantDescriptor,
    /// AVIF derivative; absent when the source was already WebP.
    pub extra: Option<VariantDescriptor>,
    /// One descriptor per configured breakpoint, ascending by breakpoint.
    pub responsive: Vec<VariantDescriptor>,
}

impl VariantSet {
    /// `"<path> <width>w, ..."` ascending by width, ready for an `srcset`
    /// attribute. Tiers that reuse the primary derivative collapse into one
    /// entry.
    pub fn srcset(&self) -> String {
        let mut seen = Vec::new();
        let mut parts = Vec::new();
        for v in &self.responsive {
            if seen.contains(&v.rel_path) {
                continue;
            }
            seen.push(v.rel_path.clone());
            parts.push(format!("{} {}w", v.rel_path, v.width));
        }
        parts.join(", ")
    }
}

/// Produce modern-format and breakpoint derivatives for one asset.
///
/// The primary WebP is written alongside the original, except when the
/// original is itself WebP: then it is re-encoded in place (backed up first,
/// atomic rename). A failed breakpoint or AVIF encode is logged and dropped
/// without cancelling the rest.
pub fn generate_variants(
    asset: &ImageAsset,
    config: &VariantConfig,
    guard: &BackupGuard,
) -> (FileOutcome, Option<VariantSet>) {
    let skip = |reason: SkipReason| {
        warn!("SKIP {}: {reason}", asset.file_name());
        (
            FileOutcome::Skipped {
                path: asset.path.clone(),
                reason,
            },
            None,
        )
    };

    let bytes = match fs::read(&asset.path) {
        Ok(bytes) => bytes,
        Err(e) => return skip(SkipReason::DecodeFailed(e.to_string())),
    };
    let image = match decode(&bytes) {
        Ok(image) => normalized(image, &bytes),
        Err(e) => return skip(SkipReason::DecodeFailed(e.to_string())),
    };
    let (width, height) = (image.width(), image.height());
    let source_is_webp = asset.format() == Some(ImageFormat::Webp);

    // Primary derivative. Its failure fails the whole file; everything
    // after it is isolated.
    let primary_bytes = match encode(&image, ImageFormat::Webp, config.webp_quality) {
        Ok(b) => b,
        Err(e) => return skip(SkipReason::EncodeFailed(e.to_string())),
    };
    let primary_path = if source_is_webp {
        if let Err(e) = guard.ensure(asset) {
            return skip(SkipReason::BackupFailed(e.to_string()));
        }
        asset.path.clone()
    } else {
        asset.derivative_path(ImageFormat::Webp)
    };
    if let Err(e) = write_atomic(&primary_path, &primary_bytes) {
        return skip(SkipReason::EncodeFailed(e.to_string()));
    }
    let primary = VariantDescriptor {
        width,
        height,
        rel_path: file_name(&primary_path),
        size_bytes: primary_bytes.len() as u64,
    };

    let extra = if source_is_webp {
        None
    } else {
        match encode(&image, ImageFormat::Avif, config.avif_quality) {
            Ok(avif_bytes) => {
                let avif_path = asset.derivative_path(ImageFormat::Avif);
                match write_atomic(&avif_path, &avif_bytes) {
                    Ok(()) => Some(VariantDescriptor {
                        width,
                        height,
                        rel_path: file_name(&avif_path),
                        size_bytes: avif_bytes.len() as u64,
                    }),
                    Err(e) => {
                        warn!("avif write failed for {}: {e}", asset.file_name());
                        None
                    }
                }
            }
            Err(e) => {
                warn!("avif encode failed for {}: {e}", asset.file_name());
                None
            }
        }
    };

    let mut breakpoints = config.breakpoints.clone();
    breakpoints.sort_unstable();
    let mut responsive = Vec::with_capacity(breakpoints.len());
    for bp in breakpoints {
        if bp >= width {
            // Never upscale: this tier serves the primary derivative.
            responsive.push(primary.clone());
            continue;
        }
        match breakpoint_variant(asset, &image, bp, width, height, config.webp_quality) {
            Ok(descriptor) => responsive.push(descriptor),
            Err(e) => warn!("breakpoint {bp}w failed for {}: {e}", asset.file_name()),
        }
    }

    let set = VariantSet {
        primary,
        extra,
        responsive,
    };
    let outcome = FileOutcome::Processed {
        path: asset.path.clone(),
        original_bytes: asset.size_bytes,
        optimized_bytes: set.primary.size_bytes,
    };
    info!(
        "optimized {}: {} tiers, srcset: {}",
        asset.file_name(),
        set.responsive.len(),
        set.srcset()
    );
    (outcome, Some(set))
}

fn breakpoint_variant(
    asset: &ImageAsset,
    image: &DynamicImage,
    breakpoint: u32,
    width: u32,
    height: u32,
    quality: u8,
) -> assetpress_core::Result<VariantDescriptor> {
    let new_height = (height as f64 * breakpoint as f64 / width as f64).round() as u32;
    // Contain fit: scale to the tier width, no cropping.
    let resized = image.resize(breakpoint, new_height.max(1), FilterType::Lanczos3);
    let encoded = encode(&resized, ImageFormat::Webp, quality)?;
    let path = asset.variant_path(breakpoint, ImageFormat::Webp);
    write_atomic(&path, &encoded)?;
    Ok(VariantDescriptor {
        width: resized.width(),
        height: resized.height(),
        rel_path: file_name(&path),
        size_bytes: encoded.len() as u64,
    })
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
