use anyhow::Result;
use rayon::prelude::*;

use assetpress_core::{ImageAsset, RunStats};
use assetpress_discover::{DiscoverOptions, discover};
use assetpress_engine::{BackupGuard, VariantConfig, generate_variants};

use crate::config::Config;

/// Non-destructive mode: WebP/AVIF derivatives plus breakpoint variants for
/// every candidate.
pub fn handle(config: &Config) -> Result<()> {
    println!("assetpress optimize");
    println!(
        "Target formats: WebP, AVIF; breakpoints: {}\n",
        config
            .breakpoints
            .iter()
            .map(|w| format!("{w}px"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let variant_config = VariantConfig {
        breakpoints: config.breakpoints.clone(),
        webp_quality: config.quality.webp,
        avif_quality: config.quality.avif,
    };
    let options = DiscoverOptions {
        min_bytes: config.thresholds.optimize_min_bytes,
        exclude: config.exclude_list(),
    };
    let candidates: Vec<ImageAsset> = discover(&config.roots, &options).collect();
    tracing::info!("discovered {} candidates", candidates.len());
    let guard = BackupGuard::new();

    let stats = candidates
        .par_iter()
        .map(|asset| generate_variants(asset, &variant_config, &guard).0)
        .fold(RunStats::default, |mut acc, outcome| {
            acc.record(&outcome);
            acc
        })
        .reduce(RunStats::default, RunStats::merge);

    print!("{}", stats.into_report(5));
    Ok(())
}
