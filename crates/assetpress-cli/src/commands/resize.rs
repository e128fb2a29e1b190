use anyhow::Result;
use rayon::prelude::*;

use assetpress_core::{ImageAsset, RunStats};
use assetpress_discover::{DiscoverOptions, discover};
use assetpress_engine::{BackupGuard, resize_in_place};

use crate::config::Config;

/// Destructive mode: downscale every oversized candidate to its policy
/// width. Each worker folds outcomes into its own stats value; the partials
/// are merged once at the end.
pub fn handle(config: &Config) -> Result<()> {
    println!("assetpress resize");
    println!("Backups are saved with the .original infix\n");

    let policy = config.usage_policy();
    let options = DiscoverOptions {
        min_bytes: config.thresholds.resize_min_bytes,
        exclude: config.exclude_list(),
    };
    let candidates: Vec<ImageAsset> = discover(&config.roots, &options).collect();
    tracing::info!("discovered {} candidates", candidates.len());
    let guard = BackupGuard::new();

    let stats = candidates
        .par_iter()
        .map(|asset| {
            let target = policy.max_width_for(&asset.file_name());
            resize_in_place(asset, target, config.quality.resize_webp, &guard)
        })
        .fold(RunStats::default, |mut acc, outcome| {
            acc.record(&outcome);
            acc
        })
        .reduce(RunStats::default, RunStats::merge);

    print!("{}", stats.into_report(5));
    Ok(())
}
