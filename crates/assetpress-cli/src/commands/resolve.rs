use anyhow::{Result, bail};

use assetpress_resolve::{AssetIndex, Resolution};

use crate::config::Config;

/// Resolve one logical reference. An unresolved reference is a
/// build-integrity failure, so it exits non-zero.
pub fn handle(config: &Config, reference: &str) -> Result<()> {
    let index = build_index(config);
    match index.resolve(reference) {
        Resolution::Local(asset) => {
            println!(
                "{} ({}x{})",
                asset.path.display(),
                asset.width,
                asset.height
            );
            Ok(())
        }
        Resolution::External(url) => {
            println!("{url} (external)");
            Ok(())
        }
        Resolution::Unresolved => bail!("unresolved reference: {reference}"),
    }
}

/// Print the whole index so dangling references can be audited.
pub fn print_map(config: &Config) -> Result<()> {
    let index = build_index(config);

    if index.is_empty() {
        println!("No assets indexed.");
        return Ok(());
    }

    println!("Indexed assets ({}):", index.len());
    for (key, asset) in index.entries() {
        println!("  {key} -> {} ({}x{})", asset.path.display(), asset.width, asset.height);
    }
    Ok(())
}

fn build_index(config: &Config) -> AssetIndex {
    AssetIndex::build(&config.roots, config.resolve.public_prefixes.clone())
}
