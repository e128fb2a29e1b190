use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assetpress")]
#[command(about = "Asset optimization and resolution pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a config file (defaults to ./assetpress.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Downscale oversized photos to their usage-policy width, in place.
    /// Originals are backed up with the .original infix first.
    Resize,

    /// Generate WebP/AVIF derivatives and responsive breakpoint variants
    /// alongside the originals (non-destructive)
    Optimize,

    /// Resolve a logical asset reference against the build-time index
    Resolve {
        /// Logical reference, e.g. "portfolio/hero.webp" or a full URL
        reference: String,
    },

    /// Build the resolution index and print every entry
    Map,
}
