use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use assetpress_core::UsagePolicy;
use assetpress_discover::ExcludeList;

// ============================================================================
// Project config (./assetpress.toml)
// ============================================================================

/// Pipeline configuration. Every field has a compiled default, so a site
/// without an assetpress.toml gets the stock behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directories scanned for candidates and indexed for resolution.
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Directory names pruned from every walk.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Breakpoint widths for responsive variants, ascending.
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<u32>,

    #[serde(default)]
    pub thresholds: ThresholdConfig,

    #[serde(default)]
    pub quality: QualityConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Only photos at least this large are worth a destructive resize.
    #[serde(default = "default_resize_min_bytes")]
    pub resize_min_bytes: u64,

    /// Lower bar for the non-destructive optimize pass.
    #[serde(default = "default_optimize_min_bytes")]
    pub optimize_min_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default = "default_webp_quality")]
    pub webp: u8,

    /// The resize pass re-encodes at a slightly higher quality since it
    /// replaces the canonical file.
    #[serde(default = "default_resize_webp_quality")]
    pub resize_webp: u8,

    #[serde(default = "default_avif_quality")]
    pub avif: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_max_width")]
    pub default_max_width: u32,

    /// Base name -> maximum display width, from auditing where each image
    /// is actually used.
    #[serde(default)]
    pub max_widths: HashMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// References with these prefixes are served from a stable public
    /// location and pass through the resolver verbatim.
    #[serde(default = "default_public_prefixes")]
    pub public_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            exclude_dirs: default_exclude_dirs(),
            breakpoints: default_breakpoints(),
            thresholds: ThresholdConfig::default(),
            quality: QualityConfig::default(),
            policy: PolicyConfig::default(),
            resolve: ResolveConfig::default(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            resize_min_bytes: default_resize_min_bytes(),
            optimize_min_bytes: default_optimize_min_bytes(),
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            webp: default_webp_quality(),
            resize_webp: default_resize_webp_quality(),
            avif: default_avif_quality(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            default_max_width: default_max_width(),
            max_widths: HashMap::new(),
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            public_prefixes: default_public_prefixes(),
        }
    }
}

fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("src/assets")]
}

fn default_exclude_dirs() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "dist".to_string(),
    ]
}

fn default_breakpoints() -> Vec<u32> {
    vec![640, 1024, 1440]
}

fn default_resize_min_bytes() -> u64 {
    200_000
}

fn default_optimize_min_bytes() -> u64 {
    100_000
}

fn default_webp_quality() -> u8 {
    75
}

fn default_resize_webp_quality() -> u8 {
    80
}

fn default_avif_quality() -> u8 {
    65
}

fn default_max_width() -> u32 {
    1440
}

fn default_public_prefixes() -> Vec<String> {
    vec!["/videos/".to_string()]
}

impl Config {
    /// Load from an explicit path (which must exist), from ./assetpress.toml
    /// when present, or fall back to the compiled defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&content)?)
            }
            None => {
                let default_path = Path::new("assetpress.toml");
                if default_path.exists() {
                    let content = std::fs::read_to_string(default_path)?;
                    Ok(toml::from_str(&content)?)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn usage_policy(&self) -> UsagePolicy {
        UsagePolicy::new(
            self.policy.max_widths.clone(),
            self.policy.default_max_width,
        )
    }

    pub fn exclude_list(&self) -> ExcludeList {
        ExcludeList::new(self.exclude_dirs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.thresholds.resize_min_bytes, 200_000);
        assert_eq!(config.thresholds.optimize_min_bytes, 100_000);
        assert_eq!(config.breakpoints, vec![640, 1024, 1440]);
        assert_eq!(config.quality.webp, 75);
        assert_eq!(config.quality.resize_webp, 80);
        assert_eq!(config.quality.avif, 65);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            roots = ["site/images"]

            [policy.max_widths]
            "hero-banner" = 1200
            "#,
        )
        .unwrap();

        assert_eq!(config.roots, vec![PathBuf::from("site/images")]);
        assert_eq!(config.usage_policy().max_width_for("hero-banner.jpg"), 1200);
        assert_eq!(config.usage_policy().max_width_for("other"), 1440);
        assert_eq!(config.thresholds.resize_min_bytes, 200_000);
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.breakpoints, config.breakpoints);
        assert_eq!(parsed.resolve.public_prefixes, config.resolve.public_prefixes);
    }
}
