use std::collections::HashMap;

/// Fallback display width for images without an explicit policy entry.
pub const DEFAULT_MAX_WIDTH: u32 = 1440;

/// Static mapping from an image's base name to the maximum width it is ever
/// displayed at. Loaded once from configuration, read-only afterwards.
#[derive(Debug, Clone)]
pub struct UsagePolicy {
    entries: HashMap<String, u32>,
    default_width: u32,
}

impl UsagePolicy {
    pub fn new(entries: HashMap<String, u32>, default_width: u32) -> Self {
        Self {
            entries,
            default_width,
        }
    }

    /// Total function: an explicit entry, or the default width.
    /// The lookup key is the base name (extension and variant suffix
    /// stripped), so callers may pass a full file name.
    pub fn max_width_for(&self, name: &str) -> u32 {
        let base = name.split('.').next().unwrap_or(name);
        self.entries
            .get(base)
            .copied()
            .unwrap_or(self.default_width)
    }
}

impl Default for UsagePolicy {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            default_width: DEFAULT_MAX_WIDTH,
        }
    }
}
