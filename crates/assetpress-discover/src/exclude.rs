use glob::Pattern;

/// Directory exclusion checker using glob patterns
pub struct ExcludeList {
    patterns: Vec<Pattern>,
}

impl ExcludeList {
    /// Create new exclusion list from pattern strings
    pub fn new(patterns: Vec<String>) -> Self {
        let compiled: Vec<Pattern> = patterns
            .into_iter()
            .filter_map(|p| Pattern::new(&p).ok())
            .collect();

        Self { patterns: compiled }
    }

    /// Check if a directory name matches any exclusion pattern
    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }
}

impl Default for ExcludeList {
    fn default() -> Self {
        Self::new(vec![
            "node_modules".to_string(),
            ".git".to_string(),
            "dist".to_string(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let excluded = ExcludeList::default();

        assert!(excluded.is_excluded("node_modules"));
        assert!(excluded.is_excluded(".git"));
        assert!(excluded.is_excluded("dist"));
        assert!(!excluded.is_excluded("portfolio"));
    }

    #[test]
    fn test_glob_patterns() {
        let excluded = ExcludeList::new(vec![".cache*".to_string()]);

        assert!(excluded.is_excluded(".cache"));
        assert!(excluded.is_excluded(".cache-v2"));
        assert!(!excluded.is_excluded("cache"));
    }
}
