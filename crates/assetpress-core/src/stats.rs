use std::fmt;
use std::path::PathBuf;

/// Why a discovered candidate was left untouched.
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// Dimensions could not be read from the file.
    UnreadableMetadata,
    /// Natural width already at or below the target; no upscaling.
    AlreadyFits { width: u32, target: u32 },
    DecodeFailed(String),
    EncodeFailed(String),
    BackupFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableMetadata => write!(f, "unable to read dimensions"),
            Self::AlreadyFits { width, target } => {
                write!(f, "already {width}px, target: {target}px")
            }
            Self::DecodeFailed(reason) => write!(f, "decode failed: {reason}"),
            Self::EncodeFailed(reason) => write!(f, "encode failed: {reason}"),
            Self::BackupFailed(reason) => write!(f, "backup failed: {reason}"),
        }
    }
}

/// Per-candidate result, recorded exactly once per discovered file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Processed {
        path: PathBuf,
        original_bytes: u64,
        optimized_bytes: u64,
    },
    Skipped {
        path: PathBuf,
        reason: SkipReason,
    },
}

impl FileOutcome {
    /// Byte savings; negative when a re-encode grew the file.
    pub fn savings(&self) -> i64 {
        match self {
            Self::Processed {
                original_bytes,
                optimized_bytes,
                ..
            } => *original_bytes as i64 - *optimized_bytes as i64,
            Self::Skipped { .. } => 0,
        }
    }

    pub fn savings_percent(&self) -> i64 {
        match self {
            Self::Processed { original_bytes, .. } if *original_bytes > 0 => {
                (100.0 * self.savings() as f64 / *original_bytes as f64).round() as i64
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Saving {
    pub path: PathBuf,
    pub saved: i64,
}

/// Run-scoped accumulator. An explicit value rather than ambient state:
/// parallel workers each fold outcomes into their own `RunStats` and the
/// partials are merged at the end of the run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub processed: u64,
    pub skipped: u64,
    pub total_original: u64,
    pub total_optimized: u64,
    savers: Vec<Saving>,
}

impl RunStats {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Processed {
                path,
                original_bytes,
                optimized_bytes,
            } => {
                self.processed += 1;
                self.total_original += original_bytes;
                self.total_optimized += optimized_bytes;
                self.savers.push(Saving {
                    path: path.clone(),
                    saved: outcome.savings(),
                });
            }
            FileOutcome::Skipped { .. } => {
                self.skipped += 1;
            }
        }
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.total_original += other.total_original;
        self.total_optimized += other.total_optimized;
        self.savers.extend(other.savers);
        self
    }

    /// Exact integer total; equals the sum of per-file savings.
    pub fn savings(&self) -> i64 {
        self.total_original as i64 - self.total_optimized as i64
    }

    pub fn into_report(mut self, top_n: usize) -> Report {
        self.savers.sort_by(|a, b| b.saved.cmp(&a.saved));
        self.savers.truncate(top_n);
        Report {
            processed: self.processed,
            skipped: self.skipped,
            total_original: self.total_original,
            total_optimized: self.total_optimized,
            top_savers: self.savers,
        }
    }
}

/// End-of-run summary. Percentages are computed here, at presentation time,
/// never accumulated in rounded form.
#[derive(Debug, Clone)]
pub struct Report {
    pub processed: u64,
    pub skipped: u64,
    pub total_original: u64,
    pub total_optimized: u64,
    pub top_savers: Vec<Saving>,
}

impl Report {
    pub fn savings(&self) -> i64 {
        self.total_original as i64 - self.total_optimized as i64
    }

    pub fn savings_percent(&self) -> i64 {
        if self.total_original == 0 {
            return 0;
        }
        (100.0 * self.savings() as f64 / self.total_original as f64).round() as i64
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "============================")?;
        writeln!(f, "OPTIMIZATION SUMMARY")?;
        writeln!(f, "============================")?;
        writeln!(f, "Processed: {} images", self.processed)?;
        writeln!(f, "Skipped: {} images", self.skipped)?;
        writeln!(f, "Total Original Size: {}", format_bytes(self.total_original))?;
        writeln!(
            f,
            "Total Optimized Size: {}",
            format_bytes(self.total_optimized)
        )?;
        writeln!(
            f,
            "Total Savings: {} ({}%)",
            format_bytes(self.savings().unsigned_abs()),
            self.savings_percent()
        )?;
        if !self.top_savers.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top space savers:")?;
            for (i, saver) in self.top_savers.iter().enumerate() {
                writeln!(
                    f,
                    "  {}. {}: {} saved",
                    i + 1,
                    saver.path.display(),
                    format_bytes(saver.saved.unsigned_abs())
                )?;
            }
        }
        Ok(())
    }
}

/// Human-readable byte count, base 1024, two decimals.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let i = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let i = i.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(i as i32);
    format!("{} {}", (value * 100.0).round() / 100.0, UNITS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(name: &str, original: u64, optimized: u64) -> FileOutcome {
        FileOutcome::Processed {
            path: PathBuf::from(name),
            original_bytes: original,
            optimized_bytes: optimized,
        }
    }

    #[test]
    fn test_savings_arithmetic() {
        let outcome = processed("a.jpg", 4_500_000, 900_000);
        assert_eq!(outcome.savings(), 3_600_000);
        assert_eq!(outcome.savings_percent(), 80);
    }

    #[test]
    fn test_aggregate_equals_sum_of_per_file_savings() {
        let outcomes = [
            processed("a.jpg", 1000, 400),
            processed("b.png", 2000, 1500),
            processed("c.webp", 300, 350), // grew
        ];

        let mut stats = RunStats::default();
        for o in &outcomes {
            stats.record(o);
        }

        let per_file: i64 = outcomes.iter().map(|o| o.savings()).sum();
        assert_eq!(stats.savings(), per_file);
        assert_eq!(stats.total_original, 3300);
        assert_eq!(stats.total_optimized, 2250);
    }

    #[test]
    fn test_merge() {
        let mut a = RunStats::default();
        a.record(&processed("a.jpg", 1000, 400));
        a.record(&FileOutcome::Skipped {
            path: PathBuf::from("s.png"),
            reason: SkipReason::UnreadableMetadata,
        });

        let mut b = RunStats::default();
        b.record(&processed("b.jpg", 2000, 500));

        let merged = a.merge(b);
        assert_eq!(merged.processed, 2);
        assert_eq!(merged.skipped, 1);
        assert_eq!(merged.savings(), 600 + 1500);
    }

    #[test]
    fn test_top_savers_ranked() {
        let mut stats = RunStats::default();
        stats.record(&processed("small.jpg", 1000, 900));
        stats.record(&processed("big.jpg", 10_000, 1000));
        stats.record(&processed("mid.jpg", 5000, 2500));

        let report = stats.into_report(2);
        assert_eq!(report.top_savers.len(), 2);
        assert_eq!(report.top_savers[0].path, PathBuf::from("big.jpg"));
        assert_eq!(report.top_savers[1].path, PathBuf::from("mid.jpg"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(4_718_592), "4.5 MB");
    }

    #[test]
    fn test_empty_report_percent() {
        let report = RunStats::default().into_report(5);
        assert_eq!(report.savings_percent(), 0);
    }
}
