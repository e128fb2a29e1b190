use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};

use tracing::debug;

use assetpress_core::{Error, ImageAsset, Result};

#[derive(Debug, Clone)]
pub struct BackupRecord {
    pub path: PathBuf,
    /// False when a backup from an earlier run was already present.
    pub created: bool,
}

/// Guards the check-then-copy window so two workers (or two concurrent runs
/// sharing this guard) cannot race on the same source file. A backup is
/// written at most once per source path and never overwritten, so it always
/// holds the pristine pre-first-run bytes.
#[derive(Default)]
pub struct BackupGuard {
    in_flight: Mutex<HashSet<PathBuf>>,
    done: Condvar,
}

impl BackupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure(&self, asset: &ImageAsset) -> Result<BackupRecord> {
        let backup_path = asset.backup_path();

        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while in_flight.contains(&asset.path) {
            in_flight = self
                .done
                .wait(in_flight)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        in_flight.insert(asset.path.clone());
        drop(in_flight);

        let result = self.copy_if_absent(asset, &backup_path);

        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.remove(&asset.path);
        self.done.notify_all();

        result
    }

    fn copy_if_absent(&self, asset: &ImageAsset, backup_path: &PathBuf) -> Result<BackupRecord> {
        if backup_path.exists() {
            debug!("backup already present: {}", backup_path.display());
            return Ok(BackupRecord {
                path: backup_path.clone(),
                created: false,
            });
        }

        fs::copy(&asset.path, backup_path).map_err(|e| Error::Backup {
            path: asset.path.clone(),
            reason: e.to_string(),
        })?;

        debug!("backup created: {}", backup_path.display());
        Ok(BackupRecord {
            path: backup_path.clone(),
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_created_once() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        fs::write(&source, b"pristine bytes").unwrap();

        let asset = ImageAsset::new(source.clone(), 14);
        let guard = BackupGuard::new();

        let first = guard.ensure(&asset).unwrap();
        assert!(first.created);
        assert!(first.path.exists());

        // Mutate the source, then ask again. The backup must keep the
        // original bytes.
        fs::write(&source, b"rewritten").unwrap();
        let second = guard.ensure(&asset).unwrap();
        assert!(!second.created);
        assert_eq!(fs::read(&second.path).unwrap(), b"pristine bytes");
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let asset = ImageAsset::new(PathBuf::from("/does/not/exist.jpg"), 0);
        let guard = BackupGuard::new();
        assert!(matches!(
            guard.ensure(&asset),
            Err(Error::Backup { .. })
        ));
    }
}
