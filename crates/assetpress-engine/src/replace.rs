use std::fs;
use std::path::Path;

use anyhow::anyhow;
use tempfile::NamedTempFile;

use assetpress_core::{Error, Result};

/// Write `bytes` to a temporary file in the destination's directory, then
/// rename it over `path`. The rename is atomic within one filesystem, so no
/// partially-written file is ever visible at the canonical path.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(anyhow!("no parent directory for {}", path.display())))?;

    let tmp = NamedTempFile::new_in(parent)?;
    fs::write(tmp.path(), bytes)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.webp");
        fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");

        // No stray temp files left behind.
        let entries = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_creates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fresh.webp");
        write_atomic(&path, b"bytes").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"bytes");
    }
}
