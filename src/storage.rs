//! On-disk file store for attachment blobs and project logos.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Writes binary payloads under a base directory and hands back the
/// relative path stored on the attachment row.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        std::fs::create_dir_all(&base)
            .with_context(|| format!("failed to create file store at {}", base.display()))?;
        Ok(Self { base })
    }

    /// Persist `data` under a fresh directory and return the relative path.
    /// The original filename is kept as the final path component.
    pub fn save(&self, name: &str, data: &[u8]) -> Result<String> {
        let safe_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed");

        let relative = format!("{}/{}", Uuid::new_v4(), safe_name);
        let full = self.base.join(&relative);

        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, data)
            .with_context(|| format!("failed to write {}", full.display()))?;

        debug!("Stored {} bytes at {}", data.len(), relative);
        Ok(relative)
    }

    pub fn path_of(&self, relative: &str) -> PathBuf {
        self.base.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_keeps_filename() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let rel = store.save("report.pdf", b"content").unwrap();
        assert!(rel.ends_with("/report.pdf"));
        assert_eq!(std::fs::read(store.path_of(&rel)).unwrap(), b"content");
    }

    #[test]
    fn test_save_strips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let rel = store.save("../../etc/passwd", b"x").unwrap();
        assert!(rel.ends_with("/passwd"));
        assert!(store.path_of(&rel).starts_with(dir.path()));
    }

    #[test]
    fn test_save_empty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let rel = store.save("empty.bin", b"").unwrap();
        assert_eq!(std::fs::read(store.path_of(&rel)).unwrap().len(), 0);
    }
}
