//! JSON file implementation of the ChainStore trait.
//!
//! The document lives at a single path. Writes go to a temporary file in the
//! same directory, are synced, then renamed over the target, so a crash
//! mid-write leaves the previous chain intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::traits::ChainStore;

/// Default file name used by the ledger when no path is configured.
pub const DEFAULT_CHAIN_FILE: &str = "artledger_chain.json";

/// File-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for the document at `path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the chain document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that receives the temporary file.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN_FILE)
    }
}

impl ChainStore for FileStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, document: &[u8]) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(document)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), bytes = document.len(), "replaced chain file");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::traits::ChainStoreExt;
    use artledger_core::{CoreError, HashChain, Metadata};

    #[test]
    fn test_absent_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("chain.json"));

        assert!(store.read().unwrap().is_none());

        let chain = store.load_chain().unwrap();
        assert_eq!(chain.len(), 1);
        // Loading does not create the file
        assert!(!store.path().exists());
    }

    #[test]
    fn test_write_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("chain.json"));

        store.write(b"first").unwrap();
        store.write(b"second").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some(&b"second"[..]));

        // Only the document remains; no stray temp files
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/deeper/chain.json"));

        store.write(b"[]").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_chain_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("chain.json"));

        let mut chain = HashChain::with_genesis_at("2025-01-14 12:00:00");
        chain
            .append("abc123", "alice", None, Metadata::new().with("title", "Sunset"))
            .unwrap();
        store.save_chain(&chain).unwrap();

        let loaded = store.load_chain().unwrap();
        assert_eq!(loaded, chain);
        assert!(loaded.is_valid());
    }

    #[test]
    fn test_corrupt_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("chain.json"));

        fs::write(store.path(), b"{ not a chain").unwrap();
        assert!(matches!(
            store.load_chain(),
            Err(StoreError::Codec(CoreError::DecodingError(_)))
        ));

        fs::write(store.path(), b"[]").unwrap();
        assert!(matches!(
            store.load_chain(),
            Err(StoreError::Codec(CoreError::EmptyChain))
        ));
    }

    #[test]
    fn test_relative_path_uses_current_dir() {
        let store = FileStore::new("chain.json");
        assert_eq!(store.parent_dir(), Path::new("."));
        assert_eq!(FileStore::default().location(), DEFAULT_CHAIN_FILE);
    }
}
