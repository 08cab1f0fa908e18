//! SQLite implementation of the ChainStore trait.
//!
//! The serialized chain is kept in a single-row table and replaced inside a
//! transaction, so a failed write leaves the previous chain in place.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::ChainStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
#[derive(Clone)]
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    /// Where the database lives, for logs.
    location: String,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let location = path.as_ref().display().to_string();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %location, "opened sqlite chain store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: ":memory:".to_string(),
        })
    }

    /// Unix ms of the last write, if any.
    pub fn updated_at(&self) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let updated = conn
                .query_row(
                    "SELECT updated_at FROM chain_document WHERE id = 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(updated)
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }

    /// Execute a blocking operation that needs mutable access.
    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut conn)
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("location", &self.location)
            .finish()
    }
}

impl ChainStore for SqliteStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            let document = conn
                .query_row(
                    "SELECT document FROM chain_document WHERE id = 1",
                    [],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()?;
            Ok(document)
        })
    }

    fn write(&self, document: &[u8]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO chain_document (id, document, updated_at) VALUES (1, ?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET
                    document = excluded.document,
                    updated_at = excluded.updated_at",
                params![document, chrono::Utc::now().timestamp_millis()],
            )?;
            tx.commit()?;
            Ok(())
        })?;

        tracing::debug!(path = %self.location, bytes = document.len(), "replaced chain document");
        Ok(())
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChainStoreExt;
    use artledger_core::{Attestation, HashChain, Keypair, Metadata};

    fn sample_chain() -> HashChain {
        let keypair = Keypair::from_secret_bytes(&[0x42; 32]).unwrap();
        let mut chain = HashChain::with_genesis_at("2025-01-14 12:00:00");
        chain
            .append(
                "abc123",
                "alice",
                Some(Attestation::sign(&keypair, "abc123")),
                Metadata::new().with("title", "Sunset").with("rating", 4.5),
            )
            .unwrap();
        chain
    }

    #[test]
    fn test_empty_database_reads_none() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(store.updated_at().unwrap().is_none());
        assert_eq!(store.load_chain().unwrap().len(), 1);
    }

    #[test]
    fn test_write_replaces_single_row() {
        let store = SqliteStore::open_memory().unwrap();
        store.write(b"first").unwrap();
        store.write(b"second").unwrap();

        assert_eq!(store.read().unwrap().as_deref(), Some(&b"second"[..]));
        assert!(store.updated_at().unwrap().is_some());

        let rows: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM chain_document", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_chain_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let chain = sample_chain();

        store.save_chain(&chain).unwrap();
        let loaded = store.load_chain().unwrap();

        assert_eq!(loaded, chain);
        assert!(loaded.is_valid());
    }

    #[test]
    fn test_reopen_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.db");
        let chain = sample_chain();

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save_chain(&chain).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load_chain().unwrap(), chain);
    }
}
