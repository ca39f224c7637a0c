//! SQLite-backed key-value persistence.
//!
//! State is stored as one JSON document per key in a single `kv` table at
//! `~/.config/mindfocus/mindfocus.db`. Every value travels inside a versioned
//! envelope `{"version": N, "data": ...}`; a value that fails to parse or
//! carries the wrong version is dropped and the caller falls back to
//! defaults, so no single corrupt slice can wedge the app.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StorageError;

#[derive(Serialize)]
struct EnvelopeRef<'a, T: Serialize> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: serde_json::Value,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (and migrate) the store at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("mindfocus.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Read a versioned slice. Malformed JSON or a version mismatch clears
    /// the key and reads as absent.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
        version: u32,
    ) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(_) => {
                self.remove(key)?;
                return Ok(None);
            }
        };
        if envelope.version != version {
            self.remove(key)?;
            return Ok(None);
        }
        match serde_json::from_value(envelope.data) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.remove(key)?;
                Ok(None)
            }
        }
    }

    /// Write a versioned slice.
    pub fn set_json<T: Serialize>(
        &self,
        key: &str,
        version: u32,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&EnvelopeRef {
            version,
            data: value,
        })?;
        self.set_raw(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn sample() -> Sample {
        Sample {
            name: "alpha".into(),
            count: 3,
        }
    }

    #[test]
    fn json_roundtrip() {
        let store = Store::open_memory().unwrap();
        store.set_json("sample", 1, &sample()).unwrap();
        let loaded: Option<Sample> = store.get_json("sample", 1).unwrap();
        assert_eq!(loaded, Some(sample()));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = Store::open_memory().unwrap();
        let loaded: Option<Sample> = store.get_json("absent", 1).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_value_is_cleared() {
        let store = Store::open_memory().unwrap();
        store.set_raw("sample", "{not json").unwrap();
        let loaded: Option<Sample> = store.get_json("sample", 1).unwrap();
        assert!(loaded.is_none());
        assert!(store.get_raw("sample").unwrap().is_none());
    }

    #[test]
    fn version_mismatch_is_cleared() {
        let store = Store::open_memory().unwrap();
        store.set_json("sample", 1, &sample()).unwrap();
        let loaded: Option<Sample> = store.get_json("sample", 2).unwrap();
        assert!(loaded.is_none());
        assert!(store.get_raw("sample").unwrap().is_none());
    }

    #[test]
    fn shape_mismatch_is_cleared() {
        let store = Store::open_memory().unwrap();
        store
            .set_raw("sample", r#"{"version": 1, "data": {"wrong": true}}"#)
            .unwrap();
        let loaded: Option<Sample> = store.get_json("sample", 1).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn overwrite_replaces_value() {
        let store = Store::open_memory().unwrap();
        store.set_json("sample", 1, &sample()).unwrap();
        store
            .set_json(
                "sample",
                1,
                &Sample {
                    name: "beta".into(),
                    count: 9,
                },
            )
            .unwrap();
        let loaded: Option<Sample> = store.get_json("sample", 1).unwrap();
        assert_eq!(loaded.map(|s| s.name), Some("beta".to_string()));
    }

    #[test]
    fn open_at_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let store = Store::open_at(&path).unwrap();
            store.set_json("sample", 1, &sample()).unwrap();
        }
        let store = Store::open_at(&path).unwrap();
        let loaded: Option<Sample> = store.get_json("sample", 1).unwrap();
        assert_eq!(loaded, Some(sample()));
    }
}
