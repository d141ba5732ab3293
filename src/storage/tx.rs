//! Transaction handle over the key-value table.

use super::bucket::Bucket;
use crate::error::{PlanLockError, Result};
use rusqlite::{OptionalExtension, Transaction, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// An open transaction.
///
/// Handed to the closures passed to `Database::update` and `Database::view`;
/// it cannot outlive them. Keys are compared as raw bytes, so scans follow
/// byte order.
pub struct Tx<'conn> {
    pub(super) inner: Transaction<'conn>,
}

impl Tx<'_> {
    /// Read the raw value at `key`.
    pub fn get(&self, bucket: Bucket, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .inner
            .query_row(
                "SELECT value FROM kv WHERE bucket = ?1 AND key = ?2",
                params![bucket.as_str(), key.as_bytes()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write `value` at `key`, replacing anything already there.
    pub fn put(&self, bucket: Bucket, key: &str, value: &[u8]) -> Result<()> {
        self.inner.execute(
            "INSERT INTO kv (bucket, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value",
            params![bucket.as_str(), key.as_bytes(), value],
        )?;
        Ok(())
    }

    /// Delete `key`. Returns whether anything was deleted.
    pub fn delete(&self, bucket: Bucket, key: &str) -> Result<bool> {
        let count = self.inner.execute(
            "DELETE FROM kv WHERE bucket = ?1 AND key = ?2",
            params![bucket.as_str(), key.as_bytes()],
        )?;
        Ok(count > 0)
    }

    /// All entries whose key starts with `prefix`, in byte order.
    pub fn scan_prefix(&self, bucket: Bucket, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut stmt = self.inner.prepare(
            "SELECT key, value FROM kv WHERE bucket = ?1 AND key >= ?2 ORDER BY key",
        )?;
        let mut rows = stmt.query(params![bucket.as_str(), prefix.as_bytes()])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let key: Vec<u8> = row.get(0)?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let value: Vec<u8> = row.get(1)?;
            let key = String::from_utf8(key).map_err(|e| {
                PlanLockError::SerializationError(format!(
                    "non utf-8 key in bucket '{}': {}",
                    bucket, e
                ))
            })?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    /// All entries of a bucket, in byte order.
    pub fn scan(&self, bucket: Bucket) -> Result<Vec<(String, Vec<u8>)>> {
        self.scan_prefix(bucket, "")
    }

    /// Read and decode the JSON value at `key`.
    pub fn get_json<T: DeserializeOwned>(&self, bucket: Bucket, key: &str) -> Result<Option<T>> {
        match self.get(bucket, key)? {
            Some(bytes) => decode_json(bucket, key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and write it at `key`.
    pub fn put_json<T: Serialize>(&self, bucket: Bucket, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            PlanLockError::SerializationError(format!(
                "failed to serialize value for key '{}' in bucket '{}': {}",
                key, bucket, e
            ))
        })?;
        self.put(bucket, key, &bytes)
    }
}

/// Decode a stored JSON record, naming the key on failure.
pub fn decode_json<T: DeserializeOwned>(bucket: Bucket, key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        PlanLockError::SerializationError(format!(
            "failed to deserialize record at key '{}' in bucket '{}': {}",
            key, bucket, e
        ))
    })
}
