//! Cache entry CRUD and whole-store maintenance.
//!
//! Rows are addressed by `(cache_name, key_hash)`. Writes are UPSERTs, so a
//! newer response for the same key replaces the old one atomically.

use super::connection::CacheDb;
use super::key::RequestKey;
use crate::Error;
use crate::router::AssetResponse;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

const UPSERT_ENTRY: &str = "INSERT INTO cache_entries (
        cache_name, key_hash, method, url, status, headers_json, body, stored_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(cache_name, key_hash) DO UPDATE SET
        method = excluded.method,
        url = excluded.url,
        status = excluded.status,
        headers_json = excluded.headers_json,
        body = excluded.body,
        stored_at = excluded.stored_at";

/// Row payload prepared outside the connection thread.
struct EntryRow {
    key_hash: String,
    method: String,
    url: String,
    status: u16,
    headers_json: String,
    body: Vec<u8>,
}

impl EntryRow {
    fn new(key: &RequestKey, response: &AssetResponse) -> Result<Self, Error> {
        let headers_json =
            serde_json::to_string(&response.headers).map_err(|e| Error::CorruptEntry(e.to_string()))?;
        Ok(Self {
            key_hash: key.hash(),
            method: key.method.clone(),
            url: key.url.clone(),
            status: response.status,
            headers_json,
            body: response.body.to_vec(),
        })
    }

    fn insert(&self, conn: &rusqlite::Connection, cache_name: &str, stored_at: &str) -> Result<(), Error> {
        conn.execute(
            UPSERT_ENTRY,
            params![
                cache_name,
                &self.key_hash,
                &self.method,
                &self.url,
                self.status,
                &self.headers_json,
                &self.body,
                stored_at,
            ],
        )?;
        Ok(())
    }
}

impl CacheDb {
    /// Insert or replace the response stored for `key` in `cache_name`.
    pub async fn put_entry(&self, cache_name: &str, key: &RequestKey, response: &AssetResponse) -> Result<(), Error> {
        let cache_name = cache_name.to_string();
        let row = EntryRow::new(key, response)?;
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> { row.insert(conn, &cache_name, &stored_at) })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace several entries in one transaction.
    ///
    /// Either every entry is written or none is.
    pub async fn put_entries(&self, cache_name: &str, entries: &[(RequestKey, AssetResponse)]) -> Result<(), Error> {
        let cache_name = cache_name.to_string();
        let rows = entries
            .iter()
            .map(|(key, response)| EntryRow::new(key, response))
            .collect::<Result<Vec<_>, _>>()?;
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                for row in &rows {
                    row.insert(&tx, &cache_name, &stored_at)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get the response stored for `key`.
    ///
    /// Returns None if the key has no entry in `cache_name`.
    pub async fn get_entry(&self, cache_name: &str, key: &RequestKey) -> Result<Option<AssetResponse>, Error> {
        let cache_name = cache_name.to_string();
        let key_hash = key.hash();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(u16, String, Vec<u8>)>, Error> {
                let result = conn.query_row(
                    "SELECT status, headers_json, body FROM cache_entries WHERE cache_name = ?1 AND key_hash = ?2",
                    params![cache_name, key_hash],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                );

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some((status, headers_json, body)) = row else {
            return Ok(None);
        };
        let headers = serde_json::from_str(&headers_json).map_err(|e| Error::CorruptEntry(format!("{key}: {e}")))?;
        Ok(Some(AssetResponse { status, headers, body: body.into() }))
    }

    /// Check whether `key` has an entry in `cache_name`.
    pub async fn has_entry(&self, cache_name: &str, key: &RequestKey) -> Result<bool, Error> {
        let cache_name = cache_name.to_string();
        let key_hash = key.hash();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM cache_entries WHERE cache_name = ?1 AND key_hash = ?2)",
                    params![cache_name, key_hash],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Request identities stored in `cache_name`, oldest write first.
    pub async fn cache_keys(&self, cache_name: &str) -> Result<Vec<RequestKey>, Error> {
        let cache_name = cache_name.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<RequestKey>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT method, url FROM cache_entries WHERE cache_name = ?1 ORDER BY stored_at ASC, url ASC",
                )?;
                let keys = stmt
                    .query_map(params![cache_name], |row| Ok(RequestKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }

    /// Names of every store holding at least one entry.
    pub async fn cache_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT DISTINCT cache_name FROM cache_entries ORDER BY cache_name")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Drop the whole store called `cache_name`.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_cache(&self, cache_name: &str) -> Result<u64, Error> {
        let cache_name = cache_name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE cache_name = ?1", params![cache_name])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Drop every store whose name is not `current`.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_stale_caches(&self, current: &str) -> Result<u64, Error> {
        let current = current.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE cache_name <> ?1", params![current])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
