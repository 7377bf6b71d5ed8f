//! Learned-item persistence.
//!
//! Storage is an injected collaborator behind [`ItemStore`]. Two
//! implementations ship: an in-memory store for tests and demos, and a
//! `SQLite` store that keeps reference vectors as little-endian f32 BLOBs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, params};

use refind_core::{ItemId, LearnedItem};

use crate::errors::{Result, SessionError};

/// Persistence interface for learned items.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist one item (replacing any previous row with the same ID).
    async fn save(&self, item: &LearnedItem) -> Result<()>;

    /// All stored items, oldest first.
    async fn list(&self) -> Result<Vec<LearnedItem>>;

    /// Fetch one item by ID.
    async fn get(&self, id: &ItemId) -> Result<Option<LearnedItem>>;

    /// Delete one item by ID. Deleting a missing item is a no-op.
    async fn delete(&self, id: &ItemId) -> Result<()>;

    /// Number of stored items.
    async fn count(&self) -> Result<usize>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Volatile store for tests and demo flows.
#[derive(Default)]
pub struct MemoryItemStore {
    items: Mutex<Vec<LearnedItem>>,
}

impl MemoryItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn save(&self, item: &LearnedItem) -> Result<()> {
        let mut items = self.items.lock();
        items.retain(|existing| existing.id != item.id);
        items.push(item.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LearnedItem>> {
        Ok(self.items.lock().clone())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<LearnedItem>> {
        Ok(self.items.lock().iter().find(|i| &i.id == id).cloned())
    }

    async fn delete(&self, id: &ItemId) -> Result<()> {
        self.items.lock().retain(|i| &i.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.items.lock().len())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite store
// ─────────────────────────────────────────────────────────────────────────────

/// Convert an f32 slice to a byte blob for storage.
fn f32_slice_to_blob(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert a byte blob back to an f32 vector.
fn blob_to_f32_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// `SQLite`-backed store. Reference vectors live in a child table keyed by
/// `(item_id, seq)` so capture order survives round-trips.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Create a store over an open connection and ensure the schema exists.
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS learned_items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                photo_count INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS item_embeddings (
                item_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                embedding BLOB NOT NULL,
                PRIMARY KEY (item_id, seq)
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn load_embeddings(conn: &Connection, id: &str) -> Result<Vec<Vec<f32>>> {
        let mut stmt = conn.prepare(
            "SELECT embedding FROM item_embeddings WHERE item_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![id], |row| row.get::<_, Vec<u8>>(0))?;
        let mut embeddings = Vec::new();
        for blob in rows {
            embeddings.push(blob_to_f32_vec(&blob?));
        }
        Ok(embeddings)
    }

    fn row_to_item(
        conn: &Connection,
        id: String,
        name: String,
        created_at: String,
        photo_count: i64,
    ) -> Result<LearnedItem> {
        let created_at = created_at
            .parse::<DateTime<Utc>>()
            .map_err(|e| SessionError::Storage(format!("bad timestamp for {id}: {e}")))?;
        let embeddings = Self::load_embeddings(conn, &id)?;
        #[allow(clippy::cast_sign_loss)]
        Ok(LearnedItem {
            id: ItemId::from_string(id),
            name,
            embeddings,
            created_at,
            photo_count: photo_count as usize,
        })
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn save(&self, item: &LearnedItem) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        // delete-then-insert upsert
        let _ = tx.execute(
            "DELETE FROM learned_items WHERE id = ?1",
            params![item.id.as_str()],
        )?;
        let _ = tx.execute(
            "DELETE FROM item_embeddings WHERE item_id = ?1",
            params![item.id.as_str()],
        )?;

        #[allow(clippy::cast_possible_wrap)]
        let _ = tx.execute(
            "INSERT INTO learned_items (id, name, created_at, photo_count)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                item.id.as_str(),
                item.name,
                item.created_at.to_rfc3339(),
                item.photo_count as i64
            ],
        )?;

        for (seq, embedding) in item.embeddings.iter().enumerate() {
            #[allow(clippy::cast_possible_wrap)]
            let _ = tx.execute(
                "INSERT INTO item_embeddings (item_id, seq, embedding) VALUES (?1, ?2, ?3)",
                params![item.id.as_str(), seq as i64, f32_slice_to_blob(embedding)],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LearnedItem>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, photo_count FROM learned_items ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, name, created_at, photo_count) = row?;
            items.push(Self::row_to_item(&conn, id, name, created_at, photo_count)?);
        }
        Ok(items)
    }

    async fn get(&self, id: &ItemId) -> Result<Option<LearnedItem>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT id, name, created_at, photo_count FROM learned_items WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match row {
            Some((id, name, created_at, photo_count)) => Ok(Some(Self::row_to_item(
                &conn,
                id,
                name,
                created_at,
                photo_count,
            )?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &ItemId) -> Result<()> {
        let conn = self.conn.lock();
        let _ = conn.execute(
            "DELETE FROM learned_items WHERE id = ?1",
            params![id.as_str()],
        )?;
        let _ = conn.execute(
            "DELETE FROM item_embeddings WHERE item_id = ?1",
            params![id.as_str()],
        )?;
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 =
            conn.query_row("SELECT count(*) FROM learned_items", [], |row| row.get(0))?;
        #[allow(clippy::cast_sign_loss)]
        Ok(count as usize)
    }
}
