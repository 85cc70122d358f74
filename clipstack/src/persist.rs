use crate::db::Db;
use clipstack_history::{DurableStore, Entry, EntryId, PersistenceError};
use rusqlite::params;

/// SQLite-backed durable store; each trait call is a single statement and
/// therefore atomic.
pub struct SqliteStore {
    db: Db,
}

impl SqliteStore {
    pub fn new(db: Db) -> Self {
        SqliteStore { db }
    }
}

fn persistence_err(err: rusqlite::Error) -> PersistenceError {
    PersistenceError::new(err.to_string())
}

impl DurableStore for SqliteStore {
    fn create(&mut self, entry: &Entry) -> Result<(), PersistenceError> {
        let conn = self.db.get_connection();
        conn.execute(
            "INSERT INTO clip_history (id, content, touched_at, pinned)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.id.as_str(),
                entry.content,
                entry.touched_at,
                entry.pinned
            ],
        )
        .map(drop)
        .map_err(persistence_err)
    }

    fn update(&mut self, entry: &Entry) -> Result<(), PersistenceError> {
        let conn = self.db.get_connection();
        conn.execute(
            "UPDATE clip_history SET content = ?2, touched_at = ?3, pinned = ?4 WHERE id = ?1",
            params![
                entry.id.as_str(),
                entry.content,
                entry.touched_at,
                entry.pinned
            ],
        )
        .map(drop)
        .map_err(persistence_err)
    }

    fn delete(&mut self, id: &EntryId) -> Result<(), PersistenceError> {
        let conn = self.db.get_connection();
        conn.execute("DELETE FROM clip_history WHERE id = ?1", params![
            id.as_str()
        ])
        .map(drop)
        .map_err(persistence_err)
    }

    fn list_all(&mut self) -> Result<Vec<Entry>, PersistenceError> {
        let conn = self.db.get_connection();
        let mut stmt = conn
            .prepare("SELECT id, content, touched_at, pinned FROM clip_history")
            .map_err(persistence_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Entry {
                    id: EntryId::from(row.get::<_, String>(0)?),
                    content: row.get(1)?,
                    touched_at: row.get(2)?,
                    pinned: row.get(3)?,
                })
            })
            .map_err(persistence_err)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(persistence_err)?);
        }
        Ok(entries)
    }
}
