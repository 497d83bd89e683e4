use rusqlite::{params, Connection, OptionalExtension};

use crate::store::{SlotStore, StoreError};

/// Key-value slots kept in the `slots` table of the embedded SQLite database.
/// Each slot holds one serialized string; writes overwrite the whole value.
pub struct SqliteSlots {
    conn: Connection,
}

impl SqliteSlots {
    /// Wrap a connection whose schema was prepared by `ensure_schema` or
    /// `create_tables`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlots {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// `INSERT OR REPLACE` turns every save into a full overwrite of the slot.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
