//! Durable client storage for the session.

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, db::CreateTable};

/// The storage key for the derived `Authorization` header value.
pub const AUTH_HEADER_KEY: &str = "authHeader";
/// The storage key for the logged in principal's name.
pub const USERNAME_KEY: &str = "username";

/// String key/value storage that survives process restarts.
pub trait SessionStorage: Debug + Send {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any existing value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), Error>;

    /// Store every `(key, value)` pair in `entries`, or none of them.
    ///
    /// The default implementation writes the entries one by one and puts the
    /// previous values back if a write fails.
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), Error> {
        let previous = entries
            .iter()
            .map(|(key, _)| Ok((*key, self.get(key)?)))
            .collect::<Result<Vec<_>, Error>>()?;

        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(error) = self.set(key, value) {
                for (key, value) in &previous[..written] {
                    let rollback = match value {
                        Some(value) => self.set(key, value),
                        None => self.remove(key),
                    };

                    if let Err(rollback_error) = rollback {
                        tracing::error!(
                            "Could not restore {key} after a failed write: {rollback_error}"
                        );
                    }
                }

                return Err(error);
            }
        }

        Ok(())
    }
}

/// Storage that lives as long as the process.
///
/// Clones share the same entries, which lets tests simulate a reload by
/// restoring a new session store from a clone.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self.entries.lock().map_err(|_| Error::SessionLockError)?;

        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .lock()
            .map_err(|_| Error::SessionLockError)?
            .insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.entries
            .lock()
            .map_err(|_| Error::SessionLockError)?
            .remove(key);

        Ok(())
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), Error> {
        let mut stored = self.entries.lock().map_err(|_| Error::SessionLockError)?;

        for (key, value) in entries {
            stored.insert((*key).to_owned(), (*value).to_owned());
        }

        Ok(())
    }
}

/// Session storage backed by a SQLite key/value table.
#[derive(Debug, Clone)]
pub struct SQLiteSessionStorage {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteSessionStorage {
    /// Create the storage, adding its table to the database if needed.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SqlError] if the table could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        Self::create_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

impl SessionStorage for SQLiteSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::SessionLockError)?
            .query_row(
                "SELECT value FROM session_entry WHERE key = :key",
                &[(":key", key)],
                |row| row.get(0),
            )
            .optional()
            .map_err(|error| error.into())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.connection
            .lock()
            .map_err(|_| Error::SessionLockError)?
            .execute(
                "INSERT INTO session_entry (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (key, value),
            )?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.connection
            .lock()
            .map_err(|_| Error::SessionLockError)?
            .execute("DELETE FROM session_entry WHERE key = ?1", (key,))?;

        Ok(())
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), Error> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| Error::SessionLockError)?;
        let transaction = connection.transaction()?;

        for (key, value) in entries {
            transaction.execute(
                "INSERT INTO session_entry (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (*key, *value),
            )?;
        }

        transaction.commit()?;

        Ok(())
    }
}

impl CreateTable for SQLiteSessionStorage {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS session_entry (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}
