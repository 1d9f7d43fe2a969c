//! Settings for connecting to the backend and storing the session.

use std::{fs, path::PathBuf, time::Duration};

use rusqlite::Connection;

use crate::{Error, session::SQLiteSessionStorage};

/// The address of a backend running on the local machine.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5050";

/// How long to wait for the backend before giving up on a request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the client sends requests and keeps its session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// The scheme, host and port of the backend, e.g. "http://localhost:5050".
    pub api_base_url: String,
    /// The SQLite file the session is persisted to.
    pub storage_path: PathBuf,
    /// How long to wait for each response.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            storage_path: default_storage_path(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Open the durable session storage at `storage_path`, creating the file
    /// and its parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an [Error::StorageIo] if the directory could not be created,
    /// or an [Error::SqlError] if the database could not be opened.
    pub fn open_storage(&self) -> Result<SQLiteSessionStorage, Error> {
        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| {
                    Error::StorageIo(format!("{}: {error}", parent.display()))
                })?;
            }
        }

        let connection = Connection::open(&self.storage_path)?;

        SQLiteSessionStorage::new(connection)
    }
}

fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fintrack")
        .join("session.db")
}

#[cfg(test)]
mod tests {
    use std::{env, process, time::Duration};

    use crate::{
        config::{ClientConfig, DEFAULT_API_BASE_URL},
        session::SessionStorage,
    };

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.storage_path.ends_with("fintrack/session.db"));
    }

    #[test]
    fn open_storage_creates_missing_directories() {
        let dir = env::temp_dir().join(format!("fintrack-config-test-{}", process::id()));
        let config = ClientConfig {
            storage_path: dir.join("nested").join("session.db"),
            ..Default::default()
        };

        let mut storage = config.open_storage().unwrap();
        storage.set("username", "alice").unwrap();

        assert!(config.storage_path.exists());
        assert_eq!(storage.get("username"), Ok(Some("alice".to_owned())));

        drop(storage);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
