use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use directories::ProjectDirs;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use url::Url;

use super::{LocalStorage, StorageError};

const DATABASE_FILE: &str = "local_storage.sqlite3";

/// Persistent `localStorage` shared by every page hosted from this machine,
/// partitioned by page origin.
pub struct SqliteStorage {
    pool: Pool<SqliteConnectionManager>,
    origin: String,
}

#[derive(Debug)]
struct SqliteCustomizer;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for SqliteCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(Duration::from_secs(1))
    }
}

impl SqliteStorage {
    /// Open the database in `$ARCADE_DATA_DIR`, `data_dir`, or the platform
    /// data directory, in that order.
    pub fn new(origin: &Url, data_dir: Option<&Path>) -> Result<Self, StorageError> {
        let path = database_path(data_dir)?;
        Self::open(&path, origin)
    }

    /// Create storage with custom path (primarily for testing)
    pub fn new_with_path(dir: &Path, origin: &Url) -> Result<Self, StorageError> {
        Self::open(&dir.join(DATABASE_FILE), origin)
    }

    fn open(path: &Path, origin: &Url) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|_| StorageError::DataDir)?;
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(SqliteCustomizer))
            .build(manager)?;

        let conn = pool.get()?;
        initialise_schema(&conn)?;

        Ok(Self {
            pool,
            origin: origin.origin().ascii_serialization(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT key FROM local_storage WHERE origin = ?1 ORDER BY key")?;
        let mut rows = stmt.query([&self.origin])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

impl LocalStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.pool.get()?;
        conn.query_row(
            "SELECT value FROM local_storage WHERE origin = ?1 AND key = ?2",
            params![self.origin, key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO local_storage (origin, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)",
            params![self.origin, key, value, unix_timestamp()],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM local_storage WHERE origin = ?1 AND key = ?2",
            params![self.origin, key],
        )?;
        Ok(())
    }
}

fn database_path(data_dir: Option<&Path>) -> Result<PathBuf, StorageError> {
    if let Ok(dir) = std::env::var("ARCADE_DATA_DIR") {
        let mut path = PathBuf::from(dir);
        path.push(DATABASE_FILE);
        return Ok(path);
    }

    if let Some(dir) = data_dir {
        return Ok(dir.join(DATABASE_FILE));
    }

    if let Some(dirs) = ProjectDirs::from("org", "Arcade", "ArcadeHost") {
        let mut path = dirs.data_dir().to_path_buf();
        path.push("storage");
        path.push(DATABASE_FILE);
        Ok(path)
    } else {
        Err(StorageError::DataDir)
    }
}

fn initialise_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        CREATE TABLE IF NOT EXISTS local_storage (
            origin TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (origin, key)
        );
        "#,
    )?;
    Ok(())
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn origin(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn round_trip_item() {
        let dir = TempDir::new().unwrap();
        let storage = SqliteStorage::new_with_path(dir.path(), &origin("http://localhost:3000"))
            .unwrap();
        storage.set_item("highScores", "[]").unwrap();
        assert_eq!(
            storage.get_item("highScores").unwrap().as_deref(),
            Some("[]")
        );
        storage.set_item("highScores", "[1]").unwrap();
        assert_eq!(
            storage.get_item("highScores").unwrap().as_deref(),
            Some("[1]")
        );
        storage.remove_item("highScores").unwrap();
        assert!(storage.get_item("highScores").unwrap().is_none());
    }

    #[test]
    fn origins_are_isolated() {
        let dir = TempDir::new().unwrap();
        let first =
            SqliteStorage::new_with_path(dir.path(), &origin("http://localhost:3000/game"))
                .unwrap();
        let second =
            SqliteStorage::new_with_path(dir.path(), &origin("https://arcade.example")).unwrap();

        first.set_item("highScores", "first").unwrap();
        assert!(second.get_item("highScores").unwrap().is_none());
        assert_eq!(first.origin(), "http://localhost:3000");
        assert_eq!(first.keys().unwrap(), vec!["highScores".to_string()]);
    }

    #[test]
    fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let page = origin("http://localhost:3000");
        {
            let storage = SqliteStorage::new_with_path(dir.path(), &page).unwrap();
            storage.set_item("highScores", "kept").unwrap();
        }
        let storage = SqliteStorage::new_with_path(dir.path(), &page).unwrap();
        assert_eq!(
            storage.get_item("highScores").unwrap().as_deref(),
            Some("kept")
        );
        assert!(storage.is_available());
    }
}
