mod memory;
mod sqlite;

use thiserror::Error;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

const PROBE_KEY: &str = "__storage_test__";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unable to determine data directory")]
    DataDir,
    #[error("local storage is unavailable")]
    Unavailable,
}

/// Origin-scoped key/value storage with string values, the shape of a
/// browser's `localStorage`.
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Probe the backend with a throwaway write.
    fn is_available(&self) -> bool {
        self.set_item(PROBE_KEY, PROBE_KEY)
            .and_then(|_| self.remove_item(PROBE_KEY))
            .is_ok()
    }
}

impl<T: LocalStorage + ?Sized> LocalStorage for std::rc::Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
