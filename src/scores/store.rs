use tracing::{debug, warn};

use super::{Leaderboard, Ranking, ScoreEntry};
use crate::storage::{LocalStorage, StorageError};

pub const DEFAULT_STORAGE_KEY: &str = "highScores";
pub const DEFAULT_CAPACITY: usize = 10;

/// Result of reading the persisted leaderboard.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing stored and a stored `null` both load as an empty board.
    Loaded(Leaderboard),
    /// The stored text is not a leaderboard.
    Corrupt(serde_json::Error),
    /// The backend refused the read.
    Unavailable(StorageError),
}

impl LoadOutcome {
    /// The board to present to the game: failures read as empty.
    pub fn into_leaderboard(self) -> Leaderboard {
        match self {
            LoadOutcome::Loaded(board) => board,
            LoadOutcome::Corrupt(_) | LoadOutcome::Unavailable(_) => Leaderboard::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Recorded(Leaderboard),
    /// Storage is unavailable; nothing was written.
    Skipped,
}

/// The persisted high-score list under one fixed key.
pub struct HighScoreStore<S> {
    storage: S,
    key: String,
    capacity: usize,
    ranking: Ranking,
}

impl<S: LocalStorage> HighScoreStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            capacity: DEFAULT_CAPACITY,
            ranking: Ranking::default(),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self) -> LoadOutcome {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::Loaded(Leaderboard::new()),
            Err(err) => return LoadOutcome::Unavailable(err),
        };

        match serde_json::from_str::<Option<Leaderboard>>(&raw) {
            Ok(board) => LoadOutcome::Loaded(board.unwrap_or_default()),
            Err(err) => LoadOutcome::Corrupt(err),
        }
    }

    pub fn query(&self) -> LoadOutcome {
        self.load()
    }

    /// Append `entry`, re-rank, keep the top `capacity` entries and persist
    /// them, replacing whatever was stored before.
    pub fn submit(&self, entry: ScoreEntry) -> Result<Submission, StorageError> {
        if !self.storage.is_available() {
            debug!(key = %self.key, "local storage unavailable; score not recorded");
            return Ok(Submission::Skipped);
        }

        let current = match self.load() {
            LoadOutcome::Loaded(board) => board,
            LoadOutcome::Corrupt(err) => {
                warn!(key = %self.key, error = %err, "replacing unreadable leaderboard");
                Leaderboard::new()
            }
            LoadOutcome::Unavailable(err) => {
                warn!(key = %self.key, error = %err, "leaderboard read failed; starting empty");
                Leaderboard::new()
            }
        };

        let mut entries = current.into_entries();
        entries.push(entry);
        self.ranking.rank(&mut entries);
        entries.truncate(self.capacity);

        let board = Leaderboard::from(entries);
        let json = serde_json::to_string(&board)?;
        self.storage.set_item(&self.key, &json)?;

        debug!(key = %self.key, entries = board.len(), "leaderboard recorded");
        Ok(Submission::Recorded(board))
    }
}
