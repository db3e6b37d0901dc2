mod bridge;
mod entry;
mod ranking;
mod store;

pub use bridge::connect;
pub use entry::{Leaderboard, ScoreEntry};
pub use ranking::Ranking;
pub use store::{
    HighScoreStore, LoadOutcome, Submission, DEFAULT_CAPACITY, DEFAULT_STORAGE_KEY,
};
