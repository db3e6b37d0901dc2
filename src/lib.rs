// Library exports for the host binary and tests

pub mod app;
pub mod bootstrap;
pub mod config;
mod listeners;
pub mod logging;
pub mod offline;
pub mod page;
pub mod ports;
pub mod scores;
pub mod storage;
pub mod window;

// Re-export commonly used types for tests
pub use app::EmbeddableApp;
pub use bootstrap::{BootstrapError, Bootstrapper};
pub use config::HostConfig;
pub use page::{HostPage, MountPoint};
pub use ports::{AppPorts, Port};
pub use scores::{HighScoreStore, Leaderboard, LoadOutcome, Ranking, ScoreEntry, Submission};
pub use storage::{LocalStorage, MemoryStorage, SqliteStorage};
pub use window::{HostWindow, WindowEventKind};
