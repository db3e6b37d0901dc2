use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::scores::{Ranking, DEFAULT_CAPACITY, DEFAULT_STORAGE_KEY};

const DEFAULT_MOUNT_ID: &str = "root";
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read host config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid origin `{origin}`: {source}")]
    Origin {
        origin: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// `id` of the page element the game mounts into.
    pub mount_id: String,
    /// Origin of the hosted page; local storage is partitioned by it.
    pub origin: String,
    pub data_dir: Option<PathBuf>,
    pub scores: ScoresConfig,
    pub offline_cache: OfflineCacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoresConfig {
    pub storage_key: String,
    pub capacity: usize,
    pub ranking: Ranking,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OfflineCacheConfig {
    pub enabled: bool,
    pub asset_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            mount_id: DEFAULT_MOUNT_ID.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            data_dir: None,
            scores: ScoresConfig::default(),
            offline_cache: OfflineCacheConfig::default(),
        }
    }
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            capacity: DEFAULT_CAPACITY,
            ranking: Ranking::default(),
        }
    }
}

impl Default for OfflineCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            asset_dir: None,
            cache_dir: None,
        }
    }
}

impl HostConfig {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)?;
                Self::from_yaml(&contents)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents)?;
        config.origin_url()?;
        Ok(config)
    }

    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|source| ConfigError::Origin {
            origin: self.origin.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_default() {
        let config = HostConfig::load(None).unwrap();
        assert_eq!(config.mount_id, "root");
        assert_eq!(
            config.origin_url().unwrap().as_str(),
            "http://localhost:3000/"
        );
        assert_eq!(config.scores.storage_key, "highScores");
        assert_eq!(config.scores.capacity, 10);
        assert_eq!(config.scores.ranking, Ranking::Legacy);
        assert!(config.offline_cache.enabled);
        assert!(config.offline_cache.asset_dir.is_none());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = HostConfig::load(Some(PathBuf::from("/nonexistent/arcade.yaml"))).unwrap();
        assert_eq!(config.mount_id, "root");
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "mount_id: game\norigin: https://arcade.example\nscores:\n  capacity: 5\n  ranking: score_descending\noffline_cache:\n  enabled: false"
        )
        .unwrap();
        let config = HostConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.mount_id, "game");
        assert_eq!(
            config.origin_url().unwrap().host_str(),
            Some("arcade.example")
        );
        assert_eq!(config.scores.capacity, 5);
        assert_eq!(config.scores.storage_key, "highScores");
        assert_eq!(config.scores.ranking, Ranking::ScoreDescending);
        assert!(!config.offline_cache.enabled);
    }

    #[test]
    fn rejects_invalid_yaml() {
        assert!(matches!(
            HostConfig::from_yaml("scores: [unterminated"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(HostConfig::from_yaml("scores:\n  ranking: alphabetical").is_err());
    }

    #[test]
    fn rejects_invalid_origin() {
        let err = HostConfig::from_yaml("origin: not a url").unwrap_err();
        assert!(matches!(err, ConfigError::Origin { ref origin, .. } if origin == "not a url"));
    }
}
