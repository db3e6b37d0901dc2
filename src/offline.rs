use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

const MANIFEST_FILE: &str = "precache-manifest.json";
const CACHE_SUBDIR: &str = "offline-cache";

#[derive(Debug, Error)]
pub enum OfflineCacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("asset directory {0} does not exist")]
    MissingAssets(PathBuf),
    #[error("unable to determine data directory")]
    DataDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecacheEntry {
    pub path: String,
    pub sha256: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheReport {
    /// Blobs written by this registration.
    pub stored: usize,
    /// Blobs already present from an earlier registration.
    pub reused: usize,
}

impl CacheReport {
    pub fn total(&self) -> usize {
        self.stored + self.reused
    }
}

/// Makes the game's static assets available offline.
pub trait AssetCache {
    fn register(&self) -> Result<CacheReport, OfflineCacheError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAssetCache;

impl AssetCache for DisabledAssetCache {
    fn register(&self) -> Result<CacheReport, OfflineCacheError> {
        Ok(CacheReport::default())
    }
}

/// Content-addressed copy of an asset directory plus a manifest mapping each
/// asset path to its SHA-256.
#[derive(Debug, Clone)]
pub struct DirectoryAssetCache {
    asset_root: PathBuf,
    cache_dir: PathBuf,
}

impl DirectoryAssetCache {
    pub fn new(asset_root: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.cache_dir.join(MANIFEST_FILE)
    }

    pub fn read_manifest(&self) -> Result<Vec<PrecacheEntry>, OfflineCacheError> {
        let contents = fs::read(self.manifest_path())?;
        Ok(serde_json::from_slice(&contents)?)
    }

    fn collect_files(&self, dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path == self.cache_dir {
                continue;
            }
            if path.is_dir() {
                self.collect_files(&path, files)?;
            } else if path.is_file() {
                files.push(path);
            }
        }
        Ok(())
    }
}

impl AssetCache for DirectoryAssetCache {
    fn register(&self) -> Result<CacheReport, OfflineCacheError> {
        if !self.asset_root.is_dir() {
            return Err(OfflineCacheError::MissingAssets(self.asset_root.clone()));
        }
        fs::create_dir_all(&self.cache_dir)?;

        let mut files = Vec::new();
        self.collect_files(&self.asset_root, &mut files)?;

        let mut report = CacheReport::default();
        let mut manifest = Vec::with_capacity(files.len());
        for file in files {
            let bytes = fs::read(&file)?;
            let hash = sha256_hex(&bytes);
            let blob = self.cache_dir.join(&hash);
            if blob.is_file() {
                report.reused += 1;
            } else {
                fs::write(&blob, &bytes)?;
                report.stored += 1;
            }
            manifest.push(PrecacheEntry {
                path: asset_path(&self.asset_root, &file),
                sha256: hash,
                size: bytes.len() as u64,
            });
        }
        manifest.sort_by(|a, b| a.path.cmp(&b.path));
        fs::write(self.manifest_path(), serde_json::to_vec_pretty(&manifest)?)?;

        info!(
            assets = manifest.len(),
            stored = report.stored,
            reused = report.reused,
            cache = %self.cache_dir.display(),
            "offline cache registered"
        );
        Ok(report)
    }
}

/// Cache location under `$ARCADE_DATA_DIR`, `data_dir`, or the platform data
/// directory.
pub fn resolve_cache_dir(data_dir: Option<&Path>) -> Result<PathBuf, OfflineCacheError> {
    if let Ok(dir) = std::env::var("ARCADE_DATA_DIR") {
        let mut path = PathBuf::from(dir);
        path.push(CACHE_SUBDIR);
        return Ok(path);
    }

    if let Some(dir) = data_dir {
        return Ok(dir.join(CACHE_SUBDIR));
    }

    if let Some(dirs) = ProjectDirs::from("org", "Arcade", "ArcadeHost") {
        let mut path = dirs.data_dir().to_path_buf();
        path.push(CACHE_SUBDIR);
        Ok(path)
    } else {
        Err(OfflineCacheError::DataDir)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn asset_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let joined = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}
