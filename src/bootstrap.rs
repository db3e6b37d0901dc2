use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::app::EmbeddableApp;
use crate::config::HostConfig;
use crate::offline::{resolve_cache_dir, AssetCache, DirectoryAssetCache, DisabledAssetCache};
use crate::page::HostPage;
use crate::ports::AppPorts;
use crate::scores::{self, HighScoreStore};
use crate::storage::LocalStorage;
use crate::window::{HostWindow, WindowEventKind};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("mount point #{0} not found in host page")]
    MissingMountPoint(String),
    #[error("failed to embed application: {0}")]
    Embed(Box<dyn std::error::Error + Send + Sync>),
}

/// Mounts a game into its page and connects it to the host.
pub struct Bootstrapper {
    mount_id: String,
    asset_cache: Box<dyn AssetCache>,
}

impl Bootstrapper {
    pub fn new(mount_id: impl Into<String>) -> Self {
        Self {
            mount_id: mount_id.into(),
            asset_cache: Box::new(DisabledAssetCache),
        }
    }

    /// Mount id and offline cache from configuration. An unresolvable cache
    /// location disables the cache rather than failing.
    pub fn from_config(config: &HostConfig) -> Self {
        let bootstrapper = Self::new(config.mount_id.clone());
        let offline = &config.offline_cache;
        if !offline.enabled {
            return bootstrapper;
        }
        let Some(asset_dir) = offline.asset_dir.clone() else {
            debug!("no asset directory configured; offline cache disabled");
            return bootstrapper;
        };

        let cache_dir = match offline.cache_dir.clone() {
            Some(dir) => dir,
            None => match resolve_cache_dir(config.data_dir.as_deref()) {
                Ok(dir) => dir,
                Err(err) => {
                    warn!(error = %err, "offline cache disabled");
                    return bootstrapper;
                }
            },
        };
        bootstrapper.with_asset_cache(DirectoryAssetCache::new(asset_dir, cache_dir))
    }

    pub fn with_asset_cache(mut self, cache: impl AssetCache + 'static) -> Self {
        self.asset_cache = Box::new(cache);
        self
    }

    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    /// Embed `app` at the configured mount point, forward window blur, serve
    /// the score ports from `store`, then register the offline cache.
    ///
    /// Only a missing mount point or a failing embed abort startup.
    pub fn start<A, S>(
        &self,
        page: &HostPage,
        window: &HostWindow,
        app: &A,
        store: Rc<HighScoreStore<S>>,
    ) -> Result<AppPorts, BootstrapError>
    where
        A: EmbeddableApp + ?Sized,
        S: LocalStorage + 'static,
    {
        let mount = page.mount_point(&self.mount_id).ok_or_else(|| {
            error!(mount_id = %self.mount_id, "mount point missing from host page");
            BootstrapError::MissingMountPoint(self.mount_id.clone())
        })?;

        let ports = app
            .embed(&mount)
            .map_err(|err| BootstrapError::Embed(err.into()))?;

        let blur = ports.window_blur.clone();
        window.add_event_listener(WindowEventKind::Blur, move || {
            let delivered = blur.send(String::new());
            trace!(delivered, "forwarded window blur");
        });

        scores::connect(&ports, store);

        match self.asset_cache.register() {
            Ok(report) => {
                debug!(
                    stored = report.stored,
                    reused = report.reused,
                    "offline cache registration finished"
                );
            }
            Err(err) => {
                warn!(error = %err, "offline cache registration failed");
            }
        }

        info!(mount_id = %self.mount_id, "application mounted");
        Ok(ports)
    }
}
