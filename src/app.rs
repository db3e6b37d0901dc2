use anyhow::Result;

use crate::page::MountPoint;
use crate::ports::AppPorts;

/// A compiled game that can be attached to a page element.
///
/// The host never sees game state; everything crosses through the returned
/// ports.
pub trait EmbeddableApp {
    fn embed(&self, mount: &MountPoint) -> Result<AppPorts>;
}

impl<F> EmbeddableApp for F
where
    F: Fn(&MountPoint) -> Result<AppPorts>,
{
    fn embed(&self, mount: &MountPoint) -> Result<AppPorts> {
        self(mount)
    }
}
