use std::fs;
use std::path::Path;

use kuchiki::traits::*;
use kuchiki::{parse_html, NodeRef};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read host page: {0}")]
    Io(#[from] std::io::Error),
}

/// The parsed document an application is mounted into.
pub struct HostPage {
    document: NodeRef,
}

impl HostPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: parse_html().one(html),
        }
    }

    pub fn load(path: &Path) -> Result<Self, PageError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    /// The first element whose `id` attribute equals `id`.
    pub fn mount_point(&self, id: &str) -> Option<MountPoint> {
        self.document
            .descendants()
            .elements()
            .find(|element| element.attributes.borrow().get("id") == Some(id))
            .map(|element| MountPoint {
                id: id.to_string(),
                node: element.as_node().clone(),
            })
    }

    pub fn to_html(&self) -> String {
        self.document.to_string()
    }
}

/// An element the application renders into.
#[derive(Clone)]
pub struct MountPoint {
    id: String,
    node: NodeRef,
}

impl MountPoint {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    /// Text content of the element and its descendants.
    pub fn text_contents(&self) -> String {
        self.node.text_contents()
    }
}
