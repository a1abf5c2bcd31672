//! Loader capability and the data it produces.

use std::path::Path;

use anyhow::Result;
use corelib::{Material, mesh::MeshData, transform::Transform};

/// Byte-level progress of an in-flight load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Rounded percentage, if the total size is known.
    pub fn percent(&self) -> Option<u32> {
        match self.total {
            Some(total) if total > 0 => {
                Some(((self.loaded.min(total) as f64 / total as f64) * 100.0).round() as u32)
            }
            _ => None,
        }
    }
}

/// Receives progress notifications from a loader.
pub trait LoadObserver {
    fn on_progress(&self, progress: LoadProgress);
}

/// Observer that ignores everything.
pub struct NoProgress;

impl LoadObserver for NoProgress {
    fn on_progress(&self, _progress: LoadProgress) {}
}

/// Something that can turn a packaged asset into a model hierarchy.
pub trait AssetLoader: Send + Sync {
    fn load(&self, path: &Path, observer: &dyn LoadObserver) -> Result<LoadedModel>;
}

#[derive(Clone, Debug)]
pub struct ModelMesh {
    pub data: MeshData,
    pub material: Material,
}

#[derive(Clone, Debug)]
pub struct ModelNode {
    pub name: Option<String>,
    /// Index into `LoadedModel::nodes`; always smaller than this node's index.
    pub parent: Option<usize>,
    pub transform: Transform,
    pub mesh: Option<ModelMesh>,
}

/// Flattened node hierarchy, parents before children.
#[derive(Clone, Debug, Default)]
pub struct LoadedModel {
    pub nodes: Vec<ModelNode>,
}

impl LoadedModel {
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }
}
