//! Pristine materials of every recolorable mesh.

use corelib::{Material, scene::NodeId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegistryEntry {
    pub node: NodeId,
    /// Snapshot taken when the mesh entered the scene; never modified.
    pub original: Material,
}

/// One entry per recolorable mesh, built once when a model is attached.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    entries: Vec<RegistryEntry>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `material` for `node`. A node that is already
    /// registered keeps its first entry and `false` is returned.
    pub fn register(&mut self, node: NodeId, material: &Material) -> bool {
        if self.original(node).is_some() {
            log::warn!("Node {node} is already registered, keeping its original material");
            return false;
        }
        self.entries.push(RegistryEntry {
            node,
            original: *material,
        });
        true
    }

    pub fn original(&self, node: NodeId) -> Option<&Material> {
        self.entries
            .iter()
            .find(|e| e.node == node)
            .map(|e| &e.original)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
