//! Tiny scene graph: dense node arrays with parent links.
//!
//! Parents are always spawned before their children, so a node id is
//! strictly greater than its parent's id.

use std::sync::Arc;

use crate::{Color, Mat4, Material, light::LightRig, mesh::MeshData, transform::Transform};

/// Node id (dense, index into node arrays).
pub type NodeId = u32;

/// Renderable part of a node.
#[derive(Clone, Debug)]
pub struct MeshComponent {
    pub data: Arc<MeshData>,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshComponent {
    pub fn new(data: Arc<MeshData>, material: Material) -> Self {
        Self {
            data,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

/// A mesh node resolved to world space, as handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct MeshInstance<'a> {
    pub id: NodeId,
    pub world: Mat4,
    pub mesh: &'a MeshComponent,
}

/// Scene state: background, lighting and the node arena.
pub struct Scene {
    pub background: Color,
    pub lights: LightRig,
    names: Vec<Option<String>>,
    parents: Vec<Option<NodeId>>,
    transforms: Vec<Transform>,
    meshes: Vec<Option<MeshComponent>>,
    epoch: u64,
}

impl Scene {
    pub fn new(background: Color, lights: LightRig) -> Self {
        Self {
            background,
            lights,
            names: Vec::new(),
            parents: Vec::new(),
            transforms: Vec::new(),
            meshes: Vec::new(),
            epoch: 0,
        }
    }

    /// Spawn a node. An unknown parent id makes the node a root.
    pub fn spawn(
        &mut self,
        name: Option<String>,
        parent: Option<NodeId>,
        transform: Transform,
        mesh: Option<MeshComponent>,
    ) -> NodeId {
        let id = self.transforms.len() as NodeId;
        let parent = match parent {
            Some(p) if p < id => Some(p),
            Some(p) => {
                log::warn!("Node {id}: parent {p} does not exist, attaching to root");
                None
            }
            None => None,
        };

        self.names.push(name);
        self.parents.push(parent);
        self.transforms.push(transform);
        self.meshes.push(mesh);
        id
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id as usize)?.as_deref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id as usize).copied().flatten()
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.transforms.get(id as usize)
    }

    pub fn mesh(&self, id: NodeId) -> Option<&MeshComponent> {
        self.meshes.get(id as usize)?.as_ref()
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut MeshComponent> {
        self.meshes.get_mut(id as usize)?.as_mut()
    }

    /// Replace the active material of a mesh node. Returns `false` if `id` has no mesh.
    pub fn set_material(&mut self, id: NodeId, material: Material) -> bool {
        match self.mesh_mut(id) {
            Some(mesh) => {
                mesh.material = material;
                true
            }
            None => false,
        }
    }

    /// Parent chain product, root first.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(i) = cursor {
            let Some(t) = self.transforms.get(i as usize) else {
                break;
            };
            m = t.matrix() * m;
            cursor = self.parent(i);
        }
        m
    }

    /// Iterate over all mesh nodes with their world matrices.
    pub fn meshes(&self) -> impl Iterator<Item = MeshInstance<'_>> {
        self.meshes.iter().enumerate().filter_map(move |(i, mesh)| {
            let mesh = mesh.as_ref()?;
            let id = i as NodeId;
            Some(MeshInstance {
                id,
                world: self.world_matrix(id),
                mesh,
            })
        })
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.iter().filter(|m| m.is_some()).count()
    }

    /// Drop every node. Node ids are reused afterwards, so the epoch is bumped
    /// to let caches keyed by id notice.
    pub fn clear(&mut self) {
        self.names.clear();
        self.parents.clear();
        self.transforms.clear();
        self.meshes.clear();
        self.epoch += 1;
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(crate::color::WHITE, LightRig::default())
    }
}
