//! glTF 2.0 / GLB loader producing a flattened node hierarchy.
//! Every primitive becomes its own child mesh node under the glTF node that owns it.

use std::{
    fs::File,
    io::Read,
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use corelib::{
    Color, Material, Quat, Vec3,
    mesh::{MeshData, MeshVertex},
    transform::Transform,
};

use crate::loader::{AssetLoader, LoadObserver, LoadProgress, LoadedModel, ModelMesh, ModelNode};

const DEFAULT_CHUNK: usize = 256 * 1024;

/// Loads `.glb` (and `.gltf` with external or embedded buffers) from disk.
#[derive(Clone, Debug)]
pub struct GltfLoader {
    chunk_size: usize,
}

impl GltfLoader {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK,
        }
    }

}

impl Default for GltfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader for GltfLoader {
    fn load(&self, path: &Path, observer: &dyn LoadObserver) -> Result<LoadedModel> {
        log::info!("Loading model from {}", path.display());
        let bytes = read_with_progress(path, self.chunk_size, observer)?;
        load_gltf_from_slice(&bytes, path.parent())
            .with_context(|| format!("Failed to load glTF asset: {}", path.display()))
    }
}

fn read_with_progress(path: &Path, chunk: usize, observer: &dyn LoadObserver) -> Result<Vec<u8>> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open model file: {}", path.display()))?;
    let total = file.metadata().ok().map(|m| m.len());

    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut buf = vec![0u8; chunk];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("Failed to read model file: {}", path.display()))?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..n]);
        observer.on_progress(LoadProgress {
            loaded: bytes.len() as u64,
            total,
        });
    }
    Ok(bytes)
}

/// Parse an in-memory glTF/GLB. `base` resolves relative buffer URIs.
pub fn load_gltf_from_slice(bytes: &[u8], base: Option<&Path>) -> Result<LoadedModel> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(bytes).context("Failed to parse glTF document")?;
    let buffers =
        gltf::import_buffers(&document, base, blob).context("Failed to load glTF buffers")?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| anyhow!("glTF contains no scenes"))?;

    let mut model = LoadedModel::default();
    let mut visited = vec![false; document.nodes().len()];
    for node in scene.nodes() {
        visit_node(&node, None, &buffers, &mut visited, &mut model)?;
    }

    if model.mesh_count() == 0 {
        anyhow::bail!("glTF scene contains no triangle meshes");
    }
    Ok(model)
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: Option<usize>,
    buffers: &[gltf::buffer::Data],
    visited: &mut [bool],
    model: &mut LoadedModel,
) -> Result<()> {
    // Node graphs must be trees; a second visit means a cycle or a shared child.
    match visited.get_mut(node.index()) {
        Some(seen) if !*seen => *seen = true,
        _ => anyhow::bail!("glTF node graph contains a cycle at node {}", node.index()),
    }

    let (translation, rotation, scale) = node.transform().decomposed();
    let index = model.nodes.len();
    model.nodes.push(ModelNode {
        name: node.name().map(str::to_owned),
        parent,
        transform: Transform::from_trs(
            Vec3::from(translation),
            Quat::from_array(rotation),
            Vec3::from(scale),
        ),
        mesh: None,
    });

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of mesh {:?}: mode {:?} is not triangles",
                    primitive.index(),
                    mesh.name(),
                    primitive.mode()
                );
                continue;
            }
            let data = read_primitive(&primitive, buffers).with_context(|| {
                format!(
                    "Failed to read primitive {} of mesh {}",
                    primitive.index(),
                    mesh.index()
                )
            })?;
            model.nodes.push(ModelNode {
                name: mesh.name().map(str::to_owned),
                parent: Some(index),
                transform: Transform::identity(),
                mesh: Some(ModelMesh {
                    data,
                    material: read_material(&primitive.material()),
                }),
            });
        }
    }

    for child in node.children() {
        visit_node(&child, Some(index), buffers, visited, model)?;
    }
    Ok(())
}

fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<MeshData> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| anyhow!("Primitive has no POSITION attribute"))?
        .collect();
    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|it| it.collect());
    let uvs: Option<Vec<[f32; 2]>> = reader.read_tex_coords(0).map(|it| it.into_f32().collect());

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => {
            let count = u32::try_from(positions.len())
                .map_err(|_| anyhow!("Too many vertices in primitive (>{})", u32::MAX))?;
            (0..count).collect()
        }
    };

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let normal = normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .unwrap_or([0.0, 0.0, 0.0]);
            let uv = uvs
                .as_ref()
                .and_then(|t| t.get(i).copied())
                .unwrap_or([0.0, 0.0]);
            MeshVertex::new(position, normal, uv)
        })
        .collect();

    let mut data = MeshData::new(vertices, indices);
    if !data.is_valid() {
        anyhow::bail!(
            "Primitive is not a valid triangle list ({} vertices, {} indices)",
            data.vertices.len(),
            data.indices.len()
        );
    }
    if normals.is_none() {
        data.recompute_normals();
    }
    Ok(data)
}

/// glTF factors are already linear, matching `Color`'s storage.
fn read_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _a] = pbr.base_color_factor();
    Material::new(
        Color::linear(r, g, b),
        pbr.roughness_factor(),
        pbr.metallic_factor(),
    )
}
