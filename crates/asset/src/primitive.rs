//! Procedural placeholder geometry.

use corelib::{
    Vec3,
    mesh::{MeshData, MeshVertex},
};

/// Axis-aligned box centred on the origin with flat-shaded faces.
/// 24 vertices (4 per face), 36 indices, counter-clockwise seen from outside.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vec3::new(width, height, depth) * 0.5;
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * half;
            vertices.push(MeshVertex::new(
                position.to_array(),
                normal.to_array(),
                [(su + 1.0) * 0.5, (sv + 1.0) * 0.5],
            ));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_expected_extent() {
        let mesh = box_mesh(2.0, 2.0, 1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.is_valid());

        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -1.0, -0.5));
        assert_eq!(hi, Vec3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn winding_matches_normals() {
        let mesh = box_mesh(2.0, 2.0, 1.0);
        for tri in mesh.indices.chunks_exact(3) {
            let p = |i: u32| Vec3::from(mesh.vertices[i as usize].position);
            let face = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            let normal = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(face.dot(normal) > 0.0);
        }
    }
}
