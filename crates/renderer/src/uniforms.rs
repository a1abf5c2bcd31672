//! CPU mirrors of the WGSL uniform blocks in `shaders/mesh.wgsl`.

use bytemuck::{Pod, Zeroable};
use corelib::{Material, camera::Camera, scene::Scene};
use glam::Mat4;

/// Per-frame data (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
}

impl GlobalsUniform {
    pub fn new(scene: &Scene, camera: &Camera) -> Self {
        let ambient = scene.lights.ambient;
        let key = scene.lights.directional;
        let amb = ambient.color.scaled(ambient.intensity);
        let light = key.color.scaled(key.intensity);
        let dir = key.direction();
        Self {
            view_proj: camera.proj_view().to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            ambient: [amb.r, amb.g, amb.b, 1.0],
            light_dir: dir.extend(0.0).to_array(),
            light_color: [light.r, light.g, light.b, 1.0],
        }
    }
}

/// Per-mesh data, rewritten every frame so material swaps show immediately.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(world: Mat4, material: &Material) -> Self {
        let c = material.color;
        Self {
            model: world.to_cols_array_2d(),
            normal: world.inverse().transpose().to_cols_array_2d(),
            color: [c.r, c.g, c.b, 1.0],
            params: [material.roughness, material.metalness, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{Color, Vec3, vec3};

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 128);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
    }

    #[test]
    fn globals_carry_light_rig() {
        let scene = Scene::default();
        let camera = Camera::new_perspective(
            vec3(0.0, 1.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            45f32.to_radians(),
            0.1,
            1000.0,
            1.5,
        );
        let g = GlobalsUniform::new(&scene, &camera);
        assert!((g.ambient[0] - 0.6).abs() < 1e-6);
        assert!((g.light_color[1] - 0.8).abs() < 1e-6);
        assert!(g.light_dir[1] < 0.0);
        assert_eq!(g.camera_pos, [0.0, 1.0, 5.0, 1.0]);
    }

    #[test]
    fn object_uniform_packs_material() {
        let m = Material::new(Color::linear(0.2, 0.3, 0.4), 0.4, 0.1);
        let u = ObjectUniform::new(Mat4::IDENTITY, &m);
        assert_eq!(u.color, [0.2, 0.3, 0.4, 1.0]);
        assert_eq!(u.params, [0.4, 0.1, 0.0, 0.0]);
        assert_eq!(u.normal, Mat4::IDENTITY.to_cols_array_2d());
    }
}
