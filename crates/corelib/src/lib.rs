//! Core types: math re-exports, Transform, Camera, scene graph and materials.
//! Renderer-agnostic; everything here is plain data plus small math.

pub use glam::{Mat3, Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod color;
pub mod controls;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod transform;
pub mod viewport;

pub use color::Color;
pub use error::CoreError;
pub use material::Material;
pub use viewport::Viewport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translate_then_scale_matrix() {
        let t = transform::Transform::from_trs(
            vec3(0.0, -0.5, 0.0),
            Quat::IDENTITY,
            Vec3::splat(1.5),
        );
        // Last column = translation, diagonal = scale (no rotation).
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 0.0).abs() < 1e-6);
        assert!((m[13] + 0.5).abs() < 1e-6);
        assert!((m[14] - 0.0).abs() < 1e-6);
        assert!((m[0] - 1.5).abs() < 1e-6);
        assert!((m[5] - 1.5).abs() < 1e-6);
        assert!((m[10] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn camera_pv_is_finite() {
        let cam = camera::Camera::new_perspective(
            vec3(0.0, 1.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            45f32.to_radians(),
            0.1,
            1000.0,
            16.0 / 9.0,
        );
        let pv = cam.proj_view();
        let a = pv.to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }
}
