//! Fixed lighting rig: one ambient term plus one directional light.

use crate::{Color, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Parallel light shining from `position` towards `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
}

impl DirectionalLight {
    /// Unit vector the light travels along.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Default for LightRig {
    /// Soft white ambient (0.6) and a white key light (0.8) at (5, 10, 7).
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: crate::color::WHITE,
                intensity: 0.6,
            },
            directional: DirectionalLight {
                color: crate::color::WHITE,
                intensity: 0.8,
                position: Vec3::new(5.0, 10.0, 7.0),
                target: Vec3::ZERO,
                cast_shadow: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_light_points_down_at_origin() {
        let dir = LightRig::default().directional.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.y < 0.0);
    }
}
