use crate::Color;

/// Metallic-roughness surface description of a mesh.
///
/// Cloning yields an independent value; there is no shared state between
/// a material and its clones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
}

impl Material {
    pub fn new(color: Color, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            roughness: roughness.clamp(0.0, 1.0),
            metalness: metalness.clamp(0.0, 1.0),
        }
    }

    /// Same surface, different tint.
    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for Material {
    /// Plain white dielectric (roughness 1, metalness 0).
    fn default() -> Self {
        Self::new(Color::default(), 1.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_color_keeps_surface() {
        let m = Material::new(Color::from_hex(0x000000), 0.4, 0.1);
        let tinted = m.with_color(Color::from_hex(0xff0000));
        assert_eq!(tinted.roughness, 0.4);
        assert_eq!(tinted.metalness, 0.1);
        assert_eq!(tinted.color.to_hex(), 0xff0000);
        assert_eq!(m.color.to_hex(), 0x000000);
    }
}
