/// Pixel size of the render target, derived from the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Zero dimensions are clamped to 1 so the aspect ratio stays finite.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_clamped() {
        let vp = Viewport::new(0, 0);
        assert_eq!(vp, Viewport::new(1, 1));
        assert_eq!(vp.aspect(), 1.0);
    }
}
