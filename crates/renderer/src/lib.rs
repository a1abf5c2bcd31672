//! Renderer: the `RenderSurface` seam plus its wgpu implementation.
//! wgpu = 27.x, winit = 0.30.x

mod gpu;
mod uniforms;

pub use gpu::GpuState;
pub use uniforms::{GlobalsUniform, ObjectUniform};
pub use wgpu::SurfaceError;

use corelib::{camera::Camera, scene::Scene};

/// Something a scene can be drawn into, sized in physical pixels.
pub trait RenderSurface {
    fn size(&self) -> (u32, u32);

    /// Reconfigure to exactly `width` x `height` pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw the current scene state. An empty scene is valid.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), SurfaceError>;

    /// Recover after `Lost`/`Outdated`.
    fn recreate(&mut self) {
        let (w, h) = self.size();
        self.resize(w, h);
    }
}

/// Whether the error is recovered by reconfiguring the surface.
pub fn is_surface_lost(err: &SurfaceError) -> bool {
    matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
}
