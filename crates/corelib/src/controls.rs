//! Orbit-style camera controls: drag to rotate around a target, wheel to zoom.
//!
//! Input only accumulates deltas; `update` applies them to a camera once per
//! frame. With damping on, each update consumes a fraction of the pending
//! delta, so motion eases out over several frames.

use std::f32::consts::PI;

use crate::{Vec3, camera::Camera};

const EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_pan: false,
            rotate_speed: 1.0,
            min_distance: 2.0,
            max_distance: 10.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI / 2.0,
        }
    }
}

/// Spherical coordinates around +Y: `phi` from the pole, `theta` around the axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius < EPS {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    pub target: Vec3,
    delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings, target: Vec3) -> Self {
        Self {
            settings,
            target,
            delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Pointer drag of `(dx, dy)` pixels; a drag across the full viewport height is one turn.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: u32) {
        let h = viewport_height.max(1) as f32;
        let k = 2.0 * PI * self.settings.rotate_speed / h;
        self.delta.theta -= dx * k;
        self.delta.phi -= dy * k;
    }

    /// Positive steps move closer, negative steps move away.
    pub fn zoom(&mut self, steps: f32) {
        if !self.settings.enable_zoom {
            return;
        }
        self.scale *= 0.95f32.powf(self.settings.zoom_speed * steps);
    }

    /// Screen-space pan; ignored unless `enable_pan` is set.
    pub fn pan_by_pixels(&mut self, camera: &Camera, dx: f32, dy: f32, viewport_height: u32) {
        if !self.settings.enable_pan {
            return;
        }
        let distance = (camera.eye - self.target).length();
        let world_per_px =
            2.0 * distance * (camera.fov_y_rad * 0.5).tan() / viewport_height.max(1) as f32;
        let forward = (self.target - camera.eye).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);
        self.pan_offset += (-dx * right + dy * up) * world_per_px;
    }

    /// Apply pending input to `camera`. Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let s = self.settings;
        let mut spherical = Spherical::from_offset(camera.eye - self.target);

        let k = if s.enable_damping { s.damping_factor } else { 1.0 };
        spherical.theta += self.delta.theta * k;
        spherical.phi += self.delta.phi * k;
        spherical.phi = spherical
            .phi
            .clamp(s.min_polar_angle, s.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(s.min_distance, s.max_distance);

        if s.enable_damping {
            self.target += self.pan_offset * k;
            self.pan_offset *= 1.0 - k;
        } else {
            self.target += self.pan_offset;
            self.pan_offset = Vec3::ZERO;
        }

        let eye = self.target + spherical.to_offset();
        let moved = (eye - camera.eye).length_squared() > EPS * EPS || camera.target != self.target;
        camera.eye = eye;
        camera.target = self.target;

        if s.enable_damping {
            self.delta.theta *= 1.0 - k;
            self.delta.phi *= 1.0 - k;
        } else {
            self.delta = Spherical::default();
        }
        self.scale = 1.0;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    fn camera() -> Camera {
        Camera::new_perspective(
            vec3(0.0, 1.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            45f32.to_radians(),
            0.1,
            1000.0,
            1.0,
        )
    }

    #[test]
    fn idle_update_keeps_camera_in_place() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitSettings::default(), Vec3::ZERO);
        controls.update(&mut cam);
        assert!((cam.eye - vec3(0.0, 1.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn damping_eases_towards_full_rotation() {
        let mut cam = camera();
        let start = cam.eye;
        let mut controls = OrbitControls::new(OrbitSettings::default(), Vec3::ZERO);
        // Half a turn around Y.
        controls.rotate_by_pixels(-300.0, 0.0, 600);

        controls.update(&mut cam);
        let after_one = cam.eye;
        assert!((after_one - start).length() < 1.0, "damped first step is small");

        for _ in 0..600 {
            controls.update(&mut cam);
        }
        assert!((cam.eye.z + start.z).abs() < 1e-2, "ended behind the target");
        assert!((cam.eye.y - start.y).abs() < 1e-3, "height untouched");
    }

    #[test]
    fn polar_angle_never_drops_below_horizon() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitSettings::default(), Vec3::ZERO);
        controls.rotate_by_pixels(0.0, -10_000.0, 600);
        for _ in 0..200 {
            controls.update(&mut cam);
            assert!(cam.eye.y >= -1e-3);
        }
    }

    #[test]
    fn zoom_is_clamped_to_distance_range() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitSettings::default(), Vec3::ZERO);
        controls.zoom(500.0);
        controls.update(&mut cam);
        assert!((cam.eye.length() - 2.0).abs() < 1e-4);

        controls.zoom(-500.0);
        controls.update(&mut cam);
        assert!((cam.eye.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn pan_disabled_by_default() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitSettings::default(), Vec3::ZERO);
        let snapshot = cam;
        controls.pan_by_pixels(&snapshot, 50.0, 50.0, 600);
        controls.update(&mut cam);
        assert_eq!(controls.target, Vec3::ZERO);
    }
}
