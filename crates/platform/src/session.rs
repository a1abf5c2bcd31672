//! Viewer session: scene bootstrap, per-frame stepping, resize and recolor.
//!
//! Nothing here touches winit directly. The display container and the
//! optional capabilities (asset loader, orbit controls) are injected, so a
//! missing piece is an explicit `None` rather than a runtime probe.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::Result;
use asset::{AssetLoader, LoadState, ModelProvider};
use corelib::{
    Color, Vec3, Viewport,
    camera::Camera,
    controls::{OrbitControls, OrbitSettings},
    light::LightRig,
    scene::Scene,
};
use renderer::{RenderSurface, SurfaceError, is_surface_lost};

/// Where the scene is displayed. Its size at init time fixes the first viewport.
pub trait Container {
    type Surface: RenderSurface;

    fn measured_size(&self) -> Viewport;

    fn attach_surface(&self, viewport: Viewport) -> Result<Self::Surface>;
}

/// Optional collaborators; `None` means unavailable.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub loader: Option<Arc<dyn AssetLoader>>,
    pub orbit_controls: Option<OrbitSettings>,
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub background: Color,
    pub lights: LightRig,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub model_path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: corelib::color::WHITE,
            lights: LightRig::default(),
            fov_y_deg: 45.0,
            z_near: 0.1,
            z_far: 1000.0,
            eye: Vec3::new(0.0, 1.0, 5.0),
            target: Vec3::ZERO,
            model_path: PathBuf::from("./leatherhandbag3dmodel.glb"),
        }
    }
}

/// Cancellation handle for the render cycle. Clones share one flag.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Rendered,
    /// Nothing presented this frame (surface lost, timeout); keep looping.
    Skipped,
    /// Session stopped or disposed; the loop should end.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

#[derive(Clone, Copy, Debug, Default)]
struct Pointer {
    drag: Option<DragMode>,
    last: Option<(f64, f64)>,
}

pub struct Bootstrapper;

impl Bootstrapper {
    /// Build a session inside `container`, or log why not and return `None`.
    pub fn init<C: Container>(
        container: Option<&C>,
        caps: Capabilities,
        config: SceneConfig,
    ) -> Option<Session<C::Surface>> {
        let Some(container) = container else {
            log::error!("Display container not found, scene not initialized");
            return None;
        };

        let viewport = container.measured_size();
        let surface = match container.attach_surface(viewport) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("Failed to attach render surface: {err:#}");
                return None;
            }
        };

        let mut scene = Scene::new(config.background, config.lights);
        let camera = Camera::new_perspective(
            config.eye,
            config.target,
            Vec3::Y,
            config.fov_y_deg.to_radians(),
            config.z_near,
            config.z_far,
            viewport.aspect(),
        );

        let controls = match caps.orbit_controls {
            Some(settings) => Some(OrbitControls::new(settings, config.target)),
            None => {
                log::error!("Orbit controls unavailable, continuing without camera interaction");
                None
            }
        };

        let mut provider = ModelProvider::new(caps.loader, config.model_path);
        provider.request(&mut scene);

        log::info!(
            "Scene initialized: viewport {}x{}, controls {}",
            viewport.width,
            viewport.height,
            if controls.is_some() { "on" } else { "off" }
        );

        Some(Session {
            scene,
            camera,
            viewport,
            controls,
            surface: Some(surface),
            provider,
            stop: StopToken::default(),
            pointer: Pointer::default(),
        })
    }
}

pub struct Session<S: RenderSurface> {
    scene: Scene,
    camera: Camera,
    viewport: Viewport,
    controls: Option<OrbitControls>,
    /// `None` once disposed.
    surface: Option<S>,
    provider: ModelProvider,
    stop: StopToken,
    pointer: Pointer,
}

impl<S: RenderSurface> Session<S> {
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn provider(&self) -> &ModelProvider {
        &self.provider
    }

    pub fn load_state(&self) -> LoadState {
        self.provider.state()
    }

    pub fn has_controls(&self) -> bool {
        self.controls.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.surface.is_none()
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Follow the container to a new size. Zero-area sizes (minimized) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-area resize {width}x{height}");
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.viewport = Viewport::new(width, height);
        self.camera.fit_viewport(self.viewport);
        surface.resize(width, height);
        log::debug!("Resized: {width}x{height}");
    }

    /// One step of the render cycle.
    pub fn frame(&mut self) -> FrameStatus {
        if self.stop.is_cancelled() {
            return FrameStatus::Stopped;
        }
        let Some(surface) = self.surface.as_mut() else {
            return FrameStatus::Stopped;
        };

        self.provider.poll(&mut self.scene);
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }

        match surface.render(&self.scene, &self.camera) {
            Ok(()) => FrameStatus::Rendered,
            Err(err) if is_surface_lost(&err) => {
                log::warn!("Surface {err:?}, reconfiguring");
                surface.recreate();
                FrameStatus::Skipped
            }
            Err(SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, stopping render loop");
                self.stop.cancel();
                FrameStatus::Stopped
            }
            Err(err) => {
                log::warn!("Frame skipped: {err:?}");
                FrameStatus::Skipped
            }
        }
    }

    /// Recolor every registered mesh. `false` while no model is active.
    pub fn update_model_color(&mut self, color: Color) -> bool {
        self.provider.recolor(&mut self.scene, color)
    }

    /// Undo all recolors.
    pub fn restore_model_color(&mut self) -> bool {
        self.provider.restore(&mut self.scene)
    }

    pub fn begin_drag(&mut self, mode: DragMode) {
        self.pointer.drag = Some(mode);
    }

    /// Ends the drag only if `mode` is the one in progress.
    pub fn end_drag(&mut self, mode: DragMode) {
        if self.pointer.drag == Some(mode) {
            self.pointer.drag = None;
        }
    }

    /// Cursor position in physical pixels.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let last = self.pointer.last.replace((x, y));
        let (Some(mode), Some((lx, ly)), Some(controls)) =
            (self.pointer.drag, last, self.controls.as_mut())
        else {
            return;
        };
        let (dx, dy) = ((x - lx) as f32, (y - ly) as f32);
        match mode {
            DragMode::Rotate => controls.rotate_by_pixels(dx, dy, self.viewport.height),
            DragMode::Pan => controls.pan_by_pixels(&self.camera, dx, dy, self.viewport.height),
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer = Pointer::default();
    }

    /// Wheel input; positive steps zoom in.
    pub fn scrolled(&mut self, steps: f32) {
        if let Some(controls) = self.controls.as_mut() {
            controls.zoom(steps);
        }
    }

    /// Stop the render cycle and release the surface. Safe to call twice.
    pub fn dispose(&mut self) {
        self.stop.cancel();
        if self.surface.take().is_some() {
            log::info!("Session disposed, render surface released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::{LoadObserver, LoadedModel, ModelMesh, ModelNode, primitive::box_mesh};
    use corelib::{Material, transform::Transform};
    use std::{cell::Cell, path::Path};

    #[derive(Default)]
    struct FakeSurface {
        size: (u32, u32),
        resizes: Vec<(u32, u32)>,
        frames: usize,
        fail_next: Option<SurfaceError>,
        meshes_seen: usize,
    }

    impl RenderSurface for FakeSurface {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resizes.push((width, height));
        }

        fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<(), SurfaceError> {
            if let Some(err) = self.fail_next.take() {
                return Err(err);
            }
            self.frames += 1;
            self.meshes_seen = scene.mesh_count();
            Ok(())
        }
    }

    struct FakeContainer {
        size: (u32, u32),
        attached: Cell<usize>,
        broken: bool,
    }

    impl FakeContainer {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                attached: Cell::new(0),
                broken: false,
            }
        }
    }

    impl Container for FakeContainer {
        type Surface = FakeSurface;

        fn measured_size(&self) -> Viewport {
            Viewport::new(self.size.0, self.size.1)
        }

        fn attach_surface(&self, viewport: Viewport) -> Result<FakeSurface> {
            if self.broken {
                anyhow::bail!("no adapter");
            }
            self.attached.set(self.attached.get() + 1);
            Ok(FakeSurface {
                size: (viewport.width, viewport.height),
                ..Default::default()
            })
        }
    }

    struct OneMesh;

    impl AssetLoader for OneMesh {
        fn load(&self, _path: &Path, _observer: &dyn LoadObserver) -> Result<LoadedModel> {
            Ok(LoadedModel {
                nodes: vec![ModelNode {
                    name: Some("bag".into()),
                    parent: None,
                    transform: Transform::identity(),
                    mesh: Some(ModelMesh {
                        data: box_mesh(1.0, 1.0, 0.5),
                        material: Material::new(Color::from_hex(0x5c3a21), 0.8, 0.0),
                    }),
                }],
            })
        }
    }

    struct Gated(crossbeam_channel::Receiver<()>);

    impl AssetLoader for Gated {
        fn load(&self, path: &Path, observer: &dyn LoadObserver) -> Result<LoadedModel> {
            self.0.recv()?;
            OneMesh.load(path, observer)
        }
    }

    fn full_caps() -> Capabilities {
        Capabilities {
            loader: None,
            orbit_controls: Some(OrbitSettings::default()),
        }
    }

    fn session(width: u32, height: u32, caps: Capabilities) -> Session<FakeSurface> {
        Bootstrapper::init(
            Some(&FakeContainer::new(width, height)),
            caps,
            SceneConfig::default(),
        )
        .expect("session")
    }

    fn wait_for_model(session: &mut Session<FakeSurface>) {
        for _ in 0..5_000 {
            if session.load_state().has_model() {
                return;
            }
            session.frame();
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        panic!("model never arrived");
    }

    #[test]
    fn missing_container_aborts_quietly() {
        let s = Bootstrapper::init::<FakeContainer>(None, full_caps(), SceneConfig::default());
        assert!(s.is_none());
    }

    #[test]
    fn surface_failure_aborts_quietly() {
        let mut container = FakeContainer::new(800, 600);
        container.broken = true;
        let s = Bootstrapper::init(Some(&container), full_caps(), SceneConfig::default());
        assert!(s.is_none());
    }

    #[test]
    fn camera_aspect_matches_container() {
        for (w, h) in [(800, 600), (1920, 1080), (300, 900), (1, 1)] {
            let container = FakeContainer::new(w, h);
            let s = Bootstrapper::init(Some(&container), full_caps(), SceneConfig::default())
                .unwrap();
            assert_eq!(container.attached.get(), 1);
            assert!((s.camera().aspect - w as f32 / h as f32).abs() < 1e-6);
            assert_eq!(s.surface().unwrap().size, (w, h));
        }
    }

    #[test]
    fn no_loader_means_placeholder_right_away() {
        let s = session(800, 600, full_caps());
        assert_eq!(s.load_state(), LoadState::FallbackSynthesized);
        assert_eq!(s.scene().mesh_count(), 1);
        assert_eq!(s.provider().registry().len(), 1);
    }

    #[test]
    fn resize_touches_only_viewport_camera_and_surface() {
        let mut s = session(800, 600, full_caps());
        let eye = s.camera().eye;
        let fov = s.camera().fov_y_rad;
        let materials: Vec<Material> = s.scene().meshes().map(|m| m.mesh.material).collect();

        s.resize(1024, 512);

        assert_eq!(s.viewport(), Viewport::new(1024, 512));
        assert!((s.camera().aspect - 2.0).abs() < 1e-6);
        assert_eq!(s.surface().unwrap().size, (1024, 512));
        assert_eq!(s.surface().unwrap().resizes, vec![(1024, 512)]);
        assert_eq!(s.camera().eye, eye);
        assert_eq!(s.camera().fov_y_rad, fov);
        let after: Vec<Material> = s.scene().meshes().map(|m| m.mesh.material).collect();
        assert_eq!(materials, after);
    }

    #[test]
    fn zero_area_resize_is_ignored() {
        let mut s = session(800, 600, full_caps());
        s.resize(0, 600);
        assert_eq!(s.viewport(), Viewport::new(800, 600));
        assert!(s.surface().unwrap().resizes.is_empty());
    }

    #[test]
    fn renders_before_model_arrives() {
        let (gate, rx) = crossbeam_channel::bounded(1);
        let caps = Capabilities {
            loader: Some(Arc::new(Gated(rx))),
            ..full_caps()
        };
        let mut s = session(800, 600, caps);
        assert_eq!(s.load_state(), LoadState::Loading);

        assert_eq!(s.frame(), FrameStatus::Rendered);
        assert_eq!(s.surface().unwrap().meshes_seen, 0);
        assert!(!s.update_model_color(Color::from_hex(0xff0000)));

        gate.send(()).unwrap();
        wait_for_model(&mut s);
        assert_eq!(s.load_state(), LoadState::Loaded);
        s.frame();
        assert_eq!(s.surface().unwrap().meshes_seen, 1);
        assert!(s.update_model_color(Color::from_hex(0xff0000)));
    }

    #[test]
    fn recolor_and_restore_through_session() {
        let caps = Capabilities {
            loader: Some(Arc::new(OneMesh)),
            ..full_caps()
        };
        let mut s = session(800, 600, caps);
        wait_for_model(&mut s);

        let red = Color::from_hex(0xff0000);
        assert!(s.update_model_color(red));
        assert!(s.update_model_color(red));
        let entry = *s.provider().registry().iter().next().unwrap();
        let live = s.scene().mesh(entry.node).unwrap().material;
        assert_eq!(live, entry.original.with_color(red));
        assert_eq!(entry.original.color.to_hex(), 0x5c3a21);

        assert!(s.restore_model_color());
        assert_eq!(s.scene().mesh(entry.node).unwrap().material, entry.original);
    }

    #[test]
    fn missing_controls_degrade_gracefully() {
        let caps = Capabilities {
            loader: None,
            orbit_controls: None,
        };
        let mut s = session(800, 600, caps);
        assert!(!s.has_controls());

        let eye = s.camera().eye;
        s.begin_drag(DragMode::Rotate);
        s.pointer_moved(10.0, 10.0);
        s.pointer_moved(200.0, 10.0);
        s.scrolled(3.0);
        assert_eq!(s.frame(), FrameStatus::Rendered);
        assert_eq!(s.camera().eye, eye);
    }

    #[test]
    fn drag_rotates_camera() {
        let mut s = session(800, 600, full_caps());
        let eye = s.camera().eye;
        s.begin_drag(DragMode::Rotate);
        s.pointer_moved(100.0, 300.0);
        s.pointer_moved(250.0, 300.0);
        s.end_drag(DragMode::Rotate);
        s.pointer_moved(400.0, 300.0);
        for _ in 0..10 {
            s.frame();
        }
        assert!((s.camera().eye - eye).length() > 0.1);
        assert!((s.camera().eye.y - eye.y).abs() < 1e-3);
    }

    #[test]
    fn releasing_other_button_keeps_rotating() {
        let mut s = session(800, 600, full_caps());
        let eye = s.camera().eye;
        s.begin_drag(DragMode::Rotate);
        s.pointer_moved(100.0, 300.0);
        s.end_drag(DragMode::Pan);
        assert_eq!(s.pointer.drag, Some(DragMode::Rotate));

        s.pointer_moved(250.0, 300.0);
        for _ in 0..10 {
            s.frame();
        }
        assert!((s.camera().eye - eye).length() > 0.1);

        s.end_drag(DragMode::Rotate);
        assert_eq!(s.pointer.drag, None);
    }

    #[test]
    fn surface_loss_is_recovered() {
        let mut s = session(800, 600, full_caps());
        s.surface.as_mut().unwrap().fail_next = Some(SurfaceError::Lost);
        assert_eq!(s.frame(), FrameStatus::Skipped);
        assert_eq!(s.surface().unwrap().resizes, vec![(800, 600)]);
        assert_eq!(s.frame(), FrameStatus::Rendered);
    }

    #[test]
    fn out_of_memory_stops_the_loop() {
        let mut s = session(800, 600, full_caps());
        s.surface.as_mut().unwrap().fail_next = Some(SurfaceError::OutOfMemory);
        assert_eq!(s.frame(), FrameStatus::Stopped);
        assert_eq!(s.frame(), FrameStatus::Stopped);
    }

    #[test]
    fn stop_token_ends_the_cycle() {
        let mut s = session(800, 600, full_caps());
        let token = s.stop_token();
        assert_eq!(s.frame(), FrameStatus::Rendered);
        token.cancel();
        assert_eq!(s.frame(), FrameStatus::Stopped);
        assert!(!s.is_disposed());
    }

    #[test]
    fn dispose_releases_surface_once() {
        let mut s = session(800, 600, full_caps());
        s.dispose();
        assert!(s.is_disposed());
        assert!(s.surface().is_none());
        assert_eq!(s.frame(), FrameStatus::Stopped);
        s.resize(640, 480);
        assert_eq!(s.viewport(), Viewport::new(800, 600));
        s.dispose();
        assert!(s.stop_token().is_cancelled());
    }
}
