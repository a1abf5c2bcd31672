//! winit binding: one window, one session, redraw every refresh.
//! winit = 0.30.x (ApplicationHandler)

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use corelib::{Color, Viewport};
use renderer::{GpuState, RenderSurface};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    input::{KeyAction, key_action},
    session::{Bootstrapper, DragMode, FrameStatus, Session},
    timing::FrameTiming,
};

/// Pixel-delta wheel events are divided by this to get zoom steps.
const PIXELS_PER_SCROLL_STEP: f32 = 50.0;

struct WindowContainer {
    window: Arc<Window>,
    backends: wgpu::Backends,
}

impl crate::session::Container for WindowContainer {
    type Surface = GpuState;

    fn measured_size(&self) -> Viewport {
        let PhysicalSize { width, height } = self.window.inner_size();
        Viewport::new(width, height)
    }

    fn attach_surface(&self, viewport: Viewport) -> Result<GpuState> {
        let mut gpu = pollster::block_on(GpuState::new(self.window.clone(), self.backends))?;
        if gpu.size() != (viewport.width, viewport.height) {
            gpu.resize(viewport.width, viewport.height);
        }
        Ok(gpu)
    }
}

struct ViewerApp {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    session: Option<Session<GpuState>>,
    /// `--color`, held until a model is active.
    pending_color: Option<Color>,
    timing: Option<FrameTiming>,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        let pending_color = config.initial_color;
        let timing = config
            .show_fps
            .then(|| FrameTiming::new(config.title.clone()));
        Self {
            config,
            window: None,
            session: None,
            pending_color,
            timing,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.as_mut() {
            session.dispose();
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.frame() == FrameStatus::Stopped {
            self.shutdown(event_loop);
            return;
        }
        if self.pending_color.is_some() && session.load_state().has_model() {
            if let Some(color) = self.pending_color.take() {
                log::info!("Applying initial color {color}");
                session.update_model_color(color);
            }
        }
        if let (Some(timing), Some(window)) = (self.timing.as_mut(), self.window.as_ref()) {
            timing.tick(window, Instant::now());
        }
    }

    fn handle_key(&mut self, action: KeyAction, event_loop: &ActiveEventLoop) {
        match action {
            KeyAction::Exit => self.shutdown(event_loop),
            KeyAction::Recolor(color) => {
                if let Some(session) = self.session.as_mut() {
                    if session.update_model_color(color) {
                        log::info!("Model color set to {color}");
                    }
                }
            }
            KeyAction::RestoreColor => {
                if let Some(session) = self.session.as_mut() {
                    session.restore_model_color();
                }
            }
            KeyAction::None => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let container = match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(window.clone());
                Some(WindowContainer {
                    window,
                    backends: self.config.backends,
                })
            }
            Err(err) => {
                log::error!("Failed to create window: {err}");
                None
            }
        };

        self.session = Bootstrapper::init(
            container.as_ref(),
            self.config.capabilities(),
            self.config.scene_config(),
        );
        if self.session.is_none() {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    self.handle_key(key_action(event.physical_key), event_loop);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                let mode = match button {
                    MouseButton::Left => DragMode::Rotate,
                    MouseButton::Right => DragMode::Pan,
                    _ => return,
                };
                match state {
                    ElementState::Pressed => session.begin_drag(mode),
                    ElementState::Released => session.end_drag(mode),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(session) = self.session.as_mut() {
                    session.pointer_moved(position.x, position.y);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(session) = self.session.as_mut() {
                    session.pointer_left();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_SCROLL_STEP,
                };
                if let Some(session) = self.session.as_mut() {
                    session.scrolled(steps);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

/// Open the viewer window and block until it closes.
pub fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = ViewerApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;
    Ok(())
}
