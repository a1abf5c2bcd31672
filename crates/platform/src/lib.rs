//! Platform layer: windowing, event loop and the viewer session.
//!
//! `session` holds everything that does not need a window (scene bootstrap,
//! resize, frame stepping, recolor); `app` binds it to winit and wgpu.

mod app;
pub mod config;
pub mod input;
pub mod session;
mod timing;

pub use app::run;
pub use config::ViewerConfig;
pub use session::{
    Bootstrapper, Capabilities, Container, DragMode, FrameStatus, SceneConfig, Session, StopToken,
};
