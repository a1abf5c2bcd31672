//! Viewer configuration assembled by the binary from command-line flags.

use std::{path::PathBuf, sync::Arc};

use asset::GltfLoader;
use corelib::{Color, controls::OrbitSettings};

use crate::session::{Capabilities, SceneConfig};

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub backends: wgpu::Backends,
    pub model_path: PathBuf,
    /// Applied once a model is active.
    pub initial_color: Option<Color>,
    pub orbit_controls: bool,
    pub asset_loader: bool,
    pub show_fps: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "bagview".to_string(),
            width: 1280,
            height: 720,
            backends: wgpu::Backends::all(),
            model_path: SceneConfig::default().model_path,
            initial_color: None,
            orbit_controls: true,
            asset_loader: true,
            show_fps: false,
        }
    }
}

impl ViewerConfig {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            loader: self
                .asset_loader
                .then(|| Arc::new(GltfLoader::new()) as Arc<dyn asset::AssetLoader>),
            orbit_controls: self.orbit_controls.then(OrbitSettings::default),
        }
    }

    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            model_path: self.model_path.clone(),
            ..SceneConfig::default()
        }
    }
}
