//! Model provider: obtains the displayed model and recolors it.
//!
//! `Idle -> Loading -> Loaded | FallbackSynthesized`, no retries. Without a
//! loader the provider goes straight from `Idle` to `FallbackSynthesized`.
//! A failed load always ends with the placeholder box in the scene.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, anyhow};
use corelib::{
    Color, Material, Vec3,
    color::BLACK,
    scene::{MeshComponent, NodeId, Scene},
    transform::Transform,
};
use crossbeam_channel::TryRecvError;

use crate::{
    job::{LoadEvent, LoadJob},
    loader::{AssetLoader, LoadProgress, LoadedModel},
    primitive::box_mesh,
    registry::MaterialRegistry,
};

/// Uniform scale applied to a loaded model.
pub const MODEL_SCALE: f32 = 1.5;
/// Where the model (loaded or placeholder) sits in the scene.
pub const MODEL_POSITION: Vec3 = Vec3::new(0.0, -0.5, 0.0);
/// Placeholder box width, height, depth.
pub const FALLBACK_SIZE: Vec3 = Vec3::new(2.0, 2.0, 1.0);

pub fn fallback_material() -> Material {
    Material::new(BLACK, 0.4, 0.1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    FallbackSynthesized,
}

impl LoadState {
    /// A model is in the scene and registered.
    pub fn has_model(self) -> bool {
        matches!(self, Self::Loaded | Self::FallbackSynthesized)
    }
}

pub struct ModelProvider {
    loader: Option<Arc<dyn AssetLoader>>,
    source: PathBuf,
    state: LoadState,
    registry: MaterialRegistry,
    job: Option<LoadJob>,
    root: Option<NodeId>,
    last_percent: Option<u32>,
}

impl ModelProvider {
    pub fn new(loader: Option<Arc<dyn AssetLoader>>, source: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            source: source.into(),
            state: LoadState::Idle,
            registry: MaterialRegistry::new(),
            job: None,
            root: None,
            last_percent: None,
        }
    }

    #[inline]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[inline]
    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    /// Root node of the active model, once there is one.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Start obtaining a model. Only valid in `Idle`.
    pub fn request(&mut self, scene: &mut Scene) {
        if self.state != LoadState::Idle {
            log::warn!("Model already requested (state {:?})", self.state);
            return;
        }

        let Some(loader) = self.loader.clone() else {
            log::error!("No asset loader available, using placeholder model");
            self.synthesize_fallback(scene);
            return;
        };

        match LoadJob::spawn(loader, self.source.clone()) {
            Ok(job) => {
                log::info!("Loading model {}", self.source.display());
                self.job = Some(job);
                self.last_percent = None;
                self.state = LoadState::Loading;
            }
            Err(err) => {
                log::error!("Failed to start model loader: {err}");
                self.synthesize_fallback(scene);
            }
        }
    }

    /// Drain pending load events without blocking.
    /// Returns `true` if the load finished during this call.
    pub fn poll(&mut self, scene: &mut Scene) -> bool {
        loop {
            let event = match self.job.as_ref() {
                Some(job) => job.try_recv(),
                None => return false,
            };
            match event {
                Ok(LoadEvent::Progress(p)) => self.report_progress(p),
                Ok(LoadEvent::Finished(result)) => {
                    self.job = None;
                    self.complete(scene, result);
                    return true;
                }
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => {
                    self.job = None;
                    self.complete(scene, Err(anyhow!("Model loader exited without a result")));
                    return true;
                }
            }
        }
    }

    /// Block until the in-flight load (if any) finishes.
    pub fn wait(&mut self, scene: &mut Scene) {
        while let Some(job) = self.job.as_ref() {
            match job.recv() {
                Ok(LoadEvent::Progress(p)) => self.report_progress(p),
                Ok(LoadEvent::Finished(result)) => {
                    self.job = None;
                    self.complete(scene, result);
                }
                Err(_) => {
                    self.job = None;
                    self.complete(scene, Err(anyhow!("Model loader exited without a result")));
                }
            }
        }
    }

    /// Apply a load result. Ignored unless a load is in progress.
    pub fn complete(&mut self, scene: &mut Scene, result: Result<LoadedModel>) {
        if self.state != LoadState::Loading {
            log::warn!("Ignoring load result in state {:?}", self.state);
            return;
        }
        match result {
            Ok(model) if model.mesh_count() > 0 => self.attach_model(scene, model),
            Ok(_) => {
                log::error!("Model {} has no meshes", self.source.display());
                self.synthesize_fallback(scene);
            }
            Err(err) => {
                log::error!("Model load failed: {err:#}");
                self.synthesize_fallback(scene);
            }
        }
    }

    /// Tint every registered mesh with `color`, rebased on its pristine material.
    /// Returns `false` (and changes nothing) while no model is active.
    pub fn recolor(&self, scene: &mut Scene, color: Color) -> bool {
        if !self.state.has_model() {
            log::info!("Model not loaded yet, ignoring color {color}");
            return false;
        }
        for entry in self.registry.iter() {
            scene.set_material(entry.node, entry.original.with_color(color));
        }
        log::debug!("Recolored {} meshes to {color}", self.registry.len());
        true
    }

    /// Put every registered mesh back on its pristine material.
    pub fn restore(&self, scene: &mut Scene) -> bool {
        if !self.state.has_model() {
            log::info!("Model not loaded yet, nothing to restore");
            return false;
        }
        for entry in self.registry.iter() {
            scene.set_material(entry.node, entry.original);
        }
        true
    }

    /// Drop the active model (and any in-flight load) and return to `Idle`.
    pub fn reset(&mut self, scene: &mut Scene) {
        self.job = None;
        scene.clear();
        self.registry.clear();
        self.root = None;
        self.state = LoadState::Idle;
    }

    fn report_progress(&mut self, progress: LoadProgress) {
        let Some(percent) = progress.percent() else {
            log::debug!("{} bytes loaded", progress.loaded);
            return;
        };
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            log::info!("{percent}% loaded");
        }
    }

    fn attach_model(&mut self, scene: &mut Scene, model: LoadedModel) {
        let root = scene.spawn(
            Some("model".into()),
            None,
            Transform::from_translation(MODEL_POSITION).with_uniform_scale(MODEL_SCALE),
            None,
        );

        let mut ids: Vec<NodeId> = Vec::with_capacity(model.nodes.len());
        for node in model.nodes {
            let parent = node
                .parent
                .and_then(|p| ids.get(p).copied())
                .unwrap_or(root);
            let mesh = node.mesh.map(|m| MeshComponent {
                data: Arc::new(m.data),
                material: m.material,
                cast_shadow: true,
                receive_shadow: true,
            });
            let original = mesh.as_ref().map(|m| m.material);
            let id = scene.spawn(node.name, Some(parent), node.transform, mesh);
            if let Some(material) = original {
                self.registry.register(id, &material);
            }
            ids.push(id);
        }

        self.root = Some(root);
        self.state = LoadState::Loaded;
        log::info!(
            "Model loaded: {} nodes, {} meshes registered",
            ids.len(),
            self.registry.len()
        );
    }

    fn synthesize_fallback(&mut self, scene: &mut Scene) {
        log::info!("Creating placeholder model");
        let material = fallback_material();
        let mesh = box_mesh(FALLBACK_SIZE.x, FALLBACK_SIZE.y, FALLBACK_SIZE.z);
        let id = scene.spawn(
            Some("placeholder".into()),
            None,
            Transform::from_translation(MODEL_POSITION),
            Some(MeshComponent::new(Arc::new(mesh), material)),
        );
        self.registry.register(id, &material);
        self.root = Some(id);
        self.state = LoadState::FallbackSynthesized;
    }
}
