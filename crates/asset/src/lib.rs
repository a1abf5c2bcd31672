//! Asset loading and model management.
//! glTF/GLB loading on a worker thread, placeholder synthesis when that is
//! not possible, and the material registry used for recoloring.

pub mod gltf_loader;
pub mod job;
pub mod loader;
pub mod primitive;
pub mod provider;
pub mod registry;

pub use gltf_loader::GltfLoader;
pub use job::{LoadEvent, LoadJob};
pub use loader::{AssetLoader, LoadObserver, LoadProgress, LoadedModel, ModelMesh, ModelNode};
pub use provider::{LoadState, ModelProvider};
pub use registry::{MaterialRegistry, RegistryEntry};
