//! Host scene graph
//!
//! The in-memory scene the exporter reads from:
//! - [`Node`]: hierarchy, transform, visibility, layer and tag
//! - [`Transform`]: local TRS with cached local/world matrices
//! - [`Scene`]: node arena, resource pools and per-node component maps
//! - [`Mesh`], [`Material`], [`Camera`], [`Light`]: exportable resources
//! - [`MeshRenderer`], [`SkinnedMeshRenderer`]: geometry bindings
//! - [`transform_system`]: world-matrix propagation

pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod node;
pub mod renderer;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;
pub mod wrapper;

pub use camera::{Camera, ProjectionType};
pub use light::{Light, LightKind};
pub use material::{AlphaMode, Material};
pub use mesh::Mesh;
pub use node::Node;
pub use renderer::{ComponentRef, MeshRenderer, SkinnedMeshRenderer};
pub use scene::Scene;
pub use skeleton::Skeleton;
pub use transform::Transform;
pub use wrapper::SceneNode;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct MaterialKey;
    pub struct CameraKey;
    pub struct LightKey;
}
