//! Scene-graph exporter
//!
//! Turns a hierarchical host scene into a flat, index-based document:
//!
//! - [`host`]: read-only [`SceneHost`] interface over the scene
//! - [`writer`]: [`DocumentWriter`] interface the exporter pushes into
//! - [`attachments`]: behavior serialization into generic values
//! - [`transform`]: world or parent-relative transform resolution
//! - [`registrar`]: resource registration with sentinel failures
//! - [`exporter`]: the two-pass traversal, [`SceneExporter`]
//! - [`gltf`]: the bundled glTF 2.0 writer

pub mod attachments;
pub mod errors;
pub mod exporter;
pub mod gltf;
pub mod host;
pub mod registrar;
pub mod settings;
pub mod transform;
pub mod writer;

pub use errors::{ExportError, Result};
pub use exporter::SceneExporter;
pub use gltf::{GltfWriter, GltfWriterSettings};
pub use host::{ComponentBinding, MeshBinding, SceneHost, SkinnedMeshBinding};
pub use settings::{EDITOR_ONLY_TAG, ExportSettings, LayerMask};
pub use transform::NodeTransform;
pub use writer::{DocumentWriter, ExportedNode, NodeIndex, ResourceIndex, SceneIndex, SkinJoints};
