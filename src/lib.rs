//! # Sylva
//!
//! Scene-graph exporter: walks a hierarchical scene and writes it as a flat,
//! index-based glTF 2.0 document, with per-node behavior state embedded as
//! generic `extras`.
//!
//! This umbrella crate re-exports the workspace members:
//!
//! - [`core`]: generic value model and the [`Behavior`](core::Behavior) interface
//! - [`scene`]: the host scene graph
//! - [`export`]: the exporter, its settings and the glTF writer
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sylva::prelude::*;
//!
//! struct Health { health: i32, name: String }
//! impl_behavior!(Health { Public health, Public name });
//!
//! let mut scene = Scene::new();
//! let bob = scene.create_node_with_name("Bob");
//! scene.add_behavior(bob, Health { health: 5, name: "Bob".into() });
//! scene.update_matrix_world();
//!
//! let mut exporter = SceneExporter::new(GltfWriter::default(), ExportSettings::default());
//! exporter.export(&scene, &scene.root_nodes.clone(), None, Some("Main"))?;
//!
//! let (_handle, registration) = AbortHandle::new_pair();
//! exporter.finalize("bob.gltf", registration).await?;
//! ```

pub use sylva_core as core;
pub use sylva_export as export;
pub use sylva_scene as scene;

pub use sylva_core::{Behavior, Color, Field, FieldAccess, ToValue, Value, ValueMap, impl_behavior, impl_symbol_value};
pub use sylva_export::errors::{ExportError, Result};
pub use sylva_export::{ExportSettings, GltfWriter, GltfWriterSettings, LayerMask, SceneExporter};
pub use sylva_scene::{Camera, Light, Material, Mesh, Node, NodeHandle, Scene};

pub mod prelude {
    pub use futures::future::{AbortHandle, AbortRegistration};
    pub use glam::{Affine3A, Quat, Vec2, Vec3, Vec4};

    pub use sylva_core::{Behavior, Color, Field, FieldAccess, ToValue, Value, ValueMap, impl_behavior, impl_symbol_value};
    pub use sylva_export::{
        DocumentWriter, EDITOR_ONLY_TAG, ExportError, ExportSettings, GltfWriter, GltfWriterSettings, LayerMask,
        NodeIndex, ResourceIndex, SceneExporter, SceneHost,
    };
    pub use sylva_scene::{
        AlphaMode, Camera, Light, LightKind, Material, Mesh, MeshRenderer, Node, NodeHandle, ProjectionType, Scene,
        SceneNode, Skeleton, SkinnedMeshRenderer, Transform,
    };
}
