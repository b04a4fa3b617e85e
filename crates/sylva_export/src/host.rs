//! Host object model interface
//!
//! Read-only accessors the exporter needs over a scene. Any hierarchical
//! scene can be exported by implementing [`SceneHost`]; the bundled
//! implementation covers [`sylva_scene::Scene`].

use std::fmt::Debug;
use std::hash::Hash;

use glam::Affine3A;
use sylva_core::Behavior;
use sylva_scene::{Camera, Light, Material, Mesh, NodeHandle, Scene};

use crate::transform::NodeTransform;

/// Geometry binding of a node.
///
/// `mesh` is `None` when the binding refers to a mesh the host no longer
/// has. Material slots keep their order; `None` is an unassigned slot.
#[derive(Debug)]
pub struct MeshBinding<'a, M, Mat> {
    pub mesh: Option<&'a M>,
    pub materials: Vec<Option<&'a Mat>>,
    pub enabled: bool,
}

/// Geometry binding deformed by an ordered bone list.
#[derive(Debug)]
pub struct SkinnedMeshBinding<'a, N, M, Mat> {
    pub geometry: MeshBinding<'a, M, Mat>,
    pub bones: &'a [N],
    pub inverse_bind_matrices: &'a [Affine3A],
}

/// Camera or light binding of a node.
#[derive(Debug)]
pub struct ComponentBinding<'a, T> {
    pub resource: Option<&'a T>,
    pub enabled: bool,
}

pub trait SceneHost {
    type Node: Copy + Eq + Hash + Debug;
    type Mesh;
    type Material;
    type Camera;
    type Light;

    fn contains(&self, node: Self::Node) -> bool;
    fn children(&self, node: Self::Node) -> &[Self::Node];
    fn name(&self, node: Self::Node) -> Option<&str>;

    /// Transform relative to the parent.
    fn local_transform(&self, node: Self::Node) -> NodeTransform;
    fn world_matrix(&self, node: Self::Node) -> Affine3A;

    /// The node's own active flag, ignoring its ancestors.
    fn is_active_self(&self, node: Self::Node) -> bool;
    /// `true` when the node and all of its ancestors are active.
    fn is_active_in_hierarchy(&self, node: Self::Node) -> bool;
    fn tag(&self, node: Self::Node) -> Option<&str>;
    fn layer(&self, node: Self::Node) -> u8;

    /// Attached behaviors, in attachment order.
    fn behaviors(&self, node: Self::Node) -> impl Iterator<Item = &dyn Behavior>;

    fn mesh_renderer(&self, node: Self::Node) -> Option<MeshBinding<'_, Self::Mesh, Self::Material>>;
    fn skinned_mesh_renderer(
        &self,
        node: Self::Node,
    ) -> Option<SkinnedMeshBinding<'_, Self::Node, Self::Mesh, Self::Material>>;
    fn camera(&self, node: Self::Node) -> Option<ComponentBinding<'_, Self::Camera>>;
    fn light(&self, node: Self::Node) -> Option<ComponentBinding<'_, Self::Light>>;
}

/// World matrices are read from the transform cache, so
/// [`Scene::update_matrix_world`] must run before exporting.
impl SceneHost for Scene {
    type Node = NodeHandle;
    type Mesh = Mesh;
    type Material = Material;
    type Camera = Camera;
    type Light = Light;

    fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(node)
    }

    fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.get_node(node).map(|n| n.children()).unwrap_or(&[])
    }

    fn name(&self, node: NodeHandle) -> Option<&str> {
        self.get_name(node)
    }

    fn local_transform(&self, node: NodeHandle) -> NodeTransform {
        self.get_node(node).map_or(NodeTransform::IDENTITY, |n| {
            NodeTransform::new(n.transform.position, n.transform.rotation, n.transform.scale)
        })
    }

    fn world_matrix(&self, node: NodeHandle) -> Affine3A {
        self.get_node(node).map_or(Affine3A::IDENTITY, |n| *n.world_matrix())
    }

    fn is_active_self(&self, node: NodeHandle) -> bool {
        self.get_node(node).is_some_and(|n| n.visible)
    }

    fn is_active_in_hierarchy(&self, node: NodeHandle) -> bool {
        Scene::is_active_in_hierarchy(self, node)
    }

    fn tag(&self, node: NodeHandle) -> Option<&str> {
        self.get_node(node).and_then(|n| n.tag.as_deref())
    }

    fn layer(&self, node: NodeHandle) -> u8 {
        self.get_node(node).map_or(0, |n| n.layer)
    }

    fn behaviors(&self, node: NodeHandle) -> impl Iterator<Item = &dyn Behavior> {
        self.get_behaviors(node).iter().map(|b| &**b as &dyn Behavior)
    }

    fn mesh_renderer(&self, node: NodeHandle) -> Option<MeshBinding<'_, Mesh, Material>> {
        let renderer = self.mesh_renderers.get(node)?;
        Some(MeshBinding {
            mesh: self.meshes.get(renderer.mesh),
            materials: renderer
                .materials
                .iter()
                .map(|slot| slot.and_then(|key| self.materials.get(key)))
                .collect(),
            enabled: renderer.enabled,
        })
    }

    fn skinned_mesh_renderer(&self, node: NodeHandle) -> Option<SkinnedMeshBinding<'_, NodeHandle, Mesh, Material>> {
        let renderer = self.skinned_mesh_renderers.get(node)?;
        Some(SkinnedMeshBinding {
            geometry: MeshBinding {
                mesh: self.meshes.get(renderer.mesh),
                materials: renderer
                    .materials
                    .iter()
                    .map(|slot| slot.and_then(|key| self.materials.get(key)))
                    .collect(),
                enabled: renderer.enabled,
            },
            bones: &renderer.skeleton.bones,
            inverse_bind_matrices: &renderer.skeleton.inverse_bind_matrices,
        })
    }

    fn camera(&self, node: NodeHandle) -> Option<ComponentBinding<'_, Camera>> {
        let component = self.camera_components.get(node)?;
        Some(ComponentBinding {
            resource: self.cameras.get(component.key),
            enabled: component.enabled,
        })
    }

    fn light(&self, node: NodeHandle) -> Option<ComponentBinding<'_, Light>> {
        let component = self.light_components.get(node)?;
        Some(ComponentBinding {
            resource: self.lights.get(component.key),
            enabled: component.enabled,
        })
    }
}
