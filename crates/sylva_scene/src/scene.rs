use slotmap::{SlotMap, SparseSecondaryMap};
use sylva_core::Behavior;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::node::Node;
use crate::renderer::{ComponentRef, MeshRenderer, SkinnedMeshRenderer};
use crate::transform_system;
use crate::wrapper::SceneNode;
use crate::{CameraKey, LightKey, MaterialKey, MeshKey, NodeHandle};

/// Scene graph
///
/// Pure data: the node arena, the shared resource pools and the per-node
/// component maps. Components are stored in sparse secondary maps keyed by
/// [`NodeHandle`], so a node only pays for what it carries.
#[derive(Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Resource pools ====
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub materials: SlotMap<MaterialKey, Material>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,

    // ==== Components ====
    pub names: SparseSecondaryMap<NodeHandle, String>,
    pub behaviors: SparseSecondaryMap<NodeHandle, Vec<Box<dyn Behavior>>>,
    pub mesh_renderers: SparseSecondaryMap<NodeHandle, MeshRenderer>,
    pub skinned_mesh_renderers: SparseSecondaryMap<NodeHandle, SkinnedMeshRenderer>,
    pub camera_components: SparseSecondaryMap<NodeHandle, ComponentRef<CameraKey>>,
    pub light_components: SparseSecondaryMap<NodeHandle, ComponentRef<LightKey>>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Creates an empty root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.set_name(handle, name);
        handle
    }

    /// Adds a node to the scene as a root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`. Falls back to a root node
    /// when `parent` does not exist.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("Parent node not found, adding child as a root");
            child.parent = None;
            return self.add_node(child);
        }

        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Re-parents `child` under `parent`, detaching it from its previous
    /// parent (or the root list) first.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("Node not found during attach!");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach a node under its own descendant!");
            return;
        }

        // 1. Detach from old
        self.detach_from_parent(child);

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }

        // 3. Update child
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(Node::parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        false
    }

    fn detach_from_parent(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get(handle).and_then(Node::parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == handle)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }
    }

    /// Removes a node, its whole subtree, and every component attached to
    /// the removed nodes. Pooled resources are left in place since other
    /// nodes may share them.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }

        self.detach_from_parent(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            stack.extend(node.children);

            self.names.remove(current);
            self.behaviors.remove(current);
            self.mesh_renderers.remove(current);
            self.skinned_mesh_renderers.remove(current);
            self.camera_components.remove(current);
            self.light_components.remove(current);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Chainable access to a node. See [`SceneNode`].
    pub fn node(&mut self, handle: NodeHandle) -> SceneNode<'_> {
        SceneNode::new(self, handle)
    }

    /// Active in hierarchy: the node and every ancestor are visible.
    #[must_use]
    pub fn is_active_in_hierarchy(&self, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    // ========================================================================
    // Names & behaviors
    // ========================================================================

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    /// Appends a behavior. Behaviors keep their insertion order.
    pub fn add_behavior(&mut self, handle: NodeHandle, behavior: impl Behavior + 'static) {
        if !self.nodes.contains_key(handle) {
            log::warn!("Cannot add behavior '{}' to a missing node", behavior.type_name());
            return;
        }
        match self.behaviors.get_mut(handle) {
            Some(list) => list.push(Box::new(behavior)),
            None => {
                self.behaviors.insert(handle, vec![Box::new(behavior)]);
            }
        }
    }

    #[must_use]
    pub fn get_behaviors(&self, handle: NodeHandle) -> &[Box<dyn Behavior>] {
        self.behaviors.get(handle).map(Vec::as_slice).unwrap_or(&[])
    }

    // ========================================================================
    // Resources
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        self.cameras.insert(camera)
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    // ========================================================================
    // Component bindings
    // ========================================================================

    pub fn set_mesh_renderer(&mut self, handle: NodeHandle, renderer: MeshRenderer) {
        if self.nodes.contains_key(handle) {
            self.mesh_renderers.insert(handle, renderer);
        }
    }

    pub fn set_skinned_mesh_renderer(&mut self, handle: NodeHandle, renderer: SkinnedMeshRenderer) {
        if self.nodes.contains_key(handle) {
            self.skinned_mesh_renderers.insert(handle, renderer);
        }
    }

    pub fn set_camera(&mut self, handle: NodeHandle, camera: CameraKey, enabled: bool) {
        if self.nodes.contains_key(handle) {
            self.camera_components.insert(handle, ComponentRef::new(camera, enabled));
        }
    }

    pub fn set_light(&mut self, handle: NodeHandle, light: LightKey, enabled: bool) {
        if self.nodes.contains_key(handle) {
            self.light_components.insert(handle, ComponentRef::new(light, enabled));
        }
    }

    // ========================================================================
    // Matrix update pipeline
    // ========================================================================

    /// Recomputes every world matrix, parents before children.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// Recomputes the world matrices of one subtree.
    pub fn update_subtree(&mut self, handle: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, handle);
    }
}
