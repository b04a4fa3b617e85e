use crate::NodeHandle;
use crate::transform::Transform;
use glam::Affine3A;

/// Number of addressable layers; a node's `layer` is an index below this.
pub const LAYER_COUNT: u8 = 32;

/// A minimal scene node containing only hierarchy and spatial data.
///
/// Names, behaviors, renderers, cameras and lights live in the [`Scene`]'s
/// component maps, keyed by the node's handle.
///
/// [`Scene`]: crate::Scene
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node handle (None for root nodes)
    pub(crate) parent: Option<NodeHandle>,
    /// Child node handles, in order
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Local visibility. A node is active in the hierarchy only when it and
    /// all of its ancestors are visible.
    pub visible: bool,

    /// Layer index in `0..LAYER_COUNT`.
    pub layer: u8,

    /// Free-form tag, e.g. `"EditorOnly"`.
    pub tag: Option<String>,
}

impl Node {
    /// Creates a visible node on layer 0 with an identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            layer: 0,
            tag: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Sets the parent of this node. Prefer [`Scene::attach`](crate::Scene::attach),
    /// which keeps both sides of the relationship in sync.
    #[inline]
    pub fn set_parent(&mut self, parent: Option<NodeHandle>) {
        self.parent = parent;
    }

    /// Appends a child handle. Prefer [`Scene::attach`](crate::Scene::attach).
    #[inline]
    pub fn push_child(&mut self, child: NodeHandle) {
        self.children.push(child);
    }

    /// Sets the layer, clamping out-of-range indices to the last layer.
    pub fn set_layer(&mut self, layer: u8) {
        if layer >= LAYER_COUNT {
            log::warn!("Layer {layer} out of range, clamping to {}", LAYER_COUNT - 1);
        }
        self.layer = layer.min(LAYER_COUNT - 1);
    }

    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    /// World transformation matrix, as of the last
    /// [`Scene::update_matrix_world`](crate::Scene::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
