//! Document writer interface
//!
//! The exporter walks the scene and pushes everything it produces into a
//! [`DocumentWriter`], which owns resource deduplication, the file format
//! and persistence.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use futures::future::AbortRegistration;
use glam::Affine3A;
use sylva_core::ValueMap;

use crate::errors::Result;
use crate::host::SceneHost;
use crate::transform::NodeTransform;

/// Identifier of an exported node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an exported scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneIndex(pub u32);

/// Index into one of the writer's resource pools, or [`ResourceIndex::SENTINEL`]
/// for a slot whose resource could not be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceIndex(i32);

impl ResourceIndex {
    pub const SENTINEL: Self = Self(-1);

    /// Returns the sentinel for indices that do not fit the pool range.
    #[must_use]
    pub fn new(index: usize) -> Self {
        i32::try_from(index).map_or(Self::SENTINEL, Self)
    }

    #[inline]
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.0 < 0
    }

    /// Pool position, `None` for the sentinel.
    #[inline]
    #[must_use]
    pub fn get(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

/// A node record ready to be appended to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedNode {
    pub transform: NodeTransform,
    /// `None` for leaves.
    pub children: Option<Vec<NodeIndex>>,
    pub name: Option<String>,
}

/// Joint data for a skinned mesh binding.
#[derive(Debug, Clone, Copy)]
pub struct SkinJoints<'a> {
    /// One exported node per bone, in bone order.
    pub joints: &'a [NodeIndex],
    /// Empty, or one matrix per joint.
    pub inverse_bind_matrices: &'a [Affine3A],
}

pub trait DocumentWriter {
    type Host: SceneHost;

    /// Appends a node. Identifiers are dense and follow call order,
    /// starting at 0.
    fn add_node(&mut self, node: &ExportedNode) -> NodeIndex;

    fn add_scene(&mut self, roots: &[NodeIndex], name: Option<&str>) -> SceneIndex;

    /// Registers a material, returning `None` on failure. Registering the
    /// same material again returns the same index.
    fn add_material(&mut self, material: &<Self::Host as SceneHost>::Material) -> Option<ResourceIndex>;

    /// Binds a mesh to a node. `materials` may contain sentinels, which
    /// keep their slot. Returns `false` when the mesh could not be written.
    fn add_mesh_to_node(
        &mut self,
        node: NodeIndex,
        mesh: &<Self::Host as SceneHost>::Mesh,
        materials: &[ResourceIndex],
        skin: Option<SkinJoints<'_>>,
    ) -> bool;

    fn add_camera(&mut self, camera: &<Self::Host as SceneHost>::Camera) -> Option<ResourceIndex>;
    fn add_camera_to_node(&mut self, node: NodeIndex, camera: ResourceIndex);

    fn add_light(&mut self, light: &<Self::Host as SceneHost>::Light) -> Option<ResourceIndex>;
    fn add_light_to_node(&mut self, node: NodeIndex, light: ResourceIndex);

    /// Never called with an empty list.
    fn add_extras_to_node(&mut self, node: NodeIndex, extras: Vec<ValueMap>);

    /// Serializes the document and writes it to `destination`. Aborting
    /// `abort`'s handle resolves the future with
    /// [`ExportError::Cancelled`](crate::errors::ExportError::Cancelled).
    fn finalize(
        self,
        destination: PathBuf,
        abort: AbortRegistration,
    ) -> impl Future<Output = Result<bool>> + Send
    where
        Self: Sized;
}
