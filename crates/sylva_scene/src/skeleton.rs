use glam::Affine3A;
use slotmap::SlotMap;

use crate::NodeHandle;
use crate::node::Node;

/// Ordered bone set of a skinned renderer.
///
/// `bones[i]` is the node driving joint index `i` of the mesh's `joints`
/// attribute.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub name: String,
    pub bones: Vec<NodeHandle>,

    /// Mesh space to bone space, one per bone. Empty when the bind pose
    /// is the identity.
    pub inverse_bind_matrices: Vec<Affine3A>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, bones: Vec<NodeHandle>, inverse_bind_matrices: Vec<Affine3A>) -> Self {
        if !inverse_bind_matrices.is_empty() && inverse_bind_matrices.len() != bones.len() {
            log::warn!(
                "Skeleton '{name}': {} inverse bind matrices for {} bones, discarding them",
                inverse_bind_matrices.len(),
                bones.len()
            );
            return Self {
                name: name.to_string(),
                bones,
                inverse_bind_matrices: Vec::new(),
            };
        }

        Self {
            name: name.to_string(),
            bones,
            inverse_bind_matrices,
        }
    }

    /// Builds a skeleton whose bind pose is the bones' current world placement.
    ///
    /// The world matrices must be up to date.
    #[must_use]
    pub fn from_current_pose(name: &str, bones: Vec<NodeHandle>, nodes: &SlotMap<NodeHandle, Node>) -> Self {
        let inverse_bind_matrices = bones
            .iter()
            .map(|&bone| nodes.get(bone).map_or(Affine3A::IDENTITY, |n| n.world_matrix().inverse()))
            .collect();

        Self::new(name, bones, inverse_bind_matrices)
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.bones.len()
    }
}
