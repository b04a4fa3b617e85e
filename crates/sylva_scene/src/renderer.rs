use crate::skeleton::Skeleton;
use crate::{MaterialKey, MeshKey};

/// Binds a mesh to a node, with one material slot per primitive.
///
/// A `None` slot is an unassigned material.
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    pub mesh: MeshKey,
    pub materials: Vec<Option<MaterialKey>>,
    pub enabled: bool,
}

impl MeshRenderer {
    #[must_use]
    pub fn new(mesh: MeshKey, material: MaterialKey) -> Self {
        Self {
            mesh,
            materials: vec![Some(material)],
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_materials(mesh: MeshKey, materials: Vec<Option<MaterialKey>>) -> Self {
        Self {
            mesh,
            materials,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Mesh binding deformed by a skeleton.
#[derive(Debug, Clone)]
pub struct SkinnedMeshRenderer {
    pub mesh: MeshKey,
    pub materials: Vec<Option<MaterialKey>>,
    pub skeleton: Skeleton,
    pub enabled: bool,
}

impl SkinnedMeshRenderer {
    #[must_use]
    pub fn new(mesh: MeshKey, materials: Vec<Option<MaterialKey>>, skeleton: Skeleton) -> Self {
        Self {
            mesh,
            materials,
            skeleton,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// A node's reference to a pooled resource (camera, light) plus the
/// component's enabled flag.
#[derive(Debug, Clone, Copy)]
pub struct ComponentRef<K> {
    pub key: K,
    pub enabled: bool,
}

impl<K> ComponentRef<K> {
    #[must_use]
    pub fn new(key: K, enabled: bool) -> Self {
        Self { key, enabled }
    }
}
