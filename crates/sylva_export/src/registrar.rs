//! Resource Registrar
//!
//! Uniform registration of node resources against the writer. Every
//! operation reports `(success, index)`; failures never abort the node.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::host::SceneHost;
use crate::writer::{DocumentWriter, NodeIndex, ResourceIndex};

/// Outcome of a single registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub success: bool,
    pub index: ResourceIndex,
}

impl Registration {
    const FAILED: Self = Self {
        success: false,
        index: ResourceIndex::SENTINEL,
    };

    fn from_index(index: Option<ResourceIndex>) -> Self {
        match index {
            Some(index) if !index.is_sentinel() => Self { success: true, index },
            _ => Self::FAILED,
        }
    }
}

type Material<W> = <<W as DocumentWriter>::Host as SceneHost>::Material;
type Camera<W> = <<W as DocumentWriter>::Host as SceneHost>::Camera;
type Light<W> = <<W as DocumentWriter>::Host as SceneHost>::Light;

/// Registers one material slot. An empty slot is a failure whose sentinel
/// still occupies the slot.
pub fn register_material<W: DocumentWriter>(writer: &mut W, slot: Option<&Material<W>>) -> Registration {
    match slot {
        Some(material) => Registration::from_index(writer.add_material(material)),
        None => Registration::FAILED,
    }
}

/// Registers every material slot of a renderer, preserving slot order.
/// Returns whether all slots registered.
pub fn register_materials<W: DocumentWriter>(
    writer: &mut W,
    slots: &[Option<&Material<W>>],
) -> (bool, Vec<ResourceIndex>) {
    let mut success = true;
    let indices = slots
        .iter()
        .enumerate()
        .map(|(slot, material)| {
            let registration = register_material(writer, *material);
            if !registration.success {
                log::warn!("Material slot {slot} could not be registered");
                success = false;
            }
            registration.index
        })
        .collect();

    (success, indices)
}

/// A missing camera (stale binding) is a failure.
pub fn register_camera<W: DocumentWriter>(writer: &mut W, camera: Option<&Camera<W>>) -> Registration {
    camera.map_or(Registration::FAILED, |camera| {
        Registration::from_index(writer.add_camera(camera))
    })
}

/// A missing light (stale binding) is a failure.
pub fn register_light<W: DocumentWriter>(writer: &mut W, light: Option<&Light<W>>) -> Registration {
    light.map_or(Registration::FAILED, |light| Registration::from_index(writer.add_light(light)))
}

/// Maps bones to their exported node identifiers. Returns `None` if any
/// bone was not exported: a partial joint list is never produced.
pub fn resolve_joints<N: Copy + Eq + Hash>(bones: &[N], node_ids: &FxHashMap<N, NodeIndex>) -> Option<Vec<NodeIndex>> {
    bones.iter().map(|bone| node_ids.get(bone).copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joints_is_all_or_nothing() {
        let mut ids = FxHashMap::default();
        ids.insert(1_u32, NodeIndex(4));
        ids.insert(2_u32, NodeIndex(5));

        assert_eq!(resolve_joints(&[2, 1], &ids), Some(vec![NodeIndex(5), NodeIndex(4)]));
        assert_eq!(resolve_joints(&[1, 3], &ids), None);
        assert_eq!(resolve_joints::<u32>(&[], &ids), Some(vec![]));
    }
}
