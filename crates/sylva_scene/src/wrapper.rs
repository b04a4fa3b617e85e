//! Chainable node operation wrapper.
//!
//! [`SceneNode`] borrows a [`Scene`] mutably and offers a fluent API for
//! setting up nodes before export. Every method is a no-op on a stale handle.
//!
//! # Example
//!
//! ```rust,ignore
//! scene.node(handle)
//!     .set_position(0.0, 3.0, 0.0)
//!     .set_layer(2)
//!     .set_tag("EditorOnly")
//!     .with_behavior(Spinner { speed: 1.5 });
//! ```
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::must_use_candidate)]
use glam::{Quat, Vec3};
use sylva_core::Behavior;

use crate::NodeHandle;
use crate::node::Node;
use crate::scene::Scene;

/// Temporary mutable borrow of a scene node for chainable operations.
pub struct SceneNode<'a> {
    scene: &'a mut Scene,
    handle: NodeHandle,
}

impl<'a> SceneNode<'a> {
    #[inline]
    pub fn new(scene: &'a mut Scene, handle: NodeHandle) -> Self {
        Self { scene, handle }
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    #[inline]
    fn with_node(self, f: impl FnOnce(&mut Node)) -> Self {
        if let Some(node) = self.scene.get_node_mut(self.handle) {
            f(node);
        }
        self
    }

    // -- Transform --

    pub fn set_position(self, x: f32, y: f32, z: f32) -> Self {
        self.with_node(|n| n.transform.position = Vec3::new(x, y, z))
    }

    pub fn set_position_vec(self, pos: Vec3) -> Self {
        self.with_node(|n| n.transform.position = pos)
    }

    pub fn set_rotation(self, quat: Quat) -> Self {
        self.with_node(|n| n.transform.rotation = quat)
    }

    /// XYZ intrinsic order, radians.
    pub fn set_rotation_euler(self, x: f32, y: f32, z: f32) -> Self {
        self.with_node(|n| n.transform.set_rotation_euler(x, y, z))
    }

    pub fn set_scale(self, s: f32) -> Self {
        self.with_node(|n| n.transform.scale = Vec3::splat(s))
    }

    pub fn set_scale_xyz(self, x: f32, y: f32, z: f32) -> Self {
        self.with_node(|n| n.transform.scale = Vec3::new(x, y, z))
    }

    /// Orients the node to face `target` (in parent-local space).
    pub fn look_at(self, target: Vec3) -> Self {
        self.with_node(|n| n.transform.look_at(target, Vec3::Y))
    }

    // -- Export-relevant state --

    pub fn set_visible(self, visible: bool) -> Self {
        self.with_node(|n| n.visible = visible)
    }

    pub fn set_layer(self, layer: u8) -> Self {
        self.with_node(|n| n.set_layer(layer))
    }

    pub fn set_tag(self, tag: &str) -> Self {
        self.with_node(|n| n.tag = Some(tag.to_string()))
    }

    pub fn set_name(self, name: &str) -> Self {
        self.scene.set_name(self.handle, name);
        self
    }

    pub fn with_behavior(self, behavior: impl Behavior + 'static) -> Self {
        self.scene.add_behavior(self.handle, behavior);
        self
    }
}
