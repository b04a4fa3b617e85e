//! Scene Graph Traversal & Node Assignment
//!
//! [`SceneExporter`] walks the host hierarchy in two passes:
//!
//! 1. **Assignment** (depth-first over an explicit stack, so hierarchy
//!    depth is bounded only by memory): filters nodes, resolves their
//!    transforms and appends them to the writer once their children have
//!    identifiers. Nodes on an included layer are queued for pass 2 before
//!    their subtree is visited.
//! 2. **Features** (FIFO over the queue): attachments, mesh or skinned mesh,
//!    camera, light.
//!
//! Every node has an identifier before pass 2 starts, so skin joints can
//! reference any exported bone regardless of visiting order.
//!
//! ```rust,ignore
//! let mut exporter = SceneExporter::new(GltfWriter::default(), ExportSettings::default());
//! let ok = exporter.export(&scene, &scene.root_nodes, None, Some("Main"))?;
//! exporter.finalize("out.gltf", abort_registration).await?;
//! ```

use std::path::Path;

use futures::future::AbortRegistration;
use glam::Affine3A;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::attachments::serialize_attachments;
use crate::errors::{ExportError, Result};
use crate::host::{MeshBinding, SceneHost};
use crate::registrar::{self, Registration};
use crate::settings::ExportSettings;
use crate::transform::{self, NodeTransform};
use crate::writer::{DocumentWriter, ExportedNode, NodeIndex, SkinJoints};

type HostNode<W> = <<W as DocumentWriter>::Host as SceneHost>::Node;

/// Where a visited node sits relative to its nearest exported ancestor.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// No exported ancestor: placed in world space.
    Root,
    /// Direct child of an exported node.
    Child,
    /// Below an exported node through skipped ancestors, whose local
    /// matrices multiply to the given matrix.
    Promoted(Affine3A),
}

/// A node waiting for pass 2.
#[derive(Debug, Clone, Copy)]
struct PendingNode<N> {
    source: N,
    /// Filled in once the node is appended after its subtree.
    id: Option<NodeIndex>,
}

/// One step of the pass 1 worklist.
#[derive(Debug, Clone, Copy)]
enum Step<N> {
    /// First visit: filter the node and schedule its subtree. `active` is
    /// the node's active state in the hierarchy.
    Enter { node: N, placement: Placement, active: bool },
    /// Subtree finished: append the node with the child identifiers
    /// collected since `first_child`.
    Exit {
        node: N,
        placement: Placement,
        slot: Option<usize>,
        first_child: usize,
    },
}

/// Per-export traversal state.
struct Traversal<'a, W: DocumentWriter> {
    host: &'a W::Host,
    settings: &'a ExportSettings,
    origin: Affine3A,
    success: bool,
    visited: FxHashSet<HostNode<W>>,
    queue: Vec<PendingNode<HostNode<W>>>,
    node_ids: FxHashMap<HostNode<W>, NodeIndex>,
}

impl<'a, W: DocumentWriter> Traversal<'a, W> {
    fn new(host: &'a W::Host, settings: &'a ExportSettings, origin: Affine3A) -> Self {
        Self {
            host,
            settings,
            origin,
            success: true,
            visited: FxHashSet::default(),
            queue: Vec::new(),
            node_ids: FxHashMap::default(),
        }
    }

    /// Inclusion predicate. Failing nodes are transparent.
    fn is_included(&self, node: HostNode<W>, active: bool) -> bool {
        if !self.settings.export_inactive && !active {
            return false;
        }
        match (&self.settings.excluded_tag, self.host.tag(node)) {
            (Some(excluded), Some(tag)) => excluded != tag,
            _ => true,
        }
    }

    // ========================================================================
    // Pass 1
    // ========================================================================

    /// Assigns identifiers to every exported node under `roots` and returns
    /// the identifiers of the top-level exported nodes.
    ///
    /// Depth-first over an explicit stack: a node is queued for pass 2 when
    /// entered and appended to the writer when exited, after its subtree.
    fn assign(&mut self, writer: &mut W, roots: &[HostNode<W>]) -> Vec<NodeIndex> {
        let mut ids = Vec::new();
        let mut stack: Vec<Step<HostNode<W>>> = roots
            .iter()
            .rev()
            .map(|&node| Step::Enter {
                node,
                placement: Placement::Root,
                active: self.host.is_active_in_hierarchy(node),
            })
            .collect();

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter { node, placement, active } => {
                    self.enter(&mut stack, node, placement, active, ids.len());
                }
                Step::Exit {
                    node,
                    placement,
                    slot,
                    first_child,
                } => {
                    let children = ids.split_off(first_child);
                    if let Some(id) = self.exit(writer, node, placement, slot, children) {
                        ids.push(id);
                    }
                }
            }
        }

        ids
    }

    fn enter(
        &mut self,
        stack: &mut Vec<Step<HostNode<W>>>,
        node: HostNode<W>,
        placement: Placement,
        active: bool,
        first_child: usize,
    ) {
        if !self.host.contains(node) {
            log::warn!("Node {node:?} is not part of the scene, skipping");
            self.success = false;
            return;
        }
        if !self.visited.insert(node) {
            log::warn!("Node {node:?} is reachable from more than one root, exporting it once");
            return;
        }

        if !self.is_included(node, active) {
            log::trace!("Node {node:?} is excluded, promoting its children");
            let local = self.host.local_transform(node).to_matrix();
            let child_placement = match placement {
                Placement::Root => Placement::Root,
                Placement::Child => Placement::Promoted(local),
                Placement::Promoted(skipped) => Placement::Promoted(skipped * local),
            };
            self.push_children(stack, node, child_placement, active);
            return;
        }

        let on_included_layer = self.settings.included_layers.contains(self.host.layer(node));
        let slot = on_included_layer.then(|| {
            self.queue.push(PendingNode { source: node, id: None });
            self.queue.len() - 1
        });

        stack.push(Step::Exit {
            node,
            placement,
            slot,
            first_child,
        });
        self.push_children(stack, node, Placement::Child, active);
    }

    /// Schedules the children so they are entered in order.
    fn push_children(
        &self,
        stack: &mut Vec<Step<HostNode<W>>>,
        node: HostNode<W>,
        placement: Placement,
        active: bool,
    ) {
        stack.extend(self.host.children(node).iter().rev().map(|&child| Step::Enter {
            node: child,
            placement,
            active: active && self.host.is_active_self(child),
        }));
    }

    fn exit(
        &mut self,
        writer: &mut W,
        node: HostNode<W>,
        placement: Placement,
        slot: Option<usize>,
        children: Vec<NodeIndex>,
    ) -> Option<NodeIndex> {
        if slot.is_none() && children.is_empty() {
            log::trace!("Node {node:?} pruned: excluded layer, nothing exported below");
            return None;
        }

        let exported = ExportedNode {
            transform: self.resolve(node, placement),
            children: (!children.is_empty()).then_some(children),
            name: if self.settings.export_names {
                self.host.name(node).map(str::to_string)
            } else {
                None
            },
        };

        let id = writer.add_node(&exported);
        self.node_ids.insert(node, id);
        if let Some(slot) = slot {
            self.queue[slot].id = Some(id);
        }
        Some(id)
    }

    fn resolve(&self, node: HostNode<W>, placement: Placement) -> NodeTransform {
        match placement {
            Placement::Root => transform::resolve(self.host, node, true, &self.origin),
            Placement::Child => transform::resolve(self.host, node, false, &self.origin),
            Placement::Promoted(skipped) => transform::resolve_promoted(self.host, node, &skipped),
        }
    }

    // ========================================================================
    // Pass 2
    // ========================================================================

    fn attach_features(&self, writer: &mut W, pending: PendingNode<HostNode<W>>) -> bool {
        let Some(id) = pending.id else {
            return true;
        };
        let node = pending.source;
        let export_disabled = self.settings.export_disabled_components;
        let mut success = true;

        let extras = serialize_attachments(self.host.behaviors(node));
        if !extras.is_empty() {
            writer.add_extras_to_node(id, extras);
        }

        if let Some(skinned) = self.host.skinned_mesh_renderer(node) {
            if skinned.geometry.enabled || export_disabled {
                let joints = registrar::resolve_joints(skinned.bones, &self.node_ids).filter(|j| !j.is_empty());
                if joints.is_none() {
                    log::debug!("Node {node:?}: skin bones not all exported, binding mesh without joints");
                }
                let skin = joints.as_deref().map(|joints| SkinJoints {
                    joints,
                    inverse_bind_matrices: skinned.inverse_bind_matrices,
                });
                success &= Self::bind_mesh(writer, id, &skinned.geometry, skin);
            } else {
                log::debug!("Node {node:?}: skinned mesh renderer disabled, skipping");
            }
        } else if let Some(renderer) = self.host.mesh_renderer(node) {
            if renderer.enabled || export_disabled {
                success &= Self::bind_mesh(writer, id, &renderer, None);
            } else {
                log::debug!("Node {node:?}: mesh renderer disabled, skipping");
            }
        }

        if let Some(camera) = self.host.camera(node) {
            if camera.enabled || export_disabled {
                let Registration { success: ok, index } = registrar::register_camera(writer, camera.resource);
                if ok {
                    writer.add_camera_to_node(id, index);
                } else {
                    log::warn!("Node {id}: camera could not be registered");
                    success = false;
                }
            } else {
                log::debug!("Node {node:?}: camera disabled, skipping");
            }
        }

        if let Some(light) = self.host.light(node) {
            if light.enabled || export_disabled {
                let Registration { success: ok, index } = registrar::register_light(writer, light.resource);
                if ok {
                    writer.add_light_to_node(id, index);
                } else {
                    log::warn!("Node {id}: light could not be registered");
                    success = false;
                }
            } else {
                log::debug!("Node {node:?}: light disabled, skipping");
            }
        }

        success
    }

    fn bind_mesh(
        writer: &mut W,
        id: NodeIndex,
        binding: &MeshBinding<'_, <W::Host as SceneHost>::Mesh, <W::Host as SceneHost>::Material>,
        skin: Option<SkinJoints<'_>>,
    ) -> bool {
        let Some(mesh) = binding.mesh else {
            log::warn!("Node {id}: mesh binding refers to a missing mesh");
            return false;
        };

        let (materials_ok, materials) = registrar::register_materials(writer, &binding.materials);

        if writer.add_mesh_to_node(id, mesh, &materials, skin) {
            materials_ok
        } else {
            log::warn!("Node {id}: mesh could not be registered");
            false
        }
    }
}

/// Single-use exporter owning its document writer until finalization.
pub struct SceneExporter<W> {
    writer: Option<W>,
    settings: ExportSettings,
}

impl<W: DocumentWriter> SceneExporter<W> {
    #[must_use]
    pub fn new(writer: W, settings: ExportSettings) -> Self {
        Self {
            writer: Some(writer),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.writer.is_none()
    }

    /// The writer, for inspection before finalization.
    pub fn writer(&self) -> Result<&W> {
        self.writer.as_ref().ok_or(ExportError::AlreadyFinalized)
    }

    /// Exports the subtrees under `roots` as one scene.
    ///
    /// `origin` (identity if `None`) is applied to every exported root's
    /// world matrix. A scene is added only when at least one node was
    /// exported. Returns `Ok(false)` when any resource failed to register;
    /// the rest of the scene is still exported.
    ///
    /// Roots may overlap: a node reachable from several roots is exported
    /// once, under whichever root reaches it first.
    pub fn export(
        &mut self,
        host: &W::Host,
        roots: &[HostNode<W>],
        origin: Option<Affine3A>,
        scene_name: Option<&str>,
    ) -> Result<bool> {
        let writer = self.writer.as_mut().ok_or(ExportError::AlreadyFinalized)?;
        let mut traversal = Traversal::<W>::new(host, &self.settings, origin.unwrap_or(Affine3A::IDENTITY));

        let root_ids = traversal.assign(writer, roots);
        let mut success = traversal.success;

        log::debug!(
            "Assigned {} node identifiers, {} queued for features",
            traversal.node_ids.len(),
            traversal.queue.len()
        );

        for pending in std::mem::take(&mut traversal.queue) {
            success &= traversal.attach_features(writer, pending);
        }

        if root_ids.is_empty() {
            log::debug!("Nothing exported, no scene added");
        } else {
            writer.add_scene(&root_ids, scene_name);
        }

        if !success {
            log::warn!("Export finished with partial failures");
        }
        Ok(success)
    }

    /// Hands the writer off for persistence. The exporter is consumed by the
    /// first call, successful or not; every later operation fails with
    /// [`ExportError::AlreadyFinalized`].
    ///
    /// The returned future runs on whatever executor the writer needs;
    /// [`GltfWriter`](crate::GltfWriter) requires a Tokio runtime.
    pub async fn finalize(&mut self, destination: impl AsRef<Path>, abort: AbortRegistration) -> Result<bool> {
        let writer = self.writer.take().ok_or(ExportError::AlreadyFinalized)?;
        writer.finalize(destination.as_ref().to_path_buf(), abort).await
    }
}
