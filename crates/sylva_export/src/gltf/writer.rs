use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_2;
use std::future::Future;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::future::{AbortRegistration, Abortable, Aborted};
use glam::{Affine3A, Mat4};
use rustc_hash::FxHashMap;
use sylva_core::ValueMap;
use sylva_scene::{AlphaMode, Camera, Light, LightKind, Material, Mesh, ProjectionType, Scene};
use uuid::Uuid;

use super::document::{self as doc, KHR_LIGHTS_PUNCTUAL, component_type, target};
use crate::errors::{ExportError, Result};
use crate::writer::{DocumentWriter, ExportedNode, NodeIndex, ResourceIndex, SceneIndex, SkinJoints};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GltfWriterSettings {
    /// Indent the JSON output.
    pub pretty: bool,
    /// Written to `asset.generator`.
    pub generator: Option<String>,
}

impl Default for GltfWriterSettings {
    fn default() -> Self {
        Self {
            pretty: false,
            generator: Some(concat!("Sylva ", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl GltfWriterSettings {
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Option<&str>) -> Self {
        self.generator = generator.map(str::to_string);
        self
    }
}

/// Accessors of one mesh's vertex data.
#[derive(Debug, Clone)]
struct Geometry {
    attributes: BTreeMap<String, u32>,
    indices: Option<u32>,
}

/// Mesh cache key: mesh identity, whether skin attributes are written, and
/// the material index list.
type MeshKey = (Uuid, bool, Vec<i32>);

/// Builds a glTF 2.0 document from a [`Scene`] export.
///
/// All binary data lives in a single buffer, embedded as a base64 data URI
/// when the document is serialized.
///
/// # Runtime
///
/// Finalization writes through `tokio::fs`, so the future returned by
/// [`SceneExporter::finalize`](crate::SceneExporter::finalize) must be
/// polled inside a Tokio runtime. Executors without one, such as
/// `futures::executor::block_on`, panic. Use [`GltfWriter::to_json_bytes`]
/// to get the document without touching the file system.
#[derive(Debug)]
pub struct GltfWriter {
    settings: GltfWriterSettings,
    root: doc::Root,
    buffer: Vec<u8>,

    material_cache: FxHashMap<Uuid, u32>,
    geometry_cache: FxHashMap<(Uuid, bool), Geometry>,
    mesh_cache: FxHashMap<MeshKey, u32>,
    camera_cache: FxHashMap<Uuid, u32>,
    light_cache: FxHashMap<Uuid, u32>,
}

impl Default for GltfWriter {
    fn default() -> Self {
        Self::new(GltfWriterSettings::default())
    }
}

impl GltfWriter {
    #[must_use]
    pub fn new(settings: GltfWriterSettings) -> Self {
        let mut root = doc::Root::default();
        root.asset.generator.clone_from(&settings.generator);

        Self {
            settings,
            root,
            buffer: Vec::new(),
            material_cache: FxHashMap::default(),
            geometry_cache: FxHashMap::default(),
            mesh_cache: FxHashMap::default(),
            camera_cache: FxHashMap::default(),
            light_cache: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &GltfWriterSettings {
        &self.settings
    }

    /// The document built so far, without the binary buffer entry.
    #[must_use]
    pub fn document(&self) -> &doc::Root {
        &self.root
    }

    /// Serializes the complete document, binary buffer included.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut root = self.root.clone();
        if !self.buffer.is_empty() {
            root.buffers.push(doc::Buffer {
                byte_length: self.buffer.len() as u32,
                uri: Some(format!("data:application/octet-stream;base64,{}", BASE64.encode(&self.buffer))),
            });
        }

        let bytes = if self.settings.pretty {
            serde_json::to_vec_pretty(&root)?
        } else {
            serde_json::to_vec(&root)?
        };
        Ok(bytes)
    }

    // ========================================================================
    // Binary data
    // ========================================================================

    fn push_view(&mut self, bytes: &[u8], target: Option<u32>) -> u32 {
        // Every component type we write is at most 4 bytes wide
        while self.buffer.len() % 4 != 0 {
            self.buffer.push(0);
        }

        let byte_offset = self.buffer.len() as u32;
        self.buffer.extend_from_slice(bytes);

        self.root.buffer_views.push(doc::BufferView {
            buffer: 0,
            byte_offset,
            byte_length: bytes.len() as u32,
            target,
        });
        self.root.buffer_views.len() as u32 - 1
    }

    fn push_accessor(&mut self, bytes: &[u8], target: Option<u32>, accessor: AccessorDesc) -> u32 {
        let buffer_view = self.push_view(bytes, target);
        self.root.accessors.push(doc::Accessor {
            buffer_view,
            component_type: accessor.component_type,
            count: accessor.count as u32,
            kind: accessor.kind,
            min: accessor.min,
            max: accessor.max,
        });
        self.root.accessors.len() as u32 - 1
    }

    fn push_f32_accessor<const N: usize>(&mut self, data: &[[f32; N]], kind: &'static str) -> u32 {
        let bytes = f32_bytes(data.iter().flatten().copied());
        self.push_accessor(
            &bytes,
            Some(target::ARRAY_BUFFER),
            AccessorDesc::new(component_type::FLOAT, data.len(), kind),
        )
    }

    fn geometry(&mut self, mesh: &Mesh, skinned: bool) -> Geometry {
        if let Some(geometry) = self.geometry_cache.get(&(mesh.uuid, skinned)) {
            return geometry.clone();
        }

        let mut attributes = BTreeMap::new();

        let (min, max) = mesh.bounds().unwrap_or_default();
        let position_bytes = f32_bytes(mesh.positions.iter().flatten().copied());
        let position = self.push_accessor(
            &position_bytes,
            Some(target::ARRAY_BUFFER),
            AccessorDesc::new(component_type::FLOAT, mesh.vertex_count(), "VEC3")
                .with_bounds(min.to_array().to_vec(), max.to_array().to_vec()),
        );
        attributes.insert("POSITION".to_string(), position);

        if let Some(normals) = &mesh.normals {
            attributes.insert("NORMAL".to_string(), self.push_f32_accessor(normals, "VEC3"));
        }
        if let Some(uvs) = &mesh.uvs {
            attributes.insert("TEXCOORD_0".to_string(), self.push_f32_accessor(uvs, "VEC2"));
        }

        if skinned && let (Some(joints), Some(weights)) = (&mesh.joints, &mesh.weights) {
            let joint_bytes: Vec<u8> = joints.iter().flatten().flat_map(|j| j.to_le_bytes()).collect();
            let joints = self.push_accessor(
                &joint_bytes,
                Some(target::ARRAY_BUFFER),
                AccessorDesc::new(component_type::UNSIGNED_SHORT, joints.len(), "VEC4"),
            );
            attributes.insert("JOINTS_0".to_string(), joints);
            attributes.insert("WEIGHTS_0".to_string(), self.push_f32_accessor(weights, "VEC4"));
        }

        let indices = mesh.indices.as_ref().map(|indices| {
            let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
            self.push_accessor(
                &bytes,
                Some(target::ELEMENT_ARRAY_BUFFER),
                AccessorDesc::new(component_type::UNSIGNED_INT, indices.len(), "SCALAR"),
            )
        });

        let geometry = Geometry { attributes, indices };
        self.geometry_cache.insert((mesh.uuid, skinned), geometry.clone());
        geometry
    }

    fn push_skin(&mut self, skin: SkinJoints<'_>) -> u32 {
        let inverse_bind_matrices = if skin.inverse_bind_matrices.is_empty() {
            None
        } else if skin.inverse_bind_matrices.len() == skin.joints.len() {
            let bytes = f32_bytes(
                skin.inverse_bind_matrices
                    .iter()
                    .flat_map(|m: &Affine3A| Mat4::from(*m).to_cols_array()),
            );
            Some(self.push_accessor(
                &bytes,
                None,
                AccessorDesc::new(component_type::FLOAT, skin.joints.len(), "MAT4"),
            ))
        } else {
            log::warn!(
                "{} inverse bind matrices for {} joints, writing skin without them",
                skin.inverse_bind_matrices.len(),
                skin.joints.len()
            );
            None
        };

        self.root.skins.push(doc::Skin {
            joints: skin.joints.iter().map(|j| j.0).collect(),
            inverse_bind_matrices,
        });
        self.root.skins.len() as u32 - 1
    }

    fn node_mut(&mut self, node: NodeIndex) -> Option<&mut doc::Node> {
        let found = self.root.nodes.get_mut(node.index());
        if found.is_none() {
            log::warn!("Node {node} does not exist in the document");
        }
        found
    }

    fn use_extension(&mut self, name: &str) {
        if !self.root.extensions_used.iter().any(|e| e == name) {
            self.root.extensions_used.push(name.to_string());
        }
    }
}

struct AccessorDesc {
    component_type: u32,
    count: usize,
    kind: &'static str,
    min: Option<Vec<f32>>,
    max: Option<Vec<f32>>,
}

impl AccessorDesc {
    fn new(component_type: u32, count: usize, kind: &'static str) -> Self {
        Self {
            component_type,
            count,
            kind,
            min: None,
            max: None,
        }
    }

    fn with_bounds(mut self, min: Vec<f32>, max: Vec<f32>) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

fn f32_bytes(values: impl IntoIterator<Item = f32>) -> Vec<u8> {
    values.into_iter().flat_map(f32::to_le_bytes).collect()
}

/// Checks that a mesh can be written as a valid glTF primitive.
fn validate_mesh(mesh: &Mesh) -> std::result::Result<(), String> {
    let count = mesh.vertex_count();
    if count == 0 {
        return Err("mesh has no vertices".to_string());
    }
    if mesh.normals.as_ref().is_some_and(|n| n.len() != count) {
        return Err("normal count does not match vertex count".to_string());
    }
    if mesh.uvs.as_ref().is_some_and(|uv| uv.len() != count) {
        return Err("uv count does not match vertex count".to_string());
    }
    if mesh.joints.as_ref().is_some_and(|j| j.len() != count) || mesh.weights.as_ref().is_some_and(|w| w.len() != count) {
        return Err("skin weight count does not match vertex count".to_string());
    }
    if let Some(indices) = &mesh.indices
        && let Some(bad) = indices.iter().find(|&&i| i as usize >= count)
    {
        return Err(format!("index {bad} out of range for {count} vertices"));
    }
    Ok(())
}

/// Largest joint index referenced by the mesh's skin attributes.
fn max_joint(mesh: &Mesh) -> Option<u16> {
    mesh.joints.as_ref()?.iter().flatten().copied().max()
}

fn name_of(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}

impl DocumentWriter for GltfWriter {
    type Host = Scene;

    fn add_node(&mut self, node: &ExportedNode) -> NodeIndex {
        let t = &node.transform;
        self.root.nodes.push(doc::Node {
            name: node.name.clone(),
            children: node.children.iter().flatten().map(|c| c.0).collect(),
            translation: t.translation.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
            mesh: None,
            skin: None,
            camera: None,
            extensions: None,
            extras: None,
        });
        NodeIndex(self.root.nodes.len() as u32 - 1)
    }

    fn add_scene(&mut self, roots: &[NodeIndex], name: Option<&str>) -> SceneIndex {
        self.root.scenes.push(doc::Scene {
            name: name.map(str::to_string),
            nodes: roots.iter().map(|r| r.0).collect(),
        });
        let index = self.root.scenes.len() as u32 - 1;
        if self.root.scene.is_none() {
            self.root.scene = Some(index);
        }
        SceneIndex(index)
    }

    fn add_material(&mut self, material: &Material) -> Option<ResourceIndex> {
        if let Some(&index) = self.material_cache.get(&material.uuid) {
            return Some(ResourceIndex::new(index as usize));
        }

        let (alpha_mode, alpha_cutoff) = match material.alpha_mode {
            AlphaMode::Opaque => ("OPAQUE", None),
            AlphaMode::Mask(cutoff) => ("MASK", Some(cutoff.max(0.0))),
            AlphaMode::Blend => ("BLEND", None),
        };

        self.root.materials.push(doc::Material {
            name: name_of(&material.name),
            pbr_metallic_roughness: doc::PbrMetallicRoughness {
                base_color_factor: material.base_color.to_array(),
                metallic_factor: material.metallic.clamp(0.0, 1.0),
                roughness_factor: material.roughness.clamp(0.0, 1.0),
            },
            emissive_factor: (material.emissive != [0.0; 3]).then_some(material.emissive),
            alpha_mode,
            alpha_cutoff,
            double_sided: material.double_sided,
        });

        let index = self.root.materials.len() as u32 - 1;
        self.material_cache.insert(material.uuid, index);
        Some(ResourceIndex::new(index as usize))
    }

    fn add_mesh_to_node(
        &mut self,
        node: NodeIndex,
        mesh: &Mesh,
        materials: &[ResourceIndex],
        skin: Option<SkinJoints<'_>>,
    ) -> bool {
        if node.index() >= self.root.nodes.len() {
            log::warn!("Cannot bind mesh '{}' to missing node {node}", mesh.name);
            return false;
        }
        if let Err(reason) = validate_mesh(mesh) {
            log::warn!("Mesh '{}' rejected: {reason}", mesh.name);
            return false;
        }

        // Skin attributes are only valid on nodes that reference a skin, and
        // every joint attribute must index into that skin.
        let skin = skin.filter(|skin| {
            let in_range = max_joint(mesh).is_none_or(|max| usize::from(max) < skin.joints.len());
            if !in_range {
                log::warn!(
                    "Mesh '{}' references joints beyond its {}-bone skin, writing it unskinned",
                    mesh.name,
                    skin.joints.len()
                );
            }
            mesh.is_skinned() && in_range
        });
        let skinned = skin.is_some();

        let key: MeshKey = (mesh.uuid, skinned, materials.iter().map(|m| m.raw()).collect());
        let mesh_index = match self.mesh_cache.get(&key) {
            Some(&index) => index,
            None => {
                let geometry = self.geometry(mesh, skinned);
                let primitive = |material: Option<u32>| doc::Primitive {
                    attributes: geometry.attributes.clone(),
                    indices: geometry.indices,
                    material,
                };
                let primitives = if materials.is_empty() {
                    vec![primitive(None)]
                } else {
                    materials.iter().map(|m| primitive(m.get().map(|i| i as u32))).collect()
                };

                self.root.meshes.push(doc::Mesh {
                    name: name_of(&mesh.name),
                    primitives,
                });
                let index = self.root.meshes.len() as u32 - 1;
                self.mesh_cache.insert(key, index);
                index
            }
        };

        let skin_index = skin.map(|skin| self.push_skin(skin));

        if let Some(entry) = self.node_mut(node) {
            entry.mesh = Some(mesh_index);
            entry.skin = skin_index;
        }
        true
    }

    fn add_camera(&mut self, camera: &Camera) -> Option<ResourceIndex> {
        if let Some(&index) = self.camera_cache.get(&camera.uuid) {
            return Some(ResourceIndex::new(index as usize));
        }

        let entry = match camera.projection_type {
            ProjectionType::Perspective => {
                if !(camera.aspect > 0.0 && camera.fov > 0.0 && camera.near > 0.0 && camera.far > camera.near) {
                    log::warn!("Camera '{}' has an invalid perspective projection", camera.name);
                    return None;
                }
                doc::Camera {
                    name: name_of(&camera.name),
                    kind: "perspective",
                    perspective: Some(doc::Perspective {
                        aspect_ratio: camera.aspect,
                        yfov: camera.fov,
                        znear: camera.near,
                        zfar: camera.far.is_finite().then_some(camera.far),
                    }),
                    orthographic: None,
                }
            }
            ProjectionType::Orthographic => {
                if !(camera.ortho_size != 0.0
                    && camera.aspect > 0.0
                    && camera.near >= 0.0
                    && camera.far.is_finite()
                    && camera.far > camera.near)
                {
                    log::warn!("Camera '{}' has an invalid orthographic projection", camera.name);
                    return None;
                }
                doc::Camera {
                    name: name_of(&camera.name),
                    kind: "orthographic",
                    perspective: None,
                    orthographic: Some(doc::Orthographic {
                        xmag: camera.ortho_size * camera.aspect,
                        ymag: camera.ortho_size,
                        znear: camera.near,
                        zfar: camera.far,
                    }),
                }
            }
        };

        self.root.cameras.push(entry);
        let index = self.root.cameras.len() as u32 - 1;
        self.camera_cache.insert(camera.uuid, index);
        Some(ResourceIndex::new(index as usize))
    }

    fn add_camera_to_node(&mut self, node: NodeIndex, camera: ResourceIndex) {
        let Some(camera) = camera.get() else {
            return;
        };
        if let Some(entry) = self.node_mut(node) {
            entry.camera = Some(camera as u32);
        }
    }

    fn add_light(&mut self, light: &Light) -> Option<ResourceIndex> {
        if let Some(&index) = self.light_cache.get(&light.uuid) {
            return Some(ResourceIndex::new(index as usize));
        }
        if light.intensity < 0.0 {
            log::warn!("Light '{}' has a negative intensity", light.name);
            return None;
        }

        let (kind, spot) = match light.kind {
            LightKind::Directional => ("directional", None),
            LightKind::Point { .. } => ("point", None),
            LightKind::Spot {
                inner_cone, outer_cone, ..
            } => {
                if !(0.0 <= inner_cone && inner_cone < outer_cone && outer_cone <= FRAC_PI_2) {
                    log::warn!("Light '{}' has invalid spot cone angles", light.name);
                    return None;
                }
                (
                    "spot",
                    Some(doc::Spot {
                        inner_cone_angle: inner_cone,
                        outer_cone_angle: outer_cone,
                    }),
                )
            }
        };

        let lights = &mut self
            .root
            .extensions
            .lights_punctual
            .get_or_insert_with(doc::LightsPunctual::default)
            .lights;
        lights.push(doc::Light {
            name: name_of(&light.name),
            kind,
            color: light.color.to_array(),
            intensity: light.intensity,
            range: light.range(),
            spot,
        });
        let index = lights.len() as u32 - 1;

        self.use_extension(KHR_LIGHTS_PUNCTUAL);
        self.light_cache.insert(light.uuid, index);
        Some(ResourceIndex::new(index as usize))
    }

    fn add_light_to_node(&mut self, node: NodeIndex, light: ResourceIndex) {
        let Some(light) = light.get() else {
            return;
        };
        if let Some(entry) = self.node_mut(node) {
            entry.extensions = Some(doc::NodeExtensions {
                lights_punctual: doc::NodeLight { light: light as u32 },
            });
        }
    }

    fn add_extras_to_node(&mut self, node: NodeIndex, extras: Vec<ValueMap>) {
        if let Some(entry) = self.node_mut(node) {
            entry
                .extras
                .get_or_insert_with(doc::NodeExtras::default)
                .components
                .extend(extras);
        }
    }

    /// Serializes the document and writes it with `tokio::fs::write`.
    /// Must be awaited inside a Tokio runtime.
    fn finalize(self, destination: PathBuf, abort: AbortRegistration) -> impl Future<Output = Result<bool>> + Send {
        let write = async move {
            let bytes = self.to_json_bytes()?;
            tokio::fs::write(&destination, &bytes).await?;
            log::debug!("Wrote {} bytes to {}", bytes.len(), destination.display());
            Ok::<_, ExportError>(true)
        };

        async move {
            match Abortable::new(write, abort).await {
                Ok(result) => result,
                Err(Aborted) => Err(ExportError::Cancelled),
            }
        }
    }
}
