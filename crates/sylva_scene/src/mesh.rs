use glam::Vec3;
use std::borrow::Cow;
use uuid::Uuid;

/// Baked triangle-list geometry.
///
/// All present attribute arrays have one entry per position. `joints` and
/// `weights` are only meaningful together and index into the skeleton of
/// the renderer the mesh is bound to.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,

    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,

    pub joints: Option<Vec<[u16; 4]>>,
    pub weights: Option<Vec<[f32; 4]>>,
}

impl Mesh {
    #[must_use]
    pub fn new(positions: Vec<[f32; 3]>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Mesh"),
            positions,
            normals: None,
            uvs: None,
            indices: None,
            joints: None,
            weights: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    #[must_use]
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    #[must_use]
    pub fn with_skin_weights(mut self, joints: Vec<[u16; 4]>, weights: Vec<[f32; 4]>) -> Self {
        self.joints = Some(joints);
        self.weights = Some(weights);
        self
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_skinned(&self) -> bool {
        self.joints.is_some() && self.weights.is_some()
    }

    /// Axis-aligned bounds of the positions, `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Axis-aligned box centered at the origin, four vertices per face so
    /// every face gets flat normals.
    #[must_use]
    pub fn new_box(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;

        // (normal, u axis, v axis) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let corners = [(-1.0, -1.0, 0.0, 1.0), (1.0, -1.0, 1.0, 1.0), (1.0, 1.0, 1.0, 0.0), (-1.0, 1.0, 0.0, 0.0)];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, (normal, u_axis, v_axis)) in faces.into_iter().enumerate() {
            for (su, sv, tu, tv) in corners {
                let p = (normal + u_axis * su + v_axis * sv) * half;
                positions.push(p.to_array());
                normals.push(normal.to_array());
                uvs.push([tu, tv]);
            }
            let base = (face * 4) as u32;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(positions)
            .with_name("Box")
            .with_normals(normals)
            .with_uvs(uvs)
            .with_indices(indices)
    }
}
