use glam::Mat4;
use std::borrow::Cow;
use uuid::Uuid;

/// Projection-only camera resource.
///
/// Placement comes from the node the camera is bound to; the camera itself
/// only carries the projection parameters.
#[derive(Debug, Clone)]
pub struct Camera {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,

    pub projection_type: ProjectionType,
    /// Vertical field of view, in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    /// Far clip distance. `f32::INFINITY` means an infinite projection.
    pub far: f32,
    /// Half the vertical extent of an orthographic view volume.
    pub ortho_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

impl Camera {
    /// Creates a perspective camera. `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Camera"),
            projection_type: ProjectionType::Perspective,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,
        }
    }

    #[must_use]
    pub fn new_orthographic(ortho_size: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Camera"),
            projection_type: ProjectionType::Orthographic,
            fov: 45.0_f32.to_radians(),
            aspect,
            near,
            far,
            ortho_size,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_type {
            ProjectionType::Perspective => {
                if self.far.is_finite() {
                    Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
                } else {
                    Mat4::perspective_infinite_rh(self.fov, self.aspect, self.near)
                }
            }
            ProjectionType::Orthographic => {
                let top = self.ortho_size;
                let right = top * self.aspect;
                Mat4::orthographic_rh(-right, right, -top, top, self.near, self.far)
            }
        }
    }
}
