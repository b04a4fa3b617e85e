//! Transform Resolver
//!
//! Produces the translation/rotation/scale written for an exported node.
//! Roots are placed in world space (optionally re-centered by an origin
//! matrix); children keep their parent-relative transform.

use glam::{Affine3A, Quat, Vec3};

use crate::host::SceneHost;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    /// Unit quaternion
    pub rotation: Quat,
    pub scale: Vec3,
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
            scale,
        }
    }

    /// Decomposes an affine matrix. Shear is discarded; a negative
    /// determinant is carried by the scale.
    #[must_use]
    pub fn from_matrix(matrix: &Affine3A) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self::new(translation, rotation, scale)
    }

    #[must_use]
    pub fn to_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            // q and -q are the same rotation
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Resolves the exported transform of `node`.
///
/// Roots decompose `origin × world`; non-roots return the stored
/// parent-relative transform untouched.
pub fn resolve<H: SceneHost + ?Sized>(host: &H, node: H::Node, is_root: bool, origin: &Affine3A) -> NodeTransform {
    if is_root {
        NodeTransform::from_matrix(&(*origin * host.world_matrix(node)))
    } else {
        host.local_transform(node)
    }
}

/// Resolves a node whose nearest exported ancestor is not its direct
/// parent. `skipped` is the product of the local matrices of the skipped
/// ancestors, outermost first.
pub fn resolve_promoted<H: SceneHost + ?Sized>(host: &H, node: H::Node, skipped: &Affine3A) -> NodeTransform {
    NodeTransform::from_matrix(&(*skipped * host.local_transform(node).to_matrix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_keeps_negative_scale() {
        let m = Affine3A::from_scale_rotation_translation(
            Vec3::new(-2.0, 1.0, 3.0),
            Quat::from_rotation_y(0.5),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let t = NodeTransform::from_matrix(&m);

        assert!(t.to_matrix().abs_diff_eq(m, 1e-5));
        assert!((t.rotation.length() - 1.0).abs() < 1e-5);
        assert!(t.scale.x * t.scale.y * t.scale.z < 0.0);
    }
}
