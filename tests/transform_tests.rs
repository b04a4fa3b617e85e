//! Transform, TransformSystem and Transform Resolver tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Hierarchical world matrix propagation
//! - Export-side resolution: root decomposition, origin re-centering,
//!   parent-relative children, negative and non-uniform scale

use glam::{Affine3A, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use sylva::export::transform::{NodeTransform, resolve, resolve_promoted};
use sylva::scene::{Node, Scene, Transform};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

/// Parent at (10, 0, 0) rotated 90° around Y, child at (0, 0, 5) scaled 2×.
fn two_level_scene() -> (Scene, sylva::scene::NodeHandle, sylva::scene::NodeHandle) {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    scene
        .node(parent)
        .set_position(10.0, 0.0, 0.0)
        .set_rotation(Quat::from_rotation_y(FRAC_PI_2));

    let child = scene.add_to_parent(Node::new(), parent);
    scene.node(child).set_position(0.0, 0.0, 5.0).set_scale(2.0);

    scene.update_matrix_world();
    (scene, parent, child)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 0.0, 0.0);
    assert!(t.update_local_matrix());
    assert!(vec3_approx(t.local_matrix().translation.into(), Vec3::X));
}

#[test]
fn transform_apply_local_matrix_decomposes() {
    let mut t = Transform::new();
    let m = Affine3A::from_scale_rotation_translation(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_z(0.3), Vec3::ONE);

    t.apply_local_matrix(m);

    assert!(vec3_approx(t.position, Vec3::ONE));
    assert!(vec3_approx(t.scale, Vec3::new(1.0, 2.0, 3.0)));
}

// ============================================================================
// World Matrix Propagation
// ============================================================================

#[test]
fn world_matrix_composes_parent_and_child() {
    let (scene, _, child) = two_level_scene();

    let world: Vec3 = scene.get_node(child).unwrap().world_matrix().translation.into();
    // (0,0,5) rotated 90° about Y is (5,0,0)
    assert!(vec3_approx(world, Vec3::new(15.0, 0.0, 0.0)));
}

#[test]
fn world_matrix_follows_reattach() {
    let mut scene = Scene::new();
    let a = scene.create_node();
    scene.node(a).set_position(0.0, 3.0, 0.0);
    let child = scene.create_node();
    scene.node(child).set_position(1.0, 0.0, 0.0);

    scene.attach(child, a);
    scene.update_matrix_world();

    let world: Vec3 = scene.get_node(child).unwrap().world_matrix().translation.into();
    assert!(vec3_approx(world, Vec3::new(1.0, 3.0, 0.0)));
}

// ============================================================================
// Transform Resolver
// ============================================================================

#[test]
fn resolve_root_with_identity_origin_matches_world() {
    let (scene, _, child) = two_level_scene();

    let resolved = resolve(&scene, child, true, &Affine3A::IDENTITY);
    let direct = NodeTransform::from_matrix(scene.get_node(child).unwrap().world_matrix());

    assert!(resolved.abs_diff_eq(&direct, EPSILON));
    assert!(vec3_approx(resolved.translation, Vec3::new(15.0, 0.0, 0.0)));
    assert!(vec3_approx(resolved.scale, Vec3::splat(2.0)));
}

#[test]
fn resolve_root_applies_origin() {
    let (scene, parent, _) = two_level_scene();

    let origin = Affine3A::from_translation(Vec3::new(-10.0, 0.0, 0.0));
    let resolved = resolve(&scene, parent, true, &origin);

    assert!(vec3_approx(resolved.translation, Vec3::ZERO));
    assert!(resolved.rotation.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), EPSILON));
}

#[test]
fn resolve_child_uses_local_transform() {
    let (scene, _, child) = two_level_scene();

    let resolved = resolve(&scene, child, false, &Affine3A::from_translation(Vec3::splat(100.0)));

    assert_eq!(resolved.translation, Vec3::new(0.0, 0.0, 5.0));
    assert_eq!(resolved.scale, Vec3::splat(2.0));
    assert_eq!(resolved.rotation, Quat::IDENTITY);
}

#[test]
fn resolve_root_handles_negative_scale() {
    let mut scene = Scene::new();
    let node = scene.create_node();
    scene
        .node(node)
        .set_scale_xyz(-1.0, 2.0, 0.5)
        .set_rotation(Quat::from_rotation_x(0.7))
        .set_position(1.0, 2.0, 3.0);
    scene.update_matrix_world();

    let resolved = resolve(&scene, node, true, &Affine3A::IDENTITY);
    let world = *scene.get_node(node).unwrap().world_matrix();

    assert!(resolved.to_matrix().abs_diff_eq(world, 1e-4));
    assert!(approx_eq(resolved.rotation.length(), 1.0));
    assert!(resolved.scale.x * resolved.scale.y * resolved.scale.z < 0.0);
}

#[test]
fn resolve_promoted_folds_skipped_chain() {
    let (scene, parent, child) = two_level_scene();

    // Parent skipped below an identity ancestor: child must land where the
    // parent chain would have put it.
    let skipped = NodeTransform::from_matrix(scene.get_node(parent).unwrap().transform.local_matrix()).to_matrix();
    let resolved = resolve_promoted(&scene, child, &skipped);

    assert!(vec3_approx(resolved.translation, Vec3::new(15.0, 0.0, 0.0)));
    assert!(vec3_approx(resolved.scale, Vec3::splat(2.0)));
}
