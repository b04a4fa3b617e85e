//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy
//! - Component bindings: renderers, cameras, lights, behaviors
//! - Active-in-hierarchy and layer/tag state
//! - SceneNode wrapper convenience API

use glam::Vec3;
use sylva::core::{Behavior, Field};
use sylva::scene::{Camera, Light, Material, Mesh, MeshRenderer, Node, Scene};

struct Marker;

impl Behavior for Marker {
    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_create_node() {
    let mut scene = Scene::new();
    let handle = scene.create_node();
    assert!(scene.get_node(handle).is_some());
    assert!(scene.root_nodes.contains(&handle));
}

#[test]
fn scene_create_node_with_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("TestNode");
    assert_eq!(scene.get_name(handle), Some("TestNode"));
}

#[test]
fn scene_set_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node();
    scene.set_name(handle, "Renamed");
    assert_eq!(scene.get_name(handle), Some("Renamed"));
}

#[test]
fn scene_remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);
    let grandchild = scene.add_to_parent(Node::new(), child);
    scene.add_behavior(grandchild, Marker);

    scene.remove_node(parent);

    assert!(scene.get_node(parent).is_none());
    assert!(scene.get_node(child).is_none());
    assert!(scene.get_node(grandchild).is_none());
    assert!(scene.get_behaviors(grandchild).is_empty());
    assert!(scene.root_nodes.is_empty());
}

#[test]
fn scene_remove_child_detaches_from_parent() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.remove_node(child);

    assert!(scene.get_node(parent).unwrap().children().is_empty());
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn scene_attach_sets_parent_child() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.create_node();

    scene.attach(child, parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
    assert!(!scene.root_nodes.contains(&child));
}

#[test]
fn scene_attach_removes_from_old_parent() {
    let mut scene = Scene::new();
    let a = scene.create_node();
    let b = scene.create_node();
    let child = scene.add_to_parent(Node::new(), a);

    scene.attach(child, b);

    assert!(scene.get_node(a).unwrap().children().is_empty());
    assert_eq!(scene.get_node(b).unwrap().children(), &[child]);
}

#[test]
fn scene_attach_to_self_is_noop() {
    let mut scene = Scene::new();
    let node = scene.create_node();

    scene.attach(node, node);

    assert_eq!(scene.get_node(node).unwrap().parent(), None);
    assert!(scene.root_nodes.contains(&node));
}

#[test]
fn scene_add_to_parent_keeps_child_order() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let first = scene.add_to_parent(Node::new(), parent);
    let second = scene.add_to_parent(Node::new(), parent);

    assert_eq!(scene.get_node(parent).unwrap().children(), &[first, second]);
}

// ============================================================================
// Active State, Layers & Tags
// ============================================================================

#[test]
fn scene_hidden_ancestor_deactivates_subtree() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    assert!(scene.is_active_in_hierarchy(child));

    scene.get_node_mut(parent).unwrap().visible = false;

    assert!(!scene.is_active_in_hierarchy(parent));
    assert!(!scene.is_active_in_hierarchy(child));
}

#[test]
fn scene_layer_is_clamped() {
    let mut scene = Scene::new();
    let node = scene.create_node();

    scene.node(node).set_layer(200);

    assert_eq!(scene.get_node(node).unwrap().layer, 31);
}

#[test]
fn scene_node_wrapper_chains() {
    let mut scene = Scene::new();
    let node = scene.create_node();

    scene
        .node(node)
        .set_position(1.0, 2.0, 3.0)
        .set_scale(2.0)
        .set_tag("EditorOnly")
        .set_name("Chained")
        .with_behavior(Marker);

    let n = scene.get_node(node).unwrap();
    assert_eq!(n.transform.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(n.transform.scale, Vec3::splat(2.0));
    assert!(n.has_tag("EditorOnly"));
    assert_eq!(scene.get_name(node), Some("Chained"));
    assert_eq!(scene.get_behaviors(node).len(), 1);
}

// ============================================================================
// Component Bindings
// ============================================================================

#[test]
fn scene_set_camera_and_light() {
    let mut scene = Scene::new();
    let node = scene.create_node();
    let camera = scene.add_camera(Camera::new_perspective(60.0, 1.5, 0.1, 100.0));
    let light = scene.add_light(Light::new_point(Vec3::ONE, 10.0, 5.0));

    scene.set_camera(node, camera, true);
    scene.set_light(node, light, false);

    assert_eq!(scene.camera_components.get(node).unwrap().key, camera);
    assert!(scene.camera_components.get(node).unwrap().enabled);
    assert!(!scene.light_components.get(node).unwrap().enabled);
}

#[test]
fn scene_set_mesh_renderer() {
    let mut scene = Scene::new();
    let node = scene.create_node();
    let mesh = scene.add_mesh(Mesh::new_box(1.0, 1.0, 1.0));
    let material = scene.add_material(Material::default());

    scene.set_mesh_renderer(node, MeshRenderer::new(mesh, material));

    let renderer = scene.mesh_renderers.get(node).unwrap();
    assert_eq!(renderer.materials, vec![Some(material)]);
    assert!(renderer.enabled);
}

#[test]
fn scene_components_on_missing_node_are_ignored() {
    let mut scene = Scene::new();
    let node = scene.create_node();
    scene.remove_node(node);

    scene.set_name(node, "ghost");
    scene.add_behavior(node, Marker);

    assert!(scene.get_name(node).is_none());
    assert!(scene.get_behaviors(node).is_empty());
}

#[test]
fn scene_behaviors_keep_insertion_order() {
    struct Named(&'static str);
    impl Behavior for Named {
        fn type_name(&self) -> &str {
            self.0
        }
        fn fields(&self) -> Vec<Field<'_>> {
            Vec::new()
        }
    }

    let mut scene = Scene::new();
    let node = scene.create_node();
    scene.add_behavior(node, Named("first"));
    scene.add_behavior(node, Named("second"));

    let names: Vec<&str> = scene.get_behaviors(node).iter().map(|b| b.type_name()).collect();
    assert_eq!(names, ["first", "second"]);
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn box_mesh_is_well_formed() {
    let mesh = Mesh::new_box(2.0, 4.0, 6.0);

    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.indices.as_ref().unwrap().len(), 36);
    assert!(mesh.indices.as_ref().unwrap().iter().all(|&i| (i as usize) < 24));

    let (min, max) = mesh.bounds().unwrap();
    assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn light_range_is_none_when_unbounded() {
    assert_eq!(Light::new_directional(Vec3::ONE, 1.0).range(), None);
    assert_eq!(Light::new_point(Vec3::ONE, 1.0, 0.0).range(), None);
    assert_eq!(Light::new_point(Vec3::ONE, 1.0, 8.0).range(), Some(8.0));
}
