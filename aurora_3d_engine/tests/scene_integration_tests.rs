//! Integration tests for the scene graph and its draw command queue
//!
//! Runs against MockGraphicsContext. No GPU required.
//!
//! Run with: cargo test --test scene_integration_tests

use aurora_3d_engine::aurora3d::Error;
use aurora_3d_engine::aurora3d::context::{DrawMode, MockCall, MockGraphicsContext};
use aurora_3d_engine::aurora3d::render::{ShaderSources, ShaderVariantSet};
use aurora_3d_engine::aurora3d::resource::{Material, MaterialLibrary};
use aurora_3d_engine::aurora3d::scene::{
    DrawQueue, DrawTarget, Drawable, ExecutionOrder, MeshData, NodeKey, SceneGraph,
};
use aurora_3d_engine::glam::{Mat4, Vec2, Vec3};

// ============================================================================
// HELPERS
// ============================================================================

fn quad(name: &str) -> Drawable {
    Drawable::new(name, MeshData {
        positions: vec![
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        tex_coords: vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y],
        indices: vec![0, 1, 2, 2, 3, 0],
        skin: None,
    }).unwrap()
}

fn queue_from(graph: &SceneGraph, materials: &MaterialLibrary) -> Vec<(NodeKey, Mat4)> {
    let mut queue = DrawQueue::new();
    graph.draw(graph.root(), &Mat4::IDENTITY, materials, DrawMode::Triangles, &mut DrawTarget::Queue(&mut queue)).unwrap();
    queue.commands().iter().map(|c| (c.drawable(), *c.transform())).collect()
}

// ============================================================================
// TRAVERSAL
// ============================================================================

#[test]
fn test_integration_root_group_two_drawables() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let group_a = graph.create_group("GroupA");
    let x = graph.create_drawable(quad("X"));
    let y = graph.create_drawable(quad("Y"));
    graph.add_child(root, group_a).unwrap();
    graph.add_child(group_a, x).unwrap();
    graph.add_child(group_a, y).unwrap();

    let translate = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    graph.set_local_transform(root, translate).unwrap();

    let commands = queue_from(&graph, &MaterialLibrary::new());

    assert_eq!(commands, vec![(x, translate), (y, translate)]);
}

#[test]
fn test_integration_edits_between_frames() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let keys: Vec<NodeKey> = ["a", "b", "c", "d"].iter().map(|n| graph.create_drawable(quad(n))).collect();
    for &key in &keys {
        graph.add_child(root, key).unwrap();
    }
    let materials = MaterialLibrary::new();

    let first: Vec<NodeKey> = queue_from(&graph, &materials).into_iter().map(|(k, _)| k).collect();
    assert_eq!(first, keys);

    graph.remove_child(root, keys[0]).unwrap();
    graph.remove_child(root, keys[2]).unwrap();
    graph.add_child(root, keys[0]).unwrap();

    let second: Vec<NodeKey> = queue_from(&graph, &materials).into_iter().map(|(k, _)| k).collect();
    assert_eq!(second, vec![keys[1], keys[3], keys[0]]);
}

// ============================================================================
// FULL FRAME
// ============================================================================

#[test]
fn test_integration_bind_draw_destroy() {
    let mut ctx = MockGraphicsContext::new();
    let mut shaders = ShaderVariantSet::new("phong", ShaderSources::new("void main() {}", "void main() {}"));
    shaders.bind_to_context(&mut ctx).unwrap();

    let mut materials = MaterialLibrary::new();
    let mut red = Material::new("red");
    red.set_kd(Vec3::X);
    materials.add(red).unwrap();
    materials.bind_to_context(&mut ctx);

    let mut graph = SceneGraph::new();
    let root = graph.root();
    let group = graph.create_group("group");
    let painted = graph.create_drawable(quad("painted").with_material("red"));
    let plain = graph.create_drawable(quad("plain").with_material("missing"));
    graph.add_child(root, group).unwrap();
    graph.add_child(group, painted).unwrap();
    graph.add_child(group, plain).unwrap();

    assert_eq!(graph.bind_to_context(root, &mut ctx).unwrap(), 2);
    assert_eq!(graph.bind_to_context(root, &mut ctx).unwrap(), 0);

    let mut queue = DrawQueue::new();
    graph.draw(root, &Mat4::IDENTITY, &materials, DrawMode::Triangles, &mut DrawTarget::Queue(&mut queue)).unwrap();
    let stats = queue.execute(&graph, &mut ctx, &shaders, &Mat4::IDENTITY, ExecutionOrder::Submission).unwrap();
    assert_eq!(stats.submissions, 2);
    assert_eq!(ctx.draw_calls().len(), 2);

    assert_eq!(graph.destroy(group, &mut ctx).unwrap(), 3);
    assert_eq!(ctx.live_geometry_count(), 0);
    assert!(ctx.calls().iter().any(|c| matches!(c, MockCall::DeleteGeometry(_))));
}

#[test]
fn test_integration_stale_command_is_fatal() {
    let mut ctx = MockGraphicsContext::new();
    let mut shaders = ShaderVariantSet::new("phong", ShaderSources::new("void main() {}", "void main() {}"));
    shaders.bind_to_context(&mut ctx).unwrap();
    let mut materials = MaterialLibrary::new();
    materials.bind_to_context(&mut ctx);

    let mut graph = SceneGraph::new();
    let root = graph.root();
    let doomed = graph.create_drawable(quad("doomed"));
    graph.add_child(root, doomed).unwrap();
    graph.bind_to_context(root, &mut ctx).unwrap();

    let mut queue = DrawQueue::new();
    graph.draw(root, &Mat4::IDENTITY, &materials, DrawMode::Triangles, &mut DrawTarget::Queue(&mut queue)).unwrap();

    let other_frame = SceneGraph::new();
    let result = queue.execute(&other_frame, &mut ctx, &shaders, &Mat4::IDENTITY, ExecutionOrder::Submission);
    assert!(matches!(result, Err(Error::ProgrammingError(_))));
    assert!(ctx.draw_calls().is_empty());
}
