//! Unit tests for DeferredStrategy and its geometry buffer

use glam::{Mat4, Vec2, Vec3};
use crate::camera::Camera;
use crate::error::Error;
use crate::graphics_context::{
    FramebufferHandle, MockCall, MockGraphicsContext, UniformValue, Viewport,
};
use crate::resource::MaterialLibrary;
use crate::scene::{Drawable, Light, MeshData, SceneGraph};
use super::*;
use crate::render_strategy::ShaderLibrary;

// ============================================================================
// HELPERS
// ============================================================================

fn create_strategy() -> DeferredStrategy {
    let shaders = ShaderLibrary::default();
    DeferredStrategy::new("deferredPhong", StrategyConfig::default(), shaders.geometry_pass, shaders.resolve)
}

fn create_camera() -> Camera {
    Camera::new(
        Mat4::IDENTITY,
        Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0),
        Viewport { x: 0, y: 0, width: 800, height: 600 },
    )
}

fn scene(ctx: &mut MockGraphicsContext, count: usize) -> (SceneGraph, MaterialLibrary) {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    for i in 0..count {
        let key = graph.create_drawable(Drawable::new(format!("d{}", i), MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            tex_coords: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            indices: vec![0, 1, 2],
            ..Default::default()
        }).unwrap());
        graph.add_child(root, key).unwrap();
    }
    graph.bind_to_context(root, ctx).unwrap();
    let mut materials = MaterialLibrary::new();
    materials.bind_to_context(ctx);
    (graph, materials)
}

fn geometry_framebuffer(strategy: &DeferredStrategy) -> FramebufferHandle {
    strategy.geometry_buffer().unwrap().targets().framebuffer
}

// ============================================================================
// BINDING
// ============================================================================

#[test]
fn test_bind_allocates_pass_resources() {
    let mut ctx = MockGraphicsContext::new();
    let mut strategy = create_strategy();

    strategy.bind_to_context(&mut ctx).unwrap();

    assert!(strategy.is_bound());
    assert_eq!(strategy.kind(), StrategyKind::Deferred);
    let buffer = strategy.geometry_buffer().unwrap();
    assert_eq!((buffer.width(), buffer.height()), (1024, 1024));
    assert_eq!(buffer.targets().color_attachments.len(), 4);
    assert_eq!(ctx.live_framebuffer_count(), 1);
    // static + skinned geometry pass, plus the resolve program
    assert_eq!(ctx.live_program_count(), 3);
    assert_eq!(ctx.live_geometry_count(), 1);
}

#[test]
fn test_bind_twice_allocates_once() {
    let mut ctx = MockGraphicsContext::new();
    let mut strategy = create_strategy();

    strategy.bind_to_context(&mut ctx).unwrap();
    strategy.bind_to_context(&mut ctx).unwrap();

    assert_eq!(ctx.live_framebuffer_count(), 1);
    assert_eq!(ctx.compile_count(), 3);
}

#[test]
fn test_bind_without_enough_attachments_fails() {
    let mut ctx = MockGraphicsContext::new();
    ctx.set_max_color_attachments(1);
    let mut strategy = create_strategy();

    let result = strategy.bind_to_context(&mut ctx);

    assert!(matches!(result, Err(Error::InvalidState(_))));
    assert!(!strategy.is_bound());
    assert_eq!(ctx.live_framebuffer_count(), 0);
    assert_eq!(ctx.live_program_count(), 0);
}

#[test]
fn test_failed_resolve_compile_releases_everything() {
    let mut ctx = MockGraphicsContext::new();
    let shaders = ShaderLibrary::default();
    let mut strategy = DeferredStrategy::new(
        "broken",
        StrategyConfig::default(),
        shaders.geometry_pass,
        crate::shader::ShaderSources::new("#error resolve", "void main() {}"),
    );

    let result = strategy.bind_to_context(&mut ctx);

    assert!(matches!(result, Err(Error::ShaderCompilation(_))));
    assert_eq!(ctx.live_framebuffer_count(), 0);
    assert_eq!(ctx.live_geometry_count(), 0);
    assert_eq!(ctx.live_program_count(), 0);
}

// ============================================================================
// RENDER
// ============================================================================

#[test]
fn test_render_n_geometry_then_one_resolve() {
    let mut ctx = MockGraphicsContext::new();
    let (graph, materials) = scene(&mut ctx, 5);
    let mut strategy = create_strategy();
    strategy.bind_to_context(&mut ctx).unwrap();
    ctx.clear_calls();

    let stats = strategy.render(&mut ctx, &graph, graph.root(), &materials, &create_camera()).unwrap();

    assert_eq!(stats.geometry_submissions, 5);
    assert_eq!(stats.resolve_submissions, 1);
    assert_eq!(stats.program_switches, 2);

    let gbuffer = geometry_framebuffer(&strategy);
    let targets: Vec<Option<FramebufferHandle>> = ctx.draw_calls().iter().filter_map(|c| match c {
        MockCall::Draw { framebuffer, .. } => Some(*framebuffer),
        _ => None,
    }).collect();
    assert_eq!(targets.len(), 6);
    assert!(targets[..5].iter().all(|t| *t == Some(gbuffer)));
    assert_eq!(targets[5], None);
}

#[test]
fn test_resolve_samples_every_attachment() {
    let mut ctx = MockGraphicsContext::new();
    let (graph, materials) = scene(&mut ctx, 1);
    let mut strategy = create_strategy();
    strategy.bind_to_context(&mut ctx).unwrap();

    strategy.render(&mut ctx, &graph, graph.root(), &materials, &create_camera()).unwrap();

    let buffer = strategy.geometry_buffer().unwrap();
    for attachment in GBufferAttachment::ALL {
        assert_eq!(ctx.bound_texture(attachment.texture_unit()), Some(buffer.attachment(attachment)));
    }
    assert_eq!(ctx.last_uniform("uMapRGBDepth"), Some(UniformValue::Int(1)));
    assert_eq!(ctx.last_uniform("uMapNormal"), Some(UniformValue::Int(2)));
    assert_eq!(ctx.last_uniform("uMapPosition"), Some(UniformValue::Int(3)));
    assert_eq!(ctx.last_uniform("uHMatrix"), Some(UniformValue::Mat4(Mat4::IDENTITY)));
}

#[test]
fn test_geometry_pass_uses_buffer_viewport() {
    let mut ctx = MockGraphicsContext::new();
    let (graph, materials) = scene(&mut ctx, 1);
    let mut strategy = create_strategy();
    strategy.bind_to_context(&mut ctx).unwrap();
    ctx.clear_calls();
    let camera = create_camera();

    strategy.render(&mut ctx, &graph, graph.root(), &materials, &camera).unwrap();

    let viewports: Vec<Viewport> = ctx.calls().iter().filter_map(|c| match c {
        MockCall::SetViewport(v) => Some(*v),
        _ => None,
    }).collect();
    assert_eq!(viewports, vec![
        Viewport { x: 0, y: 0, width: 1024, height: 1024 },
        *camera.viewport(),
    ]);
}

#[test]
fn test_empty_scene_still_resolves() {
    let mut ctx = MockGraphicsContext::new();
    let (graph, materials) = scene(&mut ctx, 0);
    let mut strategy = create_strategy();
    strategy.bind_to_context(&mut ctx).unwrap();

    let stats = strategy.render(&mut ctx, &graph, graph.root(), &materials, &create_camera()).unwrap();

    assert_eq!(stats, FrameStats { geometry_submissions: 0, resolve_submissions: 1, program_switches: 1 });
}

#[test]
fn test_render_unbound_fails() {
    let mut ctx = MockGraphicsContext::new();
    let (graph, materials) = scene(&mut ctx, 1);
    let mut strategy = create_strategy();

    let result = strategy.render(&mut ctx, &graph, graph.root(), &materials, &create_camera());
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

// ============================================================================
// DESTROY
// ============================================================================

#[test]
fn test_destroy_releases_all_resources() {
    let mut ctx = MockGraphicsContext::new();
    let (graph, materials) = scene(&mut ctx, 1);
    let mut strategy = create_strategy();
    strategy.bind_to_context(&mut ctx).unwrap();

    strategy.destroy(&mut ctx);

    assert!(!strategy.is_bound());
    assert_eq!(ctx.live_framebuffer_count(), 0);
    assert_eq!(ctx.live_program_count(), 0);
    // only the scene drawable's geometry is left
    assert_eq!(ctx.live_geometry_count(), 1);
    let result = strategy.render(&mut ctx, &graph, graph.root(), &materials, &create_camera());
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

// ============================================================================
// LIGHTS AND FAILURE
// ============================================================================

#[test]
fn test_resolve_receives_view_space_lights() {
    let mut ctx = MockGraphicsContext::new();
    let (mut graph, materials) = scene(&mut ctx, 2);
    graph.add_light(Light::new(Vec3::new(1.0, 2.0, 3.0))).unwrap();
    graph.add_light(Light::new(Vec3::new(-1.0, 0.0, 0.0))).unwrap();
    let mut strategy = create_strategy();
    strategy.bind_to_context(&mut ctx).unwrap();

    strategy.render(&mut ctx, &graph, graph.root(), &materials, &create_camera()).unwrap();

    assert_eq!(ctx.uniform_uploads("uLightPosition0"), vec![UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))]);
    assert_eq!(ctx.uniform_uploads("uLightPosition1"), vec![UniformValue::Vec3(Vec3::new(-1.0, 0.0, 0.0))]);
}

#[test]
fn test_failed_geometry_pass_restores_default_targets() {
    let mut ctx = MockGraphicsContext::new();
    let (mut graph, materials) = scene(&mut ctx, 1);
    let unbound = graph.create_drawable(Drawable::new("late", MeshData {
        positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        tex_coords: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
        indices: vec![0, 1, 2],
        ..Default::default()
    }).unwrap());
    graph.add_child(graph.root(), unbound).unwrap();
    let mut strategy = create_strategy();
    strategy.bind_to_context(&mut ctx).unwrap();

    let result = strategy.render(&mut ctx, &graph, graph.root(), &materials, &create_camera());

    assert!(matches!(result, Err(Error::InvalidState(_))));
    assert_eq!(ctx.current_program(), None);
    assert_eq!(ctx.current_framebuffer(), None);
}
