use glam::{Mat4, Vec3, Vec4};
use crate::graphics_context::{GraphicsContext, MockGraphicsContext, ProgramDesc, UniformValue};
use super::*;

fn link_test_program(ctx: &mut MockGraphicsContext) -> Program {
    Program::link(ctx, &ProgramDesc {
        name: "test",
        vertex_source: "void main() {}",
        fragment_source: "void main() {}",
    }).unwrap()
}

#[test]
fn test_uniform_names_are_unique() {
    let mut names: Vec<&str> = Uniform::ALL.iter().map(|u| u.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Uniform::ALL.len());
}

#[test]
fn test_link_resolves_every_uniform() {
    let mut ctx = MockGraphicsContext::new();
    let program = link_test_program(&mut ctx);

    assert_eq!(program.name(), "test");
    for uniform in Uniform::ALL {
        assert!(program.has_uniform(uniform), "{} missing", uniform.name());
    }
}

#[test]
fn test_absent_uniform_upload_is_skipped() {
    let mut ctx = MockGraphicsContext::new();
    ctx.hide_uniform("uKs");
    let program = link_test_program(&mut ctx);
    ctx.use_program(Some(program.handle()));

    assert!(!program.has_uniform(Uniform::Specular));
    program.set_vec4(&mut ctx, Uniform::Specular, Vec4::ONE);
    program.set_mat4(&mut ctx, Uniform::ModelView, &Mat4::IDENTITY);

    assert!(ctx.uniform_uploads("uKs").is_empty());
    assert_eq!(ctx.last_uniform("uMVMatrix"), Some(UniformValue::Mat4(Mat4::IDENTITY)));
}

#[test]
fn test_delete_releases_program() {
    let mut ctx = MockGraphicsContext::new();
    let program = link_test_program(&mut ctx);
    assert_eq!(ctx.live_program_count(), 1);

    program.delete(&mut ctx);
    assert_eq!(ctx.live_program_count(), 0);
}

#[test]
fn test_object_id_resolves() {
    let mut ctx = MockGraphicsContext::new();
    let program = link_test_program(&mut ctx);
    ctx.use_program(Some(program.handle()));

    assert_eq!(Uniform::ObjectId.name(), "uObjId");
    assert!(program.has_uniform(Uniform::ObjectId));
    program.set_int(&mut ctx, Uniform::ObjectId, 42);
    assert_eq!(ctx.last_uniform("uObjId"), Some(UniformValue::Int(42)));
}

#[test]
fn test_light_position_slots() {
    assert_eq!(Uniform::light_position(0), Some(Uniform::LightPosition0));
    assert_eq!(Uniform::light_position(8).map(|u| u.name()), Some("uLightPosition8"));
    assert_eq!(Uniform::light_position(MAX_LIGHTS), None);
}

#[test]
fn test_set_light_positions_skips_absent_and_extra_slots() {
    let mut ctx = MockGraphicsContext::new();
    ctx.hide_uniform("uLightPosition1");
    let program = link_test_program(&mut ctx);
    ctx.use_program(Some(program.handle()));

    let positions: Vec<Vec3> = (0..MAX_LIGHTS + 1).map(|i| Vec3::splat(i as f32)).collect();
    program.set_light_positions(&mut ctx, &positions);

    assert_eq!(ctx.last_uniform("uLightPosition0"), Some(UniformValue::Vec3(Vec3::ZERO)));
    assert!(ctx.uniform_uploads("uLightPosition1").is_empty());
    assert_eq!(ctx.last_uniform("uLightPosition8"), Some(UniformValue::Vec3(Vec3::splat(8.0))));
    assert!(ctx.uniform_uploads("uLightPosition9").is_empty());
}
