/// Unit tests for texture.rs
///
/// Tests the load lifecycle (Loading -> Ready / Failed) and binding against
/// MockGraphicsContext.

use glam::Vec2;
use crate::error::Error;
use crate::graphics_context::{MockCall, MockGraphicsContext, TextureHandle};
use super::*;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn create_test_image(width: u32, height: u32) -> ImageData {
    ImageData {
        width,
        height,
        pixels: vec![255; (width * height * 4) as usize],
    }
}

// ============================================================================
// STATE
// ============================================================================

#[test]
fn test_loading_texture_is_not_ready() {
    let texture = Texture::loading("brick");

    assert_eq!(texture.name(), "brick");
    assert_eq!(texture.state(), TextureState::Loading);
    assert!(!texture.is_ready());
    assert_eq!(texture.handle(), None);
    assert_eq!(texture.scale(), Vec2::ONE);
}

#[test]
fn test_with_scale() {
    let texture = Texture::loading("tiles").with_scale(Vec2::new(4.0, 2.0));
    assert_eq!(texture.scale(), Vec2::new(4.0, 2.0));
}

#[test]
fn test_complete_load_uploads_and_becomes_ready() {
    let mut ctx = MockGraphicsContext::new();
    let texture = Texture::loading("brick");

    texture.complete_load(&mut ctx, &create_test_image(2, 2)).unwrap();

    let handle = texture.handle().unwrap();
    assert_eq!(texture.state(), TextureState::Ready(handle));
    assert!(ctx.calls().contains(&MockCall::UploadTexturePixels { texture: handle, bytes: 16 }));
}

#[test]
fn test_complete_load_twice_fails() {
    let mut ctx = MockGraphicsContext::new();
    let texture = Texture::loading("brick");
    texture.complete_load(&mut ctx, &create_test_image(1, 1)).unwrap();

    let result = texture.complete_load(&mut ctx, &create_test_image(1, 1));
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

#[test]
fn test_malformed_image_fails_texture() {
    let mut ctx = MockGraphicsContext::new();
    let texture = Texture::loading("brick");
    let image = ImageData { width: 2, height: 2, pixels: vec![0; 3] };

    let result = texture.complete_load(&mut ctx, &image);

    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert!(matches!(texture.state(), TextureState::Failed(_)));
}

#[test]
fn test_fail_records_reason() {
    let texture = Texture::loading("missing");
    texture.fail("404");
    assert_eq!(texture.state(), TextureState::Failed("404".to_string()));
}

// ============================================================================
// BINDING AND RELEASE
// ============================================================================

#[test]
fn test_bind_only_when_ready() {
    let mut ctx = MockGraphicsContext::new();
    let texture = Texture::loading("brick");

    assert!(!texture.bind(&mut ctx, 0));
    assert_eq!(ctx.bound_texture(0), None);

    texture.complete_load(&mut ctx, &create_test_image(1, 1)).unwrap();
    assert!(texture.bind(&mut ctx, 0));
    assert_eq!(ctx.bound_texture(0), texture.handle());
}

#[test]
fn test_release_deletes_owned_handle() {
    let mut ctx = MockGraphicsContext::new();
    let texture = Texture::loading("brick");
    texture.complete_load(&mut ctx, &create_test_image(1, 1)).unwrap();
    let handle = texture.handle().unwrap();

    texture.release(&mut ctx);

    assert!(ctx.calls().contains(&MockCall::DeleteTexture(handle)));
    assert!(!texture.is_ready());
}

#[test]
fn test_release_keeps_context_owned_handle() {
    let mut ctx = MockGraphicsContext::new();
    let texture = Texture::from_context_handle("white", TextureHandle(1));
    assert!(texture.is_ready());

    texture.release(&mut ctx);

    assert!(!ctx.calls().iter().any(|c| matches!(c, MockCall::DeleteTexture(_))));
}
