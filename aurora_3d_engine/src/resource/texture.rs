/// Bindable texture with an asynchronous load lifecycle.
///
/// Image decoding and fetching happen outside the core. The loader creates a
/// texture in the `Loading` state, shares it with materials, and later calls
/// `complete_load` (or `fail`) on the render thread. Materials bind their
/// fallback until the texture is `Ready`.

use std::sync::{Mutex, MutexGuard};
use glam::Vec2;
use crate::error::Result;
use crate::graphics_context::{GraphicsContext, TextureDesc, TextureFormat, TextureHandle};
use crate::{engine_bail, engine_debug, engine_warn};

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

/// Load state of a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureState {
    Loading,
    Ready(TextureHandle),
    Failed(String),
}

/// Shared texture resource
#[derive(Debug)]
pub struct Texture {
    name: String,
    scale: Vec2,
    /// False for textures wrapping a handle owned by the context
    owns_handle: bool,
    state: Mutex<TextureState>,
}

impl Texture {
    /// Texture whose image is still being fetched
    pub fn loading(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: Vec2::ONE,
            owns_handle: true,
            state: Mutex::new(TextureState::Loading),
        }
    }

    /// Ready texture around a handle the context owns (e.g. its white texture)
    pub fn from_context_handle(name: impl Into<String>, handle: TextureHandle) -> Self {
        Self {
            name: name.into(),
            scale: Vec2::ONE,
            owns_handle: false,
            state: Mutex::new(TextureState::Ready(handle)),
        }
    }

    /// Set the uv scale uploaded as `uMapKdScale`
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    fn lock_state(&self) -> MutexGuard<'_, TextureState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> TextureState {
        self.lock_state().clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.lock_state(), TextureState::Ready(_))
    }

    /// GPU handle once ready
    pub fn handle(&self) -> Option<TextureHandle> {
        match *self.lock_state() {
            TextureState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    /// Upload a decoded image and become `Ready`
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the texture is not `Loading`
    /// - `InvalidResource` if the pixel buffer does not match the image size
    ///
    /// On upload failure the texture moves to `Failed`.
    pub fn complete_load(&self, ctx: &mut dyn GraphicsContext, image: &ImageData) -> Result<()> {
        let mut state = self.lock_state();
        if *state != TextureState::Loading {
            engine_bail!(InvalidState, "aurora3d::Texture",
                "'{}' is not loading (state {:?})", self.name, *state);
        }
        let expected = image.width as usize * image.height as usize * 4;
        if image.width == 0 || image.height == 0 || image.pixels.len() != expected {
            *state = TextureState::Failed("malformed image".to_string());
            engine_bail!(InvalidResource, "aurora3d::Texture",
                "'{}': {}x{} image with {} bytes (expected {})",
                self.name, image.width, image.height, image.pixels.len(), expected);
        }

        let handle = ctx.create_texture(&TextureDesc {
            width: image.width,
            height: image.height,
            format: TextureFormat::Rgba8,
        })?;
        if let Err(e) = ctx.upload_texture_pixels(handle, &image.pixels) {
            ctx.delete_texture(handle);
            *state = TextureState::Failed(e.to_string());
            return Err(e);
        }

        *state = TextureState::Ready(handle);
        engine_debug!("aurora3d::Texture", "'{}' ready ({}x{})", self.name, image.width, image.height);
        Ok(())
    }

    /// Record a load failure reported by the loader
    pub fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        engine_warn!("aurora3d::Texture", "'{}' failed to load: {}", self.name, reason);
        *self.lock_state() = TextureState::Failed(reason);
    }

    /// Bind to `unit` if ready; returns whether anything was bound
    pub fn bind(&self, ctx: &mut dyn GraphicsContext, unit: u32) -> bool {
        match self.handle() {
            Some(handle) => {
                ctx.bind_texture(unit, Some(handle));
                true
            }
            None => false,
        }
    }

    /// Delete the GPU texture this resource owns
    pub fn release(&self, ctx: &mut dyn GraphicsContext) {
        let mut state = self.lock_state();
        if let TextureState::Ready(handle) = *state {
            if self.owns_handle {
                ctx.delete_texture(handle);
            }
            *state = TextureState::Failed("released".to_string());
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
