/// Phong material: ambient, diffuse and specular reflectance plus an
/// optional diffuse texture.
///
/// The alpha of every reflectance vector is reserved. Setters force it to
/// 1.0, and at draw time the diffuse alpha carries the "untextured" flag
/// (1.0 = no texture, 0.0 = textured) to the fragment stage.

use std::sync::Arc;
use glam::{Vec3, Vec4};
use crate::error::Result;
use crate::graphics_context::GraphicsContext;
use crate::shader::{Program, Uniform};
use crate::engine_err;
use super::texture::Texture;

/// Texture unit the diffuse map is bound to
pub const DIFFUSE_TEXTURE_UNIT: u32 = 0;

/// Surface reflectance description
#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    ka: Vec4,
    kd: Vec4,
    ks: Vec4,
    map_kd: Option<Arc<Texture>>,
    /// Shared fallback, set by `bind_to_context`
    fallback: Option<Arc<Texture>>,
}

impl Material {
    /// Black ambient, white diffuse, black specular, no texture
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ka: Vec4::new(0.0, 0.0, 0.0, 1.0),
            kd: Vec4::ONE,
            ks: Vec4::new(0.0, 0.0, 0.0, 1.0),
            map_kd: None,
            fallback: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ka(&self) -> Vec4 {
        self.ka
    }

    pub fn kd(&self) -> Vec4 {
        self.kd
    }

    pub fn ks(&self) -> Vec4 {
        self.ks
    }

    pub fn set_ka(&mut self, ka: Vec3) {
        self.ka = ka.extend(1.0);
    }

    pub fn set_kd(&mut self, kd: Vec3) {
        self.kd = kd.extend(1.0);
    }

    pub fn set_ks(&mut self, ks: Vec3) {
        self.ks = ks.extend(1.0);
    }

    /// Attach a diffuse texture; the material shares it, it does not own it
    pub fn set_map_kd(&mut self, texture: Arc<Texture>) {
        self.map_kd = Some(texture);
    }

    pub fn map_kd(&self) -> Option<&Arc<Texture>> {
        self.map_kd.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.fallback.is_some()
    }

    /// Store the context's shared fallback texture
    ///
    /// Every untextured material of a library receives the same instance.
    pub fn bind_to_context(&mut self, fallback: Arc<Texture>) {
        self.fallback = Some(fallback);
    }

    /// Texture `draw` binds: the diffuse map once ready, the fallback otherwise
    pub fn active_texture(&self) -> Option<&Arc<Texture>> {
        let fallback = self.fallback.as_ref()?;
        match &self.map_kd {
            Some(texture) if texture.is_ready() && !Arc::ptr_eq(texture, fallback) => Some(texture),
            _ => Some(fallback),
        }
    }

    /// Upload reflectance uniforms and bind the diffuse texture
    ///
    /// Uniforms the program does not expose are skipped.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the material was never bound.
    pub fn draw(&self, ctx: &mut dyn GraphicsContext, program: &Program) -> Result<()> {
        let fallback = self.fallback.as_ref()
            .ok_or_else(|| engine_err!(InvalidState, "aurora3d::Material",
                "Material '{}' drawn before bind_to_context", self.name))?;
        let texture = self.active_texture().unwrap_or(fallback);
        let textured = !Arc::ptr_eq(texture, fallback);

        program.set_vec4(ctx, Uniform::Ambient, self.ka);

        let mut kd = self.kd;
        kd.w = if textured { 0.0 } else { 1.0 };
        program.set_vec4(ctx, Uniform::Diffuse, kd);

        if !texture.bind(ctx, DIFFUSE_TEXTURE_UNIT) {
            let white = ctx.white_texture();
            ctx.bind_texture(DIFFUSE_TEXTURE_UNIT, Some(white));
        }
        program.set_int(ctx, Uniform::DiffuseMap, DIFFUSE_TEXTURE_UNIT as i32);
        program.set_vec2(ctx, Uniform::DiffuseMapScale, texture.scale());

        program.set_vec4(ctx, Uniform::Specular, self.ks);
        Ok(())
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
