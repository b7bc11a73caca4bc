/// Named material list handed to scene traversal.
///
/// Drawables reference materials by name. The library owns the single
/// fallback texture shared by every material: it wraps the context's white
/// texture, so untextured materials never cause a second upload.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::graphics_context::{ContextId, GraphicsContext};
use crate::{engine_bail, engine_debug, engine_info};
use super::material::Material;
use super::texture::Texture;

#[derive(Debug)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    by_name: FxHashMap<String, usize>,
    /// Used by drawables without a (known) material
    default_material: Material,
    fallback: Option<(ContextId, Arc<Texture>)>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
            by_name: FxHashMap::default(),
            default_material: Material::new("default"),
            fallback: None,
        }
    }

    /// Add a material; it is bound immediately if the library already is
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if a material with the same name exists.
    pub fn add(&mut self, mut material: Material) -> Result<()> {
        if self.by_name.contains_key(material.name()) {
            engine_bail!(ConfigurationError, "aurora3d::MaterialLibrary",
                "Duplicate material name '{}'", material.name());
        }
        if let Some((_, fallback)) = &self.fallback {
            material.bind_to_context(fallback.clone());
        }
        self.by_name.insert(material.name().to_string(), self.materials.len());
        self.materials.push(material);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.by_name.get(name).map(|&i| &self.materials[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Material> {
        match self.by_name.get(name) {
            Some(&i) => Some(&mut self.materials[i]),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn default_material(&self) -> &Material {
        &self.default_material
    }

    /// Shared fallback texture, once bound
    pub fn fallback_texture(&self) -> Option<&Arc<Texture>> {
        self.fallback.as_ref().map(|(_, texture)| texture)
    }

    /// Material for a drawable's material name, or the default material
    pub fn resolve(&self, name: Option<&str>) -> &Material {
        match name {
            Some(name) => match self.get(name) {
                Some(material) => material,
                None => {
                    engine_debug!("aurora3d::MaterialLibrary",
                        "Unknown material '{}', using default", name);
                    &self.default_material
                }
            },
            None => &self.default_material,
        }
    }

    /// Share one fallback texture, wrapping the context's white texture,
    /// with every material
    ///
    /// Binding again to the same context keeps the existing fallback.
    pub fn bind_to_context(&mut self, ctx: &mut dyn GraphicsContext) {
        let context = ctx.context_id();
        let fallback = match &self.fallback {
            Some((bound, texture)) if *bound == context => texture.clone(),
            _ => {
                let texture = Arc::new(Texture::from_context_handle("fallback-white", ctx.white_texture()));
                self.fallback = Some((context, texture.clone()));
                texture
            }
        };

        for material in &mut self.materials {
            material.bind_to_context(fallback.clone());
        }
        self.default_material.bind_to_context(fallback);
        engine_info!("aurora3d::MaterialLibrary", "Bound {} materials to {:?}", self.materials.len(), context);
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "material_library_tests.rs"]
mod tests;
