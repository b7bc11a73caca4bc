//! Resource module
//!
//! Textures with their load lifecycle, materials, and the named material
//! library traversal resolves drawables against.

mod material;
mod material_library;
mod texture;

pub use material::{Material, DIFFUSE_TEXTURE_UNIT};
pub use material_library::MaterialLibrary;
pub use texture::{ImageData, Texture, TextureState};
