//! Shader module
//!
//! Linked programs with their uniform tables, and the static/skinned
//! variant pair every strategy draws with.

pub mod builtin;
mod program;
mod shader_variant_set;

pub use program::{Program, Uniform, MAX_LIGHTS};
pub use shader_variant_set::{
    skinned_vertex_source, ShaderSources, ShaderVariant, ShaderVariantSet,
    ARMATURE_SUPPORT_DEFINE,
};
