/// ShaderVariantSet - a static and a skinned program sharing fragment logic.
///
/// Both programs are compiled eagerly when the set is bound. The skinned
/// program differs only by the `ARMATURE_SUPPORT` define in its vertex stage,
/// so variants grow along a single boolean axis.

use crate::error::Result;
use crate::graphics_context::{ContextId, GraphicsContext, ProgramDesc};
use crate::scene::{Drawable, DrawableCapabilities};
use crate::{engine_bail, engine_info, engine_trace};
use super::program::Program;

/// Define prepended to the vertex stage of the skinned variant
pub const ARMATURE_SUPPORT_DEFINE: &str = "#define ARMATURE_SUPPORT\n";

/// Vertex and fragment source pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Which program of a set a drawable uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderVariant {
    Static,
    Skinned,
}

impl ShaderVariant {
    /// Variant required by a capability set
    pub fn for_capabilities(capabilities: DrawableCapabilities) -> Self {
        if capabilities.contains(DrawableCapabilities::SKINNED) {
            ShaderVariant::Skinned
        } else {
            ShaderVariant::Static
        }
    }
}

/// Insert the skinning define, keeping a leading `#version` directive first
pub fn skinned_vertex_source(vertex: &str) -> String {
    if vertex.starts_with("#version") {
        let split = vertex.find('\n').map(|i| i + 1).unwrap_or(vertex.len());
        let (version, body) = vertex.split_at(split);
        let mut source = version.to_string();
        if !source.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(ARMATURE_SUPPORT_DEFINE);
        source.push_str(body);
        source
    } else {
        format!("{}{}", ARMATURE_SUPPORT_DEFINE, vertex)
    }
}

enum VariantState {
    Unbound,
    Bound {
        context: ContextId,
        static_program: Program,
        skinned_program: Program,
    },
    Destroyed,
}

/// Static/skinned program pair
pub struct ShaderVariantSet {
    name: String,
    sources: ShaderSources,
    state: VariantState,
}

impl ShaderVariantSet {
    pub fn new(name: impl Into<String>, sources: ShaderSources) -> Self {
        Self {
            name: name.into(),
            sources,
            state: VariantState::Unbound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &ShaderSources {
        &self.sources
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, VariantState::Bound { .. })
    }

    /// Compile both variants on `ctx`
    ///
    /// Binding again to the same context is a no-op.
    ///
    /// # Errors
    ///
    /// - `ShaderCompilation` if either variant fails to compile
    /// - `InvalidState` after `destroy`, or when already bound to another context
    pub fn bind_to_context(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        match &self.state {
            VariantState::Bound { context, .. } if *context == ctx.context_id() => {
                engine_trace!("aurora3d::ShaderVariantSet", "'{}' already bound", self.name);
                return Ok(());
            }
            VariantState::Bound { context, .. } => {
                engine_bail!(InvalidState, "aurora3d::ShaderVariantSet",
                    "'{}' is bound to context {:?}; destroy it before binding to {:?}",
                    self.name, context, ctx.context_id());
            }
            VariantState::Destroyed => {
                engine_bail!(InvalidState, "aurora3d::ShaderVariantSet",
                    "'{}' was destroyed and cannot be bound again", self.name);
            }
            VariantState::Unbound => {}
        }

        let static_name = format!("{}/static", self.name);
        let static_program = self.link(ctx, &static_name, &self.sources.vertex)?;

        let skinned_name = format!("{}/skinned", self.name);
        let skinned_vertex = skinned_vertex_source(&self.sources.vertex);
        let skinned_program = match self.link(ctx, &skinned_name, &skinned_vertex) {
            Ok(program) => program,
            Err(e) => {
                static_program.delete(ctx);
                return Err(e);
            }
        };

        self.state = VariantState::Bound {
            context: ctx.context_id(),
            static_program,
            skinned_program,
        };
        engine_info!("aurora3d::ShaderVariantSet", "'{}' compiled static and skinned variants", self.name);
        Ok(())
    }

    fn link(&self, ctx: &mut dyn GraphicsContext, name: &str, vertex: &str) -> Result<Program> {
        let desc = ProgramDesc {
            name,
            vertex_source: vertex,
            fragment_source: &self.sources.fragment,
        };
        Program::link(ctx, &desc).map_err(|e| {
            crate::engine_error!("aurora3d::ShaderVariantSet", "'{}': {}", name, e);
            e
        })
    }

    /// Program for an explicit variant
    ///
    /// # Errors
    ///
    /// `InvalidState` before binding or after `destroy`.
    pub fn program(&self, variant: ShaderVariant) -> Result<&Program> {
        match &self.state {
            VariantState::Bound { static_program, skinned_program, .. } => Ok(match variant {
                ShaderVariant::Static => static_program,
                ShaderVariant::Skinned => skinned_program,
            }),
            VariantState::Unbound => {
                engine_bail!(InvalidState, "aurora3d::ShaderVariantSet",
                    "'{}' used before bind_to_context", self.name);
            }
            VariantState::Destroyed => {
                engine_bail!(InvalidState, "aurora3d::ShaderVariantSet",
                    "'{}' used after destroy", self.name);
            }
        }
    }

    /// Skinned program for armature drawables, static program otherwise
    pub fn select_for_drawable(&self, drawable: &Drawable) -> Result<&Program> {
        self.program(ShaderVariant::for_capabilities(drawable.capabilities()))
    }

    /// Release both programs; the set cannot be used afterwards
    pub fn destroy(&mut self, ctx: &mut dyn GraphicsContext) {
        let state = std::mem::replace(&mut self.state, VariantState::Destroyed);
        if let VariantState::Bound { static_program, skinned_program, .. } = state {
            static_program.delete(ctx);
            skinned_program.delete(ctx);
            engine_info!("aurora3d::ShaderVariantSet", "'{}' destroyed", self.name);
        }
    }
}

#[cfg(test)]
#[path = "shader_variant_set_tests.rs"]
mod tests;
