/// Linked program plus the uniform locations the renderer core uploads to.
///
/// Locations are resolved once at link time. A uniform the program does not
/// expose is recorded as absent and every upload to it is silently skipped,
/// which lets variants omit terms they do not use.

use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::error::Result;
use crate::graphics_context::{GraphicsContext, ProgramDesc, ProgramHandle, UniformLocation};

/// Uniforms known to the renderer core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    /// Projection matrix
    Projection,
    /// Model-view matrix
    ModelView,
    /// Normal matrix (inverse transpose of the model-view)
    NormalMatrix,
    /// Screen-space transform of full-screen quads
    HudTransform,
    Ambient,
    Diffuse,
    Specular,
    /// Diffuse texture sampler (also the color attachment in the resolve pass)
    DiffuseMap,
    DiffuseMapScale,
    /// Depth encoded as RGB, geometry buffer attachment
    DepthMap,
    NormalMap,
    PositionMap,
    /// Bone and bone-normal matrices, interleaved per bone
    BoneMatrices,
    /// Integer id of the drawn object
    ObjectId,
    /// View-space light positions, one uniform per light slot
    LightPosition0,
    LightPosition1,
    LightPosition2,
    LightPosition3,
    LightPosition4,
    LightPosition5,
    LightPosition6,
    LightPosition7,
    LightPosition8,
}

/// Number of light slots a program can expose
pub const MAX_LIGHTS: usize = 9;

impl Uniform {
    pub const ALL: [Uniform; 23] = [
        Uniform::Projection,
        Uniform::ModelView,
        Uniform::NormalMatrix,
        Uniform::HudTransform,
        Uniform::Ambient,
        Uniform::Diffuse,
        Uniform::Specular,
        Uniform::DiffuseMap,
        Uniform::DiffuseMapScale,
        Uniform::DepthMap,
        Uniform::NormalMap,
        Uniform::PositionMap,
        Uniform::BoneMatrices,
        Uniform::ObjectId,
        Uniform::LightPosition0,
        Uniform::LightPosition1,
        Uniform::LightPosition2,
        Uniform::LightPosition3,
        Uniform::LightPosition4,
        Uniform::LightPosition5,
        Uniform::LightPosition6,
        Uniform::LightPosition7,
        Uniform::LightPosition8,
    ];

    const LIGHT_POSITIONS: [Uniform; MAX_LIGHTS] = [
        Uniform::LightPosition0,
        Uniform::LightPosition1,
        Uniform::LightPosition2,
        Uniform::LightPosition3,
        Uniform::LightPosition4,
        Uniform::LightPosition5,
        Uniform::LightPosition6,
        Uniform::LightPosition7,
        Uniform::LightPosition8,
    ];

    /// Position uniform of light slot `index`, `None` past the last slot
    pub fn light_position(index: usize) -> Option<Uniform> {
        Self::LIGHT_POSITIONS.get(index).copied()
    }

    /// GLSL name of the uniform
    pub fn name(&self) -> &'static str {
        match self {
            Uniform::Projection => "uPMatrix",
            Uniform::ModelView => "uMVMatrix",
            Uniform::NormalMatrix => "uNMatrix",
            Uniform::HudTransform => "uHMatrix",
            Uniform::Ambient => "uKa",
            Uniform::Diffuse => "uKd",
            Uniform::Specular => "uKs",
            Uniform::DiffuseMap => "uMapKd",
            Uniform::DiffuseMapScale => "uMapKdScale",
            Uniform::DepthMap => "uMapRGBDepth",
            Uniform::NormalMap => "uMapNormal",
            Uniform::PositionMap => "uMapPosition",
            Uniform::BoneMatrices => "uBoneMatrices",
            Uniform::ObjectId => "uObjId",
            Uniform::LightPosition0 => "uLightPosition0",
            Uniform::LightPosition1 => "uLightPosition1",
            Uniform::LightPosition2 => "uLightPosition2",
            Uniform::LightPosition3 => "uLightPosition3",
            Uniform::LightPosition4 => "uLightPosition4",
            Uniform::LightPosition5 => "uLightPosition5",
            Uniform::LightPosition6 => "uLightPosition6",
            Uniform::LightPosition7 => "uLightPosition7",
            Uniform::LightPosition8 => "uLightPosition8",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A linked program and its resolved uniform table
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    handle: ProgramHandle,
    locations: [Option<UniformLocation>; Uniform::ALL.len()],
}

impl Program {
    /// Compile, link and resolve every known uniform
    ///
    /// # Errors
    ///
    /// Propagates `Error::ShaderCompilation` from the context.
    pub fn link(ctx: &mut dyn GraphicsContext, desc: &ProgramDesc) -> Result<Self> {
        let handle = ctx.compile_program(desc)?;
        let mut locations = [None; Uniform::ALL.len()];
        for uniform in Uniform::ALL {
            locations[uniform.index()] = ctx.uniform_location(handle, uniform.name());
        }
        Ok(Self {
            name: desc.name.to_string(),
            handle,
            locations,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn location(&self, uniform: Uniform) -> Option<UniformLocation> {
        self.locations[uniform.index()]
    }

    pub fn has_uniform(&self, uniform: Uniform) -> bool {
        self.location(uniform).is_some()
    }

    // ===== UPLOADS (skipped when the uniform is absent) =====

    pub fn set_int(&self, ctx: &mut dyn GraphicsContext, uniform: Uniform, value: i32) {
        if let Some(location) = self.location(uniform) {
            ctx.set_uniform_int(location, value);
        }
    }

    pub fn set_vec2(&self, ctx: &mut dyn GraphicsContext, uniform: Uniform, value: Vec2) {
        if let Some(location) = self.location(uniform) {
            ctx.set_uniform_vec2(location, value);
        }
    }

    pub fn set_vec3(&self, ctx: &mut dyn GraphicsContext, uniform: Uniform, value: Vec3) {
        if let Some(location) = self.location(uniform) {
            ctx.set_uniform_vec3(location, value);
        }
    }

    pub fn set_vec4(&self, ctx: &mut dyn GraphicsContext, uniform: Uniform, value: Vec4) {
        if let Some(location) = self.location(uniform) {
            ctx.set_uniform_vec4(location, value);
        }
    }

    pub fn set_mat4(&self, ctx: &mut dyn GraphicsContext, uniform: Uniform, value: &Mat4) {
        if let Some(location) = self.location(uniform) {
            ctx.set_uniform_mat4(location, value);
        }
    }

    pub fn set_mat4_array(&self, ctx: &mut dyn GraphicsContext, uniform: Uniform, values: &[Mat4]) {
        if let Some(location) = self.location(uniform) {
            ctx.set_uniform_mat4_array(location, values);
        }
    }

    /// Upload view-space light positions to consecutive light slots
    ///
    /// Positions past the last slot are ignored, as are slots the program
    /// does not declare.
    pub fn set_light_positions(&self, ctx: &mut dyn GraphicsContext, positions: &[Vec3]) {
        for (index, position) in positions.iter().enumerate() {
            if let Some(uniform) = Uniform::light_position(index) {
                self.set_vec3(ctx, uniform, *position);
            }
        }
    }

    /// Release the GPU program
    pub fn delete(self, ctx: &mut dyn GraphicsContext) {
        ctx.delete_program(self.handle);
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
