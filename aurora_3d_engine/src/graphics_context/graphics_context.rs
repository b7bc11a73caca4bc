/// GraphicsContext - the GPU capabilities consumed by the renderer core.
///
/// Every component receives the context explicitly (`&mut dyn GraphicsContext`).
/// Handles are plain ids owned by the context; the core never dereferences them.

use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::error::Result;

// ===== HANDLES =====

/// Identity of a context instance, used to make binds idempotent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u64);

/// Compiled and linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Uploaded vertex/index buffers of one drawable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u32);

/// Off-screen framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(pub u32);

/// Uniform location inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

// ===== DESCRIPTORS =====

/// Primitive topology used by a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Pixel format of a texture or framebuffer attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA, the format of loaded images
    Rgba8,
    /// 32-bit float RGBA, used for position and normal attachments
    Rgba32Float,
    /// Depth component
    Depth16,
}

impl TextureFormat {
    /// Bytes per pixel of a CPU-side upload
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rgba32Float => 16,
            TextureFormat::Depth16 => 2,
        }
    }
}

/// Program creation descriptor
#[derive(Debug, Clone, Copy)]
pub struct ProgramDesc<'a> {
    /// Debug name, reported in compile errors
    pub name: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
}

/// Texture creation descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Geometry upload descriptor (flat f32 attribute streams)
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryDesc<'a> {
    pub name: &'a str,
    /// xyz per vertex
    pub positions: &'a [f32],
    /// xyz per vertex
    pub normals: &'a [f32],
    /// uv per vertex
    pub tex_coords: &'a [f32],
    /// Four bone indices per vertex (empty for static geometry)
    pub bone_indices: &'a [f32],
    /// Four bone weights per vertex (empty for static geometry)
    pub bone_weights: &'a [f32],
    pub indices: &'a [u16],
}

/// Framebuffer creation descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferDesc {
    pub width: u32,
    pub height: u32,
    /// One texture per entry, attached in order to color attachment 0..n
    pub color_attachments: Vec<TextureFormat>,
    /// Attach a depth renderbuffer
    pub depth: bool,
}

/// Objects created together with a framebuffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferTargets {
    pub framebuffer: FramebufferHandle,
    /// Textures backing the color attachments, in descriptor order
    pub color_attachments: Vec<TextureHandle>,
}

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

// ===== TRAIT =====

/// GPU context capabilities used by the renderer core
pub trait GraphicsContext {
    /// Identity of this context
    fn context_id(&self) -> ContextId;

    // ----- programs -----

    /// Compile and link a program
    ///
    /// # Errors
    ///
    /// Returns `Error::ShaderCompilation` with the driver log on failure.
    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle>;

    fn delete_program(&mut self, program: ProgramHandle);

    /// Make `program` current, or unbind with `None`
    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Location of a uniform, `None` when the program does not expose it
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    // ----- uniforms (on the current program) -----

    fn set_uniform_int(&mut self, location: UniformLocation, value: i32);
    fn set_uniform_vec2(&mut self, location: UniformLocation, value: Vec2);
    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3);
    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4);
    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4);
    fn set_uniform_mat4_array(&mut self, location: UniformLocation, values: &[Mat4]);

    // ----- textures -----

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle>;

    /// Replace the full contents of a texture
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if `pixels` does not match the texture size.
    fn upload_texture_pixels(&mut self, texture: TextureHandle, pixels: &[u8]) -> Result<()>;

    /// Bind a texture to a texture unit, or unbind it with `None`
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>);

    fn delete_texture(&mut self, texture: TextureHandle);

    /// The context's pre-existing 1x1 opaque white texture
    fn white_texture(&self) -> TextureHandle;

    // ----- geometry -----

    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<GeometryHandle>;
    fn delete_geometry(&mut self, geometry: GeometryHandle);

    // ----- framebuffers -----

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferTargets>;

    /// Bind an off-screen framebuffer, or the default one with `None`
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>);

    /// Release a framebuffer and its attachment textures
    fn delete_framebuffer(&mut self, targets: &FramebufferTargets);

    /// Number of color attachments a framebuffer may have
    fn max_color_attachments(&self) -> u32;

    // ----- frame -----

    fn set_viewport(&mut self, viewport: Viewport);
    fn clear(&mut self, color: Vec4);

    /// Issue a draw call for uploaded geometry with the current program
    fn draw(&mut self, geometry: GeometryHandle, mode: DrawMode) -> Result<()>;
}
