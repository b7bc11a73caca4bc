/// GPU context abstraction and its recording mock.

pub mod graphics_context;
pub mod mock_graphics_context;

pub use graphics_context::{
    ContextId, DrawMode, FramebufferDesc, FramebufferHandle, FramebufferTargets,
    GeometryDesc, GeometryHandle, GraphicsContext, ProgramDesc, ProgramHandle,
    TextureDesc, TextureFormat, TextureHandle, UniformLocation, Viewport,
};
pub use mock_graphics_context::{MockCall, MockGraphicsContext, MockProgram, UniformValue};
