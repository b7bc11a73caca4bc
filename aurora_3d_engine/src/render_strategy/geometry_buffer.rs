/// Off-screen targets of the deferred strategy: the geometry buffer written by
/// the first pass, and the full-screen quad the resolve pass draws.

use glam::{Vec2, Vec3, Vec4};
use crate::error::Result;
use crate::graphics_context::{
    FramebufferDesc, FramebufferTargets, GeometryDesc, GeometryHandle, GraphicsContext,
    TextureFormat, TextureHandle, Viewport,
};
use crate::{engine_bail, engine_debug};
use super::config::GEOMETRY_BUFFER_ATTACHMENTS;

/// Attachments of the geometry buffer, in color attachment order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GBufferAttachment {
    /// Depth encoded as RGB
    DepthRgb,
    /// View-space normals
    Normal,
    /// View-space positions
    Position,
    /// Lit diffuse color
    Color,
}

impl GBufferAttachment {
    pub const ALL: [GBufferAttachment; GEOMETRY_BUFFER_ATTACHMENTS as usize] = [
        GBufferAttachment::DepthRgb,
        GBufferAttachment::Normal,
        GBufferAttachment::Position,
        GBufferAttachment::Color,
    ];

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn format(&self) -> TextureFormat {
        match self {
            GBufferAttachment::DepthRgb | GBufferAttachment::Color => TextureFormat::Rgba8,
            GBufferAttachment::Normal | GBufferAttachment::Position => TextureFormat::Rgba32Float,
        }
    }

    /// Texture unit the resolve pass samples this attachment from
    pub fn texture_unit(&self) -> u32 {
        match self {
            GBufferAttachment::Color => 0,
            GBufferAttachment::DepthRgb => 1,
            GBufferAttachment::Normal => 2,
            GBufferAttachment::Position => 3,
        }
    }
}

/// Framebuffer with one texture per `GBufferAttachment` plus depth
#[derive(Debug)]
pub struct GeometryBuffer {
    targets: FramebufferTargets,
    width: u32,
    height: u32,
}

impl GeometryBuffer {
    /// Allocate the framebuffer and its attachment textures
    ///
    /// # Errors
    ///
    /// `InvalidState` if the context supports fewer color attachments than
    /// the geometry buffer needs.
    pub fn create(ctx: &mut dyn GraphicsContext, width: u32, height: u32) -> Result<Self> {
        let available = ctx.max_color_attachments();
        if available < GEOMETRY_BUFFER_ATTACHMENTS {
            engine_bail!(InvalidState, "aurora3d::GeometryBuffer",
                "Context supports {} color attachments, the geometry buffer needs {}",
                available, GEOMETRY_BUFFER_ATTACHMENTS);
        }
        let targets = ctx.create_framebuffer(&FramebufferDesc {
            width,
            height,
            color_attachments: GBufferAttachment::ALL.iter().map(|a| a.format()).collect(),
            depth: true,
        })?;
        engine_debug!("aurora3d::GeometryBuffer", "Created {}x{} geometry buffer", width, height);
        Ok(Self { targets, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn targets(&self) -> &FramebufferTargets {
        &self.targets
    }

    pub fn attachment(&self, attachment: GBufferAttachment) -> TextureHandle {
        self.targets.color_attachments[attachment.index()]
    }

    /// Bind as render target, sized to the buffer, and clear it
    pub fn bind_for_writing(&self, ctx: &mut dyn GraphicsContext) {
        ctx.bind_framebuffer(Some(self.targets.framebuffer));
        ctx.set_viewport(Viewport { x: 0, y: 0, width: self.width, height: self.height });
        ctx.clear(Vec4::ZERO);
    }

    /// Bind every attachment to its resolve texture unit
    pub fn bind_for_reading(&self, ctx: &mut dyn GraphicsContext) {
        for attachment in GBufferAttachment::ALL {
            ctx.bind_texture(attachment.texture_unit(), Some(self.attachment(attachment)));
        }
    }

    pub fn release(self, ctx: &mut dyn GraphicsContext) {
        ctx.delete_framebuffer(&self.targets);
    }
}

/// Upload the two-triangle quad covering clip space
pub fn create_screen_quad(ctx: &mut dyn GraphicsContext) -> Result<GeometryHandle> {
    let positions = [
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    let tex_coords = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
    ctx.create_geometry(&GeometryDesc {
        name: "screen-quad",
        positions: bytemuck::cast_slice(&positions),
        tex_coords: bytemuck::cast_slice(&tex_coords),
        indices: &indices,
        ..Default::default()
    })
}
