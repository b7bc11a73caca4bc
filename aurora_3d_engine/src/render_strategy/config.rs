/// Configuration of render strategies and of the platform they run on.

use glam::Vec4;
use crate::graphics_context::DrawMode;
use crate::shader::{builtin, ShaderSources};

/// Number of color attachments of the deferred geometry buffer
pub const GEOMETRY_BUFFER_ATTACHMENTS: u32 = 4;

/// Per-strategy settings
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    /// Width of the deferred geometry buffer in pixels
    pub geometry_buffer_width: u32,
    /// Height of the deferred geometry buffer in pixels
    pub geometry_buffer_height: u32,
    /// Color the default framebuffer is cleared to
    pub clear_color: Vec4,
    /// Topology passed to every draw command
    pub draw_mode: DrawMode,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            geometry_buffer_width: 1024,
            geometry_buffer_height: 1024,
            clear_color: Vec4::new(0.1, 0.3, 0.1, 1.0),
            draw_mode: DrawMode::Triangles,
        }
    }
}

/// Shader sources used by the built-in strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderLibrary {
    /// Forward pass (lighting resolved per drawable)
    pub forward: ShaderSources,
    /// Deferred geometry pass, writing the geometry buffer
    pub geometry_pass: ShaderSources,
    /// Deferred full-screen lighting resolve
    pub resolve: ShaderSources,
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self {
            forward: ShaderSources::new(builtin::PHONG_VERTEX, builtin::PHONG_FRAGMENT),
            geometry_pass: ShaderSources::new(builtin::PHONG_VERTEX, builtin::GEOMETRY_PASS_FRAGMENT),
            resolve: ShaderSources::new(builtin::RESOLVE_VERTEX, builtin::RESOLVE_FRAGMENT),
        }
    }
}

/// Description of the target platform used by `create_best_fit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub user_agent: String,
    pub is_mobile: bool,
    /// Color attachments a framebuffer may have on this platform
    pub max_color_attachments: u32,
}

impl PlatformDescriptor {
    /// Desktop-class platform
    pub fn desktop() -> Self {
        Self {
            user_agent: String::new(),
            is_mobile: false,
            max_color_attachments: 8,
        }
    }

    /// Mobile-class platform identified by its user agent
    pub fn mobile(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            is_mobile: true,
            max_color_attachments: 1,
        }
    }

    /// Whether this platform should avoid multi-pass rendering
    pub fn is_constrained(&self) -> bool {
        let agent = self.user_agent.to_lowercase();
        self.is_mobile
            || ["android", "iphone", "ipad", "mobile"].iter().any(|m| agent.contains(m))
            || self.max_color_attachments < GEOMETRY_BUFFER_ATTACHMENTS
    }
}

impl Default for PlatformDescriptor {
    fn default() -> Self {
        Self::desktop()
    }
}
