/*!
# Aurora 3D Engine

Scene renderer core: a scene graph of groups and drawables, per-frame draw
command queues, static/skinned shader variants, forward and deferred render
strategies, Phong materials with shared textures, and skeletal animation.

The GPU is reached only through the `GraphicsContext` trait, always passed
explicitly. `MockGraphicsContext` records every call and serves as the
headless context for tests and tooling.

## Architecture

- **SceneGraph**: slotmap arena of Group and Drawable nodes, ordered children, point lights
- **DrawQueue**: frame-scoped `DrawCommand`s recorded by traversal
- **ShaderVariantSet**: static and skinned programs sharing fragment source
- **RenderStrategy**: forward ("simplePhong") and deferred ("deferredPhong")
- **RenderStrategyFactory**: creation by name, render level or platform
- **Material / Texture / MaterialLibrary**: Phong reflectance and diffuse maps
- **Animation / Armature / ArmatureAnimator**: keyframes to bone matrices
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod animation;
pub mod camera;
pub mod graphics_context;
pub mod render_strategy;
pub mod resource;
pub mod scene;
pub mod shader;

// Main aurora3d namespace module
pub mod aurora3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // GPU context sub-module
    pub mod context {
        pub use crate::graphics_context::*;
    }

    // Render sub-module: strategies, shaders and camera
    pub mod render {
        pub use crate::camera::Camera;
        pub use crate::render_strategy::*;
        pub use crate::shader::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Animation sub-module
    pub mod animation {
        pub use crate::animation::*;
    }
}

// Re-export math library at crate root
pub use glam;
