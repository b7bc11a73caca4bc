/// Full-frame rendering algorithms.
///
/// A strategy is bound once to a context, which allocates its pass-specific
/// resources, and then renders a scene graph root with a camera each frame.
/// Switching strategies means creating and binding a new one.

use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_context::GraphicsContext;
use crate::resource::MaterialLibrary;
use crate::scene::{NodeKey, SceneGraph};

/// Family a strategy belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Single pass, lighting resolved per drawable
    Forward,
    /// Geometry pass into off-screen buffers, then a full-screen resolve
    Deferred,
}

/// Counters of one `render` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Drawables submitted by the (first) geometry pass
    pub geometry_submissions: usize,
    /// Full-screen resolve draws
    pub resolve_submissions: usize,
    /// Times a different program became current
    pub program_switches: usize,
}

/// Rendering algorithm for a whole frame
pub trait RenderStrategy {
    /// Registry name of the strategy
    fn name(&self) -> &str;

    fn kind(&self) -> StrategyKind;

    /// Compile programs and allocate pass resources on `ctx`
    ///
    /// Binding again to the same context is a no-op.
    fn bind_to_context(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()>;

    fn is_bound(&self) -> bool;

    /// Render the subtree at `root` as seen by `camera`
    ///
    /// # Errors
    ///
    /// `InvalidState` if the strategy is not bound to `ctx`.
    fn render(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        graph: &SceneGraph,
        root: NodeKey,
        materials: &MaterialLibrary,
        camera: &Camera,
    ) -> Result<FrameStats>;

    /// Release every GPU resource; the strategy cannot render afterwards
    fn destroy(&mut self, ctx: &mut dyn GraphicsContext);
}
