/// Forward strategy ("simplePhong").
///
/// One traversal, commands executed in submission order against the default
/// framebuffer. Lighting is resolved in the same pass by the phong programs.

use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_context::{ContextId, GraphicsContext};
use crate::resource::MaterialLibrary;
use crate::scene::{DrawQueue, DrawTarget, ExecutionOrder, NodeKey, SceneGraph};
use crate::shader::{ShaderSources, ShaderVariantSet};
use crate::{engine_bail, engine_info};
use super::config::StrategyConfig;
use super::render_strategy::{FrameStats, RenderStrategy, StrategyKind};

pub struct ForwardStrategy {
    name: String,
    config: StrategyConfig,
    shaders: ShaderVariantSet,
    context: Option<ContextId>,
    /// Command count of the previous frame, used to size the next queue
    last_command_count: usize,
}

impl ForwardStrategy {
    pub fn new(name: impl Into<String>, config: StrategyConfig, sources: ShaderSources) -> Self {
        let name = name.into();
        Self {
            shaders: ShaderVariantSet::new(format!("{}/phong", name), sources),
            name,
            config,
            context: None,
            last_command_count: 0,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn shaders(&self) -> &ShaderVariantSet {
        &self.shaders
    }
}

impl RenderStrategy for ForwardStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Forward
    }

    fn bind_to_context(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        self.shaders.bind_to_context(ctx)?;
        if self.context.is_none() {
            engine_info!("aurora3d::ForwardStrategy", "'{}' bound to {:?}", self.name, ctx.context_id());
        }
        self.context = Some(ctx.context_id());
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.context.is_some() && self.shaders.is_bound()
    }

    fn render(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        graph: &SceneGraph,
        root: NodeKey,
        materials: &MaterialLibrary,
        camera: &Camera,
    ) -> Result<FrameStats> {
        if !self.is_bound() || self.context != Some(ctx.context_id()) {
            engine_bail!(InvalidState, "aurora3d::ForwardStrategy",
                "'{}' rendered without being bound to {:?}", self.name, ctx.context_id());
        }

        ctx.bind_framebuffer(None);
        ctx.set_viewport(*camera.viewport());
        ctx.clear(self.config.clear_color);

        let mut queue = DrawQueue::with_capacity(self.last_command_count);
        queue.set_light_positions(graph.view_space_lights(camera.view_matrix()));
        graph.draw(
            root,
            camera.view_matrix(),
            materials,
            self.config.draw_mode,
            &mut DrawTarget::Queue(&mut queue),
        )?;
        self.last_command_count = queue.len();

        let stats = queue.execute(
            graph,
            ctx,
            &self.shaders,
            camera.projection_matrix(),
            ExecutionOrder::Submission,
        );
        ctx.use_program(None);
        let stats = stats?;

        Ok(FrameStats {
            geometry_submissions: stats.submissions,
            resolve_submissions: 0,
            program_switches: stats.program_switches,
        })
    }

    fn destroy(&mut self, ctx: &mut dyn GraphicsContext) {
        self.shaders.destroy(ctx);
        self.context = None;
    }
}

#[cfg(test)]
#[path = "forward_tests.rs"]
mod tests;
