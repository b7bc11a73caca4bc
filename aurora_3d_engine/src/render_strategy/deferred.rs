/// Deferred strategy ("deferredPhong").
///
/// First pass: one traversal into the geometry buffer, commands grouped by
/// shader variant. Second pass: a single full-screen draw on the default
/// framebuffer that samples the four attachments and resolves lighting.
/// Every geometry submission completes before the resolve draw is issued.

use glam::Mat4;
use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_context::{ContextId, DrawMode, GeometryHandle, GraphicsContext, ProgramDesc};
use crate::resource::MaterialLibrary;
use crate::scene::{DrawQueue, DrawTarget, ExecutionOrder, NodeKey, QueueStats, SceneGraph};
use crate::shader::{Program, ShaderSources, ShaderVariantSet, Uniform};
use crate::{engine_bail, engine_info, engine_warn};
use super::config::StrategyConfig;
use super::geometry_buffer::{create_screen_quad, GBufferAttachment, GeometryBuffer};
use super::render_strategy::{FrameStats, RenderStrategy, StrategyKind};

/// GPU objects owned by a bound deferred strategy
struct DeferredResources {
    context: ContextId,
    geometry_buffer: GeometryBuffer,
    screen_quad: GeometryHandle,
    resolve_program: Program,
}

pub struct DeferredStrategy {
    name: String,
    config: StrategyConfig,
    resolve_sources: ShaderSources,
    shaders: ShaderVariantSet,
    resources: Option<DeferredResources>,
    last_command_count: usize,
}

impl DeferredStrategy {
    pub fn new(
        name: impl Into<String>,
        config: StrategyConfig,
        geometry_sources: ShaderSources,
        resolve_sources: ShaderSources,
    ) -> Self {
        let name = name.into();
        Self {
            shaders: ShaderVariantSet::new(format!("{}/geometry", name), geometry_sources),
            name,
            config,
            resolve_sources,
            resources: None,
            last_command_count: 0,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn shaders(&self) -> &ShaderVariantSet {
        &self.shaders
    }

    pub fn geometry_buffer(&self) -> Option<&GeometryBuffer> {
        self.resources.as_ref().map(|r| &r.geometry_buffer)
    }

    /// Traverse and execute into the bound geometry buffer
    fn geometry_pass(
        &self,
        ctx: &mut dyn GraphicsContext,
        graph: &SceneGraph,
        root: NodeKey,
        materials: &MaterialLibrary,
        camera: &Camera,
    ) -> Result<(usize, QueueStats)> {
        let mut queue = DrawQueue::with_capacity(self.last_command_count);
        graph.draw(
            root,
            camera.view_matrix(),
            materials,
            self.config.draw_mode,
            &mut DrawTarget::Queue(&mut queue),
        )?;
        let command_count = queue.len();
        let stats = queue.execute(
            graph,
            ctx,
            &self.shaders,
            camera.projection_matrix(),
            ExecutionOrder::GroupedByVariant,
        )?;
        Ok((command_count, stats))
    }

    fn allocate(&mut self, ctx: &mut dyn GraphicsContext) -> Result<DeferredResources> {
        let geometry_buffer = GeometryBuffer::create(
            ctx,
            self.config.geometry_buffer_width,
            self.config.geometry_buffer_height,
        )?;
        let screen_quad = match create_screen_quad(ctx) {
            Ok(quad) => quad,
            Err(e) => {
                geometry_buffer.release(ctx);
                return Err(e);
            }
        };
        let resolve_name = format!("{}/resolve", self.name);
        let resolve_program = match Program::link(ctx, &ProgramDesc {
            name: &resolve_name,
            vertex_source: &self.resolve_sources.vertex,
            fragment_source: &self.resolve_sources.fragment,
        }) {
            Ok(program) => program,
            Err(e) => {
                ctx.delete_geometry(screen_quad);
                geometry_buffer.release(ctx);
                return Err(e);
            }
        };
        if let Err(e) = self.shaders.bind_to_context(ctx) {
            resolve_program.delete(ctx);
            ctx.delete_geometry(screen_quad);
            geometry_buffer.release(ctx);
            return Err(e);
        }
        Ok(DeferredResources {
            context: ctx.context_id(),
            geometry_buffer,
            screen_quad,
            resolve_program,
        })
    }
}

impl RenderStrategy for DeferredStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Deferred
    }

    fn bind_to_context(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        match &self.resources {
            Some(resources) if resources.context == ctx.context_id() => return Ok(()),
            Some(resources) => {
                engine_bail!(InvalidState, "aurora3d::DeferredStrategy",
                    "'{}' is bound to {:?}; create a new strategy for {:?}",
                    self.name, resources.context, ctx.context_id());
            }
            None => {}
        }

        let resources = self.allocate(ctx)?;
        self.resources = Some(resources);
        engine_info!("aurora3d::DeferredStrategy", "'{}' bound to {:?} ({}x{} geometry buffer)",
            self.name, ctx.context_id(),
            self.config.geometry_buffer_width, self.config.geometry_buffer_height);
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.resources.is_some()
    }

    fn render(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        graph: &SceneGraph,
        root: NodeKey,
        materials: &MaterialLibrary,
        camera: &Camera,
    ) -> Result<FrameStats> {
        let resources = match &self.resources {
            Some(resources) if resources.context == ctx.context_id() => resources,
            _ => engine_bail!(InvalidState, "aurora3d::DeferredStrategy",
                "'{}' rendered without being bound to {:?}", self.name, ctx.context_id()),
        };

        // Geometry pass
        resources.geometry_buffer.bind_for_writing(ctx);
        let (command_count, geometry) = match self.geometry_pass(ctx, graph, root, materials, camera) {
            Ok(result) => result,
            Err(e) => {
                ctx.use_program(None);
                ctx.bind_framebuffer(None);
                return Err(e);
            }
        };

        // Lighting resolve
        ctx.bind_framebuffer(None);
        ctx.set_viewport(*camera.viewport());
        ctx.clear(self.config.clear_color);

        let program = &resources.resolve_program;
        ctx.use_program(Some(program.handle()));
        resources.geometry_buffer.bind_for_reading(ctx);
        program.set_int(ctx, Uniform::DiffuseMap, GBufferAttachment::Color.texture_unit() as i32);
        program.set_int(ctx, Uniform::DepthMap, GBufferAttachment::DepthRgb.texture_unit() as i32);
        program.set_int(ctx, Uniform::NormalMap, GBufferAttachment::Normal.texture_unit() as i32);
        program.set_int(ctx, Uniform::PositionMap, GBufferAttachment::Position.texture_unit() as i32);
        program.set_mat4(ctx, Uniform::HudTransform, &Mat4::IDENTITY);
        program.set_light_positions(ctx, &graph.view_space_lights(camera.view_matrix()));
        ctx.draw(resources.screen_quad, DrawMode::Triangles)?;
        ctx.use_program(None);

        self.last_command_count = command_count;
        Ok(FrameStats {
            geometry_submissions: geometry.submissions,
            resolve_submissions: 1,
            program_switches: geometry.program_switches + 1,
        })
    }

    fn destroy(&mut self, ctx: &mut dyn GraphicsContext) {
        self.shaders.destroy(ctx);
        match self.resources.take() {
            Some(resources) => {
                resources.resolve_program.delete(ctx);
                ctx.delete_geometry(resources.screen_quad);
                resources.geometry_buffer.release(ctx);
                engine_info!("aurora3d::DeferredStrategy", "'{}' destroyed", self.name);
            }
            None => engine_warn!("aurora3d::DeferredStrategy", "'{}' destroyed while unbound", self.name),
        }
    }
}

#[cfg(test)]
#[path = "deferred_tests.rs"]
mod tests;
