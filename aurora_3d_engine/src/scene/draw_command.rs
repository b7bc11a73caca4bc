/// Deferred draw submission.
///
/// A `DrawCommand` is a value record captured during traversal: the drawable
/// key, a copy of its effective transform, the material library of the frame,
/// the draw mode and the shader variant. The `'f` lifetime ties every command
/// to the material library of the frame that produced it, so a command cannot
/// outlive its frame.
///
/// A `DrawQueue` is the per-frame arena of commands. It is created empty for
/// each traversal and consumed by `execute`.

use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::graphics_context::{DrawMode, GraphicsContext};
use crate::resource::MaterialLibrary;
use crate::shader::{Program, ShaderVariant, ShaderVariantSet, Uniform};
use crate::{engine_err, engine_trace};
use super::drawable::Drawable;
use super::scene_graph::{NodeKey, SceneGraph};

/// Apply the drawable's material, then submit its geometry
pub(crate) fn submit_drawable(
    ctx: &mut dyn GraphicsContext,
    program: &Program,
    drawable: &Drawable,
    materials: &MaterialLibrary,
    transform: &Mat4,
    draw_mode: DrawMode,
) -> Result<()> {
    let material = materials.resolve(drawable.material_name());
    material.draw(ctx, program)?;
    drawable.draw(ctx, program, transform, draw_mode)
}

/// One queued drawable submission
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand<'f> {
    drawable: NodeKey,
    transform: Mat4,
    materials: &'f MaterialLibrary,
    draw_mode: DrawMode,
    variant: ShaderVariant,
    sequence: u32,
}

impl<'f> DrawCommand<'f> {
    pub fn drawable(&self) -> NodeKey {
        self.drawable
    }

    /// Effective transform captured at traversal time
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    pub fn materials(&self) -> &'f MaterialLibrary {
        self.materials
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn variant(&self) -> ShaderVariant {
        self.variant
    }

    /// Position of this command in submission order
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Apply material state and submit the drawable with `program`
    ///
    /// # Errors
    ///
    /// `ProgrammingError` if the drawable was removed from the graph after
    /// the command was recorded.
    pub fn run(&self, graph: &SceneGraph, ctx: &mut dyn GraphicsContext, program: &Program) -> Result<()> {
        let drawable = graph.drawable(self.drawable)
            .ok_or_else(|| engine_err!(ProgrammingError, "aurora3d::DrawCommand",
                "Command #{} refers to dead drawable {:?}", self.sequence, self.drawable))?;
        submit_drawable(ctx, program, drawable, self.materials, &self.transform, self.draw_mode)
    }
}

/// Order in which a queue executes its commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionOrder {
    /// Traversal order
    #[default]
    Submission,
    /// Grouped by shader variant, submission order within a group
    GroupedByVariant,
}

/// Counters reported by `DrawQueue::execute`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    pub submissions: usize,
    pub program_switches: usize,
}

/// Per-frame command arena
#[derive(Debug, Default)]
pub struct DrawQueue<'f> {
    commands: Vec<DrawCommand<'f>>,
    /// View-space light positions, uploaded with the projection
    light_positions: Vec<Vec3>,
}

impl<'f> DrawQueue<'f> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { commands: Vec::with_capacity(capacity), light_positions: Vec::new() }
    }

    /// Lights of the frame, in slot order
    pub fn set_light_positions(&mut self, positions: Vec<Vec3>) {
        self.light_positions = positions;
    }

    pub fn light_positions(&self) -> &[Vec3] {
        &self.light_positions
    }

    /// Record a command; its sequence number is its submission index
    pub fn push(
        &mut self,
        drawable: NodeKey,
        transform: Mat4,
        materials: &'f MaterialLibrary,
        draw_mode: DrawMode,
        variant: ShaderVariant,
    ) {
        let sequence = self.commands.len() as u32;
        self.commands.push(DrawCommand {
            drawable,
            transform,
            materials,
            draw_mode,
            variant,
            sequence,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in their current order
    pub fn commands(&self) -> &[DrawCommand<'f>] {
        &self.commands
    }

    /// Reorder the commands for execution (stable)
    pub fn sort(&mut self, order: ExecutionOrder) {
        if order == ExecutionOrder::GroupedByVariant {
            self.commands.sort_by_key(|c| c.variant);
        }
    }

    /// Run every command once, switching programs only when the variant changes
    ///
    /// The projection matrix and the light positions are uploaded each time
    /// a program becomes current. The queue is consumed.
    pub fn execute(
        mut self,
        graph: &SceneGraph,
        ctx: &mut dyn GraphicsContext,
        shaders: &ShaderVariantSet,
        projection: &Mat4,
        order: ExecutionOrder,
    ) -> Result<QueueStats> {
        self.sort(order);

        let mut stats = QueueStats::default();
        let mut current: Option<ShaderVariant> = None;
        for command in &self.commands {
            let program = shaders.program(command.variant)?;
            if current != Some(command.variant) {
                ctx.use_program(Some(program.handle()));
                program.set_mat4(ctx, Uniform::Projection, projection);
                program.set_light_positions(ctx, &self.light_positions);
                current = Some(command.variant);
                stats.program_switches += 1;
            }
            command.run(graph, ctx, program)?;
            stats.submissions += 1;
        }

        engine_trace!("aurora3d::DrawQueue", "Executed {} commands with {} program switches",
            stats.submissions, stats.program_switches);
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "draw_command_tests.rs"]
mod tests;
