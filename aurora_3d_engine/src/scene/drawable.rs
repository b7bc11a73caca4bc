/// Drawable - scene leaf that owns mesh data and its uploaded geometry.
///
/// The capability set (static or skinned) is derived from the mesh at
/// creation and never changes, so the shader variant a drawable uses is
/// fixed for its whole lifetime.

use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::error::Result;
use crate::graphics_context::{ContextId, DrawMode, GeometryDesc, GeometryHandle, GraphicsContext};
use crate::shader::{Program, Uniform};
use crate::{engine_bail, engine_debug, engine_trace, engine_warn};

bitflags! {
    /// Capabilities a drawable declares to the renderer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DrawableCapabilities: u32 {
        /// Vertices are deformed by an armature
        const SKINNED = 1 << 0;
    }
}

/// Per-vertex skinning attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkinData {
    /// Four bone indices per vertex, stored as floats for the attribute stream
    pub bone_indices: Vec<Vec4>,
    /// Four bone weights per vertex
    pub bone_weights: Vec<Vec4>,
    /// Number of bones of the armature driving this mesh
    pub bone_count: usize,
}

/// CPU-side mesh data, already loaded by an external asset loader
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    /// Empty, or one normal per position
    pub normals: Vec<Vec3>,
    /// Empty, or one uv per position
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub skin: Option<SkinData>,
}

impl MeshData {
    /// Check that every attribute stream matches the vertex count
    ///
    /// # Errors
    ///
    /// `InvalidResource` naming the first mismatching stream.
    pub fn validate(&self, name: &str) -> Result<()> {
        let vertex_count = self.positions.len();
        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            engine_bail!(InvalidResource, "aurora3d::Drawable",
                "'{}': {} normals for {} positions", name, self.normals.len(), vertex_count);
        }
        if !self.tex_coords.is_empty() && self.tex_coords.len() != vertex_count {
            engine_bail!(InvalidResource, "aurora3d::Drawable",
                "'{}': {} texture coordinates for {} positions", name, self.tex_coords.len(), vertex_count);
        }
        if let Some(index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            engine_bail!(InvalidResource, "aurora3d::Drawable",
                "'{}': index {} out of range for {} vertices", name, index, vertex_count);
        }
        if let Some(skin) = &self.skin {
            if skin.bone_indices.len() != vertex_count || skin.bone_weights.len() != vertex_count {
                engine_bail!(InvalidResource, "aurora3d::Drawable",
                    "'{}': skin streams ({} indices, {} weights) do not match {} vertices",
                    name, skin.bone_indices.len(), skin.bone_weights.len(), vertex_count);
            }
            if skin.bone_count == 0 {
                engine_bail!(InvalidResource, "aurora3d::Drawable",
                    "'{}': skinned mesh declares no bones", name);
            }
        }
        Ok(())
    }
}

/// Scene leaf that issues GPU geometry draws
#[derive(Debug)]
pub struct Drawable {
    name: String,
    mesh: MeshData,
    material_name: Option<String>,
    capabilities: DrawableCapabilities,
    binding: Option<(ContextId, GeometryHandle)>,
    /// Bone and bone-normal matrices, two per bone
    bone_matrices: Vec<Mat4>,
}

impl Drawable {
    /// Create a drawable from validated mesh data
    ///
    /// Meshes carrying skin data are SKINNED.
    pub fn new(name: impl Into<String>, mesh: MeshData) -> Result<Self> {
        let name = name.into();
        mesh.validate(&name)?;
        let (capabilities, bone_matrices) = match &mesh.skin {
            Some(skin) => (DrawableCapabilities::SKINNED, vec![Mat4::IDENTITY; skin.bone_count * 2]),
            None => (DrawableCapabilities::empty(), Vec::new()),
        };
        Ok(Self {
            name,
            mesh,
            material_name: None,
            capabilities,
            binding: None,
            bone_matrices,
        })
    }

    /// Builder form of `set_material_name`
    pub fn with_material(mut self, material_name: impl Into<String>) -> Self {
        self.material_name = Some(material_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Name of the material resolved from the frame's material library
    pub fn material_name(&self) -> Option<&str> {
        self.material_name.as_deref()
    }

    pub fn set_material_name(&mut self, material_name: Option<String>) {
        self.material_name = material_name;
    }

    pub fn capabilities(&self) -> DrawableCapabilities {
        self.capabilities
    }

    pub fn is_skinned(&self) -> bool {
        self.capabilities.contains(DrawableCapabilities::SKINNED)
    }

    /// Uploaded geometry, if bound
    pub fn geometry(&self) -> Option<GeometryHandle> {
        self.binding.map(|(_, geometry)| geometry)
    }

    pub fn is_bound_to(&self, context: ContextId) -> bool {
        matches!(self.binding, Some((bound, _)) if bound == context)
    }

    pub fn bone_matrices(&self) -> &[Mat4] {
        &self.bone_matrices
    }

    /// Replace the bone matrices uploaded with every draw
    ///
    /// # Errors
    ///
    /// `InvalidState` for static drawables or a wrong matrix count.
    pub fn set_bone_matrices(&mut self, matrices: &[Mat4]) -> Result<()> {
        if !self.is_skinned() {
            engine_bail!(InvalidState, "aurora3d::Drawable",
                "'{}' is static and has no bones", self.name);
        }
        if matrices.len() != self.bone_matrices.len() {
            engine_bail!(InvalidState, "aurora3d::Drawable",
                "'{}' expects {} bone matrices, got {}", self.name, self.bone_matrices.len(), matrices.len());
        }
        self.bone_matrices.copy_from_slice(matrices);
        Ok(())
    }

    /// Upload geometry to `ctx`
    ///
    /// Returns `false` when already bound to this context (nothing uploaded).
    ///
    /// # Errors
    ///
    /// `InvalidState` if the geometry lives in another context; release it
    /// there first.
    pub fn bind_to_context(&mut self, ctx: &mut dyn GraphicsContext) -> Result<bool> {
        let context = ctx.context_id();
        match self.binding {
            Some((bound, _)) if bound == context => {
                engine_trace!("aurora3d::Drawable", "'{}' already bound to {:?}", self.name, context);
                return Ok(false);
            }
            Some((bound, _)) => {
                engine_bail!(InvalidState, "aurora3d::Drawable",
                    "'{}' is bound to {:?}; release it before binding to {:?}", self.name, bound, context);
            }
            None => {}
        }

        let empty: &[Vec4] = &[];
        let (bone_indices, bone_weights) = match &self.mesh.skin {
            Some(skin) => (skin.bone_indices.as_slice(), skin.bone_weights.as_slice()),
            None => (empty, empty),
        };
        let geometry = ctx.create_geometry(&GeometryDesc {
            name: &self.name,
            positions: bytemuck::cast_slice(&self.mesh.positions),
            normals: bytemuck::cast_slice(&self.mesh.normals),
            tex_coords: bytemuck::cast_slice(&self.mesh.tex_coords),
            bone_indices: bytemuck::cast_slice(bone_indices),
            bone_weights: bytemuck::cast_slice(bone_weights),
            indices: &self.mesh.indices,
        })?;

        self.binding = Some((context, geometry));
        engine_debug!("aurora3d::Drawable", "'{}' uploaded {} vertices, {} indices",
            self.name, self.mesh.positions.len(), self.mesh.indices.len());
        Ok(true)
    }

    /// Upload transforms (and bones) to `program`, then draw the geometry
    ///
    /// # Errors
    ///
    /// `InvalidState` if the drawable was never bound.
    pub fn draw(
        &self,
        ctx: &mut dyn GraphicsContext,
        program: &Program,
        model_view: &Mat4,
        mode: DrawMode,
    ) -> Result<()> {
        let geometry = match self.binding {
            Some((context, geometry)) if context == ctx.context_id() => geometry,
            _ => engine_bail!(InvalidState, "aurora3d::Drawable",
                "'{}' drawn before bind_to_context", self.name),
        };

        let normal_matrix = model_view.inverse().transpose();
        program.set_mat4(ctx, Uniform::ModelView, model_view);
        program.set_mat4(ctx, Uniform::NormalMatrix, &normal_matrix);
        if self.is_skinned() {
            program.set_mat4_array(ctx, Uniform::BoneMatrices, &self.bone_matrices);
        }
        ctx.draw(geometry, mode)
    }

    /// Release the uploaded geometry
    ///
    /// The binding is kept when `ctx` is not the context that owns it.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        match self.binding {
            Some((context, geometry)) if context == ctx.context_id() => {
                ctx.delete_geometry(geometry);
                self.binding = None;
            }
            Some((context, _)) => {
                engine_warn!("aurora3d::Drawable", "'{}' released through {:?} but bound to {:?}",
                    self.name, ctx.context_id(), context);
            }
            None => {}
        }
    }
}

#[cfg(test)]
#[path = "drawable_tests.rs"]
mod tests;
