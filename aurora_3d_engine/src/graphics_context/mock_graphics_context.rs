/// Mock graphics context (no GPU required)
///
/// Records every call as a `MockCall` so tests can assert on what the
/// renderer core submitted. Also usable as a headless context.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use glam::{Mat4, Vec2, Vec3, Vec4};
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use crate::error::{Error, Result};
use super::graphics_context::{
    ContextId, DrawMode, FramebufferDesc, FramebufferHandle, FramebufferTargets,
    GeometryDesc, GeometryHandle, GraphicsContext, ProgramDesc, ProgramHandle,
    TextureDesc, TextureFormat, TextureHandle, UniformLocation, Viewport,
};

/// Value of a recorded uniform upload
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Mat4Array(Vec<Mat4>),
}

/// One recorded context call
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CompileProgram { program: ProgramHandle, name: String },
    DeleteProgram(ProgramHandle),
    UseProgram(Option<ProgramHandle>),
    SetUniform { program: Option<ProgramHandle>, name: String, value: UniformValue },
    CreateTexture(TextureHandle),
    UploadTexturePixels { texture: TextureHandle, bytes: usize },
    BindTexture { unit: u32, texture: Option<TextureHandle> },
    DeleteTexture(TextureHandle),
    CreateGeometry { geometry: GeometryHandle, name: String },
    DeleteGeometry(GeometryHandle),
    CreateFramebuffer(FramebufferHandle),
    BindFramebuffer(Option<FramebufferHandle>),
    DeleteFramebuffer(FramebufferHandle),
    SetViewport(Viewport),
    Clear(Vec4),
    Draw {
        geometry: GeometryHandle,
        mode: DrawMode,
        program: ProgramHandle,
        framebuffer: Option<FramebufferHandle>,
    },
}

/// Sources of a compiled mock program
#[derive(Debug, Clone)]
pub struct MockProgram {
    pub name: String,
    pub vertex_source: String,
    pub fragment_source: String,
}

/// Recording graphics context
pub struct MockGraphicsContext {
    id: ContextId,
    next_handle: u32,
    white_texture: TextureHandle,
    max_color_attachments: u32,
    programs: FxHashMap<ProgramHandle, MockProgram>,
    textures: FxHashMap<TextureHandle, TextureDesc>,
    geometries: FxHashSet<GeometryHandle>,
    framebuffers: FxHashSet<FramebufferHandle>,
    current_program: Option<ProgramHandle>,
    current_framebuffer: Option<FramebufferHandle>,
    texture_units: FxHashMap<u32, TextureHandle>,
    hidden_uniforms: FxHashSet<String>,
    uniform_names: RefCell<FxHashMap<i32, String>>,
    calls: Vec<MockCall>,
}

impl MockGraphicsContext {
    /// Create a context with id 1 and 4 color attachments
    pub fn new() -> Self {
        Self::with_id(ContextId(1))
    }

    /// Create a context with a specific identity
    pub fn with_id(id: ContextId) -> Self {
        let white_texture = TextureHandle(1);
        let mut textures = FxHashMap::default();
        textures.insert(white_texture, TextureDesc { width: 1, height: 1, format: TextureFormat::Rgba8 });
        Self {
            id,
            next_handle: 2,
            white_texture,
            max_color_attachments: 4,
            programs: FxHashMap::default(),
            textures,
            geometries: FxHashSet::default(),
            framebuffers: FxHashSet::default(),
            current_program: None,
            current_framebuffer: None,
            texture_units: FxHashMap::default(),
            hidden_uniforms: FxHashSet::default(),
            uniform_names: RefCell::new(FxHashMap::default()),
            calls: Vec::new(),
        }
    }

    // ===== CONFIGURATION =====

    /// Report `name` as absent from every program
    pub fn hide_uniform(&mut self, name: &str) {
        self.hidden_uniforms.insert(name.to_string());
    }

    pub fn set_max_color_attachments(&mut self, count: u32) {
        self.max_color_attachments = count;
    }

    // ===== INSPECTION =====

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of successful compile_program calls
    pub fn compile_count(&self) -> usize {
        self.calls.iter()
            .filter(|c| matches!(c, MockCall::CompileProgram { .. }))
            .count()
    }

    /// Number of create_geometry calls
    pub fn geometry_upload_count(&self) -> usize {
        self.calls.iter()
            .filter(|c| matches!(c, MockCall::CreateGeometry { .. }))
            .count()
    }

    pub fn live_program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn live_geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn program(&self, program: ProgramHandle) -> Option<&MockProgram> {
        self.programs.get(&program)
    }

    /// All recorded draw calls, in submission order
    pub fn draw_calls(&self) -> Vec<&MockCall> {
        self.calls.iter()
            .filter(|c| matches!(c, MockCall::Draw { .. }))
            .collect()
    }

    /// Every value uploaded to uniform `name`, in order
    pub fn uniform_uploads(&self, name: &str) -> Vec<UniformValue> {
        self.calls.iter()
            .filter_map(|c| match c {
                MockCall::SetUniform { name: n, value, .. } if n == name => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniform_uploads(name).pop()
    }

    /// Texture currently bound to `unit`
    pub fn bound_texture(&self, unit: u32) -> Option<TextureHandle> {
        self.texture_units.get(&unit).copied()
    }

    pub fn current_program(&self) -> Option<ProgramHandle> {
        self.current_program
    }

    /// Bound framebuffer, `None` for the default one
    pub fn current_framebuffer(&self) -> Option<FramebufferHandle> {
        self.current_framebuffer
    }

    // ===== INTERNAL =====

    fn allocate(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn location_of(name: &str) -> UniformLocation {
        let mut hasher = FxHasher::default();
        name.hash(&mut hasher);
        UniformLocation((hasher.finish() & 0x3fff_ffff) as i32)
    }

    fn record_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let name = self.uniform_names.borrow()
            .get(&location.0)
            .cloned()
            .unwrap_or_else(|| format!("#{}", location.0));
        self.calls.push(MockCall::SetUniform {
            program: self.current_program,
            name,
            value,
        });
    }
}

impl Default for MockGraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext for MockGraphicsContext {
    fn context_id(&self) -> ContextId {
        self.id
    }

    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle> {
        for (stage, source) in [("vertex", desc.vertex_source), ("fragment", desc.fragment_source)] {
            if source.contains("#error") {
                return Err(Error::ShaderCompilation(format!(
                    "{} stage of '{}': #error directive", stage, desc.name
                )));
            }
        }
        let program = ProgramHandle(self.allocate());
        self.programs.insert(program, MockProgram {
            name: desc.name.to_string(),
            vertex_source: desc.vertex_source.to_string(),
            fragment_source: desc.fragment_source.to_string(),
        });
        self.calls.push(MockCall::CompileProgram { program, name: desc.name.to_string() });
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.remove(&program);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
        self.calls.push(MockCall::DeleteProgram(program));
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.current_program = program;
        self.calls.push(MockCall::UseProgram(program));
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        if !self.programs.contains_key(&program) || self.hidden_uniforms.contains(name) {
            return None;
        }
        let location = Self::location_of(name);
        self.uniform_names.borrow_mut().insert(location.0, name.to_string());
        Some(location)
    }

    fn set_uniform_int(&mut self, location: UniformLocation, value: i32) {
        self.record_uniform(location, UniformValue::Int(value));
    }

    fn set_uniform_vec2(&mut self, location: UniformLocation, value: Vec2) {
        self.record_uniform(location, UniformValue::Vec2(value));
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3) {
        self.record_uniform(location, UniformValue::Vec3(value));
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4) {
        self.record_uniform(location, UniformValue::Vec4(value));
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4) {
        self.record_uniform(location, UniformValue::Mat4(*value));
    }

    fn set_uniform_mat4_array(&mut self, location: UniformLocation, values: &[Mat4]) {
        self.record_uniform(location, UniformValue::Mat4Array(values.to_vec()));
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidResource(format!(
                "texture size {}x{} must be non-zero", desc.width, desc.height
            )));
        }
        let texture = TextureHandle(self.allocate());
        self.textures.insert(texture, *desc);
        self.calls.push(MockCall::CreateTexture(texture));
        Ok(texture)
    }

    fn upload_texture_pixels(&mut self, texture: TextureHandle, pixels: &[u8]) -> Result<()> {
        let desc = self.textures.get(&texture)
            .ok_or_else(|| Error::BackendError(format!("unknown texture {:?}", texture)))?;
        let expected = desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(Error::InvalidResource(format!(
                "expected {} bytes of pixel data, got {}", expected, pixels.len()
            )));
        }
        self.calls.push(MockCall::UploadTexturePixels { texture, bytes: pixels.len() });
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        match texture {
            Some(t) => self.texture_units.insert(unit, t),
            None => self.texture_units.remove(&unit),
        };
        self.calls.push(MockCall::BindTexture { unit, texture });
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture);
        self.texture_units.retain(|_, bound| *bound != texture);
        self.calls.push(MockCall::DeleteTexture(texture));
    }

    fn white_texture(&self) -> TextureHandle {
        self.white_texture
    }

    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<GeometryHandle> {
        let geometry = GeometryHandle(self.allocate());
        self.geometries.insert(geometry);
        self.calls.push(MockCall::CreateGeometry { geometry, name: desc.name.to_string() });
        Ok(geometry)
    }

    fn delete_geometry(&mut self, geometry: GeometryHandle) {
        self.geometries.remove(&geometry);
        self.calls.push(MockCall::DeleteGeometry(geometry));
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferTargets> {
        if desc.color_attachments.len() as u32 > self.max_color_attachments {
            return Err(Error::BackendError(format!(
                "{} color attachments requested, {} supported",
                desc.color_attachments.len(), self.max_color_attachments
            )));
        }
        let mut color_attachments = Vec::with_capacity(desc.color_attachments.len());
        for format in &desc.color_attachments {
            color_attachments.push(self.create_texture(&TextureDesc {
                width: desc.width,
                height: desc.height,
                format: *format,
            })?);
        }
        let framebuffer = FramebufferHandle(self.allocate());
        self.framebuffers.insert(framebuffer);
        self.calls.push(MockCall::CreateFramebuffer(framebuffer));
        Ok(FramebufferTargets { framebuffer, color_attachments })
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.current_framebuffer = framebuffer;
        self.calls.push(MockCall::BindFramebuffer(framebuffer));
    }

    fn delete_framebuffer(&mut self, targets: &FramebufferTargets) {
        for texture in &targets.color_attachments {
            self.delete_texture(*texture);
        }
        self.framebuffers.remove(&targets.framebuffer);
        if self.current_framebuffer == Some(targets.framebuffer) {
            self.current_framebuffer = None;
        }
        self.calls.push(MockCall::DeleteFramebuffer(targets.framebuffer));
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.calls.push(MockCall::SetViewport(viewport));
    }

    fn clear(&mut self, color: Vec4) {
        self.calls.push(MockCall::Clear(color));
    }

    fn draw(&mut self, geometry: GeometryHandle, mode: DrawMode) -> Result<()> {
        let program = self.current_program
            .ok_or_else(|| Error::BackendError("draw without a program in use".to_string()))?;
        if !self.geometries.contains(&geometry) {
            return Err(Error::BackendError(format!("unknown geometry {:?}", geometry)));
        }
        self.calls.push(MockCall::Draw {
            geometry,
            mode,
            program,
            framebuffer: self.current_framebuffer,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_context_tests.rs"]
mod tests;
