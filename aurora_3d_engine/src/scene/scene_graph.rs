/// SceneGraph - hierarchy of Group and Drawable nodes.
///
/// Nodes live in a SlotMap and are addressed by stable `NodeKey`s. A group
/// keeps its children in insertion order; that order is the traversal order
/// and is never changed for state sorting (strategies reorder the emitted
/// draw commands instead).

use glam::{Mat4, Vec3};
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::graphics_context::{DrawMode, GraphicsContext};
use crate::resource::MaterialLibrary;
use crate::shader::{ShaderVariant, ShaderVariantSet, MAX_LIGHTS};
use crate::{engine_bail, engine_debug, engine_err, engine_info};
use super::draw_command::{submit_drawable, DrawQueue};
use super::drawable::Drawable;
use super::light::Light;

new_key_type! {
    /// Stable key of a scene node
    pub struct NodeKey;
}

/// Group or Drawable payload of a node
#[derive(Debug)]
pub enum NodeKind {
    Group { children: Vec<NodeKey> },
    Drawable(Drawable),
}

/// One node of the graph
#[derive(Debug)]
pub struct SceneNode {
    name: String,
    local: Mat4,
    parent: Option<NodeKey>,
    kind: NodeKind,
}

impl SceneNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    /// Children in traversal order (empty for drawables)
    pub fn children(&self) -> &[NodeKey] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::Drawable(_) => &[],
        }
    }

    pub fn as_drawable(&self) -> Option<&Drawable> {
        match &self.kind {
            NodeKind::Drawable(drawable) => Some(drawable),
            NodeKind::Group { .. } => None,
        }
    }
}

/// Where traversal sends the drawables it reaches
pub enum DrawTarget<'a, 'f> {
    /// Draw each drawable right away with the program its variant selects
    Immediate {
        ctx: &'a mut dyn GraphicsContext,
        shaders: &'a ShaderVariantSet,
    },
    /// Record one DrawCommand per drawable
    Queue(&'a mut DrawQueue<'f>),
}

/// Scene hierarchy rooted at a single group
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
    lights: Vec<Light>,
}

impl SceneGraph {
    /// Create a graph holding only an identity root group
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode {
            name: "root".to_string(),
            local: Mat4::IDENTITY,
            parent: None,
            kind: NodeKind::Group { children: Vec::new() },
        });
        Self { nodes, root, lights: Vec::new() }
    }

    // ===== NODE CREATION =====

    /// Create a detached, empty group
    pub fn create_group(&mut self, name: impl Into<String>) -> NodeKey {
        self.nodes.insert(SceneNode {
            name: name.into(),
            local: Mat4::IDENTITY,
            parent: None,
            kind: NodeKind::Group { children: Vec::new() },
        })
    }

    /// Create a detached drawable node
    pub fn create_drawable(&mut self, drawable: Drawable) -> NodeKey {
        self.nodes.insert(SceneNode {
            name: drawable.name().to_string(),
            local: Mat4::IDENTITY,
            parent: None,
            kind: NodeKind::Drawable(drawable),
        })
    }

    // ===== ACCESS =====

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn drawable(&self, key: NodeKey) -> Option<&Drawable> {
        self.nodes.get(key).and_then(SceneNode::as_drawable)
    }

    pub fn drawable_mut(&mut self, key: NodeKey) -> Option<&mut Drawable> {
        match self.nodes.get_mut(key).map(|n| &mut n.kind) {
            Some(NodeKind::Drawable(drawable)) => Some(drawable),
            _ => None,
        }
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map(SceneNode::children).unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    fn node_or_err(&self, key: NodeKey) -> Result<&SceneNode> {
        self.nodes.get(key)
            .ok_or_else(|| engine_err!(InvalidState, "aurora3d::SceneGraph", "Unknown node {:?}", key))
    }

    // ===== TRANSFORMS =====

    pub fn local_transform(&self, key: NodeKey) -> Result<Mat4> {
        Ok(self.node_or_err(key)?.local)
    }

    pub fn set_local_transform(&mut self, key: NodeKey, local: Mat4) -> Result<()> {
        let node = self.nodes.get_mut(key)
            .ok_or_else(|| engine_err!(InvalidState, "aurora3d::SceneGraph", "Unknown node {:?}", key))?;
        node.local = local;
        Ok(())
    }

    /// Forward bone matrices to a skinned drawable
    pub fn set_bone_matrices(&mut self, key: NodeKey, matrices: &[Mat4]) -> Result<()> {
        match self.drawable_mut(key) {
            Some(drawable) => drawable.set_bone_matrices(matrices),
            None => Err(engine_err!(InvalidState, "aurora3d::SceneGraph",
                "Node {:?} is not a drawable", key)),
        }
    }

    // ===== LIGHTS =====

    /// Append a light and return its slot
    ///
    /// # Errors
    ///
    /// `InvalidState` when every light slot is taken.
    pub fn add_light(&mut self, light: Light) -> Result<usize> {
        if self.lights.len() >= MAX_LIGHTS {
            engine_bail!(InvalidState, "aurora3d::SceneGraph",
                "Scene already holds {} lights", MAX_LIGHTS);
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_mut(&mut self, slot: usize) -> Option<&mut Light> {
        self.lights.get_mut(slot)
    }

    /// Remove the light in `slot`; later lights move down one slot
    pub fn remove_light(&mut self, slot: usize) -> Option<Light> {
        (slot < self.lights.len()).then(|| self.lights.remove(slot))
    }

    /// Light positions in view space, in slot order
    pub fn view_space_lights(&self, view: &Mat4) -> Vec<Vec3> {
        self.lights.iter().map(|l| l.view_position(view)).collect()
    }

    // ===== HIERARCHY EDITS =====

    /// Append `child` to the ordered children of `parent`
    ///
    /// # Errors
    ///
    /// `InvalidState` if either key is unknown, `parent` is a drawable, `child`
    /// is the root or already has a parent, or the edit would create a cycle.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        let parent_node = self.node_or_err(parent)?;
        let child_node = self.node_or_err(child)?;
        if !parent_node.is_group() {
            engine_bail!(InvalidState, "aurora3d::SceneGraph",
                "'{}' is a drawable and cannot have children", parent_node.name);
        }
        if child == self.root {
            engine_bail!(InvalidState, "aurora3d::SceneGraph", "The root cannot be attached");
        }
        if let Some(current) = child_node.parent {
            engine_bail!(InvalidState, "aurora3d::SceneGraph",
                "'{}' is already a child of {:?}", child_node.name, current);
        }
        let mut ancestor = Some(parent);
        while let Some(key) = ancestor {
            if key == child {
                engine_bail!(InvalidState, "aurora3d::SceneGraph",
                    "Attaching '{}' under {:?} would create a cycle", child_node.name, parent);
            }
            ancestor = self.nodes.get(key).and_then(|n| n.parent);
        }

        if let Some(NodeKind::Group { children }) = self.nodes.get_mut(parent).map(|n| &mut n.kind) {
            children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove `child` from `parent`, keeping the order of the remaining siblings
    ///
    /// The child stays alive in the arena (detached) with its GPU geometry;
    /// releasing it is the job of `destroy`.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<NodeKey> {
        let parent_name = self.node_or_err(parent)?.name.clone();
        let removed = match self.nodes.get_mut(parent).map(|n| &mut n.kind) {
            Some(NodeKind::Group { children }) => match children.iter().position(|&c| c == child) {
                Some(index) => children.remove(index),
                None => engine_bail!(InvalidState, "aurora3d::SceneGraph",
                    "{:?} is not a child of '{}'", child, parent_name),
            },
            _ => engine_bail!(InvalidState, "aurora3d::SceneGraph",
                "'{}' is a drawable and has no children", parent_name),
        };
        if let Some(node) = self.nodes.get_mut(removed) {
            node.parent = None;
        }
        Ok(removed)
    }

    // ===== LIFECYCLE =====

    /// Upload geometry of every drawable under `node` to `ctx`
    ///
    /// Idempotent: drawables already bound to this context are skipped.
    /// Returns the number of drawables uploaded by this call.
    pub fn bind_to_context(&mut self, node: NodeKey, ctx: &mut dyn GraphicsContext) -> Result<usize> {
        self.node_or_err(node)?;
        let mut uploaded = 0;
        for key in self.subtree(node) {
            if let Some(drawable) = self.drawable_mut(key) {
                if drawable.bind_to_context(ctx)? {
                    uploaded += 1;
                }
            }
        }
        engine_debug!("aurora3d::SceneGraph", "bind_to_context uploaded {} drawables", uploaded);
        Ok(uploaded)
    }

    /// Detach `node`, release the GPU geometry of its subtree and remove it
    ///
    /// Returns the number of nodes removed. Keys of removed nodes become dead.
    pub fn destroy(&mut self, node: NodeKey, ctx: &mut dyn GraphicsContext) -> Result<usize> {
        if node == self.root {
            engine_bail!(InvalidState, "aurora3d::SceneGraph", "The root cannot be destroyed");
        }
        if let Some(parent) = self.node_or_err(node)?.parent {
            self.remove_child(parent, node)?;
        }
        let keys = self.subtree(node);
        for &key in &keys {
            if let Some(mut removed) = self.nodes.remove(key) {
                if let NodeKind::Drawable(drawable) = &mut removed.kind {
                    drawable.release(ctx);
                }
            }
        }
        engine_info!("aurora3d::SceneGraph", "Destroyed {} nodes", keys.len());
        Ok(keys.len())
    }

    // ===== TRAVERSAL =====

    /// Keys of `node` and its descendants, depth-first pre-order
    pub fn subtree(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        let mut stack = vec![node];
        while let Some(key) = stack.pop() {
            if let Some(n) = self.nodes.get(key) {
                keys.push(key);
                stack.extend(n.children().iter().rev());
            }
        }
        keys
    }

    /// Drawables under `node` in traversal order
    pub fn drawables_in_order(&self, node: NodeKey) -> Vec<NodeKey> {
        self.subtree(node)
            .into_iter()
            .filter(|&k| self.drawable(k).is_some())
            .collect()
    }

    /// Traverse from `node`, composing `parent_transform * local` on the way down
    ///
    /// Groups recurse over their children in stored order. Each drawable is
    /// either drawn immediately or recorded as a DrawCommand, depending on
    /// `target`.
    ///
    /// `DrawTarget::Immediate` makes the drawable's program current and
    /// uploads only per-drawable state. The caller must already have set
    /// `uPMatrix` and the light positions on both variants of `shaders`.
    pub fn draw<'f>(
        &self,
        node: NodeKey,
        parent_transform: &Mat4,
        materials: &'f MaterialLibrary,
        draw_mode: DrawMode,
        target: &mut DrawTarget<'_, 'f>,
    ) -> Result<()> {
        let scene_node = self.node_or_err(node)?;
        let effective = *parent_transform * scene_node.local;

        match &scene_node.kind {
            NodeKind::Group { children } => {
                for &child in children {
                    self.draw(child, &effective, materials, draw_mode, target)?;
                }
            }
            NodeKind::Drawable(drawable) => match target {
                DrawTarget::Immediate { ctx, shaders } => {
                    let program = shaders.select_for_drawable(drawable)?;
                    ctx.use_program(Some(program.handle()));
                    submit_drawable(&mut **ctx, program, drawable, materials, &effective, draw_mode)?;
                }
                DrawTarget::Queue(queue) => {
                    let variant = ShaderVariant::for_capabilities(drawable.capabilities());
                    queue.push(node, effective, materials, draw_mode, variant);
                }
            },
        }
        Ok(())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
