//! Scene module
//!
//! Scene graph of groups, drawables and lights, and the per-frame draw
//! command queue traversal fills.

mod drawable;
mod draw_command;
mod light;
mod scene_graph;

pub use drawable::{Drawable, DrawableCapabilities, MeshData, SkinData};
pub use draw_command::{DrawCommand, DrawQueue, ExecutionOrder, QueueStats};
pub use light::Light;
pub use scene_graph::{DrawTarget, NodeKey, NodeKind, SceneGraph, SceneNode};
