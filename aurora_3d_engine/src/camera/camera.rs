/// Camera - passive data container consumed by render strategies.
///
/// The camera computes nothing beyond the combined view-projection. The
/// caller derives view and projection from its own controller (orbiting,
/// first person, ...) and sets them here.

use glam::Mat4;
use crate::graphics_context::Viewport;

/// View, projection and target viewport of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    viewport: Viewport,
}

impl Camera {
    pub fn new(view: Mat4, projection: Mat4, viewport: Viewport) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
            viewport,
        }
    }

    // ===== GETTERS =====

    /// View matrix; traversal starts from it, so drawables receive model-view transforms
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Width over height, 1.0 for an empty viewport
    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.height == 0 {
            1.0
        } else {
            self.viewport.width as f32 / self.viewport.height as f32
        }
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
