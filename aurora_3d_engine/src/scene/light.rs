/// Point light placed in world space.
///
/// Lights are owned by the `SceneGraph` in slot order. Each frame a strategy
/// transforms them by the camera view and uploads one `uLightPosition<i>`
/// per slot.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    position: Vec3,
}

impl Light {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Position seen through `view`
    pub fn view_position(&self, view: &Mat4) -> Vec3 {
        view.transform_point3(self.position)
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
