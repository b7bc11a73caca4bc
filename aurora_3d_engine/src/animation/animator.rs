/// ArmatureAnimator - steps an animation one keyframe per update and feeds
/// the resulting bone matrices to a skinned drawable of the scene graph.
///
/// Playback follows the first animation added. Each update advances exactly
/// one keyframe, wrapping at the end; elapsed time does not drive the frame
/// index and no interpolation is done.

use crate::error::Result;
use crate::scene::{NodeKey, SceneGraph};
use crate::{engine_bail, engine_err, engine_trace};
use super::animation::Animation;
use super::armature::Armature;

#[derive(Debug)]
pub struct ArmatureAnimator {
    armature: Armature,
    animations: Vec<Animation>,
    target: Option<NodeKey>,
    /// Keyframe shown by the last update
    last_frame: Option<usize>,
}

impl ArmatureAnimator {
    pub fn new(armature: Armature) -> Self {
        Self {
            armature,
            animations: Vec::new(),
            target: None,
            last_frame: None,
        }
    }

    pub fn armature(&self) -> &Armature {
        &self.armature
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    /// # Errors
    ///
    /// `InvalidResource` if the animation describes a different number of
    /// bones than the armature.
    pub fn add_animation(&mut self, animation: Animation) -> Result<()> {
        if animation.frame_count() > 0 && animation.bone_count() != self.armature.bone_count() {
            engine_bail!(InvalidResource, "aurora3d::ArmatureAnimator",
                "Animation '{}' animates {} bones, armature has {}",
                animation.name(), animation.bone_count(), self.armature.bone_count());
        }
        self.animations.push(animation);
        Ok(())
    }

    /// Skinned drawable node receiving the bone matrices
    pub fn set_target(&mut self, target: NodeKey) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<NodeKey> {
        self.target
    }

    pub fn current_frame(&self) -> Option<usize> {
        self.last_frame
    }

    /// Restart from the first keyframe on the next update
    pub fn rewind(&mut self) {
        self.last_frame = None;
    }

    /// Advance one keyframe and upload its matrices to the target
    ///
    /// Returns the index of the keyframe now shown.
    ///
    /// # Errors
    ///
    /// `InvalidState` without a target, without animations or with an empty
    /// animation, plus whatever `SceneGraph::set_bone_matrices` reports.
    pub fn update(&mut self, graph: &mut SceneGraph) -> Result<usize> {
        let target = self.target
            .ok_or_else(|| engine_err!(InvalidState, "aurora3d::ArmatureAnimator",
                "update called without a target"))?;
        let animation = match self.animations.first() {
            Some(animation) if animation.frame_count() > 0 => animation,
            Some(animation) => engine_bail!(InvalidState, "aurora3d::ArmatureAnimator",
                "Animation '{}' has no keyframes", animation.name()),
            None => engine_bail!(InvalidState, "aurora3d::ArmatureAnimator",
                "update called without animations"),
        };

        let frame = self.last_frame.map_or(0, |f| (f + 1) % animation.frame_count());
        let keyframe = &animation.keyframes()[frame];
        let matrices = self.armature.bone_matrices(keyframe)?;
        graph.set_bone_matrices(target, &matrices)?;

        self.last_frame = Some(frame);
        engine_trace!("aurora3d::ArmatureAnimator", "'{}' frame {} (t = {:.3}s)",
            animation.name(), frame, animation.timestamp(frame));
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "animator_tests.rs"]
mod tests;
