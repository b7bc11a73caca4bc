/// Animation - named, fixed-rate sequence of full-skeleton keyframes.
///
/// Bone indexing is positional: the i-th `add_bone_information` call of a
/// keyframe describes bone i, and every keyframe of an animation describes
/// the same bones in the same order. No interpolation happens here; a
/// playback consumer samples keyframes at `timestamp(frame) = frame / fps`.

use glam::{Mat4, Quat, Vec3};
use crate::error::Result;
use crate::{engine_bail, engine_trace};

/// Local position, rotation and scale of one bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BonePose {
    pub const IDENTITY: BonePose = BonePose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    /// Bone-local matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for BonePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One timestamped pose of the whole skeleton, as index-aligned arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keyframe {
    positions: Vec<Vec3>,
    rotations: Vec<Quat>,
    scales: Vec<Vec3>,
}

impl Keyframe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the pose of the next bone
    pub fn add_bone_information(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.positions.push(position);
        self.rotations.push(rotation);
        self.scales.push(scale);
    }

    pub fn bone_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    pub fn scales(&self) -> &[Vec3] {
        &self.scales
    }

    pub fn bone_pose(&self, bone: usize) -> Option<BonePose> {
        Some(BonePose {
            position: *self.positions.get(bone)?,
            rotation: *self.rotations.get(bone)?,
            scale: *self.scales.get(bone)?,
        })
    }

    /// Poses of every bone, in bone order
    pub fn poses(&self) -> Vec<BonePose> {
        (0..self.bone_count())
            .filter_map(|bone| self.bone_pose(bone))
            .collect()
    }
}

/// Named keyframe track played at a fixed frame rate
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    name: String,
    fps: f32,
    /// Length in seconds
    duration: f32,
    keyframes: Vec<Keyframe>,
}

impl Animation {
    /// # Errors
    ///
    /// `InvalidResource` if `fps` is not a positive finite number or the
    /// duration is negative.
    pub fn new(name: impl Into<String>, fps: f32, duration: f32) -> Result<Self> {
        let name = name.into();
        if !fps.is_finite() || fps <= 0.0 {
            engine_bail!(InvalidResource, "aurora3d::Animation",
                "'{}': frame rate must be positive, got {}", name, fps);
        }
        if !duration.is_finite() || duration < 0.0 {
            engine_bail!(InvalidResource, "aurora3d::Animation",
                "'{}': duration must be non-negative, got {}", name, duration);
        }
        Ok(Self {
            name,
            fps,
            duration,
            keyframes: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn frame_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Bones described by every keyframe (0 while empty)
    pub fn bone_count(&self) -> usize {
        self.keyframes.first().map_or(0, Keyframe::bone_count)
    }

    /// Append a keyframe
    ///
    /// # Errors
    ///
    /// `InvalidResource` if it describes a different number of bones than
    /// the keyframes already added.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> Result<()> {
        if let Some(first) = self.keyframes.first() {
            if first.bone_count() != keyframe.bone_count() {
                engine_bail!(InvalidResource, "aurora3d::Animation",
                    "'{}': keyframe {} has {} bones, expected {}",
                    self.name, self.keyframes.len(), keyframe.bone_count(), first.bone_count());
            }
        }
        self.keyframes.push(keyframe);
        engine_trace!("aurora3d::Animation", "'{}' now has {} keyframes", self.name, self.keyframes.len());
        Ok(())
    }

    pub fn keyframe(&self, frame: usize) -> Option<&Keyframe> {
        self.keyframes.get(frame)
    }

    /// Time in seconds at which `frame` is displayed
    pub fn timestamp(&self, frame: usize) -> f32 {
        frame as f32 / self.fps
    }

    /// Full bone pose array of `frame`
    pub fn pose_at(&self, frame: usize) -> Option<Vec<BonePose>> {
        self.keyframe(frame).map(Keyframe::poses)
    }
}

#[cfg(test)]
#[path = "animation_tests.rs"]
mod tests;
