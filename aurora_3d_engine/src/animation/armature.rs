/// Armature - bone hierarchy evaluated into skinning matrices.
///
/// Bones are stored parent-first: a bone's parent always has a smaller
/// index, so a single forward pass composes every world transform. The
/// output holds two matrices per bone, the skinning matrix followed by its
/// normal matrix, which is the layout `uBoneMatrices` expects.

use glam::Mat4;
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use super::animation::{BonePose, Keyframe};

/// One bone of an armature
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, `None` for roots
    pub parent: Option<usize>,
    /// Pose the mesh was bound in
    pub rest: BonePose,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<usize>, rest: BonePose) -> Self {
        Self {
            name: name.into(),
            parent,
            rest,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Armature {
    bones: Vec<Bone>,
    /// Inverse world transform of each bone in its rest pose
    inverse_rest: Vec<Mat4>,
}

impl Armature {
    /// Build an armature and precompute its inverse rest pose
    ///
    /// # Errors
    ///
    /// `InvalidResource` if a bone references a parent that does not come
    /// before it.
    pub fn new(bones: Vec<Bone>) -> Result<Self> {
        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= index {
                    engine_bail!(InvalidResource, "aurora3d::Armature",
                        "Bone {} ('{}') has parent {}, parents must precede their children",
                        index, bone.name, parent);
                }
            }
        }
        let rest_locals: Vec<Mat4> = bones.iter().map(|b| b.rest.to_matrix()).collect();
        let inverse_rest = Self::world_transforms(&bones, &rest_locals)
            .into_iter()
            .map(|world| world.inverse())
            .collect();
        engine_debug!("aurora3d::Armature", "Built armature with {} bones", bones.len());
        Ok(Self { bones, inverse_rest })
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn inverse_rest_pose(&self) -> &[Mat4] {
        &self.inverse_rest
    }

    fn world_transforms(bones: &[Bone], locals: &[Mat4]) -> Vec<Mat4> {
        let mut world: Vec<Mat4> = Vec::with_capacity(locals.len());
        for (bone, local) in bones.iter().zip(locals) {
            let parent = bone.parent.map_or(Mat4::IDENTITY, |p| world[p]);
            world.push(parent * *local);
        }
        world
    }

    /// Skinning and normal matrices for a set of bone poses
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the pose count differs from the bone count.
    pub fn evaluate(&self, poses: &[BonePose]) -> Result<Vec<Mat4>> {
        if poses.len() != self.bones.len() {
            engine_bail!(InvalidResource, "aurora3d::Armature",
                "{} bone poses for an armature of {} bones", poses.len(), self.bones.len());
        }
        let locals: Vec<Mat4> = poses.iter().map(BonePose::to_matrix).collect();
        let world = Self::world_transforms(&self.bones, &locals);

        let mut matrices = Vec::with_capacity(self.bones.len() * 2);
        for (world, inverse_rest) in world.iter().zip(&self.inverse_rest) {
            let skin = *world * *inverse_rest;
            matrices.push(skin);
            matrices.push(skin.inverse().transpose());
        }
        Ok(matrices)
    }

    /// `evaluate` applied to the poses of a keyframe
    pub fn bone_matrices(&self, keyframe: &Keyframe) -> Result<Vec<Mat4>> {
        self.evaluate(&keyframe.poses())
    }

    /// Matrices of the rest pose (identity skinning)
    pub fn rest_matrices(&self) -> Vec<Mat4> {
        vec![Mat4::IDENTITY; self.bones.len() * 2]
    }
}

#[cfg(test)]
#[path = "armature_tests.rs"]
mod tests;
