//! Skeletal animation
//!
//! Keyframe tracks, the bone hierarchy that turns poses into skinning
//! matrices, and the animator that feeds them to skinned drawables.

mod animation;
mod animator;
mod armature;

pub use animation::{Animation, BonePose, Keyframe};
pub use animator::ArmatureAnimator;
pub use armature::{Armature, Bone};
