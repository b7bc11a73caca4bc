//! Unit tests for Armature evaluation

use glam::{Mat4, Quat, Vec3, Vec4};
use crate::error::Error;
use super::*;

fn assert_mat4_near(actual: Mat4, expected: Mat4) {
    assert!(actual.abs_diff_eq(expected, 1e-5), "{:?} != {:?}", actual, expected);
}

/// Root at the origin with a child one unit up
fn two_bone_chain() -> Armature {
    Armature::new(vec![
        Bone::new("root", None, BonePose::IDENTITY),
        Bone::new("tip", Some(0), BonePose::new(Vec3::Y, Quat::IDENTITY, Vec3::ONE)),
    ]).unwrap()
}

#[test]
fn test_parent_must_precede_child() {
    let result = Armature::new(vec![
        Bone::new("a", Some(1), BonePose::IDENTITY),
        Bone::new("b", None, BonePose::IDENTITY),
    ]);
    assert!(matches!(result, Err(Error::InvalidResource(_))));

    let self_parent = Armature::new(vec![Bone::new("a", Some(0), BonePose::IDENTITY)]);
    assert!(matches!(self_parent, Err(Error::InvalidResource(_))));
}

#[test]
fn test_inverse_rest_pose() {
    let armature = two_bone_chain();
    assert_eq!(armature.bone_count(), 2);
    assert_eq!(armature.bone_index("tip"), Some(1));
    assert_mat4_near(armature.inverse_rest_pose()[1], Mat4::from_translation(-Vec3::Y));
}

#[test]
fn test_rest_pose_evaluates_to_identity() {
    let armature = two_bone_chain();
    let poses: Vec<BonePose> = armature.bones().iter().map(|b| b.rest).collect();

    let matrices = armature.evaluate(&poses).unwrap();

    assert_eq!(matrices.len(), 4);
    for (actual, expected) in matrices.iter().zip(armature.rest_matrices()) {
        assert_mat4_near(*actual, expected);
    }
}

#[test]
fn test_parent_rotation_moves_child() {
    let armature = two_bone_chain();
    let quarter_turn = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    let poses = [
        BonePose::new(Vec3::ZERO, quarter_turn, Vec3::ONE),
        BonePose::new(Vec3::Y, Quat::IDENTITY, Vec3::ONE),
    ];

    let matrices = armature.evaluate(&poses).unwrap();

    // a vertex at the tip's rest position follows the rotated root
    let tip_skin = matrices[2];
    let moved = tip_skin * Vec4::new(0.0, 1.0, 0.0, 1.0);
    assert!(moved.truncate().abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-5));
    // second matrix of each pair is the normal matrix
    assert_mat4_near(matrices[3], tip_skin.inverse().transpose());
}

#[test]
fn test_bone_matrices_from_keyframe() {
    let armature = two_bone_chain();
    let mut keyframe = Keyframe::new();
    keyframe.add_bone_information(Vec3::X, Quat::IDENTITY, Vec3::ONE);
    keyframe.add_bone_information(Vec3::Y, Quat::IDENTITY, Vec3::ONE);

    let matrices = armature.bone_matrices(&keyframe).unwrap();

    assert_mat4_near(matrices[0], Mat4::from_translation(Vec3::X));
    assert_mat4_near(matrices[2], Mat4::from_translation(Vec3::X));
}

#[test]
fn test_wrong_pose_count_fails() {
    let armature = two_bone_chain();
    assert!(matches!(armature.evaluate(&[BonePose::IDENTITY]), Err(Error::InvalidResource(_))));
}
