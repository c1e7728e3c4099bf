use nalgebra as na;

/// Position and rotation of a body.
pub type Pose = na::Isometry3<f32>;

/// Linear velocity of a body.
pub type Velocity = na::Vector3<f32>;

/// Re-expresses `pose` in the frame of `reference`.
///
/// Both poses must be given in the same frame.
/// Composing `reference` with the result yields `pose` back.
pub fn relative_pose(reference: &Pose, pose: &Pose) -> Pose {
    reference.inverse() * pose
}

/// Difference of two velocities rotated into the frame of `reference`.
///
/// Translation of `reference` doesn't affect the result.
pub fn relative_velocity(
    reference: &Pose,
    reference_velocity: &Velocity,
    velocity: &Velocity,
) -> Velocity {
    reference
        .rotation
        .inverse_transform_vector(&(velocity - reference_velocity))
}
