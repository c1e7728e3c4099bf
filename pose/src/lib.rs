//! Tracks tree of rigid bodies connected by joints and extracts their poses
//! and linear velocities relative to the root body or to parent bodies.
//!
//! Hierarchy is discovered once from joint connectivity.
//! Absolute body state is pulled from physics layer on every update.

mod error;
mod extractor;
mod hierarchy;
mod pose;
mod rigid_body;
mod settings;

pub mod scene;

pub use self::{
    error::{HierarchyError, SettingsError},
    extractor::{PoseExtractor, PoseSource},
    hierarchy::validate_parent_indices,
    pose::{relative_pose, relative_velocity, Pose, Velocity},
    rigid_body::{BodyGraph, JointLink, RigidBodies, RigidBodyPoseExtractor},
    settings::{PoseSettings, SpaceSettings},
};
