use crate::{
    pose::{relative_pose, relative_velocity, Pose, Velocity},
    settings::PoseSettings,
};

/// Supplies absolute poses and velocities of hierarchy nodes.
pub trait PoseSource {
    /// Pose of the node in the global frame.
    fn pose_at(&self, index: usize) -> Pose;

    /// Linear velocity of the node in the global frame.
    fn linear_velocity_at(&self, index: usize) -> Velocity;
}

/// Tree of nodes with poses and velocities in model and local space.
///
/// Model space is the frame of the root node.
/// Local space of a node is the frame of its parent.
///
/// Node structure is fixed once parent indices are set.
/// Derived values are overwritten on every update.
#[derive(Clone, Debug, Default)]
pub struct PoseExtractor {
    parent_indices: Box<[Option<usize>]>,
    enabled: Box<[bool]>,
    model_space_poses: Box<[Pose]>,
    local_space_poses: Box<[Pose]>,
    model_space_velocities: Box<[Velocity]>,
    local_space_velocities: Box<[Velocity]>,
}

impl PoseExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records tree structure and resets derived values.
    ///
    /// Exactly one entry must be `None`.
    /// Other entries must refer to other nodes without forming cycles.
    /// Use [`validate_parent_indices`] when this is not guaranteed by
    /// construction.
    ///
    /// [`validate_parent_indices`]: crate::validate_parent_indices
    pub fn set_parent_indices(
        &mut self,
        parent_indices: Box<[Option<usize>]>,
    ) {
        let count = parent_indices.len();
        debug_assert!(
            parent_indices
                .iter()
                .enumerate()
                .all(|(index, parent)| match *parent {
                    Some(parent) => parent < count && parent != index,
                    None => true,
                }),
            "Parent indices must refer to other nodes"
        );
        debug_assert_eq!(
            parent_indices.iter().filter(|p| p.is_none()).count(),
            1.min(count),
            "Hierarchy must have exactly one root"
        );

        self.parent_indices = parent_indices;
        self.enabled = vec![true; count].into_boxed_slice();
        self.model_space_poses =
            vec![Pose::identity(); count].into_boxed_slice();
        self.local_space_poses =
            vec![Pose::identity(); count].into_boxed_slice();
        self.model_space_velocities =
            vec![Velocity::zeros(); count].into_boxed_slice();
        self.local_space_velocities =
            vec![Velocity::zeros(); count].into_boxed_slice();
    }

    pub fn num_poses(&self) -> usize {
        self.parent_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_indices.is_empty()
    }

    /// Parent of the node or `None` for the root.
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.check_index(index);
        self.parent_indices[index]
    }

    pub fn parent_indices(&self) -> &[Option<usize>] {
        &self.parent_indices
    }

    /// Index of the root node.
    pub fn root_index(&self) -> Option<usize> {
        self.parent_indices.iter().position(Option::is_none)
    }

    pub fn set_pose_enabled(&mut self, index: usize, enabled: bool) {
        self.check_index(index);
        self.enabled[index] = enabled;
    }

    pub fn is_pose_enabled(&self, index: usize) -> bool {
        self.check_index(index);
        self.enabled[index]
    }

    pub fn num_enabled_poses(&self) -> usize {
        self.enabled.iter().filter(|&&enabled| enabled).count()
    }

    /// Recomputes poses and velocities relative to the root node.
    pub fn update_model_space_poses(&mut self, source: &impl PoseSource) {
        let root = match self.root_index() {
            Some(root) => root,
            None => return,
        };

        let root_pose = source.pose_at(root);
        let root_velocity = source.linear_velocity_at(root);

        for index in 0..self.num_poses() {
            if index == root {
                self.model_space_poses[index] = Pose::identity();
                self.model_space_velocities[index] = Velocity::zeros();
                continue;
            }

            let pose = source.pose_at(index);
            let velocity = source.linear_velocity_at(index);
            self.model_space_poses[index] = relative_pose(&root_pose, &pose);
            self.model_space_velocities[index] =
                relative_velocity(&root_pose, &root_velocity, &velocity);
        }

        tracing::trace!("Updated {} model space poses", self.num_poses());
    }

    /// Recomputes poses and velocities relative to each node's parent.
    ///
    /// Root node keeps its absolute pose and gets zero velocity.
    pub fn update_local_space_poses(&mut self, source: &impl PoseSource) {
        for index in 0..self.num_poses() {
            match self.parent_indices[index] {
                None => {
                    self.local_space_poses[index] = source.pose_at(index);
                    self.local_space_velocities[index] = Velocity::zeros();
                }
                Some(parent) => {
                    // Parents with several children are fetched repeatedly.
                    let parent_pose = source.pose_at(parent);
                    let parent_velocity = source.linear_velocity_at(parent);
                    let pose = source.pose_at(index);
                    let velocity = source.linear_velocity_at(index);

                    self.local_space_poses[index] =
                        relative_pose(&parent_pose, &pose);
                    self.local_space_velocities[index] = relative_velocity(
                        &parent_pose,
                        &parent_velocity,
                        &velocity,
                    );
                }
            }
        }

        tracing::trace!("Updated {} local space poses", self.num_poses());
    }

    /// Runs the update passes required by `settings`.
    pub fn update(
        &mut self,
        source: &impl PoseSource,
        settings: &PoseSettings,
    ) {
        if settings.uses_model_space() {
            self.update_model_space_poses(source);
        }
        if settings.uses_local_space() {
            self.update_local_space_poses(source);
        }
    }

    pub fn model_space_pose(&self, index: usize) -> &Pose {
        self.check_index(index);
        &self.model_space_poses[index]
    }

    pub fn local_space_pose(&self, index: usize) -> &Pose {
        self.check_index(index);
        &self.local_space_poses[index]
    }

    pub fn model_space_velocity(&self, index: usize) -> &Velocity {
        self.check_index(index);
        &self.model_space_velocities[index]
    }

    pub fn local_space_velocity(&self, index: usize) -> &Velocity {
        self.check_index(index);
        &self.local_space_velocities[index]
    }

    pub fn model_space_poses(&self) -> &[Pose] {
        &self.model_space_poses
    }

    pub fn local_space_poses(&self) -> &[Pose] {
        &self.local_space_poses
    }

    pub fn model_space_velocities(&self) -> &[Velocity] {
        &self.model_space_velocities
    }

    pub fn local_space_velocities(&self) -> &[Velocity] {
        &self.local_space_velocities
    }

    pub fn enabled_model_space_poses(
        &self,
    ) -> impl Iterator<Item = &Pose> + '_ {
        self.enabled_only(&self.model_space_poses)
    }

    pub fn enabled_local_space_poses(
        &self,
    ) -> impl Iterator<Item = &Pose> + '_ {
        self.enabled_only(&self.local_space_poses)
    }

    pub fn enabled_model_space_velocities(
        &self,
    ) -> impl Iterator<Item = &Velocity> + '_ {
        self.enabled_only(&self.model_space_velocities)
    }

    pub fn enabled_local_space_velocities(
        &self,
    ) -> impl Iterator<Item = &Velocity> + '_ {
        self.enabled_only(&self.local_space_velocities)
    }

    fn enabled_only<'a, T>(
        &'a self,
        values: &'a [T],
    ) -> impl Iterator<Item = &'a T> + 'a {
        values
            .iter()
            .zip(self.enabled.iter())
            .filter(|(_, &enabled)| enabled)
            .map(|(value, _)| value)
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.num_poses(),
            "Pose index {} is out of bounds for hierarchy of {} nodes",
            index,
            self.num_poses()
        );
    }
}
