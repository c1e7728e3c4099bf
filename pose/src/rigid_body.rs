use {
    crate::{
        error::HierarchyError,
        extractor::{PoseExtractor, PoseSource},
        hierarchy::validate_parent_indices,
        pose::{Pose, Velocity},
        settings::PoseSettings,
    },
    ahash::AHashMap,
    std::hash::Hash,
};

/// Physics layer that owns rigid bodies.
pub trait RigidBodies {
    type Handle: Copy + Eq + Hash;

    /// Current pose of the body in the global frame.
    fn pose(&self, body: Self::Handle) -> Pose;

    /// Current linear velocity of the body in the global frame.
    fn linear_velocity(&self, body: Self::Handle) -> Velocity;
}

/// Enumerates bodies and joints below a root body.
pub trait BodyGraph: RigidBodies {
    /// All bodies of the subtree.
    /// Order must be deterministic with the root body first.
    fn bodies_in_subtree(&self, root: Self::Handle) -> Vec<Self::Handle>;

    /// All joints attached to bodies of the subtree.
    fn joints_in_subtree(
        &self,
        root: Self::Handle,
    ) -> Vec<JointLink<Self::Handle>>;
}

/// Joint connecting `body` to its parent `connected` body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointLink<H> {
    pub connected: H,
    pub body: H,
}

/// Tracks hierarchy of rigid bodies connected by joints.
///
/// Hierarchy is built once from the root body.
/// If no valid hierarchy can be built, extractor stays empty and all
/// updates are no-ops.
#[derive(Clone, Debug)]
pub struct RigidBodyPoseExtractor<H> {
    bodies: Box<[H]>,
    body_to_index: AHashMap<H, usize>,
    extractor: PoseExtractor,
}

impl<H> Default for RigidBodyPoseExtractor<H>
where
    H: Copy + Eq + Hash,
{
    fn default() -> Self {
        RigidBodyPoseExtractor {
            bodies: Box::new([]),
            body_to_index: AHashMap::new(),
            extractor: PoseExtractor::new(),
        }
    }
}

impl<H> RigidBodyPoseExtractor<H>
where
    H: Copy + Eq + Hash + std::fmt::Debug,
{
    /// Builds hierarchy from enumerated bodies and joints.
    ///
    /// `bodies` must start with `root`.
    /// Each joint makes its `connected` body parent of its `body`.
    ///
    /// Malformed input is reported with a warning and yields an empty
    /// extractor.
    pub fn new(
        root: Option<H>,
        bodies: &[H],
        joints: &[JointLink<H>],
    ) -> Self {
        match Self::try_new(root, bodies, joints) {
            Ok(extractor) => extractor,
            Err(err) => {
                tracing::warn!(
                    "Failed to build rigid body hierarchy for {:?}: {}",
                    root,
                    err
                );
                Self::default()
            }
        }
    }

    /// Builds hierarchy from enumerated bodies and joints.
    ///
    /// Missing root yields an empty extractor.
    pub fn try_new(
        root: Option<H>,
        bodies: &[H],
        joints: &[JointLink<H>],
    ) -> Result<Self, HierarchyError> {
        let root = match root {
            Some(root) => root,
            None => return Ok(Self::default()),
        };

        if bodies.first() != Some(&root) {
            return Err(HierarchyError::RootNotFirst);
        }

        let mut body_to_index = AHashMap::with_capacity(bodies.len());
        for (index, &body) in bodies.iter().enumerate() {
            if let Some(first) = body_to_index.insert(body, index) {
                return Err(HierarchyError::DuplicateBody {
                    first,
                    second: index,
                });
            }
        }

        let mut parent_indices = vec![None; bodies.len()];
        for (joint, link) in joints.iter().enumerate() {
            let parent = body_to_index.get(&link.connected);
            let child = body_to_index.get(&link.body);

            match (parent, child) {
                (Some(&parent), Some(&child)) => {
                    if parent_indices[child].is_some() {
                        return Err(HierarchyError::MultipleParents {
                            index: child,
                        });
                    }
                    parent_indices[child] = Some(parent)
                }
                _ => return Err(HierarchyError::UnknownBody { joint }),
            }
        }

        if validate_parent_indices(&parent_indices)? != 0 {
            return Err(HierarchyError::RootHasParent);
        }

        let mut extractor = PoseExtractor::new();
        extractor.set_parent_indices(parent_indices.into_boxed_slice());

        tracing::debug!(
            "Built hierarchy of {} rigid bodies rooted at {:?}",
            bodies.len(),
            root
        );

        Ok(RigidBodyPoseExtractor {
            bodies: bodies.into(),
            body_to_index,
            extractor,
        })
    }

    /// Builds hierarchy of all bodies reachable from `root` in `graph`.
    pub fn from_graph<G>(graph: &G, root: Option<H>) -> Self
    where
        G: BodyGraph<Handle = H>,
    {
        match root {
            None => Self::default(),
            Some(body) => Self::new(
                root,
                &graph.bodies_in_subtree(body),
                &graph.joints_in_subtree(body),
            ),
        }
    }

}

impl<H> RigidBodyPoseExtractor<H>
where
    H: Copy + Eq + Hash,
{
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[H] {
        &self.bodies
    }

    pub fn body_at(&self, index: usize) -> H {
        self.bodies[index]
    }

    pub fn body_index(&self, body: H) -> Option<usize> {
        self.body_to_index.get(&body).copied()
    }

    /// Includes or excludes the body from enabled pose iterators.
    ///
    /// Returns `false` if the body is not part of the hierarchy.
    pub fn set_body_enabled(&mut self, body: H, enabled: bool) -> bool {
        match self.body_index(body) {
            Some(index) => {
                self.extractor.set_pose_enabled(index, enabled);
                true
            }
            None => false,
        }
    }

    pub fn extractor(&self) -> &PoseExtractor {
        &self.extractor
    }

    pub fn update_model_space_poses<P>(&mut self, physics: &P)
    where
        P: RigidBodies<Handle = H>,
    {
        let source = BodySource {
            bodies: &self.bodies,
            physics,
        };
        self.extractor.update_model_space_poses(&source);
    }

    pub fn update_local_space_poses<P>(&mut self, physics: &P)
    where
        P: RigidBodies<Handle = H>,
    {
        let source = BodySource {
            bodies: &self.bodies,
            physics,
        };
        self.extractor.update_local_space_poses(&source);
    }

    pub fn update<P>(&mut self, physics: &P, settings: &PoseSettings)
    where
        P: RigidBodies<Handle = H>,
    {
        let source = BodySource {
            bodies: &self.bodies,
            physics,
        };
        self.extractor.update(&source, settings);
    }
}

/// Reads hierarchy nodes from physics by index.
struct BodySource<'a, P: RigidBodies> {
    bodies: &'a [P::Handle],
    physics: &'a P,
}

impl<P> PoseSource for BodySource<'_, P>
where
    P: RigidBodies,
{
    fn pose_at(&self, index: usize) -> Pose {
        self.physics.pose(self.bodies[index])
    }

    fn linear_velocity_at(&self, index: usize) -> Velocity {
        self.physics.linear_velocity(self.bodies[index])
    }
}
