use {
    crate::{
        pose::{Pose, Velocity},
        rigid_body::{BodyGraph, JointLink, RigidBodies},
    },
    ahash::AHashMap,
    hecs::{Entity, World},
    std::cmp::Reverse,
};

/// Physical state of a body in the global frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    pub iso: Pose,
    pub linear_velocity: Velocity,
}

impl RigidBody {
    pub fn at_rest(iso: Pose) -> Self {
        RigidBody {
            iso,
            linear_velocity: Velocity::zeros(),
        }
    }
}

/// Scene graph link to the parent entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Parent(pub Entity);

/// Attaches entity's body to the `connected` body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Joint {
    pub connected: Entity,
}

/// Rigid bodies stored in the `World`.
///
/// Subtree of an entity consists of the entity and all entities linked
/// to it by `Parent` components, transitively.
/// Entities are visited depth first, children in order of entity ids.
pub struct SceneBodies<'a> {
    world: &'a World,
}

impl<'a> SceneBodies<'a> {
    pub fn new(world: &'a World) -> Self {
        SceneBodies { world }
    }

    /// All entities of the subtree, parents before children.
    pub fn subtree(&self, root: Entity) -> Vec<Entity> {
        let mut children: AHashMap<Entity, Vec<Entity>> = AHashMap::new();
        for (entity, parent) in self.world.query::<&Parent>().iter() {
            children.entry(parent.0).or_default().push(entity);
        }

        let mut subtree = Vec::new();
        let mut stack = vec![root];

        while let Some(entity) = stack.pop() {
            subtree.push(entity);
            if let Some(children) = children.get_mut(&entity) {
                // Reversed so that lower ids are popped first.
                children.sort_unstable_by_key(|child| Reverse(child.id()));
                stack.extend(children.iter().copied());
            }
        }

        subtree
    }

    fn body(&self, entity: Entity) -> hecs::Ref<'a, RigidBody> {
        match self.world.get::<RigidBody>(entity) {
            Ok(body) => body,
            Err(err) => {
                panic!("Entity {:?} is not a rigid body: {}", entity, err)
            }
        }
    }
}

impl RigidBodies for SceneBodies<'_> {
    type Handle = Entity;

    fn pose(&self, body: Entity) -> Pose {
        self.body(body).iso
    }

    fn linear_velocity(&self, body: Entity) -> Velocity {
        self.body(body).linear_velocity
    }
}

impl BodyGraph for SceneBodies<'_> {
    fn bodies_in_subtree(&self, root: Entity) -> Vec<Entity> {
        self.subtree(root)
            .into_iter()
            .filter(|&entity| self.world.get::<RigidBody>(entity).is_ok())
            .collect()
    }

    fn joints_in_subtree(&self, root: Entity) -> Vec<JointLink<Entity>> {
        self.subtree(root)
            .into_iter()
            .filter_map(|entity| {
                let joint = self.world.get::<Joint>(entity).ok()?;
                Some(JointLink {
                    connected: joint.connected,
                    body: entity,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::rigid_body::RigidBodyPoseExtractor};

    #[test]
    fn subtree_is_depth_first() {
        let mut world = World::new();
        let root = world.spawn((RigidBody::at_rest(Pose::identity()),));
        let a = world.spawn((Parent(root),));
        let b = world.spawn((Parent(root),));
        let c = world.spawn((Parent(a),));
        let outside = world.spawn((RigidBody::at_rest(Pose::identity()),));

        let scene = SceneBodies::new(&world);
        assert_eq!(scene.subtree(root), vec![root, a, c, b]);
        assert_eq!(scene.subtree(a), vec![a, c]);
        assert_eq!(scene.subtree(outside), vec![outside]);
    }

    #[test]
    fn bodies_and_joints_skip_plain_entities() {
        let mut world = World::new();
        let root = world.spawn((RigidBody::at_rest(Pose::identity()),));
        let group = world.spawn((Parent(root),));
        let arm = world.spawn((
            Parent(group),
            RigidBody::at_rest(Pose::translation(1.0, 0.0, 0.0)),
            Joint { connected: root },
        ));

        let scene = SceneBodies::new(&world);
        assert_eq!(scene.bodies_in_subtree(root), vec![root, arm]);
        assert_eq!(
            scene.joints_in_subtree(root),
            vec![JointLink {
                connected: root,
                body: arm
            }]
        );

        let extractor = RigidBodyPoseExtractor::from_graph(&scene, Some(root));
        assert_eq!(extractor.extractor().parent_indices(), &[None, Some(0)]);
    }

    #[test]
    fn enumeration_from_child_body() {
        let mut world = World::new();
        let root = world.spawn((RigidBody::at_rest(Pose::identity()),));
        let arm = world.spawn((
            Parent(root),
            RigidBody::at_rest(Pose::identity()),
            Joint { connected: root },
        ));

        // Arm's joint refers to a body outside of its own subtree.
        let scene = SceneBodies::new(&world);
        let extractor = RigidBodyPoseExtractor::from_graph(&scene, Some(arm));
        assert!(extractor.is_empty());
    }

    #[test]
    #[should_panic(expected = "is not a rigid body")]
    fn reading_plain_entity_panics() {
        let mut world = World::new();
        let body = world.spawn((RigidBody::at_rest(Pose::identity()),));
        let entity = world.spawn((Parent(body),));
        SceneBodies::new(&world).pose(entity);
    }
}
