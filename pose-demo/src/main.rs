use {
    color_eyre::Report,
    eyre::WrapErr as _,
    hecs::{Entity, World},
    nalgebra as na,
    pose_extract::{
        scene::{Joint, Parent, RigidBody, SceneBodies},
        Pose, PoseSettings, RigidBodyPoseExtractor, Velocity,
    },
    std::{f32::consts::PI, path::PathBuf},
    tracing_subscriber::{
        layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
    },
};

const STEPS: usize = 8;
const DT: f32 = 1.0 / 30.0;
const WALK_SPEED: f32 = 1.2;

/// Limb of the ragdoll attached to an earlier limb.
struct Limb {
    name: &'static str,
    parent: Option<usize>,
    offset: na::Vector3<f32>,
    swing: f32,
    phase: f32,
}

fn limbs() -> Vec<Limb> {
    let limb = |name, parent, offset: [f32; 3], swing, phase| Limb {
        name,
        parent,
        offset: na::Vector3::new(offset[0], offset[1], offset[2]),
        swing,
        phase,
    };

    vec![
        limb("pelvis", None, [0.0, 1.0, 0.0], 0.0, 0.0),
        limb("torso", Some(0), [0.0, 0.3, 0.0], 0.1, 0.0),
        limb("head", Some(1), [0.0, 0.4, 0.0], 0.05, 0.5),
        limb("left thigh", Some(0), [-0.15, -0.1, 0.0], 0.6, 0.0),
        limb("left shin", Some(3), [0.0, -0.45, 0.0], 0.4, 1.0),
        limb("right thigh", Some(0), [0.15, -0.1, 0.0], 0.6, PI),
        limb("right shin", Some(5), [0.0, -0.45, 0.0], 0.4, PI + 1.0),
    ]
}

/// Absolute poses of all limbs at `time`.
fn walk(limbs: &[Limb], time: f32) -> Vec<Pose> {
    let mut poses: Vec<Pose> = Vec::with_capacity(limbs.len());
    for limb in limbs {
        let angle = limb.swing * (time * 6.0 + limb.phase).sin();
        let local = Pose::from_parts(
            na::Translation3::from(limb.offset),
            na::UnitQuaternion::from_axis_angle(&na::Vector3::x_axis(), angle),
        );
        let pose = match limb.parent {
            Some(parent) => poses[parent] * local,
            None => Pose::translation(0.0, 0.0, time * WALK_SPEED) * local,
        };
        poses.push(pose);
    }
    poses
}

fn spawn_ragdoll(world: &mut World, limbs: &[Limb]) -> Vec<Entity> {
    let poses = walk(limbs, 0.0);
    let mut entities: Vec<Entity> = Vec::with_capacity(limbs.len());

    for (limb, pose) in limbs.iter().zip(poses) {
        let body = RigidBody::at_rest(pose);
        let entity = match limb.parent {
            Some(parent) => {
                let parent = entities[parent];
                world.spawn((body, Parent(parent), Joint { connected: parent }))
            }
            None => world.spawn((body,)),
        };
        entities.push(entity);
    }

    entities
}

fn step(world: &mut World, limbs: &[Limb], entities: &[Entity], time: f32) {
    let current = walk(limbs, time);
    let next = walk(limbs, time + DT);

    for ((&entity, pose), next) in entities.iter().zip(current).zip(next) {
        let velocity: Velocity =
            (next.translation.vector - pose.translation.vector) / DT;

        if let Ok(mut body) = world.get_mut::<RigidBody>(entity) {
            body.iso = pose;
            body.linear_velocity = velocity;
        }
    }
}

fn load_settings() -> Result<PoseSettings, Report> {
    match std::env::var("POSE_DEMO_CONFIG_PATH") {
        Ok(path) => {
            let path = PathBuf::from(path);
            PoseSettings::load(&path).wrap_err_with(|| {
                format!("Failed to load settings from `{}`", path.display())
            })
        }
        Err(_) => {
            let path = PathBuf::from("./pose.ron");
            if path.exists() {
                Ok(PoseSettings::load(&path)?)
            } else {
                tracing::info!("No settings file found, using defaults");
                Ok(PoseSettings::default())
            }
        }
    }
}

fn install_tracing() -> Result<(), Report> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_error::ErrorLayer::default())
        .init();

    Ok(())
}

fn main() -> Result<(), Report> {
    install_tracing()?;
    color_eyre::install()?;

    let settings = load_settings()?;
    tracing::info!("Pose settings: {:?}", settings);

    let limbs = limbs();
    let mut world = World::new();
    let entities = spawn_ragdoll(&mut world, &limbs);

    let mut extractor = RigidBodyPoseExtractor::from_graph(
        &SceneBodies::new(&world),
        entities.first().copied(),
    );
    if extractor.is_empty() {
        eyre::bail!("Failed to build ragdoll hierarchy");
    }

    // Head is tracked but not reported.
    extractor.set_body_enabled(entities[2], false);

    for index in 0..STEPS {
        let time = index as f32 * DT;
        step(&mut world, &limbs, &entities, time);
        extractor.update(&SceneBodies::new(&world), &settings);

        let poses = extractor.extractor();
        let names = extractor
            .bodies()
            .iter()
            .enumerate()
            .filter(|&(i, _)| poses.is_pose_enabled(i))
            .map(|(_, body)| {
                let limb = entities.iter().position(|e| e == body);
                limb.map_or("?", |limb| limbs[limb].name)
            });

        if settings.uses_model_space() {
            for (name, (pose, velocity)) in names.clone().zip(
                poses
                    .enabled_model_space_poses()
                    .zip(poses.enabled_model_space_velocities()),
            ) {
                tracing::info!(
                    "t={:.3} model {}: {} {}",
                    time,
                    name,
                    pose,
                    velocity.transpose()
                );
            }
        }

        if settings.uses_local_space() {
            for (name, (pose, velocity)) in names.zip(
                poses
                    .enabled_local_space_poses()
                    .zip(poses.enabled_local_space_velocities()),
            ) {
                tracing::info!(
                    "t={:.3} local {}: {} {}",
                    time,
                    name,
                    pose,
                    velocity.transpose()
                );
            }
        }
    }

    Ok(())
}
