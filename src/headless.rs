use anyhow::{ensure, Result};
use glam::{DVec3, IVec3};
use rand::Rng;
use sightline_core::{scoped_rng, RegistryKey};
use sightline_physics::Aabb;
use sightline_targeting::{HitResult, Observer, Pose, TargetResolver, TargetingConfig};
use sightline_world::{
    Entity, EntityKind, Voxel, VoxelWorld, BLOCK_BARRIER, BLOCK_GLASS, BLOCK_LIGHT, BLOCK_SLAB,
    BLOCK_STONE, BLOCK_TALL_GRASS, BLOCK_WATER,
};
use tracing::info;

/// RNG stream used for look jitter.
const LOOK_STREAM: u64 = 0x10_0c;
/// Ticks for one full left-right sweep.
const SWEEP_PERIOD: u64 = 80;

pub struct HeadlessConfig {
    pub targeting: TargetingConfig,
    pub ticks: u64,
    pub seed: u64,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub blocks: u64,
    pub entities: u64,
    pub misses: u64,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    ensure!(cfg.ticks > 0, "--ticks must be positive");

    let (mut world, mut observer) = demo_scene();
    let mut resolver = TargetResolver::new(cfg.targeting);
    let mut summary = RunSummary::default();
    let mut previous = observer.pose;

    for _ in 0..cfg.ticks {
        world.step();
        let tick = world.tick();
        let mut rng = scoped_rng(cfg.seed, LOOK_STREAM, tick);

        let phase = (tick.0 % SWEEP_PERIOD) as f64 / SWEEP_PERIOD as f64;
        let yaw = (phase * std::f64::consts::TAU).sin() * 0.9 + rng.gen_range(-0.05..0.05);
        let pitch: f64 = -0.45 + rng.gen_range(-0.05..0.05);
        let current = Pose {
            eye: observer.pose.eye,
            look: DVec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()),
        };
        observer.pose = Pose::lerp(previous, current, 0.5);
        previous = current;

        let target = *resolver.fire(&observer, &world);
        let icon = resolver.current_icon(&world);
        match target {
            HitResult::Miss => summary.misses += 1,
            HitResult::Block { .. } => summary.blocks += 1,
            HitResult::Entity { .. } => summary.entities += 1,
        }
        info!(tick = tick.0, ?target, ?icon, "target");
    }

    summary.ticks = cfg.ticks;
    Ok(summary)
}

/// A small courtyard: a stone floor, a pool with a light marker in it, a
/// barrier, some props and a few entities.
fn demo_scene() -> (VoxelWorld, Observer) {
    let mut world = VoxelWorld::default();
    for x in -2..10 {
        for z in -6..=6 {
            world.set_voxel(IVec3::new(x, -1, z), Voxel::block(BLOCK_STONE));
        }
    }
    for z in -2..=2 {
        world.set_voxel(IVec3::new(6, -1, z), Voxel::block(BLOCK_WATER));
        world.set_voxel(IVec3::new(6, 0, z), Voxel::block(BLOCK_WATER));
    }
    world.set_voxel(IVec3::new(6, 0, 0), Voxel::block(BLOCK_LIGHT).waterlogged());
    world.set_voxel(IVec3::new(3, 0, -3), Voxel::block(BLOCK_BARRIER));
    world.set_voxel(IVec3::new(4, 0, 3), Voxel::block(BLOCK_SLAB));
    world.set_voxel(IVec3::new(2, 0, 2), Voxel::block(BLOCK_TALL_GRASS));
    world.set_voxel(IVec3::new(8, 0, -1), Voxel::block(BLOCK_GLASS));

    let player = world.allocate_id();
    world.spawn(Entity::new(
        player,
        EntityKind::Player,
        RegistryKey::builtin("player"),
        Aabb::new(DVec3::new(0.2, 0.0, 0.2), DVec3::new(0.8, 1.8, 0.8)),
    ));

    let cow = world.allocate_id();
    let mut cow_entity = Entity::new(
        cow,
        EntityKind::Mob,
        RegistryKey::builtin("cow"),
        Aabb::from_center_size(DVec3::new(3.0, 0.7, 1.5), DVec3::new(0.9, 1.4, 0.9)),
    );
    cow_entity.icon = Some(RegistryKey::builtin("cow_spawn_egg"));
    world.spawn(cow_entity);

    let item = world.allocate_id();
    let mut item_entity = Entity::new(
        item,
        EntityKind::DroppedItem,
        RegistryKey::builtin("item"),
        Aabb::from_center_size(DVec3::new(2.5, 0.125, -1.5), DVec3::splat(0.25)),
    );
    item_entity.icon = Some(RegistryKey::builtin("diamond"));
    world.spawn(item_entity);

    let arrow = world.allocate_id();
    world.spawn(Entity::new(
        arrow,
        EntityKind::Projectile,
        RegistryKey::builtin("arrow"),
        Aabb::from_center_size(DVec3::new(1.8, 1.4, 0.3), DVec3::splat(0.5)),
    ));

    let observer = Observer::player(
        player,
        Pose {
            eye: DVec3::new(0.5, 1.62, 0.5),
            look: DVec3::X,
        },
    );
    (world, observer)
}
