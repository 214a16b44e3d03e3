//! Small hand-built scenes: one world plus one observer.

use glam::{DVec3, IVec3};
use sightline_core::{EntityId, RegistryKey};
use sightline_physics::Aabb;
use sightline_targeting::{Observer, Pose};
use sightline_world::{Entity, EntityKind, Voxel, VoxelWorld};

/// Height of the observer's own body box.
const BODY_HEIGHT: f64 = 1.8;
/// Eye height above the feet.
const EYE_HEIGHT: f64 = 1.62;
/// Width of the observer's body box.
const BODY_WIDTH: f64 = 0.6;

/// A world with a player observer standing in it.
#[derive(Debug, Clone)]
pub struct Scene {
    /// The world being looked at.
    pub world: VoxelWorld,
    /// The player doing the looking; its body is spawned in `world`.
    pub observer: Observer,
}

impl Scene {
    /// Player with its eye at `eye`, looking along `look`, with both reaches set to `reach`.
    pub fn new(eye: DVec3, look: DVec3, reach: f64) -> Self {
        let mut world = VoxelWorld::default();
        let id = world.allocate_id();
        let feet = eye - DVec3::new(0.0, EYE_HEIGHT, 0.0);
        let body = Aabb::new(
            feet - DVec3::new(BODY_WIDTH / 2.0, 0.0, BODY_WIDTH / 2.0),
            feet + DVec3::new(BODY_WIDTH / 2.0, BODY_HEIGHT, BODY_WIDTH / 2.0),
        );
        world.spawn(Entity::new(
            id,
            EntityKind::Player,
            RegistryKey::builtin("player"),
            body,
        ));
        let observer = Observer::player(id, Pose { eye, look }).with_reach(reach, reach);
        Self { world, observer }
    }

    /// Eye at the origin looking down +X with both reaches at `reach`.
    pub fn looking_along_x(reach: f64) -> Self {
        Self::new(DVec3::ZERO, DVec3::X, reach)
    }

    /// Place a block.
    pub fn set_block(&mut self, cell: IVec3, voxel: Voxel) -> &mut Self {
        self.world.set_voxel(cell, voxel);
        self
    }

    /// Spawn a cube-shaped entity of `kind` centered on `center`.
    pub fn spawn(&mut self, kind: EntityKind, path: &'static str, center: DVec3, size: f64) -> EntityId {
        self.spawn_with(kind, path, center, size, |_| {})
    }

    /// Like [`Scene::spawn`], letting `configure` adjust the entity first.
    pub fn spawn_with<F>(
        &mut self,
        kind: EntityKind,
        path: &'static str,
        center: DVec3,
        size: f64,
        configure: F,
    ) -> EntityId
    where
        F: FnOnce(&mut Entity),
    {
        let id = self.world.allocate_id();
        let mut entity = Entity::new(
            id,
            kind,
            RegistryKey::builtin(path),
            Aabb::from_center_size(center, DVec3::splat(size)),
        );
        configure(&mut entity);
        self.world.spawn(entity)
    }

    /// Move the eye, keeping the look direction.
    pub fn move_eye(&mut self, eye: DVec3) -> &mut Self {
        self.observer.pose.eye = eye;
        self
    }

    /// Point the observer along `look`.
    pub fn look(&mut self, look: DVec3) -> &mut Self {
        self.observer.pose.look = look;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_world::WorldView;

    #[test]
    fn observer_body_contains_its_eye() {
        let scene = Scene::looking_along_x(5.0);
        let body = scene
            .world
            .entity(scene.observer.entity)
            .expect("observer spawned");
        assert!(body.bounds.contains(scene.observer.pose.eye));
        assert_eq!(scene.observer.block_reach, 5.0);
        assert_eq!(scene.observer.entity_reach, 5.0);
    }

    #[test]
    fn spawn_with_applies_configuration() {
        let mut scene = Scene::looking_along_x(5.0);
        let id = scene.spawn_with(
            EntityKind::Projectile,
            "arrow",
            DVec3::new(1.0, 0.0, 0.0),
            0.5,
            |e| e.age_ticks = 2,
        );
        let arrow = scene.world.entity(id).expect("arrow spawned");
        assert_eq!(arrow.age_ticks, 2);
        assert_eq!(arrow.type_key, RegistryKey::builtin("arrow"));
    }
}
