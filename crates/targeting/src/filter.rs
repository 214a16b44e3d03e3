//! Entity eligibility: which entities may ever be reported to this observer.

use crate::config::Suppression;
use crate::observer::Observer;
use sightline_world::{Entity, EntityKind, WorldView};
use std::fmt;
use tracing::trace;

/// Projectiles at or below this age are skipped unless time is frozen for them.
pub const PROJECTILE_GRACE_TICKS: u32 = 10;

/// Host-supplied exclusion strategy, consulted after every built-in rule.
pub trait EntityExclusion {
    /// True when `entity` must not be targeted.
    fn excludes(&self, entity: &Entity) -> bool;
}

impl<F> EntityExclusion for F
where
    F: Fn(&Entity) -> bool,
{
    fn excludes(&self, entity: &Entity) -> bool {
        self(entity)
    }
}

/// Exclusion strategy that lets everything through.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeNothing;

impl EntityExclusion for ExcludeNothing {
    fn excludes(&self, _entity: &Entity) -> bool {
        false
    }
}

/// The rule an entity failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Removed from the world.
    Removed,
    /// Spectating.
    Spectator,
    /// The observer is riding it.
    OwnMount,
    /// Freshly fired projectile while time flows.
    FreshProjectile,
    /// Composite body part that does not accept interaction.
    InertPart,
    /// Invisible to this observer.
    Invisible,
    /// Dropped item while the observer is breaking a block.
    ItemWhileDestroying,
    /// Type is on the global hide list.
    Suppressed,
    /// Rejected by the host's exclusion strategy.
    Excluded,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rejection::Removed => "removed",
            Rejection::Spectator => "spectator",
            Rejection::OwnMount => "own mount",
            Rejection::FreshProjectile => "fresh projectile",
            Rejection::InertPart => "inert part",
            Rejection::Invisible => "invisible",
            Rejection::ItemWhileDestroying => "item while destroying",
            Rejection::Suppressed => "suppressed",
            Rejection::Excluded => "excluded",
        };
        f.write_str(label)
    }
}

/// Eligibility predicate bound to one observer for one pass.
pub struct Eligibility<'a> {
    observer: &'a Observer,
    suppression: &'a Suppression,
    exclusion: &'a dyn EntityExclusion,
}

impl<'a> Eligibility<'a> {
    /// Bind the rule chain to `observer`.
    pub fn new(
        observer: &'a Observer,
        suppression: &'a Suppression,
        exclusion: &'a dyn EntityExclusion,
    ) -> Self {
        Self {
            observer,
            suppression,
            exclusion,
        }
    }

    /// First rule `entity` fails, in rule order.
    pub fn check<W>(&self, world: &W, entity: &Entity) -> Result<(), Rejection>
    where
        W: WorldView + ?Sized,
    {
        let observer = self.observer;
        if entity.removed {
            return Err(Rejection::Removed);
        }
        if entity.spectator {
            return Err(Rejection::Spectator);
        }
        if observer.vehicle == Some(entity.id) {
            return Err(Rejection::OwnMount);
        }
        if entity.is_projectile()
            && entity.age_ticks <= PROJECTILE_GRACE_TICKS
            && !world.is_entity_frozen(entity)
        {
            return Err(Rejection::FreshProjectile);
        }
        if entity.is_multipart() && !entity.pickable {
            return Err(Rejection::InertPart);
        }
        if observer.player_controlled {
            if entity.is_invisible_to(observer.team, observer.spectating) {
                return Err(Rejection::Invisible);
            }
            if observer.destroying && entity.kind == EntityKind::DroppedItem {
                return Err(Rejection::ItemWhileDestroying);
            }
        } else if entity.invisible {
            return Err(Rejection::Invisible);
        }
        if self.suppression.hides_entity(entity) {
            return Err(Rejection::Suppressed);
        }
        if self.exclusion.excludes(entity) {
            return Err(Rejection::Excluded);
        }
        Ok(())
    }

    /// Boolean form of [`Self::check`]; logs the rejection reason at trace level.
    pub fn allows<W>(&self, world: &W, entity: &Entity) -> bool
    where
        W: WorldView + ?Sized,
    {
        match self.check(world, entity) {
            Ok(()) => true,
            Err(reason) => {
                trace!(entity = %entity.id, %reason, "entity not eligible");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetingConfig;
    use crate::observer::Pose;
    use glam::DVec3;
    use sightline_core::{EntityId, RegistryKey};
    use sightline_physics::Aabb;
    use sightline_world::VoxelWorld;

    fn observer() -> Observer {
        Observer::player(
            EntityId(100),
            Pose {
                eye: DVec3::ZERO,
                look: DVec3::X,
            },
        )
    }

    fn entity(kind: EntityKind, path: &'static str) -> Entity {
        Entity::new(
            EntityId(7),
            kind,
            RegistryKey::builtin(path),
            Aabb::from_center_size(DVec3::new(3.0, 0.0, 0.0), DVec3::ONE),
        )
    }

    fn check(observer: &Observer, world: &VoxelWorld, entity: &Entity) -> Result<(), Rejection> {
        let suppression = Suppression::from_config(&TargetingConfig::default());
        Eligibility::new(observer, &suppression, &ExcludeNothing).check(world, entity)
    }

    #[test]
    fn plain_mob_is_eligible() {
        let world = VoxelWorld::default();
        assert_eq!(check(&observer(), &world, &entity(EntityKind::Mob, "pig")), Ok(()));
    }

    #[test]
    fn removed_beats_every_other_rule() {
        let world = VoxelWorld::default();
        let mut target = entity(EntityKind::Projectile, "arrow");
        target.removed = true;
        target.spectator = true;
        assert_eq!(check(&observer(), &world, &target), Err(Rejection::Removed));
    }

    #[test]
    fn mount_is_not_a_target() {
        let world = VoxelWorld::default();
        let mut rider = observer();
        rider.vehicle = Some(EntityId(7));
        assert_eq!(
            check(&rider, &world, &entity(EntityKind::Vehicle, "boat")),
            Err(Rejection::OwnMount)
        );
    }

    #[test]
    fn projectile_grace_period_unless_frozen() {
        let mut world = VoxelWorld::default();
        let mut arrow = entity(EntityKind::Projectile, "arrow");
        arrow.age_ticks = PROJECTILE_GRACE_TICKS;
        assert_eq!(
            check(&observer(), &world, &arrow),
            Err(Rejection::FreshProjectile)
        );

        world.set_frozen(true);
        assert_eq!(check(&observer(), &world, &arrow), Ok(()));

        world.set_frozen(false);
        arrow.age_ticks = PROJECTILE_GRACE_TICKS + 1;
        assert_eq!(check(&observer(), &world, &arrow), Ok(()));
    }

    #[test]
    fn inert_part_rejected() {
        let world = VoxelWorld::default();
        let mut part = entity(EntityKind::Part { parent: EntityId(1) }, "dragon_part");
        part.pickable = false;
        assert_eq!(check(&observer(), &world, &part), Err(Rejection::InertPart));
        part.pickable = true;
        assert_eq!(check(&observer(), &world, &part), Ok(()));
    }

    #[test]
    fn invisibility_depends_on_observer_kind() {
        let world = VoxelWorld::default();
        let mut ghost = entity(EntityKind::Mob, "zombie");
        ghost.invisible = true;
        ghost.team = Some(3);

        let mut teammate = observer();
        teammate.team = Some(3);
        assert_eq!(check(&teammate, &world, &ghost), Ok(()));
        assert_eq!(check(&observer(), &world, &ghost), Err(Rejection::Invisible));

        let mut camera = teammate.clone();
        camera.player_controlled = false;
        assert_eq!(check(&camera, &world, &ghost), Err(Rejection::Invisible));
    }

    #[test]
    fn items_skipped_while_destroying() {
        let world = VoxelWorld::default();
        let item = entity(EntityKind::DroppedItem, "item");
        let mut miner = observer();
        miner.destroying = true;
        assert_eq!(
            check(&miner, &world, &item),
            Err(Rejection::ItemWhileDestroying)
        );

        miner.player_controlled = false;
        assert_eq!(check(&miner, &world, &item), Ok(()));
    }

    #[test]
    fn suppression_then_exclusion() {
        let world = VoxelWorld::default();
        let config = TargetingConfig {
            hidden_entities: vec![RegistryKey::builtin("bat")],
            ..TargetingConfig::default()
        };
        let suppression = Suppression::from_config(&config);
        let observer = observer();
        let no_pigs = |e: &Entity| e.type_key.path() == "pig";
        let eligibility = Eligibility::new(&observer, &suppression, &no_pigs);

        assert_eq!(
            eligibility.check(&world, &entity(EntityKind::Mob, "bat")),
            Err(Rejection::Suppressed)
        );
        assert_eq!(
            eligibility.check(&world, &entity(EntityKind::Mob, "pig")),
            Err(Rejection::Excluded)
        );
        assert!(eligibility.allows(&world, &entity(EntityKind::Mob, "cow")));
    }
}
