//! Per-tick target resolution.

use crate::block_wrap::wrap_block;
use crate::config::{FluidMode, Suppression, TargetingConfig};
use crate::entity_hit::nearest_entity;
use crate::filter::{Eligibility, EntityExclusion, ExcludeNothing};
use crate::hit::HitResult;
use crate::icon::{icon_for, IconElement};
use crate::observer::Observer;
use sightline_physics::Ray;
use sightline_world::{BlockHit, ClipRequest, FluidClip, ShapeContext, WorldView};
use tracing::{debug, trace, warn};

/// Slack added past a block already under the crosshair when clamping reach.
pub const CROSSHAIR_REACH_MARGIN: f64 = 0.1;

/// Owns the targeting settings and the single published target.
///
/// The host creates one resolver, calls [`TargetResolver::fire`] once per
/// tick, and presentation code reads [`TargetResolver::current_target`]
/// between ticks.
pub struct TargetResolver {
    config: TargetingConfig,
    suppression: Suppression,
    exclusion: Box<dyn EntityExclusion>,
    last: HitResult,
}

impl TargetResolver {
    /// Resolver with no published target yet.
    pub fn new(config: TargetingConfig) -> Self {
        let config = sanitized(config);
        Self {
            suppression: Suppression::from_config(&config),
            config,
            exclusion: Box::new(ExcludeNothing),
            last: HitResult::Miss,
        }
    }

    /// Install the host's exclusion strategy.
    pub fn with_exclusion<E>(mut self, exclusion: E) -> Self
    where
        E: EntityExclusion + 'static,
    {
        self.exclusion = Box::new(exclusion);
        self
    }

    /// Active settings.
    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    /// Swap settings; takes effect on the next pass.
    pub fn set_config(&mut self, config: TargetingConfig) {
        let config = sanitized(config);
        self.suppression = Suppression::from_config(&config);
        self.config = config;
    }

    /// The target published by the last pass.
    pub fn current_target(&self) -> &HitResult {
        &self.last
    }

    /// Icon for the current target; `None` when it has no renderable form.
    pub fn current_icon<W>(&self, world: &W) -> Option<IconElement>
    where
        W: WorldView + ?Sized,
    {
        let icon = icon_for(&self.last, world);
        (!icon.is_empty()).then_some(icon)
    }

    /// Forget the published target.
    pub fn reset(&mut self) {
        self.last = HitResult::Miss;
    }

    /// Eligibility rules bound to `observer`.
    pub fn eligibility<'a>(&'a self, observer: &'a Observer) -> Eligibility<'a> {
        Eligibility::new(observer, &self.suppression, self.exclusion.as_ref())
    }

    /// Run one pass and publish its result.
    pub fn fire<W>(&mut self, observer: &Observer, world: &W) -> &HitResult
    where
        W: WorldView + ?Sized,
    {
        let target = self.resolve(observer, world);
        if target != self.last {
            debug!(?target, "target changed");
        }
        self.last = target;
        &self.last
    }

    /// Compute this tick's target without publishing it.
    pub fn resolve<W>(&self, observer: &Observer, world: &W) -> HitResult
    where
        W: WorldView + ?Sized,
    {
        if let HitResult::Entity { entity, .. } = observer.crosshair {
            let eligibility = self.eligibility(observer);
            let still_valid = world
                .entity(entity)
                .is_some_and(|e| eligibility.allows(world, e));
            if still_valid {
                trace!(%entity, "reusing crosshair entity");
                return observer.crosshair;
            }
        }

        let bonus = self.config.extended_reach;
        self.ray_trace(
            observer,
            world,
            observer.block_reach + bonus,
            observer.entity_reach + bonus,
        )
    }

    /// Cast the observer's view ray with explicit reaches.
    pub fn ray_trace<W>(
        &self,
        observer: &Observer,
        world: &W,
        block_reach: f64,
        entity_reach: f64,
    ) -> HitResult
    where
        W: WorldView + ?Sized,
    {
        let eye = observer.pose.eye;
        let (mut block_reach, mut entity_reach) = (block_reach, entity_reach);
        if let HitResult::Block { location, .. } = observer.crosshair {
            let clamped = location.distance(eye) + CROSSHAIR_REACH_MARGIN;
            block_reach = clamped;
            entity_reach = clamped;
        }

        let ray = Ray::new(eye, observer.pose.view_vector(), entity_reach);
        let entity_segment = ray.segment();
        let eligibility = self.eligibility(observer);
        let entity_hit = nearest_entity(
            world,
            Some(observer.entity),
            entity_segment,
            &entity_segment.bounds(),
            |e| eligibility.allows(world, e),
        );

        let shape = observer.shape_context();
        let fluid = if world.fluid(observer.eye_cell()).is_some() {
            FluidClip::None
        } else {
            self.config.fluid_mode.primary_clip()
        };
        let block_segment = ray.with_length(block_reach).segment();
        let primary = world.clip(&ClipRequest {
            segment: block_segment,
            fluid,
            shape,
        });

        if let Some(hit) = entity_hit {
            let entity_wins = match primary {
                BlockHit::Block { location, .. } => {
                    hit.location.distance_squared(eye) < location.distance_squared(eye)
                }
                BlockHit::Miss { .. } => true,
            };
            if entity_wins {
                trace!(entity = %hit.entity, "entity closer than block");
                return HitResult::Entity {
                    entity: hit.entity,
                    location: hit.location,
                };
            }
        }

        if let Some(block) = self.accept_block(world, &primary, shape) {
            return block;
        }

        if self.config.fluid_mode != FluidMode::Fallback {
            return HitResult::Miss;
        }
        trace!("strict cast found nothing; retrying with fluids");
        let fallback = world.clip(&ClipRequest {
            segment: block_segment,
            fluid: FluidClip::Any,
            shape,
        });
        self.accept_block(world, &fallback, shape)
            .unwrap_or(HitResult::Miss)
    }

    fn accept_block<W>(&self, world: &W, hit: &BlockHit, shape: ShapeContext) -> Option<HitResult>
    where
        W: WorldView + ?Sized,
    {
        let BlockHit::Block {
            cell,
            face,
            location,
            ..
        } = *hit
        else {
            return None;
        };
        let state = wrap_block(world, hit, shape, &self.suppression);
        let descriptor = world.descriptor(state);
        if self.suppression.hides_block(descriptor) {
            trace!(%cell, key = %descriptor.key, "block suppressed");
            return None;
        }
        Some(HitResult::Block {
            cell,
            state,
            face,
            location,
        })
    }
}

/// Replace an unusable reach bonus with none; an unbounded ray never finishes.
fn sanitized(mut config: TargetingConfig) -> TargetingConfig {
    if let Err(err) = config.validate() {
        warn!("{err}. Ignoring extended reach");
        config.extended_reach = 0.0;
    }
    config
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new(TargetingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Pose;
    use glam::{DVec3, IVec3};
    use sightline_core::{EntityId, RegistryKey};
    use sightline_physics::Aabb;
    use sightline_world::{
        Entity, EntityKind, Voxel, VoxelWorld, BLOCK_BARRIER, BLOCK_STONE, BLOCK_WATER,
    };

    fn observer() -> Observer {
        Observer::player(
            EntityId(999),
            Pose {
                eye: DVec3::new(0.5, 0.5, 0.5),
                look: DVec3::X,
            },
        )
        .with_reach(5.0, 5.0)
    }

    fn spawn_mob(world: &mut VoxelWorld, center: DVec3) -> EntityId {
        let id = world.allocate_id();
        world.spawn(Entity::new(
            id,
            EntityKind::Mob,
            RegistryKey::builtin("cow"),
            Aabb::from_center_size(center, DVec3::ONE),
        ))
    }

    #[test]
    fn empty_world_is_a_miss() {
        let world = VoxelWorld::default();
        let mut resolver = TargetResolver::default();
        assert!(resolver.fire(&observer(), &world).is_miss());
        assert!(resolver.current_icon(&world).is_none());
    }

    #[test]
    fn fire_publishes_and_reset_clears() {
        let mut world = VoxelWorld::default();
        world.set_voxel(IVec3::new(3, 0, 0), Voxel::block(BLOCK_STONE));
        let mut resolver = TargetResolver::default();

        let published = *resolver.fire(&observer(), &world);
        assert_eq!(published.cell(), Some(IVec3::new(3, 0, 0)));
        assert_eq!(*resolver.current_target(), published);
        assert_eq!(
            resolver.current_icon(&world),
            Some(IconElement::Item(RegistryKey::builtin("stone")))
        );

        resolver.reset();
        assert!(resolver.current_target().is_miss());
    }

    #[test]
    fn crosshair_entity_is_reused_while_eligible() {
        let mut world = VoxelWorld::default();
        let mob = spawn_mob(&mut world, DVec3::new(20.0, 0.5, 0.5));
        let mut viewer = observer();
        viewer.crosshair = HitResult::Entity {
            entity: mob,
            location: DVec3::new(19.5, 0.5, 0.5),
        };
        let resolver = TargetResolver::default();
        assert_eq!(resolver.resolve(&viewer, &world), viewer.crosshair);

        world.despawn(mob);
        assert!(resolver.resolve(&viewer, &world).is_miss());
    }

    #[test]
    fn crosshair_block_clamps_reach() {
        let mut world = VoxelWorld::default();
        let mob = spawn_mob(&mut world, DVec3::new(3.5, 0.5, 0.5));
        let mut viewer = observer();
        viewer.crosshair = HitResult::Block {
            cell: IVec3::new(2, 0, 0),
            state: Voxel::block(BLOCK_STONE),
            face: IVec3::NEG_X,
            location: DVec3::new(2.0, 0.5, 0.5),
        };
        let resolver = TargetResolver::default();
        // Reach shrinks to 1.6, short of the mob's face at x = 3.
        assert!(resolver.resolve(&viewer, &world).is_miss());

        viewer.crosshair = HitResult::Miss;
        assert_eq!(resolver.resolve(&viewer, &world).entity(), Some(mob));
    }

    #[test]
    fn extended_reach_adds_to_both_ranges() {
        let mut world = VoxelWorld::default();
        world.set_voxel(IVec3::new(6, 0, 0), Voxel::block(BLOCK_STONE));
        let mut resolver = TargetResolver::default();
        assert!(resolver.resolve(&observer(), &world).is_miss());

        resolver.set_config(TargetingConfig {
            extended_reach: 1.0,
            ..TargetingConfig::default()
        });
        assert_eq!(
            resolver.resolve(&observer(), &world).cell(),
            Some(IVec3::new(6, 0, 0))
        );
    }

    #[test]
    fn unusable_reach_bonus_is_ignored() {
        let mut world = VoxelWorld::default();
        world.set_voxel(IVec3::new(3, 0, 0), Voxel::block(BLOCK_STONE));
        for bonus in [f64::INFINITY, f64::NAN, -2.0] {
            let resolver = TargetResolver::new(TargetingConfig {
                extended_reach: bonus,
                ..TargetingConfig::default()
            });
            assert_eq!(resolver.config().extended_reach, 0.0);
            assert_eq!(
                resolver.resolve(&observer(), &world).cell(),
                Some(IVec3::new(3, 0, 0))
            );
        }

        let mut resolver = TargetResolver::default();
        resolver.set_config(TargetingConfig {
            extended_reach: f64::INFINITY,
            ..TargetingConfig::default()
        });
        assert_eq!(resolver.config().extended_reach, 0.0);
    }

    #[test]
    fn eye_in_fluid_ignores_fluid_surfaces() {
        let mut world = VoxelWorld::default();
        for x in 0..4 {
            world.set_voxel(IVec3::new(x, 0, 0), Voxel::block(BLOCK_WATER));
        }
        world.set_voxel(IVec3::new(4, 0, 0), Voxel::block(BLOCK_STONE));
        let resolver = TargetResolver::new(TargetingConfig {
            fluid_mode: FluidMode::Any,
            ..TargetingConfig::default()
        });
        assert_eq!(
            resolver.resolve(&observer(), &world).cell(),
            Some(IVec3::new(4, 0, 0))
        );

        // From dry land the first water surface stops the ray.
        let mut dry = observer();
        dry.pose.eye = DVec3::new(-0.5, 0.5, 0.5);
        assert_eq!(resolver.resolve(&dry, &world).cell(), Some(IVec3::ZERO));
    }

    #[test]
    fn suppressed_block_without_fluid_is_a_miss() {
        let mut world = VoxelWorld::default();
        world.set_voxel(IVec3::new(2, 0, 0), Voxel::block(BLOCK_BARRIER));
        world.set_voxel(IVec3::new(4, 0, 0), Voxel::block(BLOCK_STONE));
        let resolver = TargetResolver::default();
        // The barrier stops the ray; suppression does not let it pass through.
        assert!(resolver.resolve(&observer(), &world).is_miss());
    }

    #[test]
    fn exclusion_strategy_is_consulted() {
        let mut world = VoxelWorld::default();
        spawn_mob(&mut world, DVec3::new(2.5, 0.5, 0.5));
        let resolver =
            TargetResolver::default().with_exclusion(|e: &Entity| e.type_key.path() == "cow");
        assert!(resolver.resolve(&observer(), &world).is_miss());
    }
}
