use glam::DVec3;
use sightline_core::EntityId;
use sightline_physics::{Aabb, Segment};
use sightline_world::{Entity, WorldView};

/// Boxes with a smaller mean edge are inflated by this much on every side.
pub const MIN_TARGET_SIZE: f64 = 0.3;

/// Nearest entity along a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityHit {
    /// Hit entity.
    pub entity: EntityId,
    /// Entry point into its bounds, or the segment start when it already contains it.
    pub location: DVec3,
}

/// Find the entity nearest to `segment.start` among those overlapping `search`.
///
/// The caster is skipped and `eligible` is applied before any geometry. An
/// entity whose (inflated) bounds contain the segment start wins at once and
/// ends the scan; otherwise the strictly closest entry point wins, so equal
/// distances keep whichever entity the world enumerated first.
pub fn nearest_entity<W, P>(
    world: &W,
    caster: Option<EntityId>,
    segment: Segment,
    search: &Aabb,
    mut eligible: P,
) -> Option<EntityHit>
where
    W: WorldView + ?Sized,
    P: FnMut(&Entity) -> bool,
{
    let mut best: Option<(EntityHit, f64)> = None;

    for entity in world.entities_in(search, caster) {
        if !eligible(entity) {
            continue;
        }

        let mut bounds = entity.bounds;
        if bounds.size() < MIN_TARGET_SIZE {
            bounds = bounds.inflate(MIN_TARGET_SIZE);
        }

        if bounds.contains(segment.start) {
            return Some(EntityHit {
                entity: entity.id,
                location: segment.start,
            });
        }

        let Some(entry) = bounds.clip(segment.start, segment.end) else {
            continue;
        };
        let dist_sq = segment.start.distance_squared(entry);
        if best.map_or(true, |(_, current)| dist_sq < current) {
            best = Some((
                EntityHit {
                    entity: entity.id,
                    location: entry,
                },
                dist_sq,
            ));
        }
    }

    best.map(|(hit, _)| hit)
}
