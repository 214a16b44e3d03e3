use glam::{DVec3, IVec3};
use serde::Serialize;
use sightline_core::EntityId;
use sightline_world::Voxel;

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HitResult {
    /// Nothing targetable within reach.
    #[default]
    Miss,
    /// A grid cell, possibly reported as the fluid it holds.
    Block {
        /// Struck cell.
        cell: IVec3,
        /// What the cell is reported as (after fluid substitution).
        state: Voxel,
        /// Face normal the ray entered through.
        face: IVec3,
        /// Point of intersection on the cell's surface.
        location: DVec3,
    },
    /// A dynamic entity.
    Entity {
        /// Target handle.
        entity: EntityId,
        /// Point where the ray enters its (possibly inflated) bounds.
        location: DVec3,
    },
}

impl HitResult {
    /// Intersection point, `None` for a miss.
    pub fn location(&self) -> Option<DVec3> {
        match *self {
            HitResult::Miss => None,
            HitResult::Block { location, .. } | HitResult::Entity { location, .. } => Some(location),
        }
    }

    /// True for [`HitResult::Miss`].
    pub fn is_miss(&self) -> bool {
        matches!(self, HitResult::Miss)
    }

    /// Targeted entity handle, if any.
    pub fn entity(&self) -> Option<EntityId> {
        match *self {
            HitResult::Entity { entity, .. } => Some(entity),
            _ => None,
        }
    }

    /// Targeted cell, if any.
    pub fn cell(&self) -> Option<IVec3> {
        match *self {
            HitResult::Block { cell, .. } => Some(cell),
            _ => None,
        }
    }

    /// Distance from `eye` to the intersection point.
    pub fn distance_from(&self, eye: DVec3) -> Option<f64> {
        self.location().map(|location| location.distance(eye))
    }
}
