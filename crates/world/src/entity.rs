//! Dynamic entities as seen by a read-only world snapshot.

use sightline_core::{EntityId, RegistryKey};
use sightline_physics::Aabb;

/// Broad entity category; drives the eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Player-controlled body.
    Player,
    /// Any living non-player creature.
    Mob,
    /// Arrow, thrown potion, fireball...
    Projectile,
    /// Item stack lying on the ground.
    DroppedItem,
    /// Rideable object (boat, minecart).
    Vehicle,
    /// One hitbox of a composite body.
    Part {
        /// The composite body this part belongs to.
        parent: EntityId,
    },
}

/// Snapshot of one entity.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Stable handle.
    pub id: EntityId,
    /// Category.
    pub kind: EntityKind,
    /// Type key used by suppression lists (e.g. `sl:arrow`).
    pub type_key: RegistryKey,
    /// World-space bounds.
    pub bounds: Aabb,
    /// Removed from the world this tick; the handle is stale.
    pub removed: bool,
    /// In spectator mode.
    pub spectator: bool,
    /// Generic invisibility (potion effect, invisible armor stand).
    pub invisible: bool,
    /// Team membership; teammates see each other while invisible.
    pub team: Option<u32>,
    /// Ticks since spawn.
    pub age_ticks: u32,
    /// Whether a composite part accepts interaction.
    pub pickable: bool,
    /// Icon shown for this entity (dropped item stack, spawn egg).
    pub icon: Option<RegistryKey>,
}

impl Entity {
    /// New visible, pickable entity with no age.
    pub fn new(id: EntityId, kind: EntityKind, type_key: RegistryKey, bounds: Aabb) -> Self {
        Self {
            id,
            kind,
            type_key,
            bounds,
            removed: false,
            spectator: false,
            invisible: false,
            team: None,
            age_ticks: 0,
            pickable: true,
            icon: None,
        }
    }

    /// True for projectile-category entities.
    pub fn is_projectile(&self) -> bool {
        self.kind == EntityKind::Projectile
    }

    /// True for a hitbox belonging to a composite body.
    pub fn is_multipart(&self) -> bool {
        matches!(self.kind, EntityKind::Part { .. })
    }

    /// Whether a player viewer can not see this entity.
    ///
    /// Spectating viewers see everything; teammates see invisible members.
    pub fn is_invisible_to(&self, viewer_team: Option<u32>, viewer_spectating: bool) -> bool {
        if viewer_spectating {
            return false;
        }
        if self.team.is_some() && self.team == viewer_team {
            return false;
        }
        self.invisible
    }
}
