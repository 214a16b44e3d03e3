//! In-memory world: sparse voxel grid plus an ordered entity table.

use crate::block::{BlockDescriptor, BlockRegistry, Voxel};
use crate::clip::{clip_cells, BlockHit, CellShapes, ClipRequest, FluidClip};
use crate::entity::{Entity, EntityKind};
use crate::fluid::FluidState;
use crate::view::WorldView;
use glam::IVec3;
use sightline_core::{EntityId, SimTick};
use sightline_physics::Aabb;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Sparse voxel world. Unset cells are air.
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    registry: BlockRegistry,
    voxels: HashMap<IVec3, Voxel>,
    entities: BTreeMap<EntityId, Entity>,
    next_entity: u64,
    tick: SimTick,
    frozen: bool,
}

impl Default for VoxelWorld {
    fn default() -> Self {
        Self::new(BlockRegistry::default())
    }
}

impl VoxelWorld {
    /// Empty world using `registry`.
    pub fn new(registry: BlockRegistry) -> Self {
        Self {
            registry,
            voxels: HashMap::new(),
            entities: BTreeMap::new(),
            next_entity: 1,
            tick: SimTick::ZERO,
            frozen: false,
        }
    }

    /// Block registry in use.
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Current simulation tick.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Place `voxel` at `pos`; air clears the cell.
    pub fn set_voxel(&mut self, pos: IVec3, voxel: Voxel) {
        if voxel.is_air() {
            self.voxels.remove(&pos);
        } else {
            self.voxels.insert(pos, voxel);
        }
    }

    /// Allocate a fresh entity handle.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    /// Insert an entity built by the caller; its id must come from [`Self::allocate_id`].
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        debug!(entity = %id, kind = ?entity.kind, key = %entity.type_key, "spawned entity");
        self.next_entity = self.next_entity.max(id.0 + 1);
        self.entities.insert(id, entity);
        id
    }

    /// Mutable access for scripted changes between ticks.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Flag an entity as removed; it stays queryable until [`Self::purge_removed`].
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.removed = true;
                debug!(entity = %id, "despawned entity");
                true
            }
            None => false,
        }
    }

    /// Drop removed entities; returns how many went away.
    pub fn purge_removed(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, e| !e.removed);
        before - self.entities.len()
    }

    /// Freeze or unfreeze time for non-player entities.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Advance one tick: age every live entity unless time is frozen.
    pub fn step(&mut self) {
        self.tick = self.tick.advance(1);
        let frozen = self.frozen;
        for entity in self.entities.values_mut() {
            if entity.removed || (frozen && entity.kind != EntityKind::Player) {
                continue;
            }
            entity.age_ticks = entity.age_ticks.saturating_add(1);
        }
    }

    fn shapes_at(&self, cell: IVec3, request: &ClipRequest) -> CellShapes {
        let voxel = self.voxel(cell);
        let block = self
            .descriptor(voxel)
            .shape
            .outline(request.shape)
            .map(|local| local.offset(cell.as_dvec3()));
        let fluid = match request.fluid {
            FluidClip::None => None,
            FluidClip::Any => FluidState::of(voxel).map(|f| f.surface_box(cell)),
        };
        CellShapes { block, fluid }
    }
}

impl WorldView for VoxelWorld {
    fn voxel(&self, pos: IVec3) -> Voxel {
        self.voxels.get(&pos).copied().unwrap_or_default()
    }

    fn descriptor(&self, voxel: Voxel) -> &BlockDescriptor {
        self.registry.get(voxel.id)
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn entities_in(&self, area: &Aabb, except: Option<EntityId>) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|e| Some(e.id) != except && e.bounds.intersects(area))
            .collect()
    }

    fn is_entity_frozen(&self, entity: &Entity) -> bool {
        self.frozen && entity.kind != EntityKind::Player
    }

    fn clip(&self, request: &ClipRequest) -> BlockHit {
        clip_cells(request.segment, |cell| self.shapes_at(cell, request))
    }
}
