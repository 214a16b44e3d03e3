//! Fluid state carried by grid cells.
//!
//! A cell holds fluid either as a fluid block (water/lava, level in the low
//! nibble of the state) or as a waterlogged block sharing the cell with a
//! water source.

use crate::block::{BlockId, BlockState, Voxel, BLOCK_LAVA, BLOCK_WATER};
use glam::{DVec3, IVec3};
use sightline_physics::Aabb;

/// Fluid type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluidType {
    /// Water.
    Water,
    /// Lava.
    Lava,
}

impl FluidType {
    /// Block used to stand in for this fluid when it is the target.
    pub fn source_block_id(self) -> BlockId {
        match self {
            FluidType::Water => BLOCK_WATER,
            FluidType::Lava => BLOCK_LAVA,
        }
    }
}

/// Fluid level of a source cell (flowing = 1-7).
pub const FLUID_LEVEL_SOURCE: u8 = 8;

/// Fluid level stored in the low 4 bits of block state.
pub fn get_fluid_level(state: BlockState) -> u8 {
    (state & 0x0F) as u8
}

/// Set fluid level in block state (preserves upper bits).
pub fn set_fluid_level(state: BlockState, level: u8) -> BlockState {
    (state & 0xFFF0) | (level as BlockState & 0x0F)
}

/// Fluid present in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidState {
    /// Which fluid.
    pub fluid: FluidType,
    /// 1-7 flowing, 8 source.
    pub level: u8,
}

impl FluidState {
    /// Source fluid of `fluid`.
    pub fn source(fluid: FluidType) -> Self {
        Self {
            fluid,
            level: FLUID_LEVEL_SOURCE,
        }
    }

    /// Fluid held by `voxel`, if any.
    pub fn of(voxel: Voxel) -> Option<Self> {
        let fluid = match voxel.id {
            BLOCK_WATER => FluidType::Water,
            BLOCK_LAVA => FluidType::Lava,
            _ if voxel.is_waterlogged() => return Some(Self::source(FluidType::Water)),
            _ => return None,
        };
        let level = match get_fluid_level(voxel.state) {
            0 => FLUID_LEVEL_SOURCE,
            level => level.min(FLUID_LEVEL_SOURCE),
        };
        Some(Self { fluid, level })
    }

    /// True for a full source cell.
    pub fn is_source(&self) -> bool {
        self.level == FLUID_LEVEL_SOURCE
    }

    /// Surface height within the cell (a source sits at 8/9).
    pub fn height(&self) -> f64 {
        f64::from(self.level) / 9.0
    }

    /// The voxel that represents this fluid when it is the reported target.
    pub fn legacy_voxel(&self) -> Voxel {
        Voxel {
            id: self.fluid.source_block_id(),
            state: set_fluid_level(0, self.level),
        }
    }

    /// World-space volume of the fluid in `cell`, used as its clip shape.
    pub fn surface_box(&self, cell: IVec3) -> Aabb {
        let min = cell.as_dvec3();
        Aabb::new(min, min + DVec3::new(1.0, self.height(), 1.0))
    }
}
