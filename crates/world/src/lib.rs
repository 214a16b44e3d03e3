#![warn(missing_docs)]
//! Read-only voxel world surface queried by the targeting core.
//!
//! The [`WorldView`] trait is the snapshot interface (cell lookup, fluid state,
//! entity enumeration, segment clipping). [`VoxelWorld`] is the in-memory
//! implementation used by the headless host and the test suites.

mod block;
mod clip;
mod entity;
mod fluid;
mod view;
mod voxel_world;

pub use block::*;
pub use clip::*;
pub use entity::*;
pub use fluid::*;
pub use view::*;
pub use voxel_world::*;
