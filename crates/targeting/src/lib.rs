#![warn(missing_docs)]
//! Look-at target resolution.
//!
//! Once per tick the host hands a [`TargetResolver`] the observer and a world
//! snapshot. The resolver casts the observer's view ray against nearby
//! entities and the voxel grid, arbitrates between the two candidates, applies
//! suppression and the fluid fallback, and publishes a single [`HitResult`]
//! that presentation code reads back between ticks.

mod block_wrap;
mod config;
mod entity_hit;
mod filter;
mod hit;
mod icon;
mod observer;
mod resolver;

pub use block_wrap::wrap_block;
pub use config::{ConfigError, FluidMode, Suppression, TargetingConfig};
pub use entity_hit::{nearest_entity, EntityHit, MIN_TARGET_SIZE};
pub use filter::{Eligibility, EntityExclusion, ExcludeNothing, Rejection, PROJECTILE_GRACE_TICKS};
pub use hit::HitResult;
pub use icon::{icon_for, IconElement};
pub use observer::{Observer, Pose};
pub use resolver::{TargetResolver, CROSSHAIR_REACH_MARGIN};
