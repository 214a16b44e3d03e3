use crate::block::{BlockDescriptor, ShapeContext, Voxel};
use crate::clip::{BlockHit, ClipRequest};
use crate::entity::Entity;
use crate::fluid::FluidState;
use glam::IVec3;
use sightline_core::EntityId;
use sightline_physics::Aabb;

/// Read-only snapshot of the world for one resolution pass.
///
/// All queries are synchronous and must not observe mutation while a pass is
/// running; the host guarantees this by owning both the world and the resolver
/// on one thread.
pub trait WorldView {
    /// Cell contents at `pos` (air outside loaded space).
    fn voxel(&self, pos: IVec3) -> Voxel;

    /// Metadata for the block in `voxel`.
    fn descriptor(&self, voxel: Voxel) -> &BlockDescriptor;

    /// Look up an entity by handle, including ones flagged as removed.
    fn entity(&self, id: EntityId) -> Option<&Entity>;

    /// Entities whose bounds overlap `area`, excluding `except`, in a stable order.
    fn entities_in(&self, area: &Aabb, except: Option<EntityId>) -> Vec<&Entity>;

    /// Whether time is currently frozen for `entity`.
    fn is_entity_frozen(&self, entity: &Entity) -> bool;

    /// First cell struck by `request.segment`, or a miss at the segment end.
    fn clip(&self, request: &ClipRequest) -> BlockHit;

    /// Fluid held by the cell at `pos`.
    fn fluid(&self, pos: IVec3) -> Option<FluidState> {
        FluidState::of(self.voxel(pos))
    }

    /// True when the block at `pos` has no outline under `ctx`.
    fn has_empty_outline(&self, pos: IVec3, ctx: ShapeContext) -> bool {
        self.descriptor(self.voxel(pos)).shape.outline(ctx).is_none()
    }
}
