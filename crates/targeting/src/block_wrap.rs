use crate::config::Suppression;
use sightline_world::{BlockHit, ShapeContext, Voxel, WorldView};

/// What a raw grid hit should be reported as.
///
/// A cell can hold a block and a fluid at once. When the block part is a
/// hidden marker the observer cannot see, or has no outline for this
/// observer, the fluid is what the ray actually met, so its own block form is
/// reported instead. A miss resolves to air.
pub fn wrap_block<W>(world: &W, hit: &BlockHit, ctx: ShapeContext, suppression: &Suppression) -> Voxel
where
    W: WorldView + ?Sized,
{
    let Some(cell) = hit.cell() else {
        return Voxel::default();
    };
    let voxel = world.voxel(cell);
    if let Some(fluid) = world.fluid(cell) {
        let descriptor = world.descriptor(voxel);
        if descriptor.marker
            && suppression.hides_block(descriptor)
            && descriptor.visible_shape(ctx).is_none()
        {
            return fluid.legacy_voxel();
        }
        if world.has_empty_outline(cell, ctx) {
            return fluid.legacy_voxel();
        }
    }
    voxel
}
