//! Segment clipping through the voxel grid using DDA (Digital Differential Analyzer).

use crate::block::ShapeContext;
use glam::{DVec3, IVec3};
use sightline_physics::{Aabb, Segment};

/// Which fluids the clip treats as obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FluidClip {
    /// Fluids are transparent.
    #[default]
    None,
    /// Any fluid surface stops the segment.
    Any,
}

/// Parameters of one grid clip.
#[derive(Debug, Clone, Copy)]
pub struct ClipRequest {
    /// Segment to trace, start to end.
    pub segment: Segment,
    /// Fluid inclusion mode.
    pub fluid: FluidClip,
    /// Shape flags of whoever is looking.
    pub shape: ShapeContext,
}

/// Raw result of a grid clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockHit {
    /// Nothing struck; `location` is the segment end.
    Miss {
        /// End of the traced segment.
        location: DVec3,
    },
    /// A cell's outline or fluid surface was struck.
    Block {
        /// Struck cell.
        cell: IVec3,
        /// Normal of the face the segment entered through (zero when starting inside).
        face: IVec3,
        /// World-space point of intersection.
        location: DVec3,
        /// The segment started inside the struck shape.
        inside: bool,
    },
}

impl BlockHit {
    /// Hit point, or the segment end for a miss.
    pub fn location(&self) -> DVec3 {
        match *self {
            BlockHit::Miss { location } | BlockHit::Block { location, .. } => location,
        }
    }

    /// Struck cell, if any.
    pub fn cell(&self) -> Option<IVec3> {
        match *self {
            BlockHit::Miss { .. } => None,
            BlockHit::Block { cell, .. } => Some(cell),
        }
    }

    /// True when a cell was struck.
    pub fn is_block(&self) -> bool {
        matches!(self, BlockHit::Block { .. })
    }
}

/// World-space shapes a single cell presents to the clip.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellShapes {
    /// Block outline.
    pub block: Option<Aabb>,
    /// Fluid volume (only when the request includes fluids).
    pub fluid: Option<Aabb>,
}

impl CellShapes {
    /// Nearest point where `segment` meets either shape, with an "inside" flag.
    fn nearest_entry(&self, segment: &Segment) -> Option<(DVec3, bool)> {
        let mut best: Option<(DVec3, bool)> = None;
        for shape in [self.block, self.fluid].into_iter().flatten() {
            if shape.contains(segment.start) {
                return Some((segment.start, true));
            }
            let Some(point) = shape.clip(segment.start, segment.end) else {
                continue;
            };
            let closer = best.map_or(true, |(current, _)| {
                segment.start.distance_squared(point) < segment.start.distance_squared(current)
            });
            if closer {
                best = Some((point, false));
            }
        }
        best
    }
}

/// Trace `segment` cell by cell, returning the first cell whose shapes it meets.
///
/// `shapes_at` is called once per visited cell in traversal order.
pub fn clip_cells<F>(segment: Segment, mut shapes_at: F) -> BlockHit
where
    F: FnMut(IVec3) -> CellShapes,
{
    let origin = segment.start;
    let length = segment.length();
    let miss = BlockHit::Miss {
        location: segment.end,
    };
    // A non-finite segment never reaches its end; the walk would not terminate.
    if !origin.is_finite() || !length.is_finite() || length <= f64::EPSILON {
        return miss;
    }
    let direction = (segment.end - origin) / length;

    let mut cell = origin.floor().as_ivec3();

    let step = IVec3::new(
        if direction.x > 0.0 { 1 } else { -1 },
        if direction.y > 0.0 { 1 } else { -1 },
        if direction.z > 0.0 { 1 } else { -1 },
    );

    // Distance along the ray to cross one cell in each axis
    let delta = DVec3::new(
        axis_delta(direction.x),
        axis_delta(direction.y),
        axis_delta(direction.z),
    );

    // Distance from origin to the first cell boundary in each axis
    let mut t_max = DVec3::new(
        first_boundary(origin.x, direction.x, cell.x),
        first_boundary(origin.y, direction.y, cell.y),
        first_boundary(origin.z, direction.z, cell.z),
    );

    let mut face = IVec3::ZERO;
    loop {
        if let Some((location, inside)) = shapes_at(cell).nearest_entry(&segment) {
            return BlockHit::Block {
                cell,
                face,
                location,
                inside,
            };
        }

        if t_max.min_element() > length {
            return miss;
        }

        if t_max.x < t_max.y && t_max.x < t_max.z {
            cell.x += step.x;
            t_max.x += delta.x;
            face = IVec3::new(-step.x, 0, 0);
        } else if t_max.y < t_max.z {
            cell.y += step.y;
            t_max.y += delta.y;
            face = IVec3::new(0, -step.y, 0);
        } else {
            cell.z += step.z;
            t_max.z += delta.z;
            face = IVec3::new(0, 0, -step.z);
        }
    }
}

fn axis_delta(dir: f64) -> f64 {
    if dir != 0.0 {
        (1.0 / dir).abs()
    } else {
        f64::INFINITY
    }
}

fn first_boundary(origin: f64, dir: f64, cell: i32) -> f64 {
    if dir > 0.0 {
        (f64::from(cell + 1) - origin) / dir
    } else if dir < 0.0 {
        (f64::from(cell) - origin) / dir
    } else {
        f64::INFINITY
    }
}
