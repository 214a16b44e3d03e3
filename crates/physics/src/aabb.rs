use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB; `min` must not exceed `max` on any axis.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        debug_assert!(min.cmple(max).all(), "inverted aabb {min} > {max}");
        Self { min, max }
    }

    /// Box spanned by two arbitrary corners.
    pub fn from_corners(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box of `size` centered on `center`.
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// The unit cube occupied by the grid cell at `cell`.
    pub fn unit_cell(cell: IVec3) -> Self {
        let min = cell.as_dvec3();
        Self::new(min, min + DVec3::ONE)
    }

    /// Edge lengths per axis.
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    /// Mean edge length, used as a scalar "how big is this" measure.
    pub fn size(&self) -> f64 {
        let e = self.extent();
        (e.x + e.y + e.z) / 3.0
    }

    /// Center point.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Grow by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(self.min - DVec3::splat(margin), self.max + DVec3::splat(margin))
    }

    /// Translate by `offset`.
    pub fn offset(&self, offset: DVec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Tests intersection with another AABB (touching faces count).
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Point containment: inclusive on the min faces, exclusive on the max faces.
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max).all()
    }

    /// Entry point of the segment `from -> to` into this box.
    ///
    /// Returns `None` when the segment misses, ends before reaching the box, or
    /// starts inside it (there is no entry face in that case). A segment that
    /// starts exactly on a face enters at `from`.
    pub fn clip(&self, from: DVec3, to: DVec3) -> Option<DVec3> {
        let delta = to - from;
        let (start, step) = (from.to_array(), delta.to_array());
        let (lo, hi) = (self.min.to_array(), self.max.to_array());

        let mut t_enter = f64::NEG_INFINITY;
        let mut t_exit = f64::INFINITY;
        for axis in 0..3 {
            if step[axis] == 0.0 {
                if start[axis] < lo[axis] || start[axis] > hi[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / step[axis];
            let near = (lo[axis] - start[axis]) * inv;
            let far = (hi[axis] - start[axis]) * inv;
            t_enter = t_enter.max(near.min(far));
            t_exit = t_exit.min(near.max(far));
        }

        if !(0.0..=1.0).contains(&t_enter) || t_enter > t_exit {
            return None;
        }
        Some(from + delta * t_enter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(x: f64, y: f64, z: f64) -> Aabb {
        Aabb::from_center_size(DVec3::new(x, y, z), DVec3::ONE)
    }

    #[test]
    fn clip_returns_near_face() {
        let aabb = unit_at(3.0, 0.0, 0.0);
        let hit = aabb
            .clip(DVec3::ZERO, DVec3::new(5.0, 0.0, 0.0))
            .expect("segment crosses box");
        assert!((hit.x - 2.5).abs() < 1e-9);
        assert_eq!(hit.y, 0.0);
    }

    #[test]
    fn clip_from_negative_direction() {
        let aabb = unit_at(0.0, 0.0, -4.0);
        let hit = aabb
            .clip(DVec3::ZERO, DVec3::new(0.0, 0.0, -10.0))
            .expect("segment crosses box");
        assert!((hit.z + 3.5).abs() < 1e-9);
    }

    #[test]
    fn clip_misses_when_segment_too_short() {
        let aabb = unit_at(3.0, 0.0, 0.0);
        assert!(aabb.clip(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn clip_misses_offset_box() {
        let aabb = unit_at(3.0, 2.0, 0.0);
        assert!(aabb.clip(DVec3::ZERO, DVec3::new(5.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn clip_from_inside_has_no_entry() {
        let aabb = unit_at(0.0, 0.0, 0.0);
        assert!(aabb.contains(DVec3::ZERO));
        assert!(aabb.clip(DVec3::ZERO, DVec3::new(5.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn clip_diagonal_segment() {
        let aabb = Aabb::new(DVec3::new(1.0, 1.0, 1.0), DVec3::new(2.0, 2.0, 2.0));
        let hit = aabb
            .clip(DVec3::ZERO, DVec3::splat(3.0))
            .expect("diagonal crosses box");
        assert!((hit - DVec3::ONE).length() < 1e-9);
    }

    #[test]
    fn contains_is_half_open() {
        let aabb = Aabb::new(DVec3::ZERO, DVec3::ONE);
        assert!(aabb.contains(DVec3::ZERO));
        assert!(!aabb.contains(DVec3::ONE));
        assert!(!aabb.contains(DVec3::new(0.5, 1.0, 0.5)));
    }

    #[test]
    fn inflate_and_size() {
        let aabb = Aabb::from_center_size(DVec3::ZERO, DVec3::new(0.1, 0.2, 0.3));
        assert!((aabb.size() - 0.2).abs() < 1e-12);
        let grown = aabb.inflate(0.3);
        assert!((grown.size() - 0.8).abs() < 1e-12);
        assert_eq!(grown.center(), aabb.center());
    }

    #[test]
    fn intersects_touching_boxes() {
        let a = Aabb::new(DVec3::ZERO, DVec3::ONE);
        let b = a.offset(DVec3::X);
        let c = a.offset(DVec3::new(1.5, 0.0, 0.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn unit_cell_spans_one_block() {
        let cell = Aabb::unit_cell(IVec3::new(2, -1, 0));
        assert_eq!(cell.min, DVec3::new(2.0, -1.0, 0.0));
        assert_eq!(cell.max, DVec3::new(3.0, 0.0, 1.0));
    }
}
