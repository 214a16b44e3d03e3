use crate::Aabb;
use glam::DVec3;

/// A ray with a bounded reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point (the observer's eye).
    pub origin: DVec3,
    /// Unit-length direction.
    pub direction: DVec3,
    /// Reach distance along `direction`.
    pub length: f64,
}

impl Ray {
    /// Build a ray, normalizing `direction`.
    pub fn new(origin: DVec3, direction: DVec3, length: f64) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            length,
        }
    }

    /// Same origin and direction with a different reach.
    pub fn with_length(self, length: f64) -> Self {
        Self { length, ..self }
    }

    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Point at the full reach.
    pub fn end(&self) -> DVec3 {
        self.point_at(self.length)
    }

    /// Bounded segment from the origin to the end point.
    pub fn segment(&self) -> Segment {
        Segment::new(self.origin, self.end())
    }
}

/// Straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point.
    pub start: DVec3,
    /// End point.
    pub end: DVec3,
}

impl Segment {
    /// Create a segment.
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Box spanned by both end points; used as the entity search region.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_corners(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_normalizes_direction() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), 5.0);
        assert_eq!(ray.direction, DVec3::X);
        assert_eq!(ray.end(), DVec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn segment_bounds_span_both_ends() {
        let seg = Segment::new(DVec3::new(1.0, 5.0, -2.0), DVec3::new(-1.0, 2.0, 3.0));
        let bounds = seg.bounds();
        assert_eq!(bounds.min, DVec3::new(-1.0, 2.0, -2.0));
        assert_eq!(bounds.max, DVec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn with_length_keeps_direction() {
        let ray = Ray::new(DVec3::ONE, DVec3::Y, 3.0).with_length(1.5);
        assert_eq!(ray.end(), DVec3::new(1.0, 2.5, 1.0));
        assert!((ray.segment().length() - 1.5).abs() < 1e-12);
    }
}
