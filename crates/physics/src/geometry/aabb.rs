use std::cmp::Ordering;

use crate::types::{approx_cmp, Vec3};

/// Axis-aligned bounding box. Transient: rebuilt for every check.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The box containing nothing; it overlaps no other box.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f64::INFINITY),
        max: Vec3::splat(f64::NEG_INFINITY),
    };

    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |acc, p| acc.grown(p))
    }

    #[must_use]
    pub fn around_sphere(center: Vec3, radius: f64) -> Self {
        let r = Vec3::splat(radius);
        Self::new(center - r, center + r)
    }

    #[must_use]
    pub fn grown(self, p: Vec3) -> Self {
        Self::new(self.min.min(p), self.max.max(p))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Tolerant containment: points within `EPSILON` of a face count as inside.
    #[must_use]
    pub fn contains_point(&self, p: Vec3) -> bool {
        let inside = |lo: f64, v: f64, hi: f64| {
            approx_cmp(v, lo) != Ordering::Less && approx_cmp(v, hi) != Ordering::Greater
        };
        inside(self.min.x, p.x, self.max.x)
            && inside(self.min.y, p.y, self.max.y)
            && inside(self.min.z, p.z, self.max.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_boxes_do_not_overlap() {
        let a = Aabb::around_sphere(Vec3::ZERO, 1.0);
        let b = Aabb::around_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Aabb::around_sphere(Vec3::new(2.0, 0.0, 0.0), 1.0)));
    }

    #[test]
    fn empty_box_overlaps_nothing() {
        assert!(Aabb::EMPTY.is_empty());
        assert!(!Aabb::EMPTY.overlaps(&Aabb::around_sphere(Vec3::ZERO, 10.0)));
    }

    #[test]
    fn flat_box_contains_its_plane_points() {
        let flat = Aabb::from_points([Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)]);
        assert!(flat.contains_point(Vec3::new(0.5, 0.0005, 0.5)));
        assert!(!flat.contains_point(Vec3::new(0.5, 0.1, 0.5)));
    }
}
