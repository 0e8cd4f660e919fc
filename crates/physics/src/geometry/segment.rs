use super::{Aabb, Line};
use crate::types::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec3,
    pub b: Vec3,
}

impl Segment {
    #[must_use]
    pub const fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn vector(&self) -> Vec3 {
        self.b - self.a
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    #[must_use]
    pub fn line(&self) -> Line {
        Line::through(self.a, self.b)
    }

    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points([self.a, self.b])
    }

    /// Closest point of the segment to `p`, clamped to the end points.
    #[must_use]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let v = self.vector();
        let len_sq = v.length_squared();
        if len_sq == 0.0 {
            return self.a;
        }
        let t = ((p - self.a).dot(v) / len_sq).clamp(0.0, 1.0);
        self.a + v * t
    }

    #[must_use]
    pub fn distance(&self, p: Vec3) -> f64 {
        p.distance(self.closest_point(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_point_clamps_to_ends() {
        let s = Segment::new(Vec3::ZERO, Vec3::X);
        assert_eq!(s.closest_point(Vec3::new(-3.0, 1.0, 0.0)), Vec3::ZERO);
        assert_eq!(s.closest_point(Vec3::new(0.5, 2.0, 0.0)), Vec3::new(0.5, 0.0, 0.0));
        assert!((s.distance(Vec3::new(2.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
    }
}
