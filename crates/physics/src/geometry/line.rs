use crate::types::{Vec3, PARALLEL_EPSILON};

/// Infinite line through `point` along `direction` (not necessarily unit).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line {
    pub point: Vec3,
    pub direction: Vec3,
}

impl Line {
    #[must_use]
    pub const fn new(point: Vec3, direction: Vec3) -> Self {
        Self { point, direction }
    }

    #[must_use]
    pub fn through(a: Vec3, b: Vec3) -> Self {
        Self::new(a, b - a)
    }

    /// Orthogonal projection of `p` onto the line.
    #[must_use]
    pub fn project(&self, p: Vec3) -> Vec3 {
        let len_sq = self.direction.length_squared();
        if len_sq == 0.0 {
            return self.point;
        }
        self.point + self.direction * ((p - self.point).dot(self.direction) / len_sq)
    }

    #[must_use]
    pub fn distance(&self, p: Vec3) -> f64 {
        p.distance(self.project(p))
    }
}

/// Plane through `point` with unit `normal`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// `None` when `normal` has no direction.
    #[must_use]
    pub fn new(point: Vec3, normal: Vec3) -> Option<Self> {
        normal.try_normalize().map(|normal| Self { point, normal })
    }

    /// Plane through three points; `None` when they are collinear.
    #[must_use]
    pub fn through(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        Self::new(a, (b - a).cross(c - a))
    }

    #[must_use]
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        (p - self.point).dot(self.normal)
    }

    #[must_use]
    pub fn distance(&self, p: Vec3) -> f64 {
        self.signed_distance(p).abs()
    }

    /// Foot of the perpendicular from `p`.
    #[must_use]
    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }

    /// Where `line` crosses the plane; `None` when the line runs parallel to it.
    #[must_use]
    pub fn intersect_line(&self, line: &Line) -> Option<Vec3> {
        let direction = line.direction.try_normalize()?;
        let denom = direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.point - line.point).dot(self.normal) / denom;
        Some(line.point + direction * t)
    }
}
