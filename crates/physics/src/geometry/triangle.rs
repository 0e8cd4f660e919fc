use super::{Aabb, Plane, Segment};
use crate::types::{approx_eq, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    #[must_use]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    #[must_use]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    #[must_use]
    pub fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.a, self.b),
            Segment::new(self.b, self.c),
            Segment::new(self.c, self.a),
        ]
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        0.5 * (self.b - self.a).cross(self.c - self.a).length()
    }

    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// `None` for a degenerate (zero-area) triangle.
    #[must_use]
    pub fn plane(&self) -> Option<Plane> {
        Plane::through(self.a, self.b, self.c)
    }

    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices())
    }

    /// Polar moment of the lamina about the normal through its centroid,
    /// per unit areal density: `A (a² + b² + c²) / 36`.
    #[must_use]
    pub fn polar_moment(&self) -> f64 {
        let sides: f64 = self.edges().iter().map(|e| e.vector().length_squared()).sum();
        self.area() * sides / 36.0
    }

    /// `p` is inside iff the three sub-triangle areas add up to the whole
    /// and `p` lies in the triangle's plane.
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        let Some(plane) = self.plane() else {
            return false;
        };
        if !approx_eq(plane.distance(p), 0.0) {
            return false;
        }
        let parts = Self::new(p, self.a, self.b).area()
            + Self::new(p, self.b, self.c).area()
            + Self::new(p, self.c, self.a).area();
        approx_eq(self.area(), parts)
    }

    /// Crossing point of `segment` with the triangle, if any.
    #[must_use]
    pub fn intersect_segment(&self, segment: &Segment) -> Option<Vec3> {
        let hit = self.plane()?.intersect_line(&segment.line())?;
        (self.contains(hit) && segment.aabb().contains_point(hit)).then_some(hit)
    }

    #[must_use]
    pub fn is_crossed_by(&self, segment: &Segment) -> bool {
        self.intersect_segment(segment).is_some()
    }

    /// Chord cut out of the triangle by `plane`, if the plane crosses it.
    #[must_use]
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Segment> {
        let mut points: Vec<Vec3> = Vec::with_capacity(3);
        for edge in self.edges() {
            let da = plane.signed_distance(edge.a);
            let db = plane.signed_distance(edge.b);
            if da == 0.0 {
                points.push(edge.a);
            } else if da * db < 0.0 {
                points.push(edge.a + edge.vector() * (da / (da - db)));
            }
        }
        points.dedup_by(|p, q| p.distance(*q) < f64::EPSILON);
        match points.as_slice() {
            [p, q] if p.distance(*q) > f64::EPSILON => Some(Segment::new(*p, *q)),
            _ => None,
        }
    }

    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.a + offset, self.b + offset, self.c + offset)
    }

    #[must_use]
    pub fn rotated(&self, rotation: Vec3, pivot: Vec3) -> Self {
        Self::new(
            self.a.rotate_about(rotation, pivot),
            self.b.rotate_about(rotation, pivot),
            self.c.rotate_about(rotation, pivot),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Triangle {
        Triangle::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0))
    }

    #[test]
    fn centroid_is_contained() {
        let t = unit();
        assert!(t.contains(t.centroid()));
    }

    #[test]
    fn point_off_plane_is_not_contained() {
        let t = unit();
        let far = t.centroid() + Vec3::Z * 50.0;
        assert!(!t.contains(far));
    }

    #[test]
    fn point_outside_edges_is_not_contained() {
        assert!(!unit().contains(Vec3::new(1.5, 1.5, 0.0)));
    }

    #[test]
    fn segment_through_face() {
        let t = unit();
        let through = Segment::new(Vec3::new(0.5, 0.5, -1.0), Vec3::new(0.5, 0.5, 1.0));
        let short = Segment::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.5, 0.5, 1.0));
        assert!(t.intersect_segment(&through).unwrap().approx_eq(Vec3::new(0.5, 0.5, 0.0)));
        assert!(!t.is_crossed_by(&short));
    }

    #[test]
    fn plane_cuts_chord() {
        let t = unit();
        let cut = Plane::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X).unwrap();
        let chord = t.intersect_plane(&cut).unwrap();
        assert!((chord.length() - 1.0).abs() < 1e-12);
        let miss = Plane::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X).unwrap();
        assert!(t.intersect_plane(&miss).is_none());
    }

    #[test]
    fn equilateral_polar_moment() {
        // side s: J = A s² / 12 with A = √3 s² / 4
        let s = 2.0_f64;
        let t = Triangle::new(Vec3::ZERO, Vec3::new(s, 0.0, 0.0), Vec3::new(1.0, 3f64.sqrt(), 0.0));
        let expected = t.area() * s * s / 12.0;
        assert!((t.polar_moment() - expected).abs() < 1e-12);
    }
}
