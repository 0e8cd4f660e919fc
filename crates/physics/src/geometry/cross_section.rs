use super::{Line, Segment, Triangle};
use crate::types::Vec3;

/// Flat convex polygon rebuilt from its boundary chords.
///
/// The polygon is fan-triangulated from the first chord's start point; chords
/// passing through that point contribute zero-area triangles.
#[derive(Clone, Debug)]
pub struct CrossSection {
    triangles: Vec<Triangle>,
}

impl CrossSection {
    /// `None` when there are no chords to build from.
    #[must_use]
    pub fn from_chords(chords: &[Segment]) -> Option<Self> {
        let anchor = chords.first()?.a;
        let triangles = chords
            .iter()
            .map(|chord| Triangle::new(anchor, chord.a, chord.b))
            .collect();
        Some(Self { triangles })
    }

    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Area-weighted centroid; `None` for a zero-area section.
    #[must_use]
    pub fn centroid(&self) -> Option<Vec3> {
        let area = self.area();
        if area <= 0.0 {
            return None;
        }
        let weighted = self
            .triangles
            .iter()
            .fold(Vec3::ZERO, |acc, t| acc + t.centroid() * t.area());
        Some(weighted / area)
    }

    /// Polar moment per unit areal density about the section's own centroid
    /// (parallel-axis sum over the fan triangles).
    #[must_use]
    pub fn polar_moment(&self) -> f64 {
        let Some(center) = self.centroid() else {
            return 0.0;
        };
        self.triangles
            .iter()
            .map(|t| t.polar_moment() + t.area() * t.centroid().distance(center).powi(2))
            .sum()
    }

    /// Polar moment per unit areal density about `axis`, which is taken to be
    /// perpendicular to the section.
    #[must_use]
    pub fn polar_moment_about(&self, axis: &Line) -> f64 {
        let Some(center) = self.centroid() else {
            return 0.0;
        };
        let d = axis.distance(center);
        self.polar_moment() + self.area() * d * d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_chords() -> Vec<Segment> {
        let p = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        // scrambled order and orientation, as slicing produces them
        vec![
            Segment::new(p[2], p[3]),
            Segment::new(p[1], p[0]),
            Segment::new(p[3], p[0]),
            Segment::new(p[1], p[2]),
        ]
    }

    #[test]
    fn square_area_and_centroid() {
        let section = CrossSection::from_chords(&unit_square_chords()).unwrap();
        assert!((section.area() - 1.0).abs() < 1e-12);
        assert!(section.centroid().unwrap().approx_eq(Vec3::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn square_polar_moment() {
        let section = CrossSection::from_chords(&unit_square_chords()).unwrap();
        // side⁴ / 6 about the centre
        assert!((section.polar_moment() - 1.0 / 6.0).abs() < 1e-12);
        let corner_axis = Line::new(Vec3::ZERO, Vec3::Z);
        assert!((section.polar_moment_about(&corner_axis) - (1.0 / 6.0 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn no_chords_no_section() {
        assert!(CrossSection::from_chords(&[]).is_none());
    }
}
