use super::Triangle;
use crate::types::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tetrahedron {
    pub apex: Vec3,
    pub base: Triangle,
}

impl Tetrahedron {
    #[must_use]
    pub const fn new(apex: Vec3, base: Triangle) -> Self {
        Self { apex, base }
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        let Triangle { a, b, c } = self.base;
        ((a - self.apex).dot((b - self.apex).cross(c - self.apex)) / 6.0).abs()
    }

    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        (self.apex + self.base.a + self.base.b + self.base.c) * 0.25
    }
}
