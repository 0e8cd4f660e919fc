use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::{Aabb, Plane, Triangle};
use crate::material::Material;
use crate::types::{approx_eq, Vec3};

/// Immovable quadrilateral, stored as two triangles sharing one plane.
///
/// A wall with a `strength` is a gravity plate: it pulls every point whose
/// orthogonal projection falls inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    corners: [Vec3; 4],
    triangles: [Triangle; 2],
    plane: Plane,
    material: Material,
    strength: Option<f64>,
}

impl Wall {
    /// Corners are given in order around the quad, and must be coplanar.
    pub fn new(corners: [Vec3; 4], material: Material) -> PhysicsResult<Self> {
        let [a, b, c, d] = corners;
        let first = Triangle::new(a, b, c);
        let second = Triangle::new(a, c, d);
        let plane = first
            .plane()
            .or_else(|| second.plane())
            .ok_or_else(|| PhysicsError::ImpossibleObject("wall corners are collinear".into()))?;
        if !corners.iter().all(|p| p.is_finite()) {
            return Err(PhysicsError::ImpossibleObject("wall corners must be finite".into()));
        }
        if !corners.iter().all(|p| approx_eq(plane.distance(*p), 0.0)) {
            return Err(PhysicsError::ImpossibleObject("wall corners are not coplanar".into()));
        }
        Ok(Self {
            corners,
            triangles: [first, second],
            plane,
            material,
            strength: None,
        })
    }

    /// A wall that also contributes an attracting field of magnitude `strength`.
    pub fn gravity_plate(corners: [Vec3; 4], strength: f64, material: Material) -> PhysicsResult<Self> {
        if !strength.is_finite() {
            return Err(PhysicsError::ImpossibleObject("plate strength must be finite".into()));
        }
        let mut wall = Self::new(corners, material)?;
        wall.strength = Some(strength);
        Ok(wall)
    }

    pub fn corners(&self) -> &[Vec3; 4] {
        &self.corners
    }

    pub fn triangles(&self) -> &[Triangle; 2] {
        &self.triangles
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn strength(&self) -> Option<f64> {
        self.strength
    }

    pub fn is_gravity_plate(&self) -> bool {
        self.strength.is_some()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.corners)
    }

    /// Field this plate exerts at `p`; zero for plain walls, for points
    /// whose projection misses the plate, and for points on the plate.
    pub fn field_at(&self, p: Vec3) -> Vec3 {
        let Some(strength) = self.strength else {
            return Vec3::ZERO;
        };
        let foot = self.plane.project(p);
        if !self.triangles.iter().any(|t| t.contains(foot)) {
            return Vec3::ZERO;
        }
        (foot - p)
            .try_normalize()
            .map_or(Vec3::ZERO, |towards| towards * strength)
    }
}

/// Acceleration field: uniform gravity plus every gravity plate.
#[derive(Copy, Clone, Debug)]
pub struct Field<'a> {
    pub gravity: Vec3,
    pub walls: &'a [Wall],
}

impl<'a> Field<'a> {
    pub fn new(gravity: Vec3, walls: &'a [Wall]) -> Self {
        Self { gravity, walls }
    }

    pub fn acceleration_at(&self, p: Vec3) -> Vec3 {
        self.walls
            .iter()
            .fold(self.gravity, |acc, wall| acc + wall.field_at(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> [Vec3; 4] {
        [
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let line = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Vec3::X * 3.0];
        assert!(matches!(
            Wall::new(line, Material::STONE),
            Err(PhysicsError::ImpossibleObject(_))
        ));
    }

    #[test]
    fn plain_wall_has_no_field() {
        let wall = Wall::new(floor(), Material::STONE).unwrap();
        assert_eq!(wall.field_at(Vec3::Y), Vec3::ZERO);
    }

    #[test]
    fn plate_pulls_points_above_it() {
        let plate = Wall::gravity_plate(floor(), 5.0, Material::STONE).unwrap();
        let pull = plate.field_at(Vec3::new(0.3, 2.0, 0.2));
        assert!(pull.approx_eq(Vec3::new(0.0, -5.0, 0.0)));
        let below = plate.field_at(Vec3::new(0.3, -2.0, 0.2));
        assert!(below.approx_eq(Vec3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn plate_ignores_points_beside_it() {
        let plate = Wall::gravity_plate(floor(), 5.0, Material::STONE).unwrap();
        assert_eq!(plate.field_at(Vec3::new(4.0, 1.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn field_sums_gravity_and_plates() {
        let walls = [Wall::gravity_plate(floor(), 2.0, Material::STONE).unwrap()];
        let field = Field::new(Vec3::new(0.0, -9.81, 0.0), &walls);
        let a = field.acceleration_at(Vec3::new(0.0, 1.0, 0.0));
        assert!((a.y + 11.81).abs() < 1e-12);
    }
}
