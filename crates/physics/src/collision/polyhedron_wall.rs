//! Polyhedron-wall collision detection and response
//!
//! A vertex has passed through the wall when the segment from it to the
//! body's centre crosses one of the wall's triangles.

use super::response::{resolve_contact, PolyhedronResponder};
use super::{Contact, ContactSettings, Intersection};
use crate::body::{Polyhedron, Snapshot, Wall};
use crate::error::PhysicsResult;
use crate::geometry::Segment;
use crate::types::Vec3;

pub fn detect_polyhedron_wall(polyhedron: &Polyhedron, wall: &Wall, snapshot: Snapshot, dt: f64) -> Intersection {
    let pose = polyhedron.pose(snapshot, dt);
    if !pose.aabb().overlaps(&wall.aabb()) {
        return Intersection::None;
    }
    let plane = wall.plane();
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    let mut deepest: Option<(Vec3, f64)> = None;
    for &vertex in &pose.vertices {
        let sightline = Segment::new(vertex, pose.center);
        if !wall.triangles().iter().any(|t| t.is_crossed_by(&sightline)) {
            continue;
        }
        let depth = plane.distance(vertex);
        sum += vertex;
        count += 1;
        if deepest.map_or(true, |(_, d)| depth > d) {
            deepest = Some((vertex, depth));
        }
    }
    let Some((vertex, depth)) = deepest else {
        return Intersection::None;
    };
    let normal = if plane.signed_distance(pose.center) < 0.0 {
        -plane.normal
    } else {
        plane.normal
    };
    Intersection::PolyhedronPlane {
        point: sum / count as f64,
        vertex,
        normal,
        depth,
    }
}

/// Impulse at the mean penetrating vertex; the wall takes none.
pub fn resolve_polyhedron_wall(
    polyhedron: &mut Polyhedron,
    wall: &Wall,
    hit: &Intersection,
    settings: &ContactSettings,
) -> PhysicsResult<bool> {
    let Intersection::PolyhedronPlane { point, normal, depth, .. } = *hit else {
        return Ok(false);
    };
    let contact = Contact::new(point, normal, depth, polyhedron.material(), wall.material());
    let pose = polyhedron.pose(Snapshot::Predicted, settings.dt);
    let mut responder = PolyhedronResponder {
        body: polyhedron,
        pose,
        slices: settings.inertia_slices,
    };
    let j = resolve_contact(&mut responder, &mut &*wall, &contact)?;
    Ok(j > 0.0)
}

/// Pulls the polyhedron back out until its deepest vertex sits on the wall.
pub(crate) fn separate_polyhedron_wall(polyhedron: &mut Polyhedron, wall: &Wall, settings: &ContactSettings) {
    if let Intersection::PolyhedronPlane { normal, depth, .. } =
        detect_polyhedron_wall(polyhedron, wall, Snapshot::Current, 0.0)
    {
        if depth > settings.position_slop {
            polyhedron.translate(normal * depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Primitive;
    use crate::material::Material;

    fn floor(material: Material) -> Wall {
        Wall::new(
            [
                Vec3::new(-3.0, 0.0, -3.0),
                Vec3::new(3.0, 0.0, -3.0),
                Vec3::new(3.0, 0.0, 3.0),
                Vec3::new(-3.0, 0.0, 3.0),
            ],
            material,
        )
        .unwrap()
    }

    fn body(primitive: Primitive, height: f64, velocity: Vec3, material: Material) -> Polyhedron {
        let surface = primitive.builder(1.0, Vec3::new(0.0, height, 0.0));
        Polyhedron::new(surface, velocity, Vec3::ZERO, material).unwrap()
    }

    #[test]
    fn hovering_cube_is_clear() {
        let cube = body(Primitive::Cube, 1.0, Vec3::ZERO, Material::WOOD);
        assert!(!detect_polyhedron_wall(&cube, &floor(Material::WOOD), Snapshot::Predicted, 0.01).is_some());
    }

    #[test]
    fn resting_cube_touches_with_zero_depth() {
        let cube = body(Primitive::Cube, 0.5, Vec3::ZERO, Material::WOOD);
        match detect_polyhedron_wall(&cube, &floor(Material::WOOD), Snapshot::Current, 0.0) {
            Intersection::PolyhedronPlane { point, normal, depth, .. } => {
                assert!(depth.abs() < 1e-12);
                assert!(normal.approx_eq(Vec3::Y));
                assert!(point.approx_eq(Vec3::ZERO));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn flat_landing_bounces_without_spin() {
        let wall = floor(Material::WOOD);
        let mut cube = body(Primitive::Cube, 0.51, Vec3::new(0.0, -3.0, 0.0), Material::WOOD);
        let settings = ContactSettings::default();
        let hit = detect_polyhedron_wall(&cube, &wall, Snapshot::Predicted, settings.dt);
        assert!(resolve_polyhedron_wall(&mut cube, &wall, &hit, &settings).unwrap());
        assert!((cube.kinematics().velocity.y - 3.0).abs() < 1e-9);
        assert!(cube.kinematics().angular_velocity.length() < 1e-9);
    }

    #[test]
    fn sliding_landing_picks_up_spin() {
        let wall = floor(Material::STONE);
        let mut tip = body(Primitive::Octahedron, 0.51, Vec3::new(2.0, -3.0, 0.0), Material::STONE);
        let settings = ContactSettings::default();
        let hit = detect_polyhedron_wall(&tip, &wall, Snapshot::Predicted, settings.dt);
        assert!(resolve_polyhedron_wall(&mut tip, &wall, &hit, &settings).unwrap());
        assert!(tip.kinematics().velocity.x < 2.0);
        assert!(tip.kinematics().angular_velocity.z < 0.0);
    }

    #[test]
    fn sunk_cube_is_pulled_out() {
        let wall = floor(Material::WOOD);
        let mut cube = body(Primitive::Cube, 0.4, Vec3::ZERO, Material::WOOD);
        separate_polyhedron_wall(&mut cube, &wall, &ContactSettings::default());
        assert!((cube.center().y - 0.5).abs() < 1e-9);
        assert!(cube.vertices().iter().all(|v| v.y > -1e-9));
    }
}
