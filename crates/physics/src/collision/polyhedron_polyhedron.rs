//! Polyhedron-polyhedron collision detection and response
//!
//! Two convex solids overlap when an edge of either crosses a face of the
//! other. Both directions are checked since neither body need enclose the
//! other's edges. The contact point is the mean crossing point. The normal
//! is the face normal (of either body) along which the two projections
//! overlap least, turned to point from the second body toward the first;
//! that overlap is the depth.

use super::response::{resolve_contact, split_by_inverse_mass, PolyhedronResponder};
use super::{Contact, ContactSettings, Intersection};
use crate::body::{Polyhedron, PolyhedronPose, Snapshot};
use crate::error::{PhysicsError, PhysicsResult};
use crate::types::Vec3;

/// Mean of every point where an edge of one pose crosses a face of the other.
fn mean_crossing(a: &PolyhedronPose, b: &PolyhedronPose) -> Option<Vec3> {
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    for (edges_of, faces_of) in [(a, b), (b, a)] {
        for edge in edges_of.edges() {
            for triangle in &faces_of.triangles {
                if let Some(hit) = triangle.intersect_segment(&edge) {
                    sum += hit;
                    count += 1;
                }
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}

fn extent_along(vertices: &[Vec3], axis: Vec3) -> (f64, f64) {
    vertices
        .iter()
        .map(|v| v.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t)))
}

/// Face normal of least overlap, oriented from `b` toward `a`, with that
/// overlap.
fn least_overlap(a: &PolyhedronPose, b: &PolyhedronPose) -> Option<(Vec3, f64)> {
    a.outward_planes()
        .chain(b.outward_planes())
        .map(|plane| {
            let axis = plane.normal;
            let (a_lo, a_hi) = extent_along(&a.vertices, axis);
            let (b_lo, b_hi) = extent_along(&b.vertices, axis);
            let overlap = a_hi.min(b_hi) - a_lo.max(b_lo);
            let toward_a = if (a.center - b.center).dot(axis) < 0.0 { -axis } else { axis };
            (toward_a, overlap)
        })
        .min_by(|x, y| x.1.total_cmp(&y.1))
}

pub(crate) fn contact_between(a: &PolyhedronPose, b: &PolyhedronPose) -> Intersection {
    if !a.aabb().overlaps(&b.aabb()) {
        return Intersection::None;
    }
    let Some(point) = mean_crossing(a, b) else {
        return Intersection::None;
    };
    let (normal, depth) = least_overlap(a, b).unwrap_or((Vec3::ZERO, 0.0));
    Intersection::Polyhedra {
        point,
        normal,
        depth: depth.max(0.0),
    }
}

pub fn detect_polyhedron_polyhedron(a: &Polyhedron, b: &Polyhedron, snapshot: Snapshot, dt: f64) -> Intersection {
    if std::ptr::eq(a, b) {
        return Intersection::None;
    }
    contact_between(&a.pose(snapshot, dt), &b.pose(snapshot, dt))
}

pub fn resolve_polyhedron_polyhedron(
    a: &mut Polyhedron,
    b: &mut Polyhedron,
    hit: &Intersection,
    settings: &ContactSettings,
) -> PhysicsResult<bool> {
    let Intersection::Polyhedra { point, normal, depth } = *hit else {
        return Ok(false);
    };
    if normal == Vec3::ZERO {
        return Err(PhysicsError::Degenerate("polyhedra contact has no normal"));
    }
    let contact = Contact::new(point, normal, depth, a.material(), b.material());
    let (pose_a, pose_b) = (a.pose(Snapshot::Predicted, settings.dt), b.pose(Snapshot::Predicted, settings.dt));
    let slices = settings.inertia_slices;
    let mut ra = PolyhedronResponder { body: a, pose: pose_a, slices };
    let mut rb = PolyhedronResponder { body: b, pose: pose_b, slices };
    let j = resolve_contact(&mut ra, &mut rb, &contact)?;
    Ok(j > 0.0)
}

pub(crate) fn separate_polyhedra(a: &mut Polyhedron, b: &mut Polyhedron, settings: &ContactSettings) {
    let Intersection::Polyhedra { normal, depth, .. } = detect_polyhedron_polyhedron(a, b, Snapshot::Current, 0.0) else {
        return;
    };
    if depth <= settings.position_slop || normal == Vec3::ZERO {
        return;
    }
    if let Some((da, db)) = split_by_inverse_mass(1.0 / a.mass(), 1.0 / b.mass(), depth) {
        a.translate(normal * da);
        b.translate(-(normal * db));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Primitive;
    use crate::material::Material;

    fn cube_at(x: f64, vx: f64) -> Polyhedron {
        let surface = Primitive::Cube.builder(1.0, Vec3::new(x, 0.1 * x, 0.05 * x));
        Polyhedron::new(surface, Vec3::new(vx, 0.0, 0.0), Vec3::ZERO, Material::WOOD).unwrap()
    }

    #[test]
    fn separated_cubes_are_clear() {
        let (a, b) = (cube_at(0.0, 0.0), cube_at(2.0, 0.0));
        assert!(!detect_polyhedron_polyhedron(&a, &b, Snapshot::Predicted, 0.01).is_some());
    }

    #[test]
    fn overlapping_cubes_meet_along_x() {
        let (a, b) = (cube_at(0.0, 0.0), cube_at(0.9, 0.0));
        match detect_polyhedron_polyhedron(&a, &b, Snapshot::Current, 0.0) {
            Intersection::Polyhedra { normal, depth, point } => {
                // normal from b toward a
                assert!(normal.approx_eq(-Vec3::X), "normal {normal:?}");
                assert!((depth - 0.1).abs() < 1e-9, "depth {depth}");
                assert!(point.x > 0.3 && point.x < 0.6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn a_cube_never_hits_itself() {
        let a = cube_at(0.0, 0.0);
        assert!(!detect_polyhedron_polyhedron(&a, &a, Snapshot::Current, 0.0).is_some());
    }

    #[test]
    fn approaching_cubes_conserve_momentum() {
        let mut a = cube_at(0.0, 3.0);
        let mut b = cube_at(1.02, -3.0);
        let settings = ContactSettings::default();
        let hit = detect_polyhedron_polyhedron(&a, &b, Snapshot::Predicted, settings.dt);
        assert!(hit.is_some());
        assert!(resolve_polyhedron_polyhedron(&mut a, &mut b, &hit, &settings).unwrap());
        let p = a.kinematics().velocity * a.mass() + b.kinematics().velocity * b.mass();
        assert!(p.length() < 1e-6, "momentum {p:?}");
        assert!(a.kinematics().velocity.x < 3.0);
    }

    #[test]
    fn overlap_is_pushed_apart() {
        let mut a = cube_at(0.0, 0.0);
        let mut b = cube_at(0.9, 0.0);
        separate_polyhedra(&mut a, &mut b, &ContactSettings::default());
        assert!(!matches!(
            detect_polyhedron_polyhedron(&a, &b, Snapshot::Current, 0.0),
            Intersection::Polyhedra { depth, .. } if depth > 1e-3
        ));
    }
}
