//! Sphere-polyhedron collision detection and response

use super::response::{resolve_contact, split_by_inverse_mass, PolyhedronResponder, SphereResponder};
use super::sphere_triangle::{deeper, sphere_triangle};
use super::{Contact, ContactSettings, Intersection};
use crate::body::{Polyhedron, PolyhedronPose, Snapshot, Sphere};
use crate::error::PhysicsResult;
use crate::types::Vec3;

/// Deepest sphere-face contact, normal pointing out of the polyhedron.
///
/// A sphere swallowed whole (centre inside, no face within reach) is pushed
/// out through the nearest face.
pub fn detect_sphere_polyhedron(
    sphere: &Sphere,
    polyhedron: &Polyhedron,
    snapshot: Snapshot,
    dt: f64,
) -> Intersection {
    if !sphere.aabb(snapshot, dt).overlaps(&polyhedron.aabb(snapshot, dt)) {
        return Intersection::None;
    }
    let pose = polyhedron.pose(snapshot, dt);
    contact_with_pose(sphere.center_at(snapshot, dt), sphere.radius(), &pose)
}

fn contact_with_pose(center: Vec3, radius: f64, pose: &PolyhedronPose) -> Intersection {
    let touching = pose
        .triangles
        .iter()
        .map(|t| outward(sphere_triangle(center, radius, t), pose))
        .fold(Intersection::None, deeper);
    if touching.is_some() || !pose.contains(center) {
        return touching;
    }
    pose.outward_planes()
        .map(|plane| (plane, -plane.signed_distance(center)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(Intersection::None, |(plane, inset)| Intersection::SpherePlane {
            point: plane.project(center),
            normal: plane.normal,
            depth: radius + inset,
        })
}

/// Face contacts report the face normal on the sphere's side; when the
/// centre sits inside the solid that side is the wrong one.
fn outward(hit: Intersection, pose: &PolyhedronPose) -> Intersection {
    match hit {
        Intersection::SpherePlane { point, normal, depth } if normal.dot(point - pose.center) < 0.0 => {
            Intersection::SpherePlane {
                point,
                normal: -normal,
                depth,
            }
        }
        other => other,
    }
}

pub fn resolve_sphere_polyhedron(
    sphere: &mut Sphere,
    polyhedron: &mut Polyhedron,
    hit: &Intersection,
    settings: &ContactSettings,
) -> PhysicsResult<bool> {
    let Intersection::SpherePlane { point, normal, depth } = *hit else {
        return Ok(false);
    };
    let contact = Contact::new(point, normal, depth, sphere.material(), polyhedron.material());
    let center = sphere.center_at(Snapshot::Predicted, settings.dt);
    let pose = polyhedron.pose(Snapshot::Predicted, settings.dt);
    let mut a = SphereResponder { sphere, center };
    let mut b = PolyhedronResponder {
        body: polyhedron,
        pose,
        slices: settings.inertia_slices,
    };
    let j = resolve_contact(&mut a, &mut b, &contact)?;
    Ok(j > 0.0)
}

pub(crate) fn separate_sphere_polyhedron(
    sphere: &mut Sphere,
    polyhedron: &mut Polyhedron,
    settings: &ContactSettings,
) {
    let Intersection::SpherePlane { normal, depth, .. } =
        detect_sphere_polyhedron(sphere, polyhedron, Snapshot::Current, 0.0)
    else {
        return;
    };
    if depth <= settings.position_slop {
        return;
    }
    if let Some((ds, dp)) = split_by_inverse_mass(1.0 / sphere.mass(), 1.0 / polyhedron.mass(), depth) {
        sphere.translate(normal * ds);
        polyhedron.translate(-(normal * dp));
    }
}
