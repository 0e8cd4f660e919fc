//! Sphere-triangle contact, and sphere-wall detection and response built on it

use super::response::{resolve_contact, SphereResponder};
use super::{Contact, ContactSettings, Intersection};
use crate::body::{Snapshot, Sphere, Wall};
use crate::error::PhysicsResult;
use crate::geometry::{Aabb, Triangle};
use crate::types::Vec3;

/// Contact of a sphere with one triangle.
///
/// The sphere touches when its centre is within `radius` of the plane and
/// either the tangent point lies in the triangle or an edge comes within
/// `radius` of the centre. The normal points toward the centre.
pub fn sphere_triangle(center: Vec3, radius: f64, triangle: &Triangle) -> Intersection {
    if !Aabb::around_sphere(center, radius).overlaps(&triangle.aabb()) {
        return Intersection::None;
    }
    let Some(plane) = triangle.plane() else {
        return Intersection::None;
    };
    let offset = plane.signed_distance(center);
    if offset.abs() > radius {
        return Intersection::None;
    }

    let tangent = plane.project(center);
    if triangle.contains(tangent) {
        let normal = if offset < 0.0 { -plane.normal } else { plane.normal };
        return Intersection::SpherePlane {
            point: tangent,
            normal,
            depth: radius - offset.abs(),
        };
    }

    let closest = triangle
        .edges()
        .iter()
        .map(|edge| edge.closest_point(center))
        .min_by(|p, q| p.distance(center).total_cmp(&q.distance(center)));
    match closest {
        Some(point) if point.distance(center) <= radius => Intersection::SpherePlane {
            point,
            normal: (center - point).try_normalize().unwrap_or(plane.normal),
            depth: radius - point.distance(center),
        },
        _ => Intersection::None,
    }
}

/// Keeps whichever of two records penetrates deeper.
pub(crate) fn deeper(best: Intersection, candidate: Intersection) -> Intersection {
    if candidate.is_some() && (!best.is_some() || candidate.depth() > best.depth()) {
        candidate
    } else {
        best
    }
}

pub fn detect_sphere_wall(sphere: &Sphere, wall: &Wall, snapshot: Snapshot, dt: f64) -> Intersection {
    if !sphere.aabb(snapshot, dt).overlaps(&wall.aabb()) {
        return Intersection::None;
    }
    let center = sphere.center_at(snapshot, dt);
    wall.triangles()
        .iter()
        .map(|t| sphere_triangle(center, sphere.radius(), t))
        .fold(Intersection::None, deeper)
}

/// Bounces the sphere off the wall using the contact found at the predicted
/// snapshot. The wall takes no impulse.
pub fn resolve_sphere_wall(
    sphere: &mut Sphere,
    wall: &Wall,
    hit: &Intersection,
    settings: &ContactSettings,
) -> PhysicsResult<bool> {
    let Intersection::SpherePlane { point, normal, depth } = *hit else {
        return Ok(false);
    };
    let contact = Contact::new(point, normal, depth, sphere.material(), wall.material());
    let center = sphere.center_at(Snapshot::Predicted, settings.dt);
    let mut responder = SphereResponder { sphere, center };
    let j = resolve_contact(&mut responder, &mut &*wall, &contact)?;
    Ok(j > 0.0)
}

/// Moves a sphere sunk into a wall back out along the contact normal.
pub(crate) fn separate_sphere_wall(sphere: &mut Sphere, wall: &Wall, settings: &ContactSettings) {
    if let Intersection::SpherePlane { normal, depth, .. } = detect_sphere_wall(sphere, wall, Snapshot::Current, 0.0) {
        if depth > settings.position_slop {
            sphere.translate(normal * depth);
        }
    }
}
