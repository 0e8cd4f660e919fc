//! Sphere-sphere collision detection and response

use super::response::{friction_impulse, split_by_inverse_mass, SphereResponder};
use super::{Contact, ContactSettings, Intersection};
use crate::body::{Snapshot, Sphere};
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::Aabb;
use crate::types::Vec3;

/// Overlap of two spheres at `snapshot`. The normal points from `b` to `a`.
pub fn detect_sphere_sphere(a: &Sphere, b: &Sphere, snapshot: Snapshot, dt: f64) -> Intersection {
    if std::ptr::eq(a, b) {
        return Intersection::None;
    }
    let (pa, pb) = (a.center_at(snapshot, dt), b.center_at(snapshot, dt));
    if !Aabb::around_sphere(pa, a.radius()).overlaps(&Aabb::around_sphere(pb, b.radius())) {
        return Intersection::None;
    }
    let reach = a.radius() + b.radius();
    let distance = pa.distance(pb);
    if distance >= reach {
        return Intersection::None;
    }
    Intersection::Spheres {
        normal: (pa - pb).try_normalize().unwrap_or_default(),
        depth: reach - distance,
    }
}

/// Post-impact axial speeds of a 1-D two-body collision with restitution
/// `k`: `u₁ = ((ρ − k)·v₁ + (1 + k)·v₂) / (ρ + 1)` with `ρ = m₁/m₂`, and
/// symmetrically for `u₂`.
pub fn restitution_speeds(m1: f64, m2: f64, v1: f64, v2: f64, k: f64) -> (f64, f64) {
    let ratio = m1 / m2;
    let u1 = ((ratio - k) * v1 + (k + 1.0) * v2) / (ratio + 1.0);
    let inverse = m2 / m1;
    let u2 = ((inverse - k) * v2 + (k + 1.0) * v1) / (inverse + 1.0);
    (u1, u2)
}

/// Exchanges axial momentum along the line between the predicted centres,
/// then applies friction at the contact point. Returns `false` when the
/// spheres already separate.
pub fn resolve_sphere_sphere(a: &mut Sphere, b: &mut Sphere, settings: &ContactSettings) -> PhysicsResult<bool> {
    let dt = settings.dt;
    let (pa, pb) = (a.center_at(Snapshot::Predicted, dt), b.center_at(Snapshot::Predicted, dt));
    let axis = (pa - pb)
        .try_normalize()
        .ok_or(PhysicsError::Degenerate("sphere centres coincide"))?;
    let point = pa - axis * a.radius();
    let contact = Contact::new(point, axis, 0.0, a.material(), b.material());

    let relative = a.velocity_at(point, pa) - b.velocity_at(point, pb);
    let (v1, v2) = (a.kinematics().velocity.dot(axis), b.kinematics().velocity.dot(axis));
    if v1 - v2 >= 0.0 {
        return Ok(false);
    }
    let (u1, _) = restitution_speeds(a.mass(), b.mass(), v1, v2, contact.restitution);
    let j = a.mass() * (u1 - v1);

    let mut ra = SphereResponder { sphere: a, center: pa };
    let mut rb = SphereResponder { sphere: b, center: pb };
    let friction = friction_impulse(&ra, &rb, &contact, relative, j)?;
    ra.sphere.apply_impulse(axis * j, point, pa);
    rb.sphere.apply_impulse(-(axis * j), point, pb);
    if friction != Vec3::ZERO {
        ra.sphere.apply_impulse(friction, point, pa);
        rb.sphere.apply_impulse(-friction, point, pb);
    }
    Ok(true)
}

/// Pushes overlapping spheres apart along the centre line at the current
/// snapshot.
pub(crate) fn separate_spheres(a: &mut Sphere, b: &mut Sphere, settings: &ContactSettings) -> PhysicsResult<()> {
    let Intersection::Spheres { normal, depth } = detect_sphere_sphere(a, b, Snapshot::Current, 0.0) else {
        return Ok(());
    };
    if depth <= settings.position_slop {
        return Ok(());
    }
    let normal = normal
        .try_normalize()
        .ok_or(PhysicsError::Degenerate("sphere centres coincide"))?;
    if let Some((da, db)) = split_by_inverse_mass(1.0 / a.mass(), 1.0 / b.mass(), depth) {
        a.translate(normal * da);
        b.translate(-(normal * db));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn ball(x: f64, vx: f64, material: Material) -> Sphere {
        Sphere::new(Vec3::new(x, 0.0, 0.0), Vec3::new(vx, 0.0, 0.0), Vec3::ZERO, 0.5, material).unwrap()
    }

    fn settings() -> ContactSettings {
        ContactSettings::default()
    }

    #[test]
    fn separated_spheres_do_not_intersect() {
        let (a, b) = (ball(0.0, 0.0, Material::WOOD), ball(3.0, 0.0, Material::WOOD));
        assert!(!detect_sphere_sphere(&a, &b, Snapshot::Predicted, 0.01).is_some());
    }

    #[test]
    fn sphere_never_hits_itself() {
        let a = ball(0.0, 0.0, Material::WOOD);
        assert!(!detect_sphere_sphere(&a, &a, Snapshot::Current, 0.01).is_some());
    }

    #[test]
    fn overlap_reports_depth_and_normal() {
        let (a, b) = (ball(0.0, 0.0, Material::WOOD), ball(0.8, 0.0, Material::WOOD));
        match detect_sphere_sphere(&a, &b, Snapshot::Current, 0.0) {
            Intersection::Spheres { normal, depth } => {
                assert!(normal.approx_eq(-Vec3::X));
                assert!((depth - 0.2).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn elastic_head_on_exchanges_speeds() {
        // wood: restitution 1, friction 0
        let mut a = ball(0.0, 2.0, Material::WOOD);
        let mut b = ball(0.99, -2.0, Material::WOOD);
        assert!(resolve_sphere_sphere(&mut a, &mut b, &settings()).unwrap());
        assert!((a.kinematics().velocity.x + 2.0).abs() < 1e-9);
        assert!((b.kinematics().velocity.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn inelastic_head_on_moves_together() {
        let clay = Material::new(1000.0, 0.0, 0.0);
        let mut a = ball(0.0, 2.0, clay);
        let mut b = ball(0.99, -2.0, clay);
        resolve_sphere_sphere(&mut a, &mut b, &settings()).unwrap();
        let (ua, ub) = (a.kinematics().velocity.x, b.kinematics().velocity.x);
        assert!((ua - ub).abs() < 1e-9);
        assert!(ua.abs() < 1e-9);
    }

    #[test]
    fn restitution_conserves_momentum() {
        let (u1, u2) = restitution_speeds(2.0, 5.0, 3.0, -1.0, 0.6);
        assert!((2.0 * u1 + 5.0 * u2 - (2.0 * 3.0 - 5.0)).abs() < 1e-12);
        assert!(((u2 - u1) - 0.6 * 4.0).abs() < 1e-12);
    }

    #[test]
    fn overlapping_spheres_are_pushed_apart() {
        let mut a = ball(0.0, 0.0, Material::WOOD);
        let mut b = ball(0.6, 0.0, Material::WOOD);
        separate_spheres(&mut a, &mut b, &settings()).unwrap();
        assert!((b.center().x - a.center().x - 1.0).abs() < 1e-12);
        assert!((a.center().x + 0.2).abs() < 1e-12);
    }

    #[test]
    fn coincident_centres_are_degenerate() {
        let mut a = ball(0.0, 1.0, Material::WOOD);
        let mut b = ball(0.0, 1.0, Material::WOOD);
        assert!(matches!(
            resolve_sphere_sphere(&mut a, &mut b, &settings()),
            Err(PhysicsError::Degenerate(_))
        ));
    }
}
