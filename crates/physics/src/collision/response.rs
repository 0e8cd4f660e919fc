//! Unified collision response
//!
//! Every pair reduces to two [`CollisionResponder`]s and a [`Contact`]. The
//! normal impulse restores the averaged restitution along the normal; the
//! friction impulse is the smaller of the Coulomb bound and the impulse
//! that would stop tangential sliding outright.

use super::Contact;
use crate::body::{Polyhedron, PolyhedronPose, Sphere, Wall};
use crate::error::{PhysicsError, PhysicsResult};
use crate::types::Vec3;

/// Anything that can take part in an impulse exchange.
pub trait CollisionResponder {
    /// Centre the lever arms are measured from.
    fn center(&self) -> Vec3;

    /// Velocity of the body material at `point`.
    fn velocity_at(&self, point: Vec3) -> Vec3;

    /// Zero for immovable bodies.
    fn inverse_mass(&self) -> f64;

    /// Inverse moment of inertia about the unit `axis` through the centre.
    fn inverse_inertia(&self, axis: Vec3) -> PhysicsResult<f64>;

    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) -> PhysicsResult<()>;
}

/// A sphere seen at the centre it has in the snapshot being resolved.
pub struct SphereResponder<'a> {
    pub sphere: &'a mut Sphere,
    pub center: Vec3,
}

impl CollisionResponder for SphereResponder<'_> {
    fn center(&self) -> Vec3 {
        self.center
    }

    fn velocity_at(&self, point: Vec3) -> Vec3 {
        self.sphere.velocity_at(point, self.center)
    }

    fn inverse_mass(&self) -> f64 {
        1.0 / self.sphere.mass()
    }

    fn inverse_inertia(&self, _axis: Vec3) -> PhysicsResult<f64> {
        Ok(1.0 / self.sphere.inertia())
    }

    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) -> PhysicsResult<()> {
        self.sphere.apply_impulse(impulse, point, self.center);
        Ok(())
    }
}

/// A polyhedron together with the pose it is resolved at.
pub struct PolyhedronResponder<'a> {
    pub body: &'a mut Polyhedron,
    pub pose: PolyhedronPose,
    pub slices: usize,
}

impl CollisionResponder for PolyhedronResponder<'_> {
    fn center(&self) -> Vec3 {
        self.pose.center
    }

    fn velocity_at(&self, point: Vec3) -> Vec3 {
        self.body.velocity_at(point, self.pose.center)
    }

    fn inverse_mass(&self) -> f64 {
        1.0 / self.body.mass()
    }

    fn inverse_inertia(&self, axis: Vec3) -> PhysicsResult<f64> {
        Ok(1.0 / self.body.inertia_about(axis, &self.pose, self.slices)?)
    }

    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) -> PhysicsResult<()> {
        self.body.apply_impulse(impulse, point, &self.pose, self.slices)
    }
}

impl CollisionResponder for &Wall {
    fn center(&self) -> Vec3 {
        self.plane().point
    }

    fn velocity_at(&self, _point: Vec3) -> Vec3 {
        Vec3::ZERO // Static
    }

    fn inverse_mass(&self) -> f64 {
        0.0 // Infinite mass
    }

    fn inverse_inertia(&self, _axis: Vec3) -> PhysicsResult<f64> {
        Ok(0.0)
    }

    fn apply_impulse(&mut self, _impulse: Vec3, _point: Vec3) -> PhysicsResult<()> {
        Ok(())
    }
}

/// `1/m + |r × d|² / J`, with `J` taken about the axis along `r × d`.
pub fn effective_inverse_mass<R: CollisionResponder + ?Sized>(
    body: &R,
    point: Vec3,
    direction: Vec3,
) -> PhysicsResult<f64> {
    let arm = (point - body.center()).cross(direction);
    let rotational = match arm.try_normalize() {
        Some(axis) => arm.length_squared() * body.inverse_inertia(axis)?,
        None => 0.0,
    };
    Ok(body.inverse_mass() + rotational)
}

/// Friction impulse on `a` (its opposite goes to `b`) for a contact whose
/// normal impulse was `normal_impulse` and whose pre-impulse relative
/// velocity at the contact was `relative`.
pub fn friction_impulse<A, B>(
    a: &A,
    b: &B,
    contact: &Contact,
    relative: Vec3,
    normal_impulse: f64,
) -> PhysicsResult<Vec3>
where
    A: CollisionResponder + ?Sized,
    B: CollisionResponder + ?Sized,
{
    if contact.friction <= 0.0 || normal_impulse <= 0.0 {
        return Ok(Vec3::ZERO);
    }
    let sliding = relative.reject_from(contact.normal);
    let Some(tangent) = sliding.try_normalize() else {
        return Ok(Vec3::ZERO);
    };
    let k = effective_inverse_mass(a, contact.point, tangent)?
        + effective_inverse_mass(b, contact.point, tangent)?;
    if !(k > 0.0) {
        return Ok(Vec3::ZERO);
    }
    let kinetic = contact.friction * normal_impulse;
    let sticking = sliding.length() / k;
    Ok(-tangent * kinetic.min(sticking))
}

/// Applies the restitution and friction impulses for `contact`, returning
/// the normal impulse magnitude. Nothing is applied when the bodies already
/// separate along the normal.
pub fn resolve_contact<A, B>(a: &mut A, b: &mut B, contact: &Contact) -> PhysicsResult<f64>
where
    A: CollisionResponder + ?Sized,
    B: CollisionResponder + ?Sized,
{
    let point = contact.point;
    let normal = contact
        .normal
        .try_normalize()
        .ok_or(PhysicsError::Degenerate("contact normal has no direction"))?;
    let relative = a.velocity_at(point) - b.velocity_at(point);
    let approach = relative.dot(normal);
    if approach >= 0.0 {
        return Ok(0.0);
    }

    let k = effective_inverse_mass(a, point, normal)? + effective_inverse_mass(b, point, normal)?;
    if !(k > 0.0 && k.is_finite()) {
        return Err(PhysicsError::Degenerate("contact has no effective mass"));
    }
    let j = -(1.0 + contact.restitution) * approach / k;
    let friction = friction_impulse(a, b, contact, relative, j)?;

    let impulse = normal * j;
    a.apply_impulse(impulse, point)?;
    b.apply_impulse(-impulse, point)?;
    if friction != Vec3::ZERO {
        a.apply_impulse(friction, point)?;
        b.apply_impulse(-friction, point)?;
    }
    Ok(j)
}

/// How far each body moves to clear `depth` of overlap, split by inverse
/// mass. `None` when neither body can move.
pub(crate) fn split_by_inverse_mass(inv_a: f64, inv_b: f64, depth: f64) -> Option<(f64, f64)> {
    let total = inv_a + inv_b;
    (total > 0.0).then(|| (depth * inv_a / total, depth * inv_b / total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn resting_ball(velocity: Vec3) -> Sphere {
        Sphere::new(Vec3::new(0.0, 1.0, 0.0), velocity, Vec3::ZERO, 1.0, Material::WOOD).unwrap()
    }

    fn floor() -> Wall {
        Wall::new(
            [
                Vec3::new(-5.0, 0.0, -5.0),
                Vec3::new(5.0, 0.0, -5.0),
                Vec3::new(5.0, 0.0, 5.0),
                Vec3::new(-5.0, 0.0, 5.0),
            ],
            Material::WOOD,
        )
        .unwrap()
    }

    fn floor_contact(friction: f64, restitution: f64) -> Contact {
        Contact {
            point: Vec3::ZERO,
            normal: Vec3::Y,
            depth: 0.0,
            restitution,
            friction,
        }
    }

    #[test]
    fn elastic_bounce_off_wall() {
        let mut ball = resting_ball(Vec3::new(0.0, -3.0, 0.0));
        let wall = floor();
        let mut a = SphereResponder { center: ball.center(), sphere: &mut ball };
        let j = resolve_contact(&mut a, &mut &wall, &floor_contact(0.0, 1.0)).unwrap();
        assert!(j > 0.0);
        assert!((ball.kinematics().velocity.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn separating_bodies_are_left_alone() {
        let mut ball = resting_ball(Vec3::new(0.0, 2.0, 0.0));
        let wall = floor();
        let mut a = SphereResponder { center: ball.center(), sphere: &mut ball };
        let j = resolve_contact(&mut a, &mut &wall, &floor_contact(0.5, 1.0)).unwrap();
        assert_eq!(j, 0.0);
        assert_eq!(ball.kinematics().velocity, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn friction_never_reverses_sliding() {
        // huge friction: the sticking bound wins and the contact point stops
        let mut ball = resting_ball(Vec3::new(2.0, -1.0, 0.0));
        let wall = floor();
        let mut a = SphereResponder { center: ball.center(), sphere: &mut ball };
        resolve_contact(&mut a, &mut &wall, &floor_contact(100.0, 0.0)).unwrap();
        let contact_velocity = ball.velocity_at(Vec3::ZERO, ball.center());
        assert!(contact_velocity.x.abs() < 1e-9);
        // a rolling sphere keeps 5/7 of its speed
        assert!((ball.kinematics().velocity.x - 2.0 * 5.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn split_is_proportional_to_inverse_mass() {
        let (a, b) = split_by_inverse_mass(1.0, 3.0, 0.4).unwrap();
        assert!((a - 0.1).abs() < 1e-12 && (b - 0.3).abs() < 1e-12);
        assert!(split_by_inverse_mass(0.0, 0.0, 1.0).is_none());
    }
}
