//! Bounding-box rejection run ahead of every narrow-phase test

use super::BodyRef;
use crate::body::Snapshot;

/// `false` when the bounding boxes at `snapshot` are disjoint, in which
/// case the bodies cannot touch.
pub fn may_touch(a: &BodyRef<'_>, b: &BodyRef<'_>, snapshot: Snapshot, dt: f64) -> bool {
    a.aabb(snapshot, dt).overlaps(&b.aabb(snapshot, dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Sphere;
    use crate::material::Material;
    use crate::types::Vec3;

    fn ball(x: f64, vx: f64) -> Sphere {
        Sphere::new(Vec3::new(x, 0.0, 0.0), Vec3::new(vx, 0.0, 0.0), Vec3::ZERO, 1.0, Material::WOOD)
            .unwrap()
    }

    #[test]
    fn distant_boxes_are_rejected() {
        let (a, b) = (ball(0.0, 0.0), ball(5.0, 0.0));
        assert!(!may_touch(&BodyRef::Sphere(&a), &BodyRef::Sphere(&b), Snapshot::Predicted, 0.01));
    }

    #[test]
    fn predicted_boxes_account_for_motion() {
        let (a, b) = (ball(0.0, 100.0), ball(2.5, 0.0));
        let (ra, rb) = (BodyRef::Sphere(&a), BodyRef::Sphere(&b));
        assert!(!may_touch(&ra, &rb, Snapshot::Current, 0.01));
        assert!(may_touch(&ra, &rb, Snapshot::Predicted, 0.01));
    }
}
