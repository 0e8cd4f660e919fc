//! # Body State Model
//!
//! Every movable body carries a [`Kinematics`] record. Queries that need the
//! body "as it will be at the end of this step" never mutate anything: they
//! combine the stored state with the [`PendingDelta`] the step would apply,
//! selected through a [`Snapshot`]. Detection and resolution both take a
//! `Snapshot`, so they read the same instant by construction.

mod builder;
mod polyhedron;
mod primitives;
mod sphere;
mod wall;

pub use builder::PolyhedronBuilder;
pub use polyhedron::{Face, Polyhedron, PolyhedronPose, PolyhedronSnapshot};
pub use primitives::Primitive;
pub use sphere::{Sphere, SphereSnapshot};
pub use wall::{Field, Wall};

use crate::types::Vec3;

/// Which instant of the current step a geometric query reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Snapshot {
    /// State as stored now.
    Current,
    /// State after this step's pending integration.
    Predicted,
}

/// Motion a body undergoes when the current step is integrated.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PendingDelta {
    pub translation: Vec3,
    /// Rotation vector: axis times angle in radians.
    pub rotation: Vec3,
}

impl PendingDelta {
    pub const NONE: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
    };
}

/// Centre of mass after `delta` is applied to `center`.
#[must_use]
pub fn predicted_position(center: Vec3, delta: PendingDelta) -> Vec3 {
    center + delta.translation
}

/// Kinematic part of a body's state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Field acceleration sampled at the end of the previous step.
    pub acceleration: Vec3,
}

impl Kinematics {
    #[must_use]
    pub fn new(position: Vec3, velocity: Vec3, angular_velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            angular_velocity,
            acceleration: Vec3::ZERO,
        }
    }

    /// Velocity once this step's field acceleration is applied.
    #[must_use]
    pub fn advanced_velocity(&self, dt: f64) -> Vec3 {
        self.velocity + self.acceleration * dt
    }

    /// `v·dt + ½·a·dt²` of translation, with `v` already advanced by the
    /// field, and `ω·dt` of rotation.
    #[must_use]
    pub fn pending(&self, dt: f64) -> PendingDelta {
        PendingDelta {
            translation: self.advanced_velocity(dt) * dt + self.acceleration * (0.5 * dt * dt),
            rotation: self.angular_velocity * dt,
        }
    }

    #[must_use]
    pub fn delta(&self, snapshot: Snapshot, dt: f64) -> PendingDelta {
        match snapshot {
            Snapshot::Current => PendingDelta::NONE,
            Snapshot::Predicted => self.pending(dt),
        }
    }

    #[must_use]
    pub fn position_at(&self, snapshot: Snapshot, dt: f64) -> Vec3 {
        predicted_position(self.position, self.delta(snapshot, dt))
    }

    /// Velocity of a point rigidly attached to the body, given where the
    /// centre is taken to be.
    #[must_use]
    pub fn point_velocity(&self, point: Vec3, center: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(point - center)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.angular_velocity.is_finite()
            && self.acceleration.is_finite()
    }

    /// Advances velocity by the field, then position with the new velocity.
    /// Returns the translation/rotation applied, which is exactly what
    /// [`Snapshot::Predicted`] reported.
    pub(crate) fn advance(&mut self, dt: f64) -> PendingDelta {
        let delta = self.pending(dt);
        self.velocity = self.advanced_velocity(dt);
        self.position = predicted_position(self.position, delta);
        delta
    }
}

/// An impulse the host asked to apply at the next integration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct QueuedImpulse {
    pub impulse: Vec3,
    pub point: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_snapshot_is_stored_position() {
        let mut k = Kinematics::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(5.0, 0.0, 0.0), Vec3::Y);
        k.acceleration = Vec3::new(0.0, -9.81, 0.0);
        assert_eq!(k.position_at(Snapshot::Current, 0.01), k.position);
    }

    #[test]
    fn advance_lands_on_prediction() {
        let mut k = Kinematics::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0), Vec3::ZERO);
        k.acceleration = Vec3::new(0.0, -10.0, 0.0);
        let predicted = k.position_at(Snapshot::Predicted, 0.1);
        k.advance(0.1);
        assert_eq!(k.position, predicted);
        assert!((k.velocity.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn velocity_advances_before_position() {
        let dt = 0.01;
        let mut k = Kinematics::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::ZERO);
        k.acceleration = Vec3::new(0.0, -9.81, 0.0);
        k.advance(dt);
        // v = a·dt, then y += v·dt + ½·a·dt²
        assert!((k.velocity.y + 0.0981).abs() < 1e-12);
        assert!((k.position.y - 9.998_528_5).abs() < 1e-12, "y = {}", k.position.y);
    }
}
