//! Vector algebra and tolerant floating-point comparison.
//!
//! Points and vectors share the one [`Vec3`] type; a point is a vector from
//! the world origin.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Tolerance used by every geometric equality/ordering predicate.
pub const EPSILON: f64 = 1e-3;

/// Threshold under which a direction is treated as parallel to a plane.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Lengths below this are too short to normalise.
pub const LENGTH_EPSILON: f64 = 1e-12;

#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    #[must_use]
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if len > LENGTH_EPSILON && len.is_finite() {
            Some(self / len)
        } else {
            None
        }
    }

    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component of `self` lying in the plane orthogonal to `normal`.
    ///
    /// `normal` need not be unit length; a zero normal returns `self`.
    #[must_use]
    pub fn reject_from(self, normal: Self) -> Self {
        let len_sq = normal.length_squared();
        if len_sq <= LENGTH_EPSILON * LENGTH_EPSILON {
            return self;
        }
        self - normal * (self.dot(normal) / len_sq)
    }

    /// Rotates `self` (a point) about the axis through `pivot` along
    /// `rotation`, by `|rotation|` radians (Rodrigues' formula).
    #[must_use]
    pub fn rotate_about(self, rotation: Self, pivot: Self) -> Self {
        let angle = rotation.length();
        let Some(axis) = rotation.try_normalize() else {
            return self;
        };
        let r = self - pivot;
        let (sin, cos) = angle.sin_cos();
        let rotated = r * cos + axis.cross(r) * sin + axis * (axis.dot(r) * (1.0 - cos));
        pivot + rotated
    }

    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y) && approx_eq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl MulAssign<f64> for Vec3 {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// `|a - b| < EPSILON`.
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Three-way comparison that treats values within [`EPSILON`] as equal.
#[must_use]
pub fn approx_cmp(a: f64, b: f64) -> Ordering {
    if approx_eq(a, b) {
        Ordering::Equal
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// Arithmetic mean, used to combine two materials' coefficients.
#[must_use]
pub fn average(a: f64, b: f64) -> f64 {
    (a + b) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
    }

    #[test]
    fn zero_vector_does_not_normalize() {
        assert!(Vec3::ZERO.try_normalize().is_none());
        let n = Vec3::new(3.0, 0.0, 4.0).try_normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn quarter_turn_about_offset_pivot() {
        let p = Vec3::new(2.0, 1.0, 0.0);
        let pivot = Vec3::new(1.0, 1.0, 0.0);
        let rotated = p.rotate_about(Vec3::Z * FRAC_PI_2, pivot);
        assert!(rotated.approx_eq(Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn zero_rotation_is_identity() {
        let p = Vec3::new(0.3, -2.0, 7.5);
        assert_eq!(p.rotate_about(Vec3::ZERO, Vec3::splat(4.0)), p);
    }

    #[test]
    fn tolerant_comparison() {
        assert_eq!(approx_cmp(1.0, 1.0005), Ordering::Equal);
        assert_eq!(approx_cmp(1.0, 1.1), Ordering::Less);
        assert_eq!(approx_cmp(1.1, 1.0), Ordering::Greater);
    }

    #[test]
    fn rejection_removes_normal_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let t = v.reject_from(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(t, Vec3::new(1.0, 0.0, 3.0));
    }
}
