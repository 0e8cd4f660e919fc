//! # Moment of Inertia by Slicing
//!
//! A convex solid is cut into slabs perpendicular to the axis. Each slab is
//! approximated by the cross-section through its middle: the surface
//! triangles are chorded by that plane, the chords are closed into a polygon
//! and its polar moment about the axis is weighted by `ρ·h`. The midpoint
//! rule never samples the end planes, so faces lying in them cannot produce
//! degenerate sections, and the error shrinks as `1/N²`.

use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::{CrossSection, Line, Plane, Segment, Triangle};
use crate::types::{Vec3, LENGTH_EPSILON};

/// Slab count used when the configuration does not override it.
pub const DEFAULT_SLICES: usize = 30;

/// Moment of inertia of the solid bounded by `surface` about `axis`.
///
/// `vertices` only bound the extent along the axis; `surface` must close a
/// convex volume.
pub fn moment_about(
    surface: &[Triangle],
    vertices: &[Vec3],
    axis: &Line,
    density: f64,
    slices: usize,
) -> PhysicsResult<f64> {
    let direction = axis
        .direction
        .try_normalize()
        .ok_or(PhysicsError::Degenerate("inertia axis has no direction"))?;
    if slices == 0 {
        return Err(PhysicsError::Degenerate("inertia needs at least one slice"));
    }

    let (low, high) = vertices
        .iter()
        .map(|v| (*v - axis.point).dot(direction))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });
    let extent = high - low;
    if !(extent > LENGTH_EPSILON) {
        return Err(PhysicsError::Degenerate("solid has no extent along the axis"));
    }

    let unit_axis = Line::new(axis.point, direction);
    let thickness = extent / slices as f64;
    let mut chords: Vec<Segment> = Vec::with_capacity(surface.len());
    let mut moment = 0.0;
    for k in 0..slices {
        let t = low + (k as f64 + 0.5) * thickness;
        let plane = Plane {
            point: axis.point + direction * t,
            normal: direction,
        };
        chords.clear();
        chords.extend(surface.iter().filter_map(|tri| tri.intersect_plane(&plane)));
        if let Some(section) = CrossSection::from_chords(&chords) {
            moment += section.polar_moment_about(&unit_axis) * density * thickness;
        }
    }
    Ok(moment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Primitive;

    fn solid(primitive: Primitive, size: f64) -> (Vec<Triangle>, Vec<Vec3>) {
        let builder = primitive.builder(size, Vec3::ZERO);
        (builder.triangles(), builder.points().to_vec())
    }

    #[test]
    fn unit_cube_about_central_axis() {
        let (surface, vertices) = solid(Primitive::Cube, 1.0);
        let axis = Line::new(Vec3::ZERO, Vec3::Y);
        let j = moment_about(&surface, &vertices, &axis, 1.0, 10).unwrap();
        // m (a² + b²) / 12
        assert!((j - 1.0 / 6.0).abs() < 1e-9, "got {j}");
    }

    #[test]
    fn cube_about_edge_axis_uses_parallel_axis() {
        let (surface, vertices) = solid(Primitive::Cube, 1.0);
        let edge = Line::new(Vec3::new(0.5, 0.0, 0.5), Vec3::Y);
        let j = moment_about(&surface, &vertices, &edge, 2.0, 10).unwrap();
        assert!((j - 2.0 * (1.0 / 6.0 + 0.5)).abs() < 1e-9, "got {j}");
    }

    #[test]
    fn pyramid_converges_monotonically() {
        // square base side 2 at y = 0, apex at height 2; centre of mass at h/4
        let (surface, vertices) = solid(Primitive::Pyramid, 2.0);
        let axis = Line::new(Vec3::new(0.0, 0.5, 0.0), Vec3::Y);
        let mass = 2.0 * 2.0 * 2.0 / 3.0;
        let reference = mass * 4.0 / 10.0;
        let mut previous = f64::INFINITY;
        for n in [10, 20, 40, 80, 100] {
            let j = moment_about(&surface, &vertices, &axis, 1.0, n).unwrap();
            let error = (j - reference).abs();
            assert!(error < previous, "error {error} at {n} slices did not shrink");
            previous = error;
        }
        assert!(previous / reference < 1e-3);
    }

    #[test]
    fn flat_solid_is_degenerate() {
        let square = [
            Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)),
            Triangle::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), Vec3::Y),
        ];
        let vertices = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        let axis = Line::new(Vec3::ZERO, Vec3::Z);
        assert!(matches!(
            moment_about(&square, &vertices, &axis, 1.0, 30),
            Err(PhysicsError::Degenerate(_))
        ));
    }

    #[test]
    fn zero_axis_is_degenerate() {
        let (surface, vertices) = solid(Primitive::Cube, 1.0);
        let axis = Line::new(Vec3::ZERO, Vec3::ZERO);
        assert!(moment_about(&surface, &vertices, &axis, 1.0, 30).is_err());
    }
}
