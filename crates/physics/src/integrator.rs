//! # Physics Integration
//!
//! Advances every body of one kind by a timestep. Each body drains its
//! queued impulses, moves by exactly the delta its predicted snapshot
//! reported, then samples the field at its new position for the next step.

use parking_lot::Mutex;

use crate::body::{Field, Polyhedron, Sphere};

pub fn integrate_spheres(spheres: &[Mutex<Sphere>], field: &Field<'_>, dt: f64) {
    for sphere in spheres {
        sphere.lock().update(dt, field);
    }
}

/// `slices` is used for queued impulses that need a moment of inertia.
pub fn integrate_polyhedra(polyhedra: &[Mutex<Polyhedron>], field: &Field<'_>, dt: f64, slices: usize) {
    for polyhedron in polyhedra {
        polyhedron.lock().update(dt, field, slices);
    }
}
