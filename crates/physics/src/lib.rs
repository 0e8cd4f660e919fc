#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::return_self_not_must_use,
    clippy::float_cmp
)]
//! # Tumble Physics Engine
//!
//! Rigid-body collision detection and impulse resolution for spheres, convex
//! polyhedra and static walls.
//!
//! ## Key Components
//!
//! -   **Geometry:** points, lines, planes, segments, triangles and bounding
//!     boxes with epsilon-tolerant predicates, in [`geometry`] and [`types`].
//! -   **Bodies:** [`Sphere`], [`Polyhedron`] and [`Wall`] in [`body`]. Every
//!     query that needs the state at the end of the step takes a
//!     [`Snapshot`], so detection and resolution read the same instant.
//! -   **Inertia:** polyhedra have no stored inertia tensor. The moment about
//!     each collision axis is integrated on demand by slicing the solid
//!     ([`inertia`]).
//! -   **Collisions:** pairs are routed by shape kind to a narrow-phase
//!     routine and resolved with normal and friction impulses
//!     ([`collision`]).
//! -   **Simulation:** [`PhysicsSim`] stores bodies by kind behind per-body
//!     locks and runs each step as a parallel collision phase followed by a
//!     parallel integration phase.
//!
//! ## Usage
//!
//! ```rust
//! use tumble_physics::{Material, PhysicsSim, Primitive, SimConfig, Vec3, Wall};
//!
//! let mut sim = PhysicsSim::new(SimConfig::default())?;
//! sim.add_wall(Wall::new(
//!     [
//!         Vec3::new(-5.0, 0.0, -5.0),
//!         Vec3::new(5.0, 0.0, -5.0),
//!         Vec3::new(5.0, 0.0, 5.0),
//!         Vec3::new(-5.0, 0.0, 5.0),
//!     ],
//!     Material::STONE,
//! )?);
//! let ball = sim.add_sphere(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, 0.25)?;
//! sim.add_primitive(Primitive::Cube, 1.0, Vec3::new(2.0, 1.0, 0.0), Vec3::ZERO, Material::WOOD)?;
//!
//! let stats = sim.run(100);
//! println!("{} contacts, ball at {:?}", stats.contacts, sim.sphere(ball).center);
//! assert_eq!(sim.steps(), 100);
//! # Ok::<(), tumble_physics::PhysicsError>(())
//! ```

pub mod body;
mod builder;
pub mod collision;
pub mod config;
pub mod error;
pub mod geometry;
pub mod inertia;
mod integrator;
pub mod material;
pub mod scene;
pub mod simulation;
pub mod types;

pub use body::{
    Face, Field, Kinematics, PendingDelta, Polyhedron, PolyhedronBuilder, PolyhedronPose, PolyhedronSnapshot,
    Primitive, Snapshot, Sphere, SphereSnapshot, Wall,
};
pub use collision::{
    CollisionPair, Contact, ContactSettings, Intersection, IntersectionPair, Route, ShapeKind,
};
pub use config::SimConfig;
pub use error::{PhysicsError, PhysicsResult};
pub use material::Material;
pub use scene::{BodyRecord, FaceRecord, SceneRecord};
pub use simulation::{BodyHandle, BodyKey, PhysicsSim, PolyhedronId, SphereId, StepStats, WallId};
pub use types::Vec3;
