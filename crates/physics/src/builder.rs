//! # Physics Simulation Builder
//!
//! Builder methods for adding bodies to a [`PhysicsSim`]. Bodies are created
//! during scene setup; a construction error surfaces here, before the body
//! exists in the simulation.

use parking_lot::Mutex;

use crate::body::{Field, Polyhedron, PolyhedronBuilder, Primitive, Sphere, Wall};
use crate::error::PhysicsResult;
use crate::material::Material;
use crate::simulation::{PhysicsSim, PolyhedronId, SphereId, WallId};
use crate::types::Vec3;

impl PhysicsSim {
    /// Add a sphere with the default material
    pub fn add_sphere(&mut self, center: Vec3, velocity: Vec3, radius: f64) -> PhysicsResult<SphereId> {
        self.add_sphere_with_material(center, velocity, Vec3::ZERO, radius, Material::default())
    }

    /// Add a sphere with custom material properties
    pub fn add_sphere_with_material(
        &mut self,
        center: Vec3,
        velocity: Vec3,
        angular_velocity: Vec3,
        radius: f64,
        material: Material,
    ) -> PhysicsResult<SphereId> {
        let sphere = Sphere::new(center, velocity, angular_velocity, radius, material)?;
        Ok(self.insert_sphere(sphere))
    }

    /// Add an already constructed sphere
    pub fn insert_sphere(&mut self, mut sphere: Sphere) -> SphereId {
        sphere.set_acceleration(&self.field());
        self.register_material(*sphere.material());
        let index = self.spheres.len();
        tracing::info!(index, radius = sphere.radius(), mass = sphere.mass(), "added sphere");
        self.spheres.push(Mutex::new(sphere));
        self.sphere_order.push(index);
        SphereId(index)
    }

    /// Add a convex polyhedron described by its surface
    pub fn add_polyhedron(
        &mut self,
        surface: PolyhedronBuilder,
        velocity: Vec3,
        angular_velocity: Vec3,
        material: Material,
    ) -> PhysicsResult<PolyhedronId> {
        let polyhedron = Polyhedron::new(surface, velocity, angular_velocity, material)?;
        Ok(self.insert_polyhedron(polyhedron))
    }

    /// Add a cube, pyramid, octahedron or tetrahedron of edge `size`
    /// placed at `origin`
    pub fn add_primitive(
        &mut self,
        primitive: Primitive,
        size: f64,
        origin: Vec3,
        velocity: Vec3,
        material: Material,
    ) -> PhysicsResult<PolyhedronId> {
        self.add_polyhedron(primitive.builder(size, origin), velocity, Vec3::ZERO, material)
    }

    /// Add an already constructed polyhedron
    pub fn insert_polyhedron(&mut self, mut polyhedron: Polyhedron) -> PolyhedronId {
        polyhedron.set_acceleration(&self.field());
        self.register_material(*polyhedron.material());
        let index = self.polyhedra.len();
        tracing::info!(
            index,
            vertices = polyhedron.vertices().len(),
            mass = polyhedron.mass(),
            "added polyhedron"
        );
        self.polyhedra.push(Mutex::new(polyhedron));
        self.polyhedron_order.push(index);
        PolyhedronId(index)
    }

    /// Add a static wall. A gravity plate changes the field every body
    /// sits in, so accelerations are resampled.
    pub fn add_wall(&mut self, wall: Wall) -> WallId {
        let index = self.walls.len();
        let plate = wall.is_gravity_plate();
        tracing::info!(index, gravity_plate = plate, "added wall");
        self.register_material(*wall.material());
        self.walls.push(wall);
        if plate {
            self.refresh_accelerations();
        }
        WallId(index)
    }

    /// Add a wall that also pulls bodies toward it with `strength`
    pub fn add_gravity_plate(&mut self, corners: [Vec3; 4], strength: f64, material: Material) -> PhysicsResult<WallId> {
        Ok(self.add_wall(Wall::gravity_plate(corners, strength, material)?))
    }

    /// Index of `material` in the material table, appending it if absent.
    pub fn register_material(&mut self, material: Material) -> usize {
        if let Some(index) = self.materials.iter().position(|m| *m == material) {
            return index;
        }
        self.materials.push(material);
        self.materials.len() - 1
    }

    fn refresh_accelerations(&mut self) {
        let field = Field::new(self.config.gravity, &self.walls);
        for sphere in &mut self.spheres {
            sphere.get_mut().set_acceleration(&field);
        }
        for polyhedron in &mut self.polyhedra {
            polyhedron.get_mut().set_acceleration(&field);
        }
    }
}
