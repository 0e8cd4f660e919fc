//! # Persisted Scene Shape
//!
//! The JSON form a host stores scenes in. Each body names its material by
//! index into the scene's material table and carries explicit geometry:
//! a centre and radius for spheres, a point list plus faces for polyhedra,
//! four corners for walls. Reading a scene into a [`PhysicsSim`] and writing
//! it back keeps positions, velocities and mesh geometry.
//!
//! ```json
//! {
//!   "materials": [{ "density": 500.0, "restitution": 1.0, "friction": 0.0 }],
//!   "bodies": [
//!     { "shape": "sphere", "material": 0, "center": { "x": 0.0, "y": 2.0, "z": 0.0 }, "radius": 0.5 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::body::{Face, Polyhedron, PolyhedronBuilder, Sphere, Wall};
use crate::config::SimConfig;
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::Triangle;
use crate::material::Material;
use crate::simulation::PhysicsSim;
use crate::types::Vec3;

fn preset_materials() -> Vec<Material> {
    Material::PRESETS.to_vec()
}

/// A whole scene: material table plus bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    #[serde(default = "preset_materials")]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub bodies: Vec<BodyRecord>,
}

impl Default for SceneRecord {
    fn default() -> Self {
        Self {
            materials: preset_materials(),
            bodies: Vec::new(),
        }
    }
}

/// One triangle of a polyhedron surface with its render colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    #[serde(rename = "A")]
    pub a: Vec3,
    #[serde(rename = "B")]
    pub b: Vec3,
    #[serde(rename = "C")]
    pub c: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<&Face> for FaceRecord {
    fn from(face: &Face) -> Self {
        let Triangle { a, b, c } = face.triangle;
        Self {
            a,
            b,
            c,
            color: face.color.clone(),
        }
    }
}

impl From<&FaceRecord> for Face {
    fn from(record: &FaceRecord) -> Self {
        Face {
            triangle: Triangle::new(record.a, record.b, record.c),
            color: record.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BodyRecord {
    Sphere {
        material: usize,
        center: Vec3,
        radius: f64,
        #[serde(default)]
        velocity: Vec3,
        #[serde(default)]
        angular_velocity: Vec3,
    },
    Polyhedron {
        material: usize,
        /// Centre of mass; derived from the mesh when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        center: Option<Vec3>,
        #[serde(default)]
        velocity: Vec3,
        #[serde(default)]
        angular_velocity: Vec3,
        points: Vec<Vec3>,
        triangles: Vec<FaceRecord>,
    },
    Wall {
        material: usize,
        corners: [Vec3; 4],
        /// Present for gravity plates
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gravity: Option<f64>,
    },
}

impl BodyRecord {
    pub fn material(&self) -> usize {
        match *self {
            Self::Sphere { material, .. } | Self::Polyhedron { material, .. } | Self::Wall { material, .. } => {
                material
            }
        }
    }
}

impl SceneRecord {
    pub fn from_json(text: &str) -> PhysicsResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> PhysicsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn material(&self, index: usize) -> PhysicsResult<Material> {
        self.materials
            .get(index)
            .copied()
            .ok_or(PhysicsError::UnknownMaterial(index))
    }
}

impl PhysicsSim {
    /// Builds a simulation holding every body of `scene`. Nothing is built
    /// when any body fails.
    pub fn from_scene(config: SimConfig, scene: &SceneRecord) -> PhysicsResult<Self> {
        let mut sim = Self::new(config)?;
        sim.materials = scene.materials.clone();
        for record in &scene.bodies {
            let material = scene.material(record.material())?;
            match record {
                BodyRecord::Sphere {
                    center,
                    radius,
                    velocity,
                    angular_velocity,
                    ..
                } => {
                    sim.insert_sphere(Sphere::new(*center, *velocity, *angular_velocity, *radius, material)?);
                }
                BodyRecord::Polyhedron {
                    center,
                    velocity,
                    angular_velocity,
                    points,
                    triangles,
                    ..
                } => {
                    let surface = PolyhedronBuilder::new(points.clone(), triangles.iter().map(Face::from).collect());
                    let mut polyhedron = Polyhedron::new(surface, *velocity, *angular_velocity, material)?;
                    if let Some(center) = center {
                        polyhedron = polyhedron.with_center(*center)?;
                    }
                    sim.insert_polyhedron(polyhedron);
                }
                BodyRecord::Wall { corners, gravity, .. } => {
                    let wall = match gravity {
                        Some(strength) => Wall::gravity_plate(*corners, *strength, material)?,
                        None => Wall::new(*corners, material)?,
                    };
                    sim.add_wall(wall);
                }
            }
        }
        Ok(sim)
    }

    /// Current state in persisted form: walls, then spheres, then polyhedra.
    pub fn to_scene(&self) -> SceneRecord {
        let mut materials = self.materials.clone();
        let mut index_of = |material: &Material| match materials.iter().position(|m| m == material) {
            Some(index) => index,
            None => {
                materials.push(*material);
                materials.len() - 1
            }
        };
        let mut bodies = Vec::with_capacity(self.wall_count() + self.sphere_count() + self.polyhedron_count());
        for wall in &self.walls {
            bodies.push(BodyRecord::Wall {
                material: index_of(wall.material()),
                corners: *wall.corners(),
                gravity: wall.strength(),
            });
        }
        for sphere in &self.spheres {
            let sphere = sphere.lock();
            let k = sphere.kinematics();
            bodies.push(BodyRecord::Sphere {
                material: index_of(sphere.material()),
                center: k.position,
                radius: sphere.radius(),
                velocity: k.velocity,
                angular_velocity: k.angular_velocity,
            });
        }
        for polyhedron in &self.polyhedra {
            let polyhedron = polyhedron.lock();
            let k = polyhedron.kinematics();
            bodies.push(BodyRecord::Polyhedron {
                material: index_of(polyhedron.material()),
                center: Some(k.position),
                velocity: k.velocity,
                angular_velocity: k.angular_velocity,
                points: polyhedron.vertices().to_vec(),
                triangles: polyhedron.faces().iter().map(FaceRecord::from).collect(),
            });
        }
        SceneRecord { materials, bodies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Primitive;

    const TETRA: &str = r#"{
        "bodies": [{
            "shape": "polyhedron",
            "material": 1,
            "velocity": { "x": 1.0, "y": 0.0, "z": 0.0 },
            "points": [
                { "x": 0.0, "y": 0.0, "z": 0.0 },
                { "x": 1.0, "y": 0.0, "z": 0.0 },
                { "x": 0.0, "y": 1.0, "z": 0.0 },
                { "x": 0.0, "y": 0.0, "z": 1.0 }
            ],
            "triangles": [
                { "A": { "x": 0.0, "y": 0.0, "z": 0.0 }, "B": { "x": 1.0, "y": 0.0, "z": 0.0 }, "C": { "x": 0.0, "y": 1.0, "z": 0.0 }, "color": "red" },
                { "A": { "x": 0.0, "y": 0.0, "z": 0.0 }, "B": { "x": 1.0, "y": 0.0, "z": 0.0 }, "C": { "x": 0.0, "y": 0.0, "z": 1.0 } },
                { "A": { "x": 0.0, "y": 0.0, "z": 0.0 }, "B": { "x": 0.0, "y": 1.0, "z": 0.0 }, "C": { "x": 0.0, "y": 0.0, "z": 1.0 } },
                { "A": { "x": 1.0, "y": 0.0, "z": 0.0 }, "B": { "x": 0.0, "y": 1.0, "z": 0.0 }, "C": { "x": 0.0, "y": 0.0, "z": 1.0 } }
            ]
        }]
    }"#;

    #[test]
    fn reads_point_and_triangle_lists() {
        let scene = SceneRecord::from_json(TETRA).unwrap();
        assert_eq!(scene.materials, Material::PRESETS.to_vec());
        let sim = PhysicsSim::from_scene(SimConfig::default(), &scene).unwrap();
        assert_eq!(sim.polyhedron_count(), 1);
        let poly = sim.polyhedra[0].lock();
        assert_eq!(poly.material(), &Material::WOOD);
        assert_eq!(poly.faces()[0].color.as_deref(), Some("red"));
        assert!((poly.volume() - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_material_is_rejected() {
        let text = r#"{ "bodies": [{ "shape": "sphere", "material": 42,
            "center": { "x": 0.0, "y": 0.0, "z": 0.0 }, "radius": 1.0 }] }"#;
        let scene = SceneRecord::from_json(text).unwrap();
        let err = PhysicsSim::from_scene(SimConfig::default(), &scene).unwrap_err();
        assert!(matches!(err, PhysicsError::UnknownMaterial(42)));
    }

    #[test]
    fn malformed_text_is_a_scene_error() {
        assert!(matches!(SceneRecord::from_json("{ bodies"), Err(PhysicsError::Scene(_))));
    }

    #[test]
    fn writes_back_what_it_read() {
        let mut sim = PhysicsSim::new(SimConfig::default()).unwrap();
        sim.add_sphere(Vec3::new(0.0, 3.0, 0.0), Vec3::X, 0.5).unwrap();
        sim.add_primitive(Primitive::Pyramid, 1.0, Vec3::new(3.0, 0.0, 0.0), Vec3::Z, Material::GOLD)
            .unwrap();
        let scene = sim.to_scene();
        let text = scene.to_json().unwrap();
        let again = SceneRecord::from_json(&text).unwrap();
        assert_eq!(again, scene);
        let rebuilt = PhysicsSim::from_scene(SimConfig::default(), &again).unwrap();
        assert_eq!(rebuilt.to_scene(), scene);
    }

    #[test]
    fn spun_polyhedron_keeps_its_exact_centre() {
        let mut sim = PhysicsSim::new(SimConfig::default()).unwrap();
        let id = sim
            .add_polyhedron(
                Primitive::Octahedron.builder(1.0, Vec3::new(0.3, 2.0, -0.4)),
                Vec3::new(0.7, 0.0, 0.2),
                Vec3::new(1.3, -0.4, 2.1),
                Material::STEEL,
            )
            .unwrap();
        sim.run(40);
        let text = sim.to_scene().to_json().unwrap();
        let rebuilt = PhysicsSim::from_scene(SimConfig::default(), &SceneRecord::from_json(&text).unwrap()).unwrap();
        assert_eq!(rebuilt.polyhedron(id).center, sim.polyhedron(id).center);
    }

    #[test]
    fn missing_centre_comes_from_the_mesh() {
        let scene = SceneRecord::from_json(TETRA).unwrap();
        let sim = PhysicsSim::from_scene(SimConfig::default(), &scene).unwrap();
        let center = sim.polyhedra[0].lock().center();
        assert!(center.approx_eq(Vec3::new(0.25, 0.25, 0.25)));
    }
}
