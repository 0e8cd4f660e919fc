#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tumble_physics::{Material, PhysicsSim, Primitive, SceneRecord, SimConfig, Vec3, Wall};

const DEFAULT_STEPS: usize = 500;
const REPORT_EVERY: usize = 50;

/// Contents of a scene file given on the command line.
#[derive(Debug, Deserialize)]
struct RunFile {
    #[serde(default)]
    config: SimConfig,
    #[serde(default = "default_steps")]
    steps: usize,
    scene: SceneRecord,
}

fn default_steps() -> usize {
    DEFAULT_STEPS
}

fn load(path: &Path) -> Result<(PhysicsSim, usize)> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: RunFile = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let sim = PhysicsSim::from_scene(file.config, &file.scene).context("building scene")?;
    Ok((sim, file.steps))
}

/// A stone box with a few bodies dropped into it.
fn demo() -> Result<PhysicsSim> {
    let mut sim = PhysicsSim::new(SimConfig::default())?;
    let quad = |a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]| {
        Wall::new([a.into(), b.into(), c.into(), d.into()], Material::STONE)
    };
    sim.add_wall(quad([-4.0, 0.0, -4.0], [4.0, 0.0, -4.0], [4.0, 0.0, 4.0], [-4.0, 0.0, 4.0])?);
    sim.add_wall(quad([-4.0, 0.0, -4.0], [-4.0, 4.0, -4.0], [-4.0, 4.0, 4.0], [-4.0, 0.0, 4.0])?);
    sim.add_wall(quad([4.0, 0.0, -4.0], [4.0, 4.0, -4.0], [4.0, 4.0, 4.0], [4.0, 0.0, 4.0])?);

    sim.add_sphere_with_material(
        Vec3::new(-1.0, 3.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::ZERO,
        0.4,
        Material::STEEL,
    )?;
    sim.add_sphere_with_material(Vec3::new(1.5, 2.0, 0.5), Vec3::new(-1.0, 0.0, 0.0), Vec3::ZERO, 0.3, Material::WOOD)?;
    sim.add_primitive(Primitive::Cube, 1.0, Vec3::new(0.0, 0.6, 0.0), Vec3::ZERO, Material::WOOD)?;
    sim.add_primitive(Primitive::Octahedron, 1.0, Vec3::new(2.5, 2.5, -1.0), Vec3::ZERO, Material::LAPIS_LAZULI)?;
    Ok(sim)
}

fn main() -> Result<()> {
    // stdout carries the final scene
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let (mut sim, num_steps) = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading scene from {path}...");
            load(Path::new(&path))?
        }
        None => {
            tracing::info!("No scene given, running the demo scene...");
            (demo()?, DEFAULT_STEPS)
        }
    };

    tracing::info!(
        "Starting simulation loop for {} steps with dt = {}...",
        num_steps,
        sim.config().dt
    );
    for i in 0..num_steps {
        let stats = sim.step();
        if (i + 1) % REPORT_EVERY == 0 {
            match sim.spheres().first() {
                Some(sphere) => tracing::info!(
                    "Simulation step {} complete. contacts: {}, skipped: {}, first sphere at {:?}",
                    i + 1,
                    stats.contacts,
                    stats.skipped,
                    sphere.center
                ),
                None => tracing::info!(
                    "Simulation step {} complete. contacts: {}, skipped: {}",
                    i + 1,
                    stats.contacts,
                    stats.skipped
                ),
            }
        }
    }

    tracing::info!("Simulation loop finished after {} steps.", num_steps);
    println!("{}", sim.to_scene().to_json()?);
    Ok(())
}
