//! # Physics Simulation Core
//!
//! [`PhysicsSim`] owns every body in arena-style storage: one vector per
//! shape kind, each movable body behind its own lock, addressed by typed
//! handles. A step runs in two phases separated by a barrier:
//!
//! 1. **Collision.** One worker scans all sphere pairs and sphere-wall pairs;
//!    a second scans polyhedron pairs, polyhedron-wall pairs and
//!    sphere-polyhedron pairs. Every pair reads the same predicted snapshot.
//! 2. **Integration.** One worker per kind advances its bodies by `dt`.
//!
//! A routine touching two bodies locks them in ascending [`BodyKey`] order
//! (shape kind first, then index), so the two workers cannot deadlock.
//! Per-pair failures are logged and skipped; a step always completes.

use std::ops::AddAssign;
use std::thread::ScopedJoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::body::{Field, Polyhedron, PolyhedronSnapshot, Snapshot, Sphere, SphereSnapshot, Wall};
use crate::collision::{may_touch, BodyMut, BodyRef, CollisionPair, ContactSettings, IntersectionPair, ShapeKind};
use crate::config::SimConfig;
use crate::error::{PhysicsError, PhysicsResult};
use crate::integrator::{integrate_polyhedra, integrate_spheres};
use crate::material::Material;
use crate::types::Vec3;

/// Handle to a sphere in a [`PhysicsSim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SphereId(pub(crate) usize);

/// Handle to a polyhedron in a [`PhysicsSim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolyhedronId(pub(crate) usize);

/// Handle to a wall in a [`PhysicsSim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallId(pub(crate) usize);

impl SphereId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl PolyhedronId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl WallId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A body that can receive impulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyHandle {
    Sphere(SphereId),
    Polyhedron(PolyhedronId),
}

impl From<SphereId> for BodyHandle {
    fn from(id: SphereId) -> Self {
        Self::Sphere(id)
    }
}

impl From<PolyhedronId> for BodyHandle {
    fn from(id: PolyhedronId) -> Self {
        Self::Polyhedron(id)
    }
}

/// Position of a body in the global lock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyKey {
    pub kind: ShapeKind,
    pub index: usize,
}

impl BodyKey {
    pub const fn new(kind: ShapeKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// The two keys in the order their locks must be taken.
    pub fn ordered(a: Self, b: Self) -> (Self, Self) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl From<SphereId> for BodyKey {
    fn from(id: SphereId) -> Self {
        Self::new(ShapeKind::Sphere, id.0)
    }
}

impl From<PolyhedronId> for BodyKey {
    fn from(id: PolyhedronId) -> Self {
        Self::new(ShapeKind::Polyhedron, id.0)
    }
}

impl From<WallId> for BodyKey {
    fn from(id: WallId) -> Self {
        Self::new(ShapeKind::Wall, id.0)
    }
}

/// What happened during one call to [`PhysicsSim::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Pairs that were in contact and got a response
    pub contacts: usize,
    /// Pairs dropped for the step because of a degeneracy
    pub skipped: usize,
}

impl AddAssign for StepStats {
    fn add_assign(&mut self, other: Self) {
        self.contacts += other.contacts;
        self.skipped += other.skipped;
    }
}

/// A locked body.
enum Locked<'a> {
    Sphere(MutexGuard<'a, Sphere>),
    Polyhedron(MutexGuard<'a, Polyhedron>),
    Wall(&'a Wall),
}

impl Locked<'_> {
    fn borrowed(&self) -> BodyRef<'_> {
        match self {
            Self::Sphere(s) => BodyRef::Sphere(s),
            Self::Polyhedron(p) => BodyRef::Polyhedron(p),
            Self::Wall(w) => BodyRef::Wall(*w),
        }
    }

    fn body_mut(&mut self) -> BodyMut<'_> {
        match self {
            Self::Sphere(s) => BodyMut::Sphere(&mut **s),
            Self::Polyhedron(p) => BodyMut::Polyhedron(&mut **p),
            Self::Wall(w) => BodyMut::Wall(*w),
        }
    }
}

/// Shared view over the arenas handed to the workers of one phase.
#[derive(Clone, Copy)]
struct Bodies<'a> {
    spheres: &'a [Mutex<Sphere>],
    polyhedra: &'a [Mutex<Polyhedron>],
    walls: &'a [Wall],
    settings: ContactSettings,
}

impl<'a> Bodies<'a> {
    fn lock(&self, key: BodyKey) -> PhysicsResult<Locked<'a>> {
        let missing = || PhysicsError::UnknownBody {
            kind: key.kind,
            index: key.index,
        };
        Ok(match key.kind {
            ShapeKind::Sphere => Locked::Sphere(self.spheres.get(key.index).ok_or_else(missing)?.lock()),
            ShapeKind::Polyhedron => Locked::Polyhedron(self.polyhedra.get(key.index).ok_or_else(missing)?.lock()),
            ShapeKind::Wall => Locked::Wall(self.walls.get(key.index).ok_or_else(missing)?),
        })
    }

    /// Locks both bodies in key order. A body paired with itself is refused
    /// since its lock cannot be taken twice.
    fn lock_pair(&self, a: BodyKey, b: BodyKey) -> PhysicsResult<(Locked<'a>, Locked<'a>)> {
        if a == b && a.kind != ShapeKind::Wall {
            return Err(PhysicsError::Degenerate("a body cannot pair with itself"));
        }
        let (first, second) = BodyKey::ordered(a, b);
        debug_assert!(first <= second);
        let first = self.lock(first)?;
        let second = self.lock(second)?;
        Ok((first, second))
    }

    fn collide_keys(&self, a: BodyKey, b: BodyKey) -> PhysicsResult<bool> {
        let (mut first, mut second) = self.lock_pair(a, b)?;
        if !may_touch(&first.borrowed(), &second.borrowed(), Snapshot::Predicted, self.settings.dt) {
            return Ok(false);
        }
        let mut pair = CollisionPair::new(first.body_mut(), second.body_mut())?;
        pair.collide(&self.settings)
    }

    fn visit(&self, stats: &mut StepStats, a: BodyKey, b: BodyKey) {
        match self.collide_keys(a, b) {
            Ok(true) => {
                stats.contacts += 1;
                tracing::trace!(first = ?a, second = ?b, "contact resolved");
            }
            Ok(false) => {}
            Err(err) => {
                stats.skipped += 1;
                tracing::warn!(first = ?a, second = ?b, error = %err, "skipping pair for this step");
            }
        }
    }

    /// Sphere pairs in the given visiting order, then every sphere against
    /// every wall.
    fn sphere_pass(&self, order: &[usize]) -> StepStats {
        let mut stats = StepStats::default();
        for (n, &i) in order.iter().enumerate() {
            for &j in &order[n + 1..] {
                self.visit(&mut stats, sphere_key(i), sphere_key(j));
            }
        }
        for &i in order {
            for w in 0..self.walls.len() {
                self.visit(&mut stats, sphere_key(i), wall_key(w));
            }
        }
        stats
    }

    /// Polyhedron pairs, polyhedron-wall pairs, then sphere-polyhedron pairs.
    fn polyhedron_pass(&self, order: &[usize]) -> StepStats {
        let mut stats = StepStats::default();
        for (n, &i) in order.iter().enumerate() {
            for &j in &order[n + 1..] {
                self.visit(&mut stats, polyhedron_key(i), polyhedron_key(j));
            }
        }
        for &i in order {
            for w in 0..self.walls.len() {
                self.visit(&mut stats, polyhedron_key(i), wall_key(w));
            }
        }
        for &i in order {
            for s in 0..self.spheres.len() {
                self.visit(&mut stats, sphere_key(s), polyhedron_key(i));
            }
        }
        stats
    }
}

fn sphere_key(index: usize) -> BodyKey {
    BodyKey::new(ShapeKind::Sphere, index)
}

fn polyhedron_key(index: usize) -> BodyKey {
    BodyKey::new(ShapeKind::Polyhedron, index)
}

fn wall_key(index: usize) -> BodyKey {
    BodyKey::new(ShapeKind::Wall, index)
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Main physics simulation container
pub struct PhysicsSim {
    pub(crate) spheres: Vec<Mutex<Sphere>>,
    pub(crate) polyhedra: Vec<Mutex<Polyhedron>>,
    pub(crate) walls: Vec<Wall>,
    /// Table scenes index materials into
    pub(crate) materials: Vec<Material>,
    pub(crate) config: SimConfig,
    rng: fastrand::Rng,
    pub(crate) sphere_order: Vec<usize>,
    pub(crate) polyhedron_order: Vec<usize>,
    steps: u64,
}

impl std::fmt::Debug for PhysicsSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsSim")
            .field("spheres", &self.spheres.len())
            .field("polyhedra", &self.polyhedra.len())
            .field("walls", &self.walls.len())
            .field("config", &self.config)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl PhysicsSim {
    /// Create a new empty simulation. Fails when `config` does not validate.
    pub fn new(config: SimConfig) -> PhysicsResult<Self> {
        config.validate()?;
        let rng = match config.shuffle_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Ok(Self {
            spheres: Vec::new(),
            polyhedra: Vec::new(),
            walls: Vec::new(),
            materials: Material::PRESETS.to_vec(),
            config,
            rng,
            sphere_order: Vec::new(),
            polyhedron_order: Vec::new(),
            steps: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Number of completed `step()` calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn polyhedron_count(&self) -> usize {
        self.polyhedra.len()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// # Panics
    /// If `id` came from another simulation with more spheres.
    pub fn sphere(&self, id: SphereId) -> SphereSnapshot {
        self.spheres[id.0].lock().snapshot()
    }

    /// # Panics
    /// If `id` came from another simulation with more polyhedra.
    pub fn polyhedron(&self, id: PolyhedronId) -> PolyhedronSnapshot {
        self.polyhedra[id.0].lock().snapshot()
    }

    /// # Panics
    /// If `id` came from another simulation with more walls.
    pub fn wall(&self, id: WallId) -> &Wall {
        &self.walls[id.0]
    }

    /// `None` when `id` names no sphere here, e.g. after a rebuild from a
    /// scene with fewer bodies.
    pub fn get_sphere(&self, id: SphereId) -> Option<SphereSnapshot> {
        self.spheres.get(id.0).map(|s| s.lock().snapshot())
    }

    pub fn get_polyhedron(&self, id: PolyhedronId) -> Option<PolyhedronSnapshot> {
        self.polyhedra.get(id.0).map(|p| p.lock().snapshot())
    }

    pub fn get_wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(id.0)
    }

    pub fn spheres(&self) -> Vec<SphereSnapshot> {
        self.spheres.iter().map(|s| s.lock().snapshot()).collect()
    }

    pub fn polyhedra(&self) -> Vec<PolyhedronSnapshot> {
        self.polyhedra.iter().map(|p| p.lock().snapshot()).collect()
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Current field acceleration at `point`: uniform gravity plus every
    /// gravity plate.
    pub fn field(&self) -> Field<'_> {
        Field::new(self.config.gravity, &self.walls)
    }

    fn bodies(&self, settings: ContactSettings) -> Bodies<'_> {
        Bodies {
            spheres: &self.spheres,
            polyhedra: &self.polyhedra,
            walls: &self.walls,
            settings,
        }
    }

    /// Whether two bodies overlap at the end of the coming step.
    ///
    /// Fails for a wall paired with a wall, and for keys naming no body.
    pub fn intersects(&self, a: impl Into<BodyKey>, b: impl Into<BodyKey>) -> PhysicsResult<bool> {
        let (a, b) = (a.into(), b.into());
        if a.kind == ShapeKind::Wall && b.kind == ShapeKind::Wall {
            return Err(PhysicsError::ImpossiblePair {
                first: ShapeKind::Wall,
                second: ShapeKind::Wall,
            });
        }
        if a == b {
            return Ok(false);
        }
        let bodies = self.bodies(self.config.contact_settings());
        let (first, second) = bodies.lock_pair(a, b)?;
        let pair = IntersectionPair::new(first.borrowed(), second.borrowed())?;
        Ok(pair.intersects(self.config.substep_dt()))
    }

    /// Queues an impulse applied at the body's next integration.
    ///
    /// Fails with [`PhysicsError::UnknownBody`] when the handle names no body
    /// of this simulation.
    pub fn queue_impulse(&mut self, body: impl Into<BodyHandle>, impulse: Vec3, point: Vec3) -> PhysicsResult<()> {
        match body.into() {
            BodyHandle::Sphere(id) => self
                .spheres
                .get_mut(id.0)
                .ok_or(PhysicsError::UnknownBody {
                    kind: ShapeKind::Sphere,
                    index: id.0,
                })?
                .get_mut()
                .queue_impulse(impulse, point),
            BodyHandle::Polyhedron(id) => self
                .polyhedra
                .get_mut(id.0)
                .ok_or(PhysicsError::UnknownBody {
                    kind: ShapeKind::Polyhedron,
                    index: id.0,
                })?
                .get_mut()
                .queue_impulse(impulse, point),
        }
        Ok(())
    }

    /// Advances the simulation by `config.dt`, running `config.substeps`
    /// collision-then-integration passes.
    pub fn step(&mut self) -> StepStats {
        let started = Instant::now();
        let settings = self.config.contact_settings();
        let mut stats = StepStats::default();
        for _ in 0..self.config.substeps {
            stats += self.collide_all(settings);
            self.integrate_all(settings.dt);
            self.shuffle();
        }
        self.steps += 1;
        tracing::debug!(
            step = self.steps,
            contacts = stats.contacts,
            skipped = stats.skipped,
            "step complete"
        );
        if self.config.realtime {
            self.pace(started);
        }
        stats
    }

    /// Runs `steps` steps and sums their statistics.
    pub fn run(&mut self, steps: usize) -> StepStats {
        let mut total = StepStats::default();
        for _ in 0..steps {
            total += self.step();
        }
        total
    }

    fn collide_all(&self, settings: ContactSettings) -> StepStats {
        let bodies = self.bodies(settings);
        let (sphere_order, polyhedron_order) = (&self.sphere_order, &self.polyhedron_order);
        std::thread::scope(|scope| {
            let spheres = scope.spawn(move || bodies.sphere_pass(sphere_order));
            let polyhedra = scope.spawn(move || bodies.polyhedron_pass(polyhedron_order));
            let mut stats = join(spheres);
            stats += join(polyhedra);
            stats
        })
    }

    fn integrate_all(&self, dt: f64) {
        let field = self.field();
        let slices = self.config.inertia_slices;
        let (spheres, polyhedra) = (&self.spheres, &self.polyhedra);
        std::thread::scope(|scope| {
            let field = &field;
            let s = scope.spawn(move || integrate_spheres(spheres, field, dt));
            let p = scope.spawn(move || integrate_polyhedra(polyhedra, field, dt, slices));
            join(s);
            join(p);
        });
    }

    /// Changes the visiting order for the next pass.
    fn shuffle(&mut self) {
        self.rng.shuffle(&mut self.sphere_order);
        self.rng.shuffle(&mut self.polyhedron_order);
    }

    fn pace(&self, started: Instant) {
        let target = Duration::from_secs_f64(self.config.dt);
        if let Some(rest) = target.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
