//! Simulation parameters.

use serde::{Deserialize, Serialize};

use crate::collision::ContactSettings;
use crate::error::{PhysicsError, PhysicsResult};
use crate::inertia::DEFAULT_SLICES;
use crate::types::Vec3;

/// Parameters fixed when a [`PhysicsSim`](crate::PhysicsSim) is built.
///
/// Every field has a default, so a scene file may name only the ones it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds
    pub dt: f64,
    /// Uniform acceleration applied everywhere
    pub gravity: Vec3,
    /// Slab count used by the moment-of-inertia integrator
    pub inertia_slices: usize,
    /// Detect/resolve/integrate passes per `step()` call
    pub substeps: usize,
    /// Sleep so that each step takes at least `dt` of wall-clock time
    pub realtime: bool,
    /// Seed for the between-step shuffle; random when absent
    pub shuffle_seed: Option<u64>,
    /// Penetration below this depth is not corrected
    pub position_slop: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            inertia_slices: DEFAULT_SLICES,
            substeps: 1,
            realtime: false,
            shuffle_seed: None,
            position_slop: 1e-4,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(PhysicsError::Degenerate("timestep must be positive"));
        }
        if self.inertia_slices == 0 {
            return Err(PhysicsError::Degenerate("inertia slice count must be positive"));
        }
        if self.substeps == 0 {
            return Err(PhysicsError::Degenerate("substep count must be positive"));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::Degenerate("gravity must be finite"));
        }
        if !(self.position_slop >= 0.0 && self.position_slop.is_finite()) {
            return Err(PhysicsError::Degenerate("position slop must be non-negative"));
        }
        Ok(())
    }

    /// Length of one substep.
    pub fn substep_dt(&self) -> f64 {
        self.dt / self.substeps as f64
    }

    pub fn contact_settings(&self) -> ContactSettings {
        ContactSettings {
            dt: self.substep_dt(),
            inertia_slices: self.inertia_slices,
            position_slop: self.position_slop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{ "dt": 0.02, "substeps": 2 }"#).unwrap();
        assert_eq!(config.dt, 0.02);
        assert_eq!(config.inertia_slices, DEFAULT_SLICES);
        assert!((config.contact_settings().dt - 0.01).abs() < 1e-15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timestep_is_rejected() {
        let config = SimConfig { dt: 0.0, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(PhysicsError::Degenerate(_))));
    }

    #[test]
    fn zero_slices_are_rejected() {
        let config = SimConfig { inertia_slices: 0, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }
}
