//! Physical materials.

use serde::{Deserialize, Serialize};

use crate::types::average;

/// Bulk properties of the stuff a body is made of.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// kg/m³
    pub density: f64,
    /// Fraction of normal speed kept through an impact (0 inelastic, 1 elastic).
    pub restitution: f64,
    pub friction: f64,
}

impl Material {
    pub const STEEL: Self = Self::new(7900.0, 0.5, 0.1);
    pub const WOOD: Self = Self::new(500.0, 1.0, 0.0);
    pub const STONE: Self = Self::new(2500.0, 1.0, 0.5);
    pub const GOLD: Self = Self::new(19300.0, 1.0, 0.7);
    pub const LAPIS_LAZULI: Self = Self::new(2500.0, 0.9, 0.1);
    pub const OSMIUM: Self = Self::new(22500.0, 1.0, 0.0);
    pub const CONSTANTAN: Self = Self::new(1000.0, 1.0, 0.5);

    /// The default material table; scenes index into it.
    pub const PRESETS: [Self; 7] = [
        Self::STEEL,
        Self::WOOD,
        Self::STONE,
        Self::GOLD,
        Self::LAPIS_LAZULI,
        Self::OSMIUM,
        Self::CONSTANTAN,
    ];

    #[must_use]
    pub const fn new(density: f64, restitution: f64, friction: f64) -> Self {
        Self {
            density,
            restitution,
            friction,
        }
    }

    /// Coefficients used when `self` touches `other`.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Coefficients {
        Coefficients {
            restitution: average(self.restitution, other.restitution),
            friction: average(self.friction, other.friction),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::CONSTANTAN
    }
}

/// Restitution and friction for one contact, averaged over both materials.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coefficients {
    pub restitution: f64,
    pub friction: f64,
}
