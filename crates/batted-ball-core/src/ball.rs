//! Baseball physical properties and shared physical constants.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;
/// Air density at sea level, 15 °C (kg/m³). Reference for density ratios.
pub const RHO_SEA_LEVEL: f64 = 1.225;

/// Fixed physical constants of the ball (assumed constant for every flight).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallPhysicalProperties {
    /// Mass [kg]
    pub mass_kg: f64,
    /// Radius [m]
    pub radius_m: f64,
    /// Cross-sectional area π r² [m²]
    pub area_m2: f64,
}

impl BallPhysicalProperties {
    /// Official MLB ball: 5.125 oz, 2.9 in diameter.
    pub const MLB: Self = Self {
        mass_kg: 0.145,
        radius_m: 0.037,
        area_m2: PI * 0.037 * 0.037,
    };

    /// Build from mass and radius; the area is derived.
    pub fn new(mass_kg: f64, radius_m: f64) -> Self {
        Self { mass_kg, radius_m, area_m2: PI * radius_m * radius_m }
    }

    pub fn diameter_m(&self) -> f64 {
        2.0 * self.radius_m
    }
}

impl Default for BallPhysicalProperties {
    fn default() -> Self {
        Self::MLB
    }
}
