//! Core batted-ball utilities
//!
//! Includes:
//! - Units & conversions (imperial/SI, backed by `uom`)
//! - Ball physical properties and shared physical constants
//! - Atmosphere: air density from altitude, temperature, humidity
//! - Wind representation
//! - Error type and JSON-loadable configuration trait
//!
//! Frame convention used across the workspace (integration frame):
//!   x = downrange toward center field, y = lateral (pull side positive),
//!   z = up. All vectors are `nalgebra::Vector3<f64>`.

pub mod atmosphere;
pub mod ball;
pub mod config;
pub mod error;
pub mod units;

pub use atmosphere::{
    compute_air_density, compute_wind_vector, Atmosphere, AtmosphereConfig, EnvironmentConditions,
    EnvironmentModel, Wind,
};
pub use ball::{BallPhysicalProperties, GRAVITY, RHO_SEA_LEVEL};
pub use config::JsonConfig;
pub use error::{ensure_finite, BattedBallError, Result};

/// 3D vector used for positions, velocities, accelerations and spin axes.
pub type Vec3 = nalgebra::Vector3<f64>;

/// Normalize `v`, or return zero when it has no usable length.
#[must_use]
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    let n = v.norm();
    if n < 1e-12 {
        Vec3::zeros()
    } else {
        v / n
    }
}
