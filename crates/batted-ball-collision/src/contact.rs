//! Collision inputs and outputs.

use batted_ball_core::{ensure_finite, Result};
use serde::{Deserialize, Serialize};

/// Bat material. Each variant maps to its own material profile in the
/// calibration (see [`crate::CollisionCalibration::profile`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatType {
    #[default]
    Wood,
    Aluminum,
}

/// Where on the bat the ball was struck, plus the swing and pitch that met.
///
/// Offsets are in inches. `vertical_offset_in` is positive when contact is
/// below the bat centerline (undercut), negative when above (topped).
/// `horizontal_offset_in` is the miss distance along the barrel from the
/// sweet spot; its sign picks the sidespin direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactGeometry {
    pub bat_speed_mph: f64,
    pub pitch_speed_mph: f64,
    /// Swing plane relative to horizontal [deg]
    pub bat_path_angle_deg: f64,
    /// Pitch descent angle at the plate [deg], usually negative
    pub pitch_angle_deg: f64,
    pub vertical_offset_in: f64,
    pub horizontal_offset_in: f64,
    pub bat_type: BatType,
}

impl Default for ContactGeometry {
    fn default() -> Self {
        Self {
            bat_speed_mph: 70.0,
            pitch_speed_mph: 90.0,
            bat_path_angle_deg: 28.0,
            pitch_angle_deg: 0.0,
            vertical_offset_in: 0.0,
            horizontal_offset_in: 0.0,
            bat_type: BatType::Wood,
        }
    }
}

impl ContactGeometry {
    /// Sweet-spot contact with a wood bat.
    pub fn new(bat_speed_mph: f64, pitch_speed_mph: f64, bat_path_angle_deg: f64) -> Self {
        Self { bat_speed_mph, pitch_speed_mph, bat_path_angle_deg, ..Self::default() }
    }

    pub fn with_offsets(self, vertical_offset_in: f64, horizontal_offset_in: f64) -> Self {
        Self { vertical_offset_in, horizontal_offset_in, ..self }
    }

    pub fn with_bat(self, bat_type: BatType) -> Self {
        Self { bat_type, ..self }
    }

    /// Apply one of the canned contact presets, replacing both offsets.
    pub fn with_quality(self, quality: ContactQuality) -> Self {
        let (v, h) = quality.offsets_in();
        self.with_offsets(v, h)
    }

    /// Distance of the contact point from the sweet spot [in].
    pub fn offset_magnitude_in(&self) -> f64 {
        self.vertical_offset_in.hypot(self.horizontal_offset_in)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure_finite("bat_speed_mph", self.bat_speed_mph)?;
        ensure_finite("pitch_speed_mph", self.pitch_speed_mph)?;
        ensure_finite("bat_path_angle_deg", self.bat_path_angle_deg)?;
        ensure_finite("pitch_angle_deg", self.pitch_angle_deg)?;
        ensure_finite("vertical_offset_in", self.vertical_offset_in)?;
        ensure_finite("horizontal_offset_in", self.horizontal_offset_in)?;
        Ok(())
    }
}

/// Canned contact locations, one inch off in the named direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactQuality {
    SweetSpot,
    BelowCenter,
    AboveCenter,
    OffCenter,
}

impl ContactQuality {
    /// (vertical, horizontal) offsets in inches.
    pub fn offsets_in(self) -> (f64, f64) {
        match self {
            ContactQuality::SweetSpot => (0.0, 0.0),
            ContactQuality::BelowCenter => (1.0, 0.0),
            ContactQuality::AboveCenter => (-1.0, 0.0),
            ContactQuality::OffCenter => (0.0, 1.0),
        }
    }
}

/// Launch conditions produced by one collision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub exit_velocity_mph: f64,
    pub launch_angle_deg: f64,
    /// Negative values are topspin.
    pub backspin_rpm: f64,
    pub sidespin_rpm: f64,
    /// Coefficient of restitution used
    pub cor: f64,
    /// Fraction of kinetic energy lost to bat vibration
    pub vibration_loss: f64,
    /// Distance of the contact point from the sweet spot [in]
    pub offset_in: f64,
}
