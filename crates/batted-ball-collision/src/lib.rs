//! batted-ball-collision
//!
//! Bat-ball collision model: turns bat speed, pitch speed and contact
//! geometry into launch conditions (exit velocity, launch angle, backspin,
//! sidespin) through an empirically calibrated coefficient of restitution
//! (COR) and a bat-vibration energy-loss term:
//!
//!   COR(d)  = COR_sweet[bat] − k_cor·|d|                 (floored)
//!   loss(d) = min(k_vib·|d|, loss_max)
//!   EV      = (a(COR)·v_bat + b(COR)·v_pitch) · sqrt(1 − loss)
//!
//! with `a` and `b` scaling linearly in COR / COR_ref. `d` is the distance of
//! the contact point from the sweet spot in inches.
//!
//! Exports:
//!   - `CollisionModel::compute`
//!   - `compute_collision` (default calibration)

mod contact;

pub use contact::{BatType, CollisionResult, ContactGeometry, ContactQuality};

use batted_ball_core::{JsonConfig, Result};
use serde::{Deserialize, Serialize};

/* ----------------------------- calibration ----------------------------- */

/// Per-material constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    /// COR at the sweet spot
    pub sweet_spot_cor: f64,
}

/// Tunable constants of the collision model.
///
/// Fit against Statcast-style benchmarks; treat as configuration, not as
/// physical truth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionCalibration {
    pub wood: MaterialProfile,
    pub aluminum: MaterialProfile,
    /// COR lost per inch from the sweet spot
    pub cor_degradation_per_inch: f64,
    pub cor_minimum: f64,
    /// COR the exit-velocity coefficients are normalized to
    pub cor_reference: f64,

    /// Energy fraction lost to vibration per inch from the sweet spot
    pub vibration_loss_per_inch: f64,
    pub max_vibration_loss: f64,

    /// a(COR) = bat_coefficient_base + bat_coefficient_gain · COR/COR_ref
    pub bat_coefficient_base: f64,
    pub bat_coefficient_gain: f64,
    /// b(COR) = pitch_coefficient_gain · COR/COR_ref
    pub pitch_coefficient_gain: f64,

    /// Offset beyond which contact collapses toward a weak dribbler [in]
    pub weak_contact_threshold_in: f64,
    /// e-folding length of that collapse [in]
    pub weak_contact_decay_in: f64,
    pub min_exit_velocity_mph: f64,

    /// Launch angle per degree of bat path
    pub swing_efficiency_ratio: f64,
    /// Launch angle per degree of pitch descent angle
    pub pitch_angle_ratio: f64,
    pub launch_deg_per_inch_below: f64,
    pub launch_deg_per_inch_above: f64,
    pub min_launch_angle_deg: f64,
    pub max_launch_angle_deg: f64,

    /// Backspin from ball compression, always present [rpm]
    pub base_backspin_rpm: f64,
    /// Friction spin per degree of launch angle at the reference bat speed [rpm]
    pub friction_spin_per_degree: f64,
    pub reference_bat_speed_mph: f64,
    pub backspin_per_inch_below: f64,
    pub topspin_per_inch_above: f64,
    pub sidespin_per_inch: f64,
    /// Spin is scaled by sqrt(EV / reference)
    pub reference_exit_velocity_mph: f64,
    pub max_spin_rpm: f64,
}

impl Default for CollisionCalibration {
    fn default() -> Self {
        Self {
            wood: MaterialProfile { sweet_spot_cor: 0.55 },
            aluminum: MaterialProfile { sweet_spot_cor: 0.60 },
            cor_degradation_per_inch: 0.03,
            cor_minimum: 0.35,
            cor_reference: 0.55,

            vibration_loss_per_inch: 0.20,
            max_vibration_loss: 0.60,

            bat_coefficient_base: 1.0,
            bat_coefficient_gain: 0.2,
            pitch_coefficient_gain: 0.2,

            weak_contact_threshold_in: 1.0,
            weak_contact_decay_in: 3.0,
            min_exit_velocity_mph: 5.0,

            swing_efficiency_ratio: 0.85,
            pitch_angle_ratio: 0.15,
            launch_deg_per_inch_below: 2.0,
            launch_deg_per_inch_above: 2.0,
            min_launch_angle_deg: -20.0,
            max_launch_angle_deg: 85.0,

            base_backspin_rpm: 800.0,
            friction_spin_per_degree: 40.0,
            reference_bat_speed_mph: 70.0,
            backspin_per_inch_below: 200.0,
            topspin_per_inch_above: 200.0,
            sidespin_per_inch: 300.0,
            reference_exit_velocity_mph: 100.0,
            max_spin_rpm: 3000.0,
        }
    }
}

impl JsonConfig for CollisionCalibration {}

impl CollisionCalibration {
    pub fn profile(&self, bat: BatType) -> &MaterialProfile {
        match bat {
            BatType::Wood => &self.wood,
            BatType::Aluminum => &self.aluminum,
        }
    }
}

/* -------------------------------- model -------------------------------- */

#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionModel {
    calibration: CollisionCalibration,
}

impl CollisionModel {
    pub fn new(calibration: CollisionCalibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &CollisionCalibration {
        &self.calibration
    }

    /// COR for contact `offset_in` inches from the sweet spot.
    pub fn cor(&self, bat: BatType, offset_in: f64) -> f64 {
        let c = &self.calibration;
        let cor = c.profile(bat).sweet_spot_cor - c.cor_degradation_per_inch * offset_in.abs();
        cor.max(c.cor_minimum).max(0.0)
    }

    /// Fraction of kinetic energy absorbed by bat vibration.
    pub fn vibration_loss(&self, offset_in: f64) -> f64 {
        let c = &self.calibration;
        (c.vibration_loss_per_inch * offset_in.abs()).clamp(0.0, c.max_vibration_loss.min(1.0))
    }

    /// (bat, pitch) velocity transfer coefficients for a given COR.
    pub fn velocity_coefficients(&self, cor: f64) -> (f64, f64) {
        let c = &self.calibration;
        let rel = cor / c.cor_reference;
        let bat = (c.bat_coefficient_base + c.bat_coefficient_gain * rel).max(0.0);
        let pitch = (c.pitch_coefficient_gain * rel).max(0.0);
        (bat, pitch)
    }

    pub fn exit_velocity(&self, bat_speed_mph: f64, pitch_speed_mph: f64, bat: BatType, offset_in: f64) -> f64 {
        let c = &self.calibration;
        let offset = offset_in.abs();
        let cor = self.cor(bat, offset);
        let (a, b) = self.velocity_coefficients(cor);

        let mut v = a * bat_speed_mph.max(0.0) + b * pitch_speed_mph.max(0.0);
        // Kinetic energy scales with v², so an energy loss L costs sqrt(1 − L) in speed.
        v *= (1.0 - self.vibration_loss(offset)).sqrt();

        if offset > c.weak_contact_threshold_in {
            v *= (-(offset - c.weak_contact_threshold_in) / c.weak_contact_decay_in).exp();
        }
        v.max(c.min_exit_velocity_mph)
    }

    pub fn launch_angle(&self, bat_path_angle_deg: f64, pitch_angle_deg: f64, vertical_offset_in: f64) -> f64 {
        let c = &self.calibration;
        let mut la = bat_path_angle_deg.clamp(-90.0, 90.0) * c.swing_efficiency_ratio
            + pitch_angle_deg.clamp(-90.0, 90.0) * c.pitch_angle_ratio;
        if vertical_offset_in > 0.0 {
            la += vertical_offset_in * c.launch_deg_per_inch_below;
        } else {
            la += vertical_offset_in * c.launch_deg_per_inch_above;
        }
        la.clamp(c.min_launch_angle_deg, c.max_launch_angle_deg)
    }

    pub fn backspin(&self, exit_velocity_mph: f64, launch_angle_deg: f64, bat_speed_mph: f64, vertical_offset_in: f64) -> f64 {
        let c = &self.calibration;
        let friction = c.friction_spin_per_degree
            * launch_angle_deg
            * (bat_speed_mph.max(0.0) / c.reference_bat_speed_mph);
        let offset_spin = if vertical_offset_in > 0.0 {
            vertical_offset_in * c.backspin_per_inch_below
        } else {
            vertical_offset_in * c.topspin_per_inch_above
        };
        let spin = (c.base_backspin_rpm + friction + offset_spin) * self.spin_scale(exit_velocity_mph);
        spin.clamp(-c.max_spin_rpm, c.max_spin_rpm)
    }

    pub fn sidespin(&self, exit_velocity_mph: f64, horizontal_offset_in: f64) -> f64 {
        let c = &self.calibration;
        let spin = horizontal_offset_in * c.sidespin_per_inch * self.spin_scale(exit_velocity_mph);
        spin.clamp(-c.max_spin_rpm, c.max_spin_rpm)
    }

    fn spin_scale(&self, exit_velocity_mph: f64) -> f64 {
        (exit_velocity_mph.max(0.0) / self.calibration.reference_exit_velocity_mph).sqrt()
    }

    /// Full collision: contact geometry → launch conditions.
    ///
    /// Out-of-range inputs are clamped; only NaN/infinite inputs fail.
    pub fn compute(&self, geometry: &ContactGeometry) -> Result<CollisionResult> {
        geometry.validate()?;

        let offset = geometry.offset_magnitude_in();
        let cor = self.cor(geometry.bat_type, offset);
        let vibration_loss = self.vibration_loss(offset);
        let exit_velocity_mph = self.exit_velocity(
            geometry.bat_speed_mph,
            geometry.pitch_speed_mph,
            geometry.bat_type,
            offset,
        );
        let launch_angle_deg = self.launch_angle(
            geometry.bat_path_angle_deg,
            geometry.pitch_angle_deg,
            geometry.vertical_offset_in,
        );
        let backspin_rpm = self.backspin(
            exit_velocity_mph,
            launch_angle_deg,
            geometry.bat_speed_mph,
            geometry.vertical_offset_in,
        );
        let sidespin_rpm = self.sidespin(exit_velocity_mph, geometry.horizontal_offset_in);

        log::debug!(
            "collision: {:.1} mph bat, {:.1} mph pitch, offset {:.2} in -> EV {:.1} mph, LA {:.1}°, spin {:.0}/{:.0} rpm (COR {:.3})",
            geometry.bat_speed_mph,
            geometry.pitch_speed_mph,
            offset,
            exit_velocity_mph,
            launch_angle_deg,
            backspin_rpm,
            sidespin_rpm,
            cor
        );

        Ok(CollisionResult {
            exit_velocity_mph,
            launch_angle_deg,
            backspin_rpm,
            sidespin_rpm,
            cor,
            vibration_loss,
            offset_in: offset,
        })
    }
}

/// Collision with the default calibration.
pub fn compute_collision(geometry: &ContactGeometry) -> Result<CollisionResult> {
    CollisionModel::default().compute(geometry)
}

/* -------------------------------- tests -------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sweet_spot() -> ContactGeometry {
        ContactGeometry::new(70.0, 90.0, 28.0)
    }

    #[test]
    fn sweet_spot_wood_contact() {
        let r = compute_collision(&sweet_spot()).unwrap();
        // 1.2·70 + 0.2·90
        assert_relative_eq!(r.exit_velocity_mph, 102.0, epsilon = 1e-9);
        assert_relative_eq!(r.launch_angle_deg, 23.8, epsilon = 1e-9);
        assert_relative_eq!(r.cor, 0.55);
        assert_relative_eq!(r.vibration_loss, 0.0);
        assert!((98.0..=106.0).contains(&r.exit_velocity_mph));
        assert!((20.0..=30.0).contains(&r.launch_angle_deg));
        assert!((1500.0..2100.0).contains(&r.backspin_rpm), "backspin={}", r.backspin_rpm);
        assert_relative_eq!(r.sidespin_rpm, 0.0);
    }

    #[test]
    fn aluminum_out_hits_wood() {
        let wood = compute_collision(&sweet_spot()).unwrap();
        let alum = compute_collision(&sweet_spot().with_bat(BatType::Aluminum)).unwrap();
        assert!(alum.cor > wood.cor);
        assert!(alum.exit_velocity_mph > wood.exit_velocity_mph);
    }

    #[test]
    fn exit_velocity_strictly_decreases_off_the_sweet_spot() {
        let base = compute_collision(&sweet_spot()).unwrap().exit_velocity_mph;
        for off in [0.05, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0] {
            let h = compute_collision(&sweet_spot().with_offsets(0.0, off)).unwrap();
            let v = compute_collision(&sweet_spot().with_offsets(off, 0.0)).unwrap();
            let neg = compute_collision(&sweet_spot().with_offsets(0.0, -off)).unwrap();
            assert!(h.exit_velocity_mph < base, "h offset {off}");
            assert!(v.exit_velocity_mph < base, "v offset {off}");
            assert_relative_eq!(neg.exit_velocity_mph, h.exit_velocity_mph);
        }
        let mut prev = base;
        for i in 1..=40 {
            let off = f64::from(i) * 0.25;
            let ev = compute_collision(&sweet_spot().with_offsets(0.0, off)).unwrap().exit_velocity_mph;
            assert!(ev <= prev);
            prev = ev;
        }
    }

    #[test]
    fn far_off_contact_collapses_but_never_goes_negative() {
        let model = CollisionModel::default();
        let r = model.compute(&sweet_spot().with_offsets(0.0, 12.0)).unwrap();
        assert!(r.exit_velocity_mph < 25.0, "ev={}", r.exit_velocity_mph);
        assert!(r.exit_velocity_mph >= model.calibration().min_exit_velocity_mph);
        assert!(r.cor >= model.calibration().cor_minimum);
        assert_relative_eq!(r.vibration_loss, 0.6);
        let (a, b) = model.velocity_coefficients(r.cor);
        assert!(a > 0.0 && b > 0.0);
    }

    #[test]
    fn undercut_raises_angle_and_backspin_topped_lowers_them() {
        let center = compute_collision(&sweet_spot()).unwrap();
        let under = compute_collision(&sweet_spot().with_quality(ContactQuality::BelowCenter)).unwrap();
        let over = compute_collision(&sweet_spot().with_quality(ContactQuality::AboveCenter)).unwrap();
        assert!(under.launch_angle_deg > center.launch_angle_deg);
        assert!(over.launch_angle_deg < center.launch_angle_deg);
        assert!(under.backspin_rpm > over.backspin_rpm);
    }

    #[test]
    fn heavily_topped_ball_gets_topspin() {
        let r = compute_collision(&ContactGeometry::new(70.0, 90.0, 0.0).with_offsets(-6.0, 0.0)).unwrap();
        assert!(r.backspin_rpm < 0.0, "backspin={}", r.backspin_rpm);
        assert_relative_eq!(r.launch_angle_deg, -12.0, epsilon = 1e-9);
    }

    #[test]
    fn sidespin_follows_horizontal_offset_sign() {
        let right = compute_collision(&sweet_spot().with_offsets(0.0, 1.0)).unwrap();
        let left = compute_collision(&sweet_spot().with_offsets(0.0, -1.0)).unwrap();
        assert!(right.sidespin_rpm > 0.0);
        assert_relative_eq!(left.sidespin_rpm, -right.sidespin_rpm);
    }

    #[test]
    fn spin_is_clamped() {
        let model = CollisionModel::default();
        let s = model.backspin(200.0, 85.0, 200.0, 10.0);
        assert_relative_eq!(s, 3000.0);
    }

    #[test]
    fn out_of_domain_inputs_are_clamped() {
        let r = compute_collision(&ContactGeometry::new(-50.0, -20.0, 400.0)).unwrap();
        assert!(r.exit_velocity_mph >= 0.0);
        assert!(r.launch_angle_deg <= 85.0);
    }

    #[test]
    fn nan_inputs_are_errors() {
        let g = ContactGeometry { bat_speed_mph: f64::NAN, ..sweet_spot() };
        assert!(compute_collision(&g).is_err());
    }

    #[test]
    fn calibration_can_be_injected() -> anyhow::Result<()> {
        let cal = CollisionCalibration::from_json_str(r#"{ "wood": { "sweet_spot_cor": 0.50 } }"#)?;
        let model = CollisionModel::new(cal);
        let r = model.compute(&sweet_spot())?;
        assert_relative_eq!(r.cor, 0.50);
        assert!(r.exit_velocity_mph < 102.0);
        Ok(())
    }
}
