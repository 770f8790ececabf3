//! Aerodynamic force model: gravity, spin-dependent drag and Magnus lift.
//!
//!   F_drag   = −½ Cd ρ A |v_rel|² · v̂_rel
//!   F_magnus =  ½ Cl ρ A |v_rel|² · (v̂_rel × ŝ)/|v̂_rel × ŝ|
//!
//! where v_rel = v_ball − wind and ŝ is the unit spin axis. Cd grows with
//! spin rate, and again in proportion to the horizontal share of the Magnus
//! direction once sidespin tilts the axis. Cl is linear in spin rate up to a saturation point.

use batted_ball_core::{normalize_or_zero, Atmosphere, BallPhysicalProperties, JsonConfig, Vec3, GRAVITY};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::integrator::{BallState, ForceModel};

/// Below this relative speed [m/s] drag and Magnus are skipped.
const MIN_RELATIVE_SPEED: f64 = 1e-6;
/// Below this |v̂ × ŝ| the Magnus direction is undefined.
const MIN_CROSS_NORM: f64 = 1e-6;

/* ------------------------------ coefficients ------------------------------ */

/// Calibrated aerodynamic constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroCoefficients {
    /// Drag coefficient of a non-spinning ball
    pub drag_base: f64,
    /// Extra Cd per rpm of total spin
    pub spin_drag_per_rpm: f64,
    /// Cap on the spin-magnitude drag increase
    pub max_spin_drag: f64,
    /// Extra Cd per rpm, scaled by the horizontal share of the Magnus direction
    pub tilt_drag_per_rpm: f64,
    /// Tilt drag only applies above this spin rate [rpm]
    pub tilt_min_spin_rpm: f64,
    /// ...and above this horizontal share of the Magnus direction
    pub tilt_min_horizontal: f64,
    /// Lift coefficient per rpm
    pub lift_per_rpm: f64,
    /// Spin rate where lift starts to saturate [rpm]
    pub lift_saturation_rpm: f64,
    /// Fraction of the lift slope kept past saturation
    pub lift_slope_after_saturation: f64,
    /// Spin below this is treated as no spin [rpm]
    pub min_spin_rpm: f64,
    /// Dynamic viscosity of air [Pa·s], for the Reynolds number
    pub dynamic_viscosity: f64,
}

impl Default for AeroCoefficients {
    fn default() -> Self {
        Self {
            drag_base: 0.32,
            spin_drag_per_rpm: 2e-5,
            max_spin_drag: 0.15,
            tilt_drag_per_rpm: 1e-5,
            tilt_min_spin_rpm: 100.0,
            tilt_min_horizontal: 0.1,
            lift_per_rpm: 1.45e-4,
            lift_saturation_rpm: 2500.0,
            lift_slope_after_saturation: 0.2,
            min_spin_rpm: 1.0,
            dynamic_viscosity: 1.81e-5,
        }
    }
}

impl JsonConfig for AeroCoefficients {}

/* ---------------------------------- spin ---------------------------------- */

/// Spin of the ball: unit axis + rate. Constant over one flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    pub axis: Vec3,
    pub rpm: f64,
}

impl Default for SpinState {
    fn default() -> Self {
        Self::none()
    }
}

impl SpinState {
    /// No spin. The axis is vertical so it is still a unit vector.
    pub fn none() -> Self {
        Self { axis: Vec3::z(), rpm: 0.0 }
    }

    /// Compose backspin (about +y) and sidespin (about +z) for a ball hit
    /// straight out to center field.
    pub fn from_components(backspin_rpm: f64, sidespin_rpm: f64) -> Self {
        Self::for_launch(backspin_rpm, sidespin_rpm, 0.0)
    }

    /// Compose backspin and sidespin for a ball launched along `spray_angle_rad`.
    ///
    /// The backspin axis is rotated with the spray so it stays horizontal and
    /// perpendicular to the direction of travel.
    pub fn for_launch(backspin_rpm: f64, sidespin_rpm: f64, spray_angle_rad: f64) -> Self {
        let backspin_axis = Rotation3::from_axis_angle(&Vector3::z_axis(), spray_angle_rad) * Vector3::y();
        let omega = backspin_axis * backspin_rpm + Vec3::z() * sidespin_rpm;
        let rpm = omega.norm();
        if rpm < 0.1 {
            return Self::none();
        }
        Self { axis: omega / rpm, rpm }
    }
}

/* ------------------------------ force output ------------------------------ */

/// Forces acting on the ball at one instant [N].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceBreakdown {
    pub gravity: Vec3,
    pub drag: Vec3,
    pub magnus: Vec3,
    /// Drag coefficient used, spin corrections included
    pub drag_coefficient: f64,
    pub lift_coefficient: f64,
}

impl ForceBreakdown {
    pub fn total(&self) -> Vec3 {
        self.gravity + self.drag + self.magnus
    }
}

/* ---------------------------------- model --------------------------------- */

#[derive(Clone, Copy, Debug, Default)]
pub struct AerodynamicForceModel {
    coefficients: AeroCoefficients,
    ball: BallPhysicalProperties,
}

impl AerodynamicForceModel {
    pub fn new(coefficients: AeroCoefficients, ball: BallPhysicalProperties) -> Self {
        Self { coefficients, ball }
    }

    pub fn coefficients(&self) -> &AeroCoefficients {
        &self.coefficients
    }

    pub fn ball(&self) -> &BallPhysicalProperties {
        &self.ball
    }

    /// Cd for a given spin rate and horizontal share of the unit Magnus direction.
    pub fn drag_coefficient(&self, spin_rpm: f64, magnus_horizontal: f64) -> f64 {
        let c = &self.coefficients;
        let rpm = spin_rpm.max(0.0);
        let mut cd = c.drag_base + (c.spin_drag_per_rpm * rpm).min(c.max_spin_drag);
        if rpm > c.tilt_min_spin_rpm && magnus_horizontal > c.tilt_min_horizontal {
            cd += c.tilt_drag_per_rpm * rpm * magnus_horizontal;
        }
        cd
    }

    pub fn lift_coefficient(&self, spin_rpm: f64) -> f64 {
        let c = &self.coefficients;
        let rpm = spin_rpm.max(0.0);
        if rpm <= c.lift_saturation_rpm {
            c.lift_per_rpm * rpm
        } else {
            c.lift_per_rpm
                * (c.lift_saturation_rpm + c.lift_slope_after_saturation * (rpm - c.lift_saturation_rpm))
        }
    }

    /// Reynolds number of the ball at `speed_mps` through air of `air_density`.
    pub fn reynolds_number(&self, speed_mps: f64, air_density: f64) -> f64 {
        air_density * speed_mps.abs() * self.ball.diameter_m() / self.coefficients.dynamic_viscosity
    }

    /// Every force on a ball moving at `velocity` through `atmosphere`.
    pub fn breakdown(&self, velocity: &Vec3, spin: &SpinState, atmosphere: &Atmosphere) -> ForceBreakdown {
        let gravity = Vec3::new(0.0, 0.0, -self.ball.mass_kg * GRAVITY);

        let v_rel = velocity - atmosphere.wind;
        let speed = v_rel.norm();
        if speed < MIN_RELATIVE_SPEED {
            return ForceBreakdown {
                gravity,
                drag: Vec3::zeros(),
                magnus: Vec3::zeros(),
                drag_coefficient: 0.0,
                lift_coefficient: 0.0,
            };
        }
        let v_hat = v_rel / speed;

        // Magnus direction v̂ × ŝ; zero when spin is parallel to the flow.
        let cross = v_hat.cross(&spin.axis);
        let magnus_dir = if cross.norm() > MIN_CROSS_NORM {
            normalize_or_zero(&cross)
        } else {
            Vec3::zeros()
        };
        let magnus_horizontal = magnus_dir.x.hypot(magnus_dir.y);

        let q = 0.5 * atmosphere.air_density * self.ball.area_m2 * speed * speed;

        let cd = self.drag_coefficient(spin.rpm, magnus_horizontal);
        let drag = -v_hat * (cd * q);

        let (cl, magnus) = if spin.rpm >= self.coefficients.min_spin_rpm && magnus_dir != Vec3::zeros() {
            let cl = self.lift_coefficient(spin.rpm);
            (cl, magnus_dir * (cl * q))
        } else {
            (0.0, Vec3::zeros())
        };

        ForceBreakdown { gravity, drag, magnus, drag_coefficient: cd, lift_coefficient: cl }
    }

    /// Net acceleration [m/s²].
    pub fn acceleration(&self, velocity: &Vec3, spin: &SpinState, atmosphere: &Atmosphere) -> Vec3 {
        self.breakdown(velocity, spin, atmosphere).total() / self.ball.mass_kg
    }

    /// Fix spin and air for one flight.
    pub fn bind(&self, spin: SpinState, atmosphere: Atmosphere) -> FlightForces {
        FlightForces { model: *self, spin, atmosphere }
    }
}

/// Force model with spin and atmosphere fixed; what the integrator sees.
#[derive(Clone, Copy, Debug)]
pub struct FlightForces {
    model: AerodynamicForceModel,
    spin: SpinState,
    atmosphere: Atmosphere,
}

impl ForceModel for FlightForces {
    fn acceleration(&self, state: &BallState) -> Vec3 {
        self.model.acceleration(&state.velocity, &self.spin, &self.atmosphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use batted_ball_core::units::mph_to_mps;

    fn air() -> Atmosphere {
        Atmosphere::still(1.194)
    }

    #[test]
    fn backspin_lifts_and_drag_opposes_motion() {
        let model = AerodynamicForceModel::default();
        let v = Vec3::new(40.0, 0.0, 0.0);
        let f = model.breakdown(&v, &SpinState::from_components(1800.0, 0.0), &air());
        assert!(f.magnus.z > 0.0);
        assert_relative_eq!(f.magnus.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.magnus.y, 0.0, epsilon = 1e-12);
        assert!(f.drag.x < 0.0);
        assert_relative_eq!(f.gravity.z, -0.145 * GRAVITY);
        // pure backspin: no tilt drag
        assert_relative_eq!(f.drag_coefficient, 0.32 + 2e-5 * 1800.0, epsilon = 1e-12);
    }

    #[test]
    fn positive_sidespin_curves_toward_negative_y() {
        let model = AerodynamicForceModel::default();
        let v = Vec3::new(40.0, 0.0, 0.0);
        let f = model.breakdown(&v, &SpinState::from_components(0.0, 1500.0), &air());
        assert!(f.magnus.y < 0.0);
    }

    #[test]
    fn tilted_axis_costs_extra_drag() {
        let model = AerodynamicForceModel::default();
        let v = Vec3::new(35.0, 0.0, 18.0);
        let back = model.breakdown(&v, &SpinState::from_components(1800.0, 0.0), &air());
        let tilted = model.breakdown(&v, &SpinState::from_components(1800.0, 1500.0), &air());
        assert!(tilted.drag_coefficient > back.drag_coefficient + 0.01);
    }

    #[test]
    fn spin_drag_is_capped_and_lift_saturates() {
        let model = AerodynamicForceModel::default();
        assert_relative_eq!(model.drag_coefficient(20_000.0, 0.0), 0.32 + 0.15);
        let below = model.lift_coefficient(2500.0);
        let above = model.lift_coefficient(3500.0);
        assert_relative_eq!(below, 1.45e-4 * 2500.0);
        assert_relative_eq!(above - below, 1.45e-4 * 0.2 * 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_relative_velocity_leaves_only_gravity() {
        let model = AerodynamicForceModel::default();
        let wind = Vec3::new(mph_to_mps(10.0), 0.0, 0.0);
        let atmosphere = Atmosphere { air_density: 1.2, wind };
        let a = model.acceleration(&wind, &SpinState::from_components(2000.0, 500.0), &atmosphere);
        assert_relative_eq!(a, Vec3::new(0.0, 0.0, -GRAVITY), epsilon = 1e-12);
    }

    #[test]
    fn spin_parallel_to_flow_gives_no_magnus() {
        let model = AerodynamicForceModel::default();
        let spin = SpinState { axis: Vec3::x(), rpm: 2000.0 };
        let f = model.breakdown(&Vec3::new(30.0, 0.0, 0.0), &spin, &air());
        assert_eq!(f.magnus, Vec3::zeros());
        assert!(f.drag.x < 0.0);
    }

    #[test]
    fn headwind_raises_drag() {
        let model = AerodynamicForceModel::default();
        let v = Vec3::new(40.0, 0.0, 0.0);
        let calm = model.breakdown(&v, &SpinState::none(), &air());
        let into = Atmosphere { air_density: 1.194, wind: Vec3::new(-5.0, 0.0, 0.0) };
        let windy = model.breakdown(&v, &SpinState::none(), &into);
        assert!(windy.drag.x < calm.drag.x);
    }

    #[test]
    fn spin_axis_tracks_spray_angle() {
        let spray = 30f64.to_radians();
        let spin = SpinState::for_launch(1800.0, 0.0, spray);
        assert_relative_eq!(spin.axis.norm(), 1.0, epsilon = 1e-12);
        let dir = Vec3::new(spray.cos(), spray.sin(), 0.0);
        assert_relative_eq!(spin.axis.dot(&dir), 0.0, epsilon = 1e-12);
        assert_relative_eq!(spin.axis, Vec3::new(-spray.sin(), spray.cos(), 0.0), epsilon = 1e-12);

        let pulled = SpinState::for_launch(1800.0, 0.0, 90f64.to_radians());
        assert_relative_eq!(pulled.axis, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(SpinState::from_components(0.0, 0.0), SpinState::none());
    }

    #[test]
    fn reynolds_number_of_a_hard_hit_ball() {
        let model = AerodynamicForceModel::default();
        let re = model.reynolds_number(mph_to_mps(100.0), 1.194);
        assert!((1.5e5..3.0e5).contains(&re), "re={re}");
    }
}
