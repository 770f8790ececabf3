//! Trajectory simulator: launch conditions + environment → flight summary.
//!
//! Integration frame: x toward center field, y lateral (pull side / left
//! field positive), z up. Results are reported in field coordinates:
//! x lateral with right field positive, y toward center field.

use batted_ball_collision::CollisionResult;
use batted_ball_core::units::{deg_to_rad, ft_to_m, m_to_ft, mph_to_mps, mps_to_mph, rad_to_deg};
use batted_ball_core::{ensure_finite, EnvironmentConditions, EnvironmentModel, JsonConfig, Result, Vec3};
use serde::{Deserialize, Serialize};

use crate::aero::{AerodynamicForceModel, SpinState};
use crate::integrator::{integrate, BallState, IntegrateOpts, Integration, Method};

/* --------------------------------- inputs --------------------------------- */

/// Ball state right off the bat.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConditions {
    pub exit_velocity_mph: f64,
    pub launch_angle_deg: f64,
    /// 0 = center field, positive = pull side (left field)
    pub spray_angle_deg: f64,
    pub backspin_rpm: f64,
    /// Positive curves the ball toward right field
    pub sidespin_rpm: f64,
    /// Height of contact above the ground [ft]
    pub initial_height_ft: f64,
}

impl Default for LaunchConditions {
    fn default() -> Self {
        Self {
            exit_velocity_mph: 100.0,
            launch_angle_deg: 28.0,
            spray_angle_deg: 0.0,
            backspin_rpm: 0.0,
            sidespin_rpm: 0.0,
            initial_height_ft: 3.0,
        }
    }
}

impl LaunchConditions {
    /// Spinless ball hit to center field from 3 ft.
    pub fn new(exit_velocity_mph: f64, launch_angle_deg: f64) -> Self {
        Self { exit_velocity_mph, launch_angle_deg, ..Self::default() }
    }

    pub fn with_spray(self, spray_angle_deg: f64) -> Self {
        Self { spray_angle_deg, ..self }
    }

    pub fn with_spin(self, backspin_rpm: f64, sidespin_rpm: f64) -> Self {
        Self { backspin_rpm, sidespin_rpm, ..self }
    }

    pub fn with_initial_height(self, initial_height_ft: f64) -> Self {
        Self { initial_height_ft, ..self }
    }

    /// Launch conditions produced by a bat-ball collision.
    pub fn from_collision(collision: &CollisionResult, spray_angle_deg: f64) -> Self {
        Self {
            exit_velocity_mph: collision.exit_velocity_mph,
            launch_angle_deg: collision.launch_angle_deg,
            spray_angle_deg,
            backspin_rpm: collision.backspin_rpm,
            sidespin_rpm: collision.sidespin_rpm,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("exit_velocity_mph", self.exit_velocity_mph)?;
        ensure_finite("launch_angle_deg", self.launch_angle_deg)?;
        ensure_finite("spray_angle_deg", self.spray_angle_deg)?;
        ensure_finite("backspin_rpm", self.backspin_rpm)?;
        ensure_finite("sidespin_rpm", self.sidespin_rpm)?;
        ensure_finite("initial_height_ft", self.initial_height_ft)?;
        Ok(())
    }

    /// Pull out-of-domain values back to the nearest valid boundary.
    pub fn clamped(&self) -> Self {
        Self {
            exit_velocity_mph: self.exit_velocity_mph.max(0.0),
            launch_angle_deg: self.launch_angle_deg.clamp(-90.0, 90.0),
            spray_angle_deg: self.spray_angle_deg.clamp(-90.0, 90.0),
            initial_height_ft: self.initial_height_ft.max(0.0),
            ..*self
        }
    }
}

/// Solver settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Time step [s]
    pub dt: f64,
    /// Give up after this much flight time [s]
    pub max_time_s: f64,
    pub ground_level_ft: f64,
    pub method: Method,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { dt: 0.001, max_time_s: 10.0, ground_level_ft: 0.0, method: Method::Rk4 }
    }
}

impl JsonConfig for SimulationConfig {}

impl SimulationConfig {
    /// 0.5 ms steps.
    pub fn fine() -> Self {
        Self { dt: 0.0005, ..Self::default() }
    }

    /// 2 ms steps; well under 1 % distance error.
    pub fn fast() -> Self {
        Self { dt: 0.002, ..Self::default() }
    }

    /// 5 ms steps for large batches.
    pub fn coarse() -> Self {
        Self { dt: 0.005, ..Self::default() }
    }

    fn integrate_opts(&self) -> IntegrateOpts {
        IntegrateOpts {
            dt: self.dt,
            max_time: self.max_time_s,
            ground_z: ft_to_m(self.ground_level_ft),
            method: self.method,
        }
    }
}

/* --------------------------------- output --------------------------------- */

/// Summary of one flight. Distances in feet, landing point in field coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    /// Horizontal distance from home plate to the landing point
    pub distance_ft: f64,
    pub flight_time_s: f64,
    pub peak_height_ft: f64,
    pub time_to_peak_s: f64,
    pub final_velocity_mph: f64,
    /// Lateral landing coordinate, right field positive
    pub landing_x_ft: f64,
    /// Landing coordinate toward center field
    pub landing_y_ft: f64,
    pub landing_z_ft: f64,
    /// Direction of the landing point, same sign convention as the spray angle
    pub spray_angle_at_landing_deg: f64,
    /// Set when `max_time_s` ran out before ground contact
    pub truncated: bool,
}

/// A point in field coordinates [ft].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    /// Lateral, right field positive
    pub x_ft: f64,
    /// Toward center field
    pub y_ft: f64,
    pub z_ft: f64,
}

impl FieldPoint {
    /// Integration-frame position [m] → field coordinates [ft].
    pub fn from_trajectory(position: &Vec3) -> Self {
        Self {
            x_ft: -m_to_ft(position.y),
            y_ft: m_to_ft(position.x),
            z_ft: m_to_ft(position.z),
        }
    }

    /// Field coordinates [ft] → integration-frame position [m].
    pub fn to_trajectory(&self) -> Vec3 {
        Vec3::new(ft_to_m(self.y_ft), -ft_to_m(self.x_ft), ft_to_m(self.z_ft))
    }
}

/// Integration-frame velocity [m/s] → field-frame velocity [m/s].
pub fn velocity_to_field(velocity: &Vec3) -> Vec3 {
    Vec3::new(-velocity.y, velocity.x, velocity.z)
}

/// One sample of a plotted path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub time_s: f64,
    #[serde(flatten)]
    pub point: FieldPoint,
    pub speed_mph: f64,
}

/* -------------------------------- simulator ------------------------------- */

#[derive(Clone, Copy, Debug, Default)]
pub struct TrajectorySimulator {
    environment: EnvironmentModel,
    aero: AerodynamicForceModel,
    config: SimulationConfig,
}

impl TrajectorySimulator {
    pub fn new(environment: EnvironmentModel, aero: AerodynamicForceModel, config: SimulationConfig) -> Self {
        Self { environment, aero, config }
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn environment_model(&self) -> &EnvironmentModel {
        &self.environment
    }

    pub fn force_model(&self) -> &AerodynamicForceModel {
        &self.aero
    }

    /// Fly one batted ball and summarize the flight.
    pub fn simulate(&self, launch: &LaunchConditions, environment: &EnvironmentConditions) -> Result<TrajectoryResult> {
        let flight = self.fly(launch, environment)?;
        Ok(self.summarize(&flight))
    }

    /// Like [`simulate`](Self::simulate), also returning every sample in field coordinates.
    pub fn simulate_with_path(
        &self,
        launch: &LaunchConditions,
        environment: &EnvironmentConditions,
    ) -> Result<(TrajectoryResult, Vec<PathPoint>)> {
        let flight = self.fly(launch, environment)?;
        let path = flight
            .samples()
            .iter()
            .map(|s| PathPoint {
                time_s: s.time,
                point: FieldPoint::from_trajectory(&s.position),
                speed_mph: mps_to_mph(s.speed()),
            })
            .collect();
        Ok((self.summarize(&flight), path))
    }

    /// Fly the ball coming off a collision.
    pub fn simulate_collision(
        &self,
        collision: &CollisionResult,
        spray_angle_deg: f64,
        environment: &EnvironmentConditions,
    ) -> Result<TrajectoryResult> {
        self.simulate(&LaunchConditions::from_collision(collision, spray_angle_deg), environment)
    }

    fn fly(&self, launch: &LaunchConditions, environment: &EnvironmentConditions) -> Result<Integration> {
        launch.validate()?;
        let launch = launch.clamped();
        let atmosphere = self.environment.resolve(environment)?;

        let v = mph_to_mps(launch.exit_velocity_mph);
        let la = deg_to_rad(launch.launch_angle_deg);
        let spray = deg_to_rad(launch.spray_angle_deg);
        let velocity = Vec3::new(v * la.cos() * spray.cos(), v * la.cos() * spray.sin(), v * la.sin());
        let position = Vec3::new(0.0, 0.0, ft_to_m(self.config.ground_level_ft + launch.initial_height_ft));

        let spin = SpinState::for_launch(launch.backspin_rpm, launch.sidespin_rpm, spray);
        let forces = self.aero.bind(spin, atmosphere);

        log::trace!(
            "simulate: {:.1} mph @ {:.1}°, spray {:.1}°, spin {:.0} rpm, rho {:.4} kg/m³",
            launch.exit_velocity_mph,
            launch.launch_angle_deg,
            launch.spray_angle_deg,
            spin.rpm,
            atmosphere.air_density
        );

        integrate(BallState::new(position, velocity), &forces, &self.config.integrate_opts())
    }

    fn summarize(&self, flight: &Integration) -> TrajectoryResult {
        let last = flight.last();
        let apex = flight.apex();
        let landing = FieldPoint::from_trajectory(&last.position);
        let result = TrajectoryResult {
            distance_ft: m_to_ft(last.position.x.hypot(last.position.y)),
            flight_time_s: last.time,
            peak_height_ft: m_to_ft(apex.position.z),
            time_to_peak_s: apex.time,
            final_velocity_mph: mps_to_mph(last.speed()),
            landing_x_ft: landing.x_ft,
            landing_y_ft: landing.y_ft,
            landing_z_ft: landing.z_ft,
            spray_angle_at_landing_deg: rad_to_deg(last.position.y.atan2(last.position.x)),
            truncated: flight.truncated(),
        };

        log::debug!(
            "flight: {:.1} ft in {:.2} s, apex {:.1} ft at {:.2} s{}",
            result.distance_ft,
            result.flight_time_s,
            result.peak_height_ft,
            result.time_to_peak_s,
            if result.truncated { " (truncated)" } else { "" }
        );
        result
    }
}

/// Simulate with the default calibration and solver settings.
pub fn simulate(launch: &LaunchConditions, environment: &EnvironmentConditions) -> Result<TrajectoryResult> {
    TrajectorySimulator::default().simulate(launch, environment)
}
