//! batted-ball-flight
//!
//! 3D flight of a struck baseball from contact to ground, integrated with RK4.
//! - Gravity, spin-dependent drag and Magnus lift (`aero`).
//! - Air density and wind from `batted-ball-core`; both constant over a flight.
//! - Landing found by interpolating the step that crosses ground level.
//! - Batch entry points spread independent flights over rayon (`parallel` feature).
//!
//! Conventions:
//! - Integration frame: x toward center field, y lateral (pull side positive), z up.
//! - Reported landing point: field frame, x lateral with right field positive,
//!   y toward center field.
//! - Backspin spins about the horizontal axis perpendicular to travel and
//!   lifts the ball; positive sidespin curves it toward right field.
//!
//! Everything here is a pure function of its inputs: no global state, no I/O.

pub mod aero;
pub mod batch;
pub mod integrator;
pub mod simulator;
pub mod validation;

pub use aero::{AeroCoefficients, AerodynamicForceModel, FlightForces, ForceBreakdown, SpinState};
pub use batch::{
    collide_and_simulate_batch, optimal_launch_angle, simulate_batch, sweep_exit_velocity, BatchRun,
    ContactOutcome, LaunchAngleOptimum,
};
pub use integrator::{integrate, BallState, ForceModel, IntegrateOpts, Integration, Method};
pub use simulator::{
    simulate, velocity_to_field, FieldPoint, LaunchConditions, PathPoint, SimulationConfig, TrajectoryResult,
    TrajectorySimulator,
};
pub use validation::{ValidationCheck, ValidationReport, ValidationSuite};
