//! Batch entry points.
//!
//! Every flight is independent, so runs are spread over the rayon pool with
//! the `parallel` feature and run in order otherwise. Output order always
//! matches input order.

use batted_ball_collision::{CollisionModel, CollisionResult, ContactGeometry};
use batted_ball_core::{ensure_finite, EnvironmentConditions, Result};
use serde::{Deserialize, Serialize};

use crate::simulator::{LaunchConditions, TrajectoryResult, TrajectorySimulator};

/// One flight in a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchRun {
    pub launch: LaunchConditions,
    pub environment: EnvironmentConditions,
}

/// A collision and the flight that came out of it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactOutcome {
    pub collision: CollisionResult,
    pub trajectory: TrajectoryResult,
}

/// Best launch angle found by [`optimal_launch_angle`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaunchAngleOptimum {
    pub launch_angle_deg: f64,
    pub distance_ft: f64,
}

#[cfg(feature = "parallel")]
fn map_runs<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    use rayon::prelude::*;
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_runs<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    F: Fn(&T) -> R,
{
    items.iter().map(f).collect()
}

pub fn simulate_batch(simulator: &TrajectorySimulator, runs: &[BatchRun]) -> Vec<Result<TrajectoryResult>> {
    log::debug!("simulating batch of {} flights", runs.len());
    map_runs(runs, |run| simulator.simulate(&run.launch, &run.environment))
}

/// Collide, then fly each contact straight out to center field.
pub fn collide_and_simulate_batch(
    model: &CollisionModel,
    simulator: &TrajectorySimulator,
    contacts: &[ContactGeometry],
    environment: &EnvironmentConditions,
) -> Vec<Result<ContactOutcome>> {
    log::debug!("colliding and simulating {} contacts", contacts.len());
    map_runs(contacts, |contact| -> Result<ContactOutcome> {
        let collision = model.compute(contact)?;
        let trajectory = simulator.simulate_collision(&collision, 0.0, environment)?;
        Ok(ContactOutcome { collision, trajectory })
    })
}

/// Re-fly `base` once per exit velocity.
pub fn sweep_exit_velocity(
    simulator: &TrajectorySimulator,
    base: &LaunchConditions,
    environment: &EnvironmentConditions,
    exit_velocities_mph: &[f64],
) -> Vec<Result<TrajectoryResult>> {
    map_runs(exit_velocities_mph, |&ev| {
        let launch = LaunchConditions { exit_velocity_mph: ev, ..*base };
        simulator.simulate(&launch, environment)
    })
}

/// Scan launch angles in `[min_deg, max_deg]` every `step_deg` and keep the longest carry.
///
/// Bounds are swapped if reversed and clamped to ±90°; the step is floored at 0.1°.
pub fn optimal_launch_angle(
    simulator: &TrajectorySimulator,
    base: &LaunchConditions,
    environment: &EnvironmentConditions,
    min_deg: f64,
    max_deg: f64,
    step_deg: f64,
) -> Result<LaunchAngleOptimum> {
    let lo = ensure_finite("min_deg", min_deg)?;
    let hi = ensure_finite("max_deg", max_deg)?;
    let step = ensure_finite("step_deg", step_deg)?.abs().max(0.1);
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let (lo, hi) = (lo.clamp(-90.0, 90.0), hi.clamp(-90.0, 90.0));

    let angles: Vec<f64> = (0u32..)
        .map(|i| lo + f64::from(i) * step)
        .take_while(|a| *a <= hi + 1e-9)
        .collect();

    let runs = map_runs(&angles, |&la| {
        let launch = LaunchConditions { launch_angle_deg: la, ..*base };
        simulator.simulate(&launch, environment).map(|r| LaunchAngleOptimum {
            launch_angle_deg: la,
            distance_ft: r.distance_ft,
        })
    });

    let mut best = LaunchAngleOptimum { launch_angle_deg: lo, distance_ft: f64::NEG_INFINITY };
    for run in runs {
        let run = run?;
        if run.distance_ft > best.distance_ft {
            best = run;
        }
    }
    log::debug!("optimal launch angle {:.1}° carries {:.1} ft", best.launch_angle_deg, best.distance_ft);
    Ok(best)
}
