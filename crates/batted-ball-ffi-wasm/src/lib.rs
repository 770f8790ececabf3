// crates/batted-ball-ffi-wasm/src/lib.rs
//
// WASM bindings: collision, single flight and batch flight exports.
// Inputs and outputs are plain JS objects with camelCase keys; every input
// field is optional and falls back to the library defaults.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

// --- our crates ---
use batted_ball_collision::{compute_collision, BatType, CollisionResult, ContactGeometry};
use batted_ball_core::EnvironmentConditions;
use batted_ball_flight::{
    simulate_batch, BatchRun, LaunchConditions, SimulationConfig, TrajectoryResult, TrajectorySimulator,
};

// Better panic messages in browser console
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

fn js_error(err: &anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

/* ------------------------------- Collision ------------------------------- */

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsContactInput {
    pub bat_speed_mph: f64,
    pub pitch_speed_mph: f64,
    pub bat_path_angle_deg: f64,
    pub pitch_angle_deg: f64,
    pub vertical_offset_in: f64,
    pub horizontal_offset_in: f64,
    /// "wood" | "aluminum"
    pub bat_type: BatType,
}

impl Default for JsContactInput {
    fn default() -> Self {
        ContactGeometry::default().into()
    }
}

impl From<ContactGeometry> for JsContactInput {
    fn from(g: ContactGeometry) -> Self {
        Self {
            bat_speed_mph: g.bat_speed_mph,
            pitch_speed_mph: g.pitch_speed_mph,
            bat_path_angle_deg: g.bat_path_angle_deg,
            pitch_angle_deg: g.pitch_angle_deg,
            vertical_offset_in: g.vertical_offset_in,
            horizontal_offset_in: g.horizontal_offset_in,
            bat_type: g.bat_type,
        }
    }
}

impl From<JsContactInput> for ContactGeometry {
    fn from(c: JsContactInput) -> Self {
        ContactGeometry {
            bat_speed_mph: c.bat_speed_mph,
            pitch_speed_mph: c.pitch_speed_mph,
            bat_path_angle_deg: c.bat_path_angle_deg,
            pitch_angle_deg: c.pitch_angle_deg,
            vertical_offset_in: c.vertical_offset_in,
            horizontal_offset_in: c.horizontal_offset_in,
            bat_type: c.bat_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsCollisionResult {
    pub exit_velocity_mph: f64,
    pub launch_angle_deg: f64,
    pub backspin_rpm: f64,
    pub sidespin_rpm: f64,
    pub cor: f64,
    pub vibration_loss_fraction: f64,
    pub offset_in: f64,
}

impl From<CollisionResult> for JsCollisionResult {
    fn from(r: CollisionResult) -> Self {
        Self {
            exit_velocity_mph: r.exit_velocity_mph,
            launch_angle_deg: r.launch_angle_deg,
            backspin_rpm: r.backspin_rpm,
            sidespin_rpm: r.sidespin_rpm,
            cor: r.cor,
            vibration_loss_fraction: r.vibration_loss,
            offset_in: r.offset_in,
        }
    }
}

pub fn compute_collision_dto(input: JsContactInput) -> anyhow::Result<JsCollisionResult> {
    let result = compute_collision(&input.into()).context("collision failed")?;
    Ok(result.into())
}

#[wasm_bindgen(js_name = computeCollision)]
pub fn compute_collision_js(input: JsValue) -> Result<JsValue, JsValue> {
    let inp: JsContactInput = swb::from_value(input)?;
    let out = compute_collision_dto(inp).map_err(|e| js_error(&e))?;
    swb::to_value(&out).map_err(Into::into)
}

/* -------------------------------- Flight --------------------------------- */

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsSimulateInput {
    pub exit_velocity_mph: f64,
    pub launch_angle_deg: f64,
    pub spray_angle_deg: f64,
    pub backspin_rpm: f64,
    pub sidespin_rpm: f64,
    pub altitude_ft: f64,
    pub temperature_f: f64,
    pub humidity: f64,
    pub wind_speed_mph: f64,
    pub wind_direction_deg: f64,
    pub initial_height_ft: f64,
    /// Integration step [s]
    pub dt_s: f64,
}

impl Default for JsSimulateInput {
    fn default() -> Self {
        BatchRun::default().into()
    }
}

impl From<BatchRun> for JsSimulateInput {
    fn from(run: BatchRun) -> Self {
        let (l, e) = (run.launch, run.environment);
        Self {
            exit_velocity_mph: l.exit_velocity_mph,
            launch_angle_deg: l.launch_angle_deg,
            spray_angle_deg: l.spray_angle_deg,
            backspin_rpm: l.backspin_rpm,
            sidespin_rpm: l.sidespin_rpm,
            altitude_ft: e.altitude_ft,
            temperature_f: e.temperature_f,
            humidity: e.humidity,
            wind_speed_mph: e.wind_speed_mph,
            wind_direction_deg: e.wind_direction_deg,
            initial_height_ft: l.initial_height_ft,
            dt_s: SimulationConfig::default().dt,
        }
    }
}

impl From<JsSimulateInput> for BatchRun {
    fn from(s: JsSimulateInput) -> Self {
        BatchRun {
            launch: LaunchConditions {
                exit_velocity_mph: s.exit_velocity_mph,
                launch_angle_deg: s.launch_angle_deg,
                spray_angle_deg: s.spray_angle_deg,
                backspin_rpm: s.backspin_rpm,
                sidespin_rpm: s.sidespin_rpm,
                initial_height_ft: s.initial_height_ft,
            },
            environment: EnvironmentConditions {
                altitude_ft: s.altitude_ft,
                temperature_f: s.temperature_f,
                humidity: s.humidity,
                wind_speed_mph: s.wind_speed_mph,
                wind_direction_deg: s.wind_direction_deg,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsTrajectoryResult {
    pub distance_ft: f64,
    pub flight_time_s: f64,
    pub peak_height_ft: f64,
    pub time_to_peak_s: f64,
    pub final_velocity_mph: f64,
    pub landing_x: f64,
    pub landing_y: f64,
    pub spray_angle_at_landing_deg: f64,
    pub truncated: bool,
}

impl From<TrajectoryResult> for JsTrajectoryResult {
    fn from(r: TrajectoryResult) -> Self {
        Self {
            distance_ft: r.distance_ft,
            flight_time_s: r.flight_time_s,
            peak_height_ft: r.peak_height_ft,
            time_to_peak_s: r.time_to_peak_s,
            final_velocity_mph: r.final_velocity_mph,
            landing_x: r.landing_x_ft,
            landing_y: r.landing_y_ft,
            spray_angle_at_landing_deg: r.spray_angle_at_landing_deg,
            truncated: r.truncated,
        }
    }
}

fn simulator_for(dt_s: f64) -> TrajectorySimulator {
    TrajectorySimulator::with_config(SimulationConfig { dt: dt_s, ..SimulationConfig::default() })
}

pub fn simulate_dto(input: JsSimulateInput) -> anyhow::Result<JsTrajectoryResult> {
    let run = BatchRun::from(input);
    let result = simulator_for(input.dt_s)
        .simulate(&run.launch, &run.environment)
        .context("simulation failed")?;
    Ok(result.into())
}

/// One batch entry: either a result or the reason the run failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsBatchEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsTrajectoryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<anyhow::Result<TrajectoryResult>> for JsBatchEntry {
    fn from(r: anyhow::Result<TrajectoryResult>) -> Self {
        match r {
            Ok(t) => Self { result: Some(t.into()), error: None },
            Err(e) => Self { result: None, error: Some(format!("{e:#}")) },
        }
    }
}

/// Runs sharing a step size go through one simulator; entries come back in input order.
pub fn simulate_batch_dto(inputs: &[JsSimulateInput]) -> Vec<JsBatchEntry> {
    let mut by_step: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
    for (n, input) in inputs.iter().enumerate() {
        by_step.entry(input.dt_s.to_bits()).or_default().push(n);
    }

    let mut entries: Vec<Option<JsBatchEntry>> = vec![None; inputs.len()];
    for (bits, indices) in by_step {
        let runs: Vec<BatchRun> = indices.iter().map(|&n| inputs[n].into()).collect();
        let results = simulate_batch(&simulator_for(f64::from_bits(bits)), &runs);
        for (n, r) in indices.into_iter().zip(results) {
            entries[n] = Some(r.with_context(|| format!("simulation {n} failed")).into());
        }
    }
    entries.into_iter().flatten().collect()
}

#[wasm_bindgen(js_name = simulate)]
pub fn simulate_js(input: JsValue) -> Result<JsValue, JsValue> {
    let inp: JsSimulateInput = swb::from_value(input)?;
    let out = simulate_dto(inp).map_err(|e| js_error(&e))?;
    swb::to_value(&out).map_err(Into::into)
}

#[wasm_bindgen(js_name = simulateBatch)]
pub fn simulate_batch_js(inputs: JsValue) -> Result<JsValue, JsValue> {
    let inp: Vec<JsSimulateInput> = swb::from_value(inputs)?;
    swb::to_value(&simulate_batch_dto(&inp)).map_err(Into::into)
}

/* --------------------------------- tests --------------------------------- */
