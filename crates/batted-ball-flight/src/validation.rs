//! Runtime validation against published batted-ball benchmarks.
//!
//! Each check flies (or collides) a reference shot and compares the emergent
//! number against an accepted band. Use it after changing a calibration.

use std::fmt;

use batted_ball_collision::{CollisionModel, ContactGeometry};
use batted_ball_core::{EnvironmentConditions, Result};
use serde::Serialize;

use crate::batch::optimal_launch_angle;
use crate::simulator::{LaunchConditions, TrajectorySimulator};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationCheck {
    pub name: &'static str,
    pub actual: f64,
    pub min: f64,
    pub max: f64,
    pub passed: bool,
}

impl ValidationCheck {
    fn new(name: &'static str, actual: f64, min: f64, max: f64) -> Self {
        Self { name, actual, min, max, passed: (min..=max).contains(&actual) }
    }
}

impl fmt::Display for ValidationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "{status}: {} = {:.2} (expected {:.2} ..= {:.2})", self.name, self.actual, self.min, self.max)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            writeln!(f, "{check}")?;
        }
        write!(f, "{}/{} checks passed", self.passed_count(), self.checks.len())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationSuite {
    collision: CollisionModel,
    simulator: TrajectorySimulator,
}

impl ValidationSuite {
    pub fn new(collision: CollisionModel, simulator: TrajectorySimulator) -> Self {
        Self { collision, simulator }
    }

    /// 100 mph, 28°, 1 800 rpm backspin.
    pub fn benchmark_launch() -> LaunchConditions {
        LaunchConditions::new(100.0, 28.0).with_spin(1800.0, 0.0)
    }

    fn distance(&self, launch: &LaunchConditions, env: &EnvironmentConditions) -> Result<f64> {
        Ok(self.simulator.simulate(launch, env)?.distance_ft)
    }

    pub fn run(&self) -> Result<ValidationReport> {
        let sea = EnvironmentConditions::standard();
        let bench = Self::benchmark_launch();
        let base = self.distance(&bench, &sea)?;

        let mut checks = vec![ValidationCheck::new("benchmark distance [ft]", base, 385.0, 415.0)];

        let repeat = self.distance(&bench, &sea)?;
        checks.push(ValidationCheck::new("repeat-run difference [ft]", (repeat - base).abs(), 0.0, 1e-9));

        let faster = LaunchConditions { exit_velocity_mph: 105.0, ..bench };
        checks.push(ValidationCheck::new("+5 mph exit velocity [ft]", self.distance(&faster, &sea)? - base, 20.0, 30.0));

        let mile_high = EnvironmentConditions { altitude_ft: 5200.0, ..sea };
        checks.push(ValidationCheck::new("5 200 ft altitude [ft]", self.distance(&bench, &mile_high)? - base, 18.0, 38.0));

        let warmer = EnvironmentConditions { temperature_f: sea.temperature_f + 10.0, ..sea };
        checks.push(ValidationCheck::new("+10 °F [ft]", self.distance(&bench, &warmer)? - base, 1.5, 5.5));

        let no_spin = self.distance(&bench.with_spin(0.0, 0.0), &sea)?;
        let backspin = self.distance(&bench.with_spin(1500.0, 0.0), &sea)?;
        checks.push(ValidationCheck::new("0 → 1 500 rpm backspin [ft]", backspin - no_spin, 35.0, 65.0));

        let tilted = self.distance(&bench.with_spin(1800.0, 1500.0), &sea)?;
        checks.push(ValidationCheck::new("1 500 rpm sidespin loss [ft]", base - tilted, 4.0, 20.0));

        let best = optimal_launch_angle(&self.simulator, &bench, &sea, 10.0, 45.0, 1.0)?;
        checks.push(ValidationCheck::new("optimal launch angle [deg]", best.launch_angle_deg, 23.0, 33.0));

        let ground = self.simulator.config().ground_level_ft;
        let mut worst_landing = 0.0_f64;
        for launch in [bench, LaunchConditions::new(60.0, -5.0), LaunchConditions::new(85.0, 60.0).with_spin(2500.0, -800.0)] {
            let r = self.simulator.simulate(&launch, &sea)?;
            worst_landing = worst_landing.max((r.landing_z_ft - ground).abs());
        }
        checks.push(ValidationCheck::new("landing height error [ft]", worst_landing, 0.0, 0.01));

        let sweet = ContactGeometry::new(70.0, 90.0, 28.0);
        let contact = self.collision.compute(&sweet)?;
        checks.push(ValidationCheck::new("sweet-spot exit velocity [mph]", contact.exit_velocity_mph, 98.0, 106.0));
        checks.push(ValidationCheck::new("sweet-spot launch angle [deg]", contact.launch_angle_deg, 20.0, 30.0));

        let mut violations = 0.0;
        for offset in [0.1, 0.5, 1.0, 2.0, 4.0] {
            for (v, h) in [(offset, 0.0), (-offset, 0.0), (0.0, offset), (0.0, -offset)] {
                let off = self.collision.compute(&sweet.with_offsets(v, h))?;
                if off.exit_velocity_mph >= contact.exit_velocity_mph {
                    violations += 1.0;
                }
            }
        }
        checks.push(ValidationCheck::new("off-center contacts not weaker", violations, 0.0, 0.0));

        let carried = self.simulator.simulate_collision(&contact, 0.0, &sea)?.distance_ft;
        checks.push(ValidationCheck::new("end-to-end distance [ft]", carried, 350.0, f64::INFINITY));

        let report = ValidationReport { checks };
        log::info!("validation: {}/{} checks passed", report.passed_count(), report.checks.len());
        for failed in report.failures() {
            log::warn!("{failed}");
        }
        Ok(report)
    }
}
