// End-to-end flight benchmarks: the emergent distances the calibration has to
// reproduce, checked through the public API only.

use approx::assert_relative_eq;
use batted_ball_collision::{compute_collision, ContactGeometry};
use batted_ball_core::EnvironmentConditions;
use batted_ball_flight::{
    optimal_launch_angle, simulate, LaunchConditions, SimulationConfig, TrajectorySimulator, ValidationSuite,
};

fn benchmark() -> LaunchConditions {
    LaunchConditions::new(100.0, 28.0).with_spin(1800.0, 0.0)
}

fn sea_level() -> EnvironmentConditions {
    EnvironmentConditions::standard()
}

fn distance(launch: &LaunchConditions, env: &EnvironmentConditions) -> f64 {
    simulate(launch, env).unwrap().distance_ft
}

#[test]
fn identical_inputs_give_identical_results() {
    let a = simulate(&benchmark(), &sea_level()).unwrap();
    let b = simulate(&benchmark(), &sea_level()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn benchmark_shot_carries_about_400_ft() {
    let d = distance(&benchmark(), &sea_level());
    assert!((385.0..=415.0).contains(&d), "distance={d}");
}

#[test]
fn five_more_mph_adds_20_to_30_ft() {
    let faster = LaunchConditions { exit_velocity_mph: 105.0, ..benchmark() };
    let gain = distance(&faster, &sea_level()) - distance(&benchmark(), &sea_level());
    assert!((20.0..=30.0).contains(&gain), "gain={gain}");
}

#[test]
fn mile_high_altitude_adds_carry() {
    let denver = EnvironmentConditions { altitude_ft: 5200.0, ..sea_level() };
    let gain = distance(&benchmark(), &denver) - distance(&benchmark(), &sea_level());
    assert!((18.0..=38.0).contains(&gain), "gain={gain}");
}

#[test]
fn ten_degrees_warmer_adds_a_few_feet() {
    let warm = EnvironmentConditions { temperature_f: 80.0, ..sea_level() };
    let gain = distance(&benchmark(), &warm) - distance(&benchmark(), &sea_level());
    assert!((1.5..=5.5).contains(&gain), "gain={gain}");
}

#[test]
fn backspin_adds_carry() {
    let none = distance(&benchmark().with_spin(0.0, 0.0), &sea_level());
    let spun = distance(&benchmark().with_spin(1500.0, 0.0), &sea_level());
    let gain = spun - none;
    assert!((35.0..=65.0).contains(&gain), "gain={gain}");
}

#[test]
fn sidespin_costs_distance() {
    let straight = distance(&benchmark(), &sea_level());
    let hooked = distance(&benchmark().with_spin(1800.0, 1500.0), &sea_level());
    let loss = straight - hooked;
    assert!((4.0..=20.0).contains(&loss), "loss={loss}");
}

#[test]
fn optimal_launch_angle_is_in_the_twenties() {
    let best = optimal_launch_angle(&TrajectorySimulator::default(), &benchmark(), &sea_level(), 10.0, 45.0, 1.0)
        .unwrap();
    assert!((23.0..=33.0).contains(&best.launch_angle_deg), "best={best:?}");
}

#[test]
fn landing_height_matches_ground_level() {
    let shots = [
        benchmark(),
        LaunchConditions::new(60.0, -5.0),
        LaunchConditions::new(45.0, 10.0).with_spray(-30.0),
        LaunchConditions::new(85.0, 65.0).with_spin(2500.0, -800.0),
        LaunchConditions::new(110.0, 35.0).with_spray(40.0).with_spin(2200.0, 900.0),
    ];
    for ground in [0.0, 12.0] {
        let sim = TrajectorySimulator::with_config(SimulationConfig { ground_level_ft: ground, ..SimulationConfig::default() });
        for shot in &shots {
            let r = sim.simulate(shot, &sea_level()).unwrap();
            assert!(!r.truncated);
            assert!((r.landing_z_ft - ground).abs() < 0.01, "landing z={} ground={ground}", r.landing_z_ft);
        }
    }
}

#[test]
fn coarse_steps_stay_within_five_percent() {
    let fine = distance(&benchmark(), &sea_level());
    for cfg in [SimulationConfig::fine(), SimulationConfig::fast(), SimulationConfig::coarse()] {
        let d = TrajectorySimulator::with_config(cfg).simulate(&benchmark(), &sea_level()).unwrap().distance_ft;
        assert!((d - fine).abs() / fine < 0.05, "dt={} d={d} fine={fine}", cfg.dt);
    }
}

#[test]
fn tailwind_carries_further_than_headwind() {
    let out = sea_level().with_wind(10.0, 0.0);
    let into = sea_level().with_wind(10.0, 180.0);
    assert!(distance(&benchmark(), &out) > distance(&benchmark(), &sea_level()));
    assert!(distance(&benchmark(), &into) < distance(&benchmark(), &sea_level()));
}

#[test]
fn crosswind_pushes_the_landing_point() {
    // Blowing toward the pull side moves the ball toward left field (negative field x).
    let r = simulate(&benchmark(), &sea_level().with_wind(15.0, 90.0)).unwrap();
    assert!(r.landing_x_ft < -5.0, "landing_x={}", r.landing_x_ft);
}

#[test]
fn pop_up_is_not_truncated_and_lands_near_the_plate() {
    let r = simulate(&LaunchConditions::new(80.0, 80.0).with_spin(3000.0, 0.0), &sea_level()).unwrap();
    assert!(!r.truncated);
    assert!(r.distance_ft < 150.0, "distance={}", r.distance_ft);
    assert!(r.peak_height_ft > 100.0);
}

#[test]
fn short_max_time_flags_truncation() {
    let sim = TrajectorySimulator::with_config(SimulationConfig { max_time_s: 1.0, ..SimulationConfig::default() });
    let r = sim.simulate(&benchmark(), &sea_level()).unwrap();
    assert!(r.truncated);
    assert!(r.landing_z_ft > 0.0);
    assert_relative_eq!(r.flight_time_s, 1.0, epsilon = 0.002);
}

#[test]
fn sweet_spot_swing_leaves_the_yard() {
    let collision = compute_collision(&ContactGeometry::new(70.0, 90.0, 28.0)).unwrap();
    assert!((98.0..=106.0).contains(&collision.exit_velocity_mph));
    assert!((20.0..=30.0).contains(&collision.launch_angle_deg));

    let r = TrajectorySimulator::default().simulate_collision(&collision, 0.0, &sea_level()).unwrap();
    assert!(r.distance_ft >= 350.0, "distance={}", r.distance_ft);
}

#[test]
fn validation_suite_passes_with_default_calibration() {
    let report = ValidationSuite::default().run().unwrap();
    assert!(report.all_passed(), "{report}");
}
