//! Fixed-step trajectory integration.
//!
//! Classical RK4 (1/6, 2/6, 2/6, 1/6) by default, forward Euler for
//! comparison. Integration stops at the first step that reaches the ground;
//! the landing sample is linearly interpolated between the last airborne
//! state and the overshoot so distance does not depend on where the final
//! step happened to fall.

use batted_ball_core::{BattedBallError, Result, Vec3};
use serde::{Deserialize, Serialize};

/// Position [m], velocity [m/s] and time [s] of the ball.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub time: f64,
}

impl BallState {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity, time: 0.0 }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Linear blend between `self` (u = 0) and `other` (u = 1).
    fn lerp(&self, other: &Self, u: f64) -> Self {
        Self {
            position: self.position + (other.position - self.position) * u,
            velocity: self.velocity + (other.velocity - self.velocity) * u,
            time: self.time + (other.time - self.time) * u,
        }
    }
}

/// Acceleration provider for the integrator.
pub trait ForceModel {
    /// Net acceleration [m/s²] of the ball in `state`.
    fn acceleration(&self, state: &BallState) -> Vec3;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Rk4,
    Euler,
}

/// Integration options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegrateOpts {
    pub dt: f64,       // step size [s]
    pub max_time: f64, // max flight time [s]
    /// Stop when z drops to this height [m].
    pub ground_z: f64,
    pub method: Method,
}

impl Default for IntegrateOpts {
    fn default() -> Self {
        Self { dt: 0.001, max_time: 10.0, ground_z: 0.0, method: Method::Rk4 }
    }
}

impl IntegrateOpts {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(BattedBallError::InvalidTimeStep(self.dt));
        }
        if !(self.max_time.is_finite() && self.max_time > 0.0) {
            return Err(BattedBallError::InvalidMaxTime(self.max_time));
        }
        if !self.ground_z.is_finite() {
            return Err(BattedBallError::NonFinite { field: "ground_z", value: self.ground_z });
        }
        Ok(())
    }

    /// Steps needed to cover `max_time`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn max_steps(&self) -> usize {
        (self.max_time / self.dt).ceil() as usize
    }
}

/// Sampled trajectory. The last sample is the interpolated landing point,
/// or the state at `max_time` when `truncated` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Integration {
    samples: Vec<BallState>,
    apex: BallState,
    truncated: bool,
}

impl Integration {
    pub fn samples(&self) -> &[BallState] {
        &self.samples
    }

    /// Landing point, or the state at `max_time` when truncated.
    pub fn last(&self) -> &BallState {
        self.samples.last().unwrap_or(&self.apex)
    }

    /// Highest sample.
    pub fn apex(&self) -> &BallState {
        &self.apex
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Integrate from `initial` until ground contact or `max_time`.
pub fn integrate<M: ForceModel>(initial: BallState, forces: &M, opts: &IntegrateOpts) -> Result<Integration> {
    opts.validate()?;

    let max_steps = opts.max_steps();
    let mut samples = Vec::with_capacity(max_steps.min(20_000) + 2);
    samples.push(initial);

    let mut s = initial;
    let mut apex = initial;
    for _ in 0..max_steps {
        // Last step is shortened so a truncated flight stops exactly at max_time.
        let dt = opts.dt.min(opts.max_time - s.time);
        if dt <= opts.dt * 1e-9 {
            break;
        }
        let next = match opts.method {
            Method::Rk4 => rk4_step(forces, &s, dt),
            Method::Euler => euler_step(forces, &s, dt),
        };

        if next.position.z <= opts.ground_z {
            samples.push(landing(&s, &next, opts.ground_z));
            return Ok(Integration { samples, apex, truncated: false });
        }

        if next.position.z > apex.position.z {
            apex = next;
        }
        samples.push(next);
        s = next;
    }

    log::warn!(
        "trajectory truncated at {:.2} s without ground contact (z = {:.2} m)",
        s.time,
        s.position.z
    );
    Ok(Integration { samples, apex, truncated: true })
}

/// Interpolate the ground crossing between an airborne state and the overshoot.
fn landing(before: &BallState, after: &BallState, ground_z: f64) -> BallState {
    let drop = before.position.z - after.position.z;
    let u = if drop > 0.0 {
        ((before.position.z - ground_z) / drop).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let mut hit = before.lerp(after, u);
    hit.position.z = ground_z;
    hit
}

pub fn rk4_step<M: ForceModel>(forces: &M, s: &BallState, dt: f64) -> BallState {
    let shifted = |dx: Vec3, dv: Vec3, h: f64| BallState {
        position: s.position + dx * h,
        velocity: s.velocity + dv * h,
        time: s.time + h,
    };

    let k1x = s.velocity;
    let k1v = forces.acceleration(s);

    let s2 = shifted(k1x, k1v, 0.5 * dt);
    let k2x = s2.velocity;
    let k2v = forces.acceleration(&s2);

    let s3 = shifted(k2x, k2v, 0.5 * dt);
    let k3x = s3.velocity;
    let k3v = forces.acceleration(&s3);

    let s4 = shifted(k3x, k3v, dt);
    let k4x = s4.velocity;
    let k4v = forces.acceleration(&s4);

    BallState {
        position: s.position + (k1x + (k2x + k3x) * 2.0 + k4x) * (dt / 6.0),
        velocity: s.velocity + (k1v + (k2v + k3v) * 2.0 + k4v) * (dt / 6.0),
        time: s.time + dt,
    }
}

pub fn euler_step<M: ForceModel>(forces: &M, s: &BallState, dt: f64) -> BallState {
    let a = forces.acceleration(s);
    BallState {
        position: s.position + s.velocity * dt,
        velocity: s.velocity + a * dt,
        time: s.time + dt,
    }
}
