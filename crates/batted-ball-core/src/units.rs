//! Units & conversions.
//!
//! Public inputs and outputs use baseball units (mph, ft, in, °F, rpm); the
//! physics runs in SI. Every conversion goes through `uom` so the factors
//! are the exact definitions rather than hand-typed approximations.

use uom::si::f64::{Angle, AngularVelocity, Length, ThermodynamicTemperature, Velocity};
use uom::si::{angle, angular_velocity, length, thermodynamic_temperature, velocity};

/* ------------------------------- speed -------------------------------- */

pub fn mph_to_mps(v: f64) -> f64 {
    Velocity::new::<velocity::mile_per_hour>(v).get::<velocity::meter_per_second>()
}

pub fn mps_to_mph(v: f64) -> f64 {
    Velocity::new::<velocity::meter_per_second>(v).get::<velocity::mile_per_hour>()
}

/* ------------------------------- length ------------------------------- */

pub fn ft_to_m(x: f64) -> f64 {
    Length::new::<length::foot>(x).get::<length::meter>()
}

pub fn m_to_ft(x: f64) -> f64 {
    Length::new::<length::meter>(x).get::<length::foot>()
}

/* ----------------------------- temperature ---------------------------- */

pub fn fahrenheit_to_celsius(t: f64) -> f64 {
    ThermodynamicTemperature::new::<thermodynamic_temperature::degree_fahrenheit>(t)
        .get::<thermodynamic_temperature::degree_celsius>()
}

pub fn fahrenheit_to_kelvin(t: f64) -> f64 {
    ThermodynamicTemperature::new::<thermodynamic_temperature::degree_fahrenheit>(t)
        .get::<thermodynamic_temperature::kelvin>()
}

/* ------------------------------- angles ------------------------------- */

pub fn deg_to_rad(a: f64) -> f64 {
    Angle::new::<angle::degree>(a).get::<angle::radian>()
}

pub fn rad_to_deg(a: f64) -> f64 {
    Angle::new::<angle::radian>(a).get::<angle::degree>()
}

/// Spin rate in rpm to angular speed in rad/s.
pub fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    AngularVelocity::new::<angular_velocity::revolution_per_minute>(rpm)
        .get::<angular_velocity::radian_per_second>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn speed_round_trip_uses_exact_mph() {
        assert_relative_eq!(mph_to_mps(100.0), 44.704, epsilon = 1e-9);
        assert_relative_eq!(mps_to_mph(44.704), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn length_factors() {
        assert_relative_eq!(ft_to_m(1.0), 0.3048, epsilon = 1e-12);
        assert_relative_eq!(m_to_ft(0.3048), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn temperature_offsets_are_applied() {
        assert_relative_eq!(fahrenheit_to_celsius(32.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(fahrenheit_to_celsius(212.0), 100.0, epsilon = 1e-9);
        assert_relative_eq!(fahrenheit_to_kelvin(70.0), 294.261_111, epsilon = 1e-5);
    }

    #[test]
    fn spin_rate() {
        assert_relative_eq!(rpm_to_rad_per_s(60.0), 2.0 * std::f64::consts::PI, epsilon = 1e-9);
        assert_relative_eq!(rad_to_deg(deg_to_rad(28.0)), 28.0, epsilon = 1e-12);
    }
}
