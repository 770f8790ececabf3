//! Atmosphere & wind.
//!
//! Air density comes from an exponential standard-atmosphere pressure model,
//! the ideal gas law, and a humidity correction via partial pressures (moist
//! air is lighter than dry air at the same pressure and temperature).
//!
//! Accurate for altitude 0–10 000 ft and temperature −20–120 °F. Values
//! outside are accepted and extrapolated; treat them as best effort.

use serde::{Deserialize, Serialize};

use crate::ball::RHO_SEA_LEVEL;
use crate::config::JsonConfig;
use crate::error::{ensure_finite, Result};
use crate::units::{deg_to_rad, fahrenheit_to_celsius, fahrenheit_to_kelvin, ft_to_m, mph_to_mps};
use crate::Vec3;

/// -------------------------
/// Conditions (input)
/// -------------------------

/// Game-time conditions at the ballpark.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConditions {
    pub altitude_ft: f64,
    pub temperature_f: f64,
    /// Relative humidity, 0..1
    pub humidity: f64,
    pub wind_speed_mph: f64,
    /// 0° = blowing out toward center field, positive toward the pull side.
    pub wind_direction_deg: f64,
}

impl Default for EnvironmentConditions {
    fn default() -> Self {
        Self {
            altitude_ft: 0.0,
            temperature_f: 70.0,
            humidity: 0.5,
            wind_speed_mph: 0.0,
            wind_direction_deg: 0.0,
        }
    }
}

impl EnvironmentConditions {
    /// Sea level, 70 °F, 50 % humidity, calm.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Coors Field, Denver (5 200 ft, typically dry).
    pub fn coors_field(temperature_f: f64) -> Self {
        Self { altitude_ft: 5200.0, temperature_f, humidity: 0.3, ..Self::default() }
    }

    /// Fenway Park, Boston (near sea level, coastal humidity).
    pub fn fenway_park(temperature_f: f64) -> Self {
        Self { altitude_ft: 20.0, temperature_f, humidity: 0.6, ..Self::default() }
    }

    pub fn with_wind(self, speed_mph: f64, direction_deg: f64) -> Self {
        Self { wind_speed_mph: speed_mph, wind_direction_deg: direction_deg, ..self }
    }

    pub fn wind(&self) -> Wind {
        Wind::new(self.wind_speed_mph, self.wind_direction_deg)
    }

    /// Reject NaN/infinite fields; everything else is accepted.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("altitude_ft", self.altitude_ft)?;
        ensure_finite("temperature_f", self.temperature_f)?;
        ensure_finite("humidity", self.humidity)?;
        ensure_finite("wind_speed_mph", self.wind_speed_mph)?;
        ensure_finite("wind_direction_deg", self.wind_direction_deg)?;
        Ok(())
    }
}

/// -------------------------
/// Wind
/// -------------------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mph: f64,
    pub direction_deg: f64, // 0° = blowing out to center field
}

impl Wind {
    pub fn new(speed_mph: f64, direction_deg: f64) -> Self {
        Self { speed_mph, direction_deg }
    }

    /// Wind velocity in the integration frame [m/s]. Horizontal only.
    pub fn velocity(&self) -> Vec3 {
        let rad = deg_to_rad(self.direction_deg);
        let w = mph_to_mps(self.speed_mph);
        Vec3::new(w * rad.cos(), w * rad.sin(), 0.0)
    }

    /// Component blowing out toward center field [mph] (negative = blowing in)
    pub fn tailwind_mph(&self) -> f64 {
        self.speed_mph * deg_to_rad(self.direction_deg).cos()
    }

    /// Component blowing toward the pull side [mph]
    pub fn crosswind_mph(&self) -> f64 {
        self.speed_mph * deg_to_rad(self.direction_deg).sin()
    }
}

/// -------------------------
/// Atmosphere model
/// -------------------------

/// Constants of the atmosphere model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConfig {
    /// Pressure at sea level [Pa]
    pub sea_level_pressure_pa: f64,
    /// Pressure scale height [m]
    pub scale_height_m: f64,
    /// Specific gas constant, dry air [J/(kg·K)]
    pub r_dry: f64,
    /// Specific gas constant, water vapor [J/(kg·K)]
    pub r_vapor: f64,
    /// Carry gained per 1 000 ft of altitude [ft] (rule of thumb)
    pub carry_per_1000_ft: f64,
    /// Carry gained per °F above the reference temperature [ft] (rule of thumb)
    pub carry_per_degree_f: f64,
    pub reference_temperature_f: f64,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            sea_level_pressure_pa: 101_325.0,
            scale_height_m: 8400.0,
            r_dry: 287.05,
            r_vapor: 461.5,
            carry_per_1000_ft: 6.0,
            carry_per_degree_f: 0.35,
            reference_temperature_f: 70.0,
        }
    }
}

impl JsonConfig for AtmosphereConfig {}

/// Air state consumed by the force model; constant over one flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Atmosphere {
    /// Air density [kg/m³]
    pub air_density: f64,
    /// Wind velocity [m/s], integration frame
    pub wind: Vec3,
}

impl Atmosphere {
    /// Still air at the given density.
    pub fn still(air_density: f64) -> Self {
        Self { air_density, wind: Vec3::zeros() }
    }

    pub fn density_ratio(&self) -> f64 {
        self.air_density / RHO_SEA_LEVEL
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EnvironmentModel {
    config: AtmosphereConfig,
}

impl EnvironmentModel {
    pub fn new(config: AtmosphereConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AtmosphereConfig {
        &self.config
    }

    /// Station pressure at `altitude_ft` [Pa]
    pub fn pressure_pa(&self, altitude_ft: f64) -> f64 {
        let h = ft_to_m(altitude_ft);
        self.config.sea_level_pressure_pa * (-h / self.config.scale_height_m).exp()
    }

    /// Saturation vapor pressure over water (Magnus formula) [Pa]
    pub fn saturation_vapor_pressure_pa(temperature_c: f64) -> f64 {
        611.2 * ((17.67 * temperature_c) / (temperature_c + 243.5)).exp()
    }

    /// Compute air density [kg/m³] from altitude [ft], temperature [°F], humidity [0..1]
    pub fn air_density(&self, altitude_ft: f64, temperature_f: f64, humidity: f64) -> f64 {
        let t_c = fahrenheit_to_celsius(temperature_f);
        let t_k = fahrenheit_to_kelvin(temperature_f).max(1.0);
        let rh = humidity.clamp(0.0, 1.0);

        let p = self.pressure_pa(altitude_ft);
        let e = rh * Self::saturation_vapor_pressure_pa(t_c); // actual vapor pressure
        let pd = (p - e).max(0.0); // dry air partial pressure

        pd / (self.config.r_dry * t_k) + e / (self.config.r_vapor * t_k)
    }

    pub fn density_ratio(&self, altitude_ft: f64, temperature_f: f64, humidity: f64) -> f64 {
        self.air_density(altitude_ft, temperature_f, humidity) / RHO_SEA_LEVEL
    }

    /// Wind vector [m/s] from speed [mph] and direction [deg]
    pub fn wind_vector(&self, wind_speed_mph: f64, wind_direction_deg: f64) -> Vec3 {
        Wind::new(wind_speed_mph, wind_direction_deg).velocity()
    }

    /// Resolve conditions into the density + wind pair used for one flight.
    pub fn resolve(&self, conditions: &EnvironmentConditions) -> Result<Atmosphere> {
        conditions.validate()?;
        if !(0.0..=10_000.0).contains(&conditions.altitude_ft)
            || !(-20.0..=120.0).contains(&conditions.temperature_f)
        {
            log::debug!(
                "atmosphere extrapolated outside calibrated range: {:.0} ft, {:.1} °F",
                conditions.altitude_ft,
                conditions.temperature_f
            );
        }
        let air_density =
            self.air_density(conditions.altitude_ft, conditions.temperature_f, conditions.humidity);
        let wind = self.wind_vector(conditions.wind_speed_mph, conditions.wind_direction_deg);
        Ok(Atmosphere { air_density, wind })
    }

    /// Rule-of-thumb extra carry from altitude alone [ft].
    pub fn altitude_carry_ft(&self, altitude_ft: f64) -> f64 {
        altitude_ft / 1000.0 * self.config.carry_per_1000_ft
    }

    /// Rule-of-thumb extra carry from temperature alone [ft].
    pub fn temperature_carry_ft(&self, temperature_f: f64) -> f64 {
        (temperature_f - self.config.reference_temperature_f) * self.config.carry_per_degree_f
    }
}

/// Air density [kg/m³] with the default atmosphere constants.
pub fn compute_air_density(altitude_ft: f64, temperature_f: f64, humidity: f64) -> f64 {
    EnvironmentModel::default().air_density(altitude_ft, temperature_f, humidity)
}

/// Wind vector [m/s] in the integration frame.
pub fn compute_wind_vector(wind_speed_mph: f64, wind_direction_deg: f64) -> Vec3 {
    Wind::new(wind_speed_mph, wind_direction_deg).velocity()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sea_level_density_is_plausible() {
        let rho = compute_air_density(0.0, 70.0, 0.5);
        assert!((1.18..1.21).contains(&rho), "rho={rho}");
    }

    #[test]
    fn altitude_thins_the_air() {
        let sea = compute_air_density(0.0, 70.0, 0.5);
        let denver = compute_air_density(5200.0, 70.0, 0.5);
        let ratio = denver / sea;
        assert!((0.80..0.86).contains(&ratio), "ratio={ratio}");
    }

    #[test]
    fn warm_and_humid_air_is_lighter() {
        assert!(compute_air_density(0.0, 90.0, 0.5) < compute_air_density(0.0, 60.0, 0.5));
        assert!(compute_air_density(0.0, 85.0, 1.0) < compute_air_density(0.0, 85.0, 0.0));
    }

    #[test]
    fn humidity_is_clamped() {
        assert_relative_eq!(compute_air_density(0.0, 70.0, 3.0), compute_air_density(0.0, 70.0, 1.0));
        assert_relative_eq!(compute_air_density(0.0, 70.0, -1.0), compute_air_density(0.0, 70.0, 0.0));
    }

    #[test]
    fn extreme_inputs_stay_finite() {
        let rho = compute_air_density(30_000.0, -60.0, 1.0);
        assert!(rho.is_finite() && rho > 0.0);
    }

    #[test]
    fn wind_components() {
        let out = compute_wind_vector(10.0, 0.0);
        assert_relative_eq!(out.x, mph_to_mps(10.0), epsilon = 1e-12);
        assert_relative_eq!(out.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.z, 0.0);

        let w = Wind::new(10.0, 90.0);
        assert_relative_eq!(w.crosswind_mph(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(w.tailwind_mph(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(Wind::new(10.0, 180.0).tailwind_mph(), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn resolve_rejects_nan() {
        let model = EnvironmentModel::default();
        let bad = EnvironmentConditions { temperature_f: f64::NAN, ..Default::default() };
        assert!(model.resolve(&bad).is_err());
        let ok = model.resolve(&EnvironmentConditions::coors_field(70.0)).unwrap();
        assert!(ok.density_ratio() < 0.9);
    }

    #[test]
    fn carry_rules_of_thumb() {
        let model = EnvironmentModel::default();
        assert_relative_eq!(model.altitude_carry_ft(5200.0), 31.2, epsilon = 1e-9);
        assert_relative_eq!(model.temperature_carry_ft(80.0), 3.5, epsilon = 1e-9);
    }

    #[test]
    fn config_round_trips_through_json() -> anyhow::Result<()> {
        let cfg = AtmosphereConfig::from_json_str(r#"{ "scale_height_m": 8000.0 }"#)?;
        assert_relative_eq!(cfg.scale_height_m, 8000.0);
        assert_relative_eq!(cfg.r_dry, 287.05);
        let back = AtmosphereConfig::from_json_str(&cfg.to_json_string()?)?;
        assert_eq!(back, cfg);
        Ok(())
    }
}
