//! Meteorology parameters
//!
//! Physical constants, tunable air/water properties and the construction
//! configuration of the [`Meteorology`](super::Meteorology) component.

use super::moisture::SaturationMethod;
use serde::{Deserialize, Serialize};
use snowmet_core::errors::{SnowMetError, SnowMetResult};
use snowmet_core::field::NodeValue;

/// Physical constants used by the energy balance.
///
/// These are fixed. They are exposed for inspection but no setter exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Gravitational acceleration (m s-2)
    pub g: f64,
    /// von Kármán constant
    pub kappa: f64,
    /// Latent heat of vaporization (J kg-1)
    pub lv: f64,
    /// Latent heat of fusion (J kg-1)
    pub lf: f64,
    /// Stefan-Boltzmann constant (W m-2 K-4)
    pub sigma: f64,
    /// Offset from degrees Celsius to Kelvin
    pub c_to_k: f64,
    pub one_seventh: f64,
    pub hours_per_day: f64,
    pub seconds_per_day: f64,
    /// Ratio of the molecular weights of water vapor and dry air, used by the
    /// latent heat flux
    pub latent_heat_constant: f64,
    /// Solar constant (W m-2)
    pub solar_constant: f64,
}

impl PhysicalConstants {
    pub const STANDARD: Self = Self {
        g: 9.81,
        kappa: 0.408,
        lv: 2_500_000.0,
        lf: 334_000.0,
        sigma: 5.67e-8,
        c_to_k: 273.15,
        one_seventh: 1.0 / 7.0,
        hours_per_day: 24.0,
        seconds_per_day: 86_400.0,
        latent_heat_constant: 0.662,
        solar_constant: 1367.0,
    };
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Air and water properties of the energy balance.
///
/// All values must be strictly positive. Use the setters (or
/// [`validate`](Self::validate) after deserialising) so an invalid value is rejected
/// rather than silently used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorologyParameters {
    /// Density of water (kg m-3).
    ///
    /// Default: 1000.0
    pub rho_h2o: f64,

    /// Density of air (kg m-3).
    ///
    /// Default: 1.2614
    pub rho_air: f64,

    /// Specific heat capacity of air (J kg-1 K-1).
    ///
    /// Default: 1005.7
    pub cp_air: f64,
}

impl Default for MeteorologyParameters {
    fn default() -> Self {
        Self {
            rho_h2o: 1000.0,
            rho_air: 1.2614,
            cp_air: 1005.7,
        }
    }
}

fn check_positive(name: &str, value: f64) -> SnowMetResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SnowMetError::InvalidParameter {
            name: name.to_string(),
            value,
        })
    }
}

impl MeteorologyParameters {
    /// Check every parameter is strictly positive
    pub fn validate(&self) -> SnowMetResult<()> {
        check_positive("rho_h2o", self.rho_h2o)?;
        check_positive("rho_air", self.rho_air)?;
        check_positive("cp_air", self.cp_air)
    }

    /// Set the density of water, keeping the old value if `value` is invalid
    pub fn set_rho_h2o(&mut self, value: f64) -> SnowMetResult<()> {
        check_positive("rho_h2o", value)?;
        self.rho_h2o = value;
        Ok(())
    }

    /// Set the density of air, keeping the old value if `value` is invalid
    pub fn set_rho_air(&mut self, value: f64) -> SnowMetResult<()> {
        check_positive("rho_air", value)?;
        self.rho_air = value;
        Ok(())
    }

    /// Set the specific heat of air, keeping the old value if `value` is invalid
    pub fn set_cp_air(&mut self, value: f64) -> SnowMetResult<()> {
        check_positive("cp_air", value)?;
        self.cp_air = value;
        Ok(())
    }
}

/// Construction options of the meteorology component.
///
/// Only the start date-time is required:
///
/// ```toml
/// start_datetime = "2023-01-01 12:00:00"
/// gmt_offset = -7
/// method = "satterlund"
///
/// [parameters]
/// rho_air = 1.25
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorologyConfig {
    /// Local date-time at the start of the simulation, `YYYY-MM-DD HH:MM:SS`
    pub start_datetime: String,
    /// Hours between local time and GMT, either one value or one per node
    #[serde(default)]
    pub gmt_offset: NodeValue,
    /// Saturation vapor pressure formula family
    #[serde(default)]
    pub method: SaturationMethod,
    #[serde(default)]
    pub parameters: MeteorologyParameters,
}

impl MeteorologyConfig {
    /// Configuration with default options starting at `start_datetime`
    pub fn new(start_datetime: impl Into<String>) -> Self {
        Self {
            start_datetime: start_datetime.into(),
            gmt_offset: NodeValue::default(),
            method: SaturationMethod::default(),
            parameters: MeteorologyParameters::default(),
        }
    }

    pub fn with_gmt_offset(mut self, gmt_offset: impl Into<NodeValue>) -> Self {
        self.gmt_offset = gmt_offset.into();
        self
    }

    pub fn with_method(mut self, method: SaturationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_parameters(mut self, parameters: MeteorologyParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Parse a configuration from TOML, validating the parameters
    pub fn from_toml_str(content: &str) -> SnowMetResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.parameters.validate()?;
        Ok(config)
    }
}
