//! Snowpack Surface Meteorology Component
//!
//! Computes the near-surface energy balance that drives snowmelt at every node of a
//! field store.
//!
//! # What This Component Does
//!
//! 1. Turbulent exchange: bulk Richardson number, stability-corrected aerodynamic
//!    conductances and the sensible heat flux.
//!
//! 2. Moisture: saturation and actual vapor pressures of the air and the surface, dew
//!    point, precipitable water and the latent heat flux.
//!
//! 3. Conduction and advection placeholders (always zero).
//!
//! 4. Solar geometry: julian day and per-node offset from true solar noon.
//!
//! 5. Radiation: clear-sky net shortwave, air emissivity and net longwave.
//!
//! 6. The net energy flux, the sum of the six component fluxes.
//!
//! # Inputs
//!
//! Required at construction:
//!
//! - `atmosphere_bottom_air__temperature` (deg_C)
//! - `land_surface__temperature` (deg_C)
//! - `land_surface__latitude` (deg)
//! - `land_surface__longitude` (deg)
//!
//! Created with a default when absent: aspect, slope, snow depth, albedo, surface
//! emissivity, dust attenuation, the Brutsaert canopy and cloud factors, relative
//! humidity, air pressure, roughness length, reference height and wind speed. The
//! defaults live on the registered variables in
//! [`standard_variables`](snowmet_core::standard_variables).
//!
//! # Outputs
//!
//! Every output is created the first time its stage runs and overwritten in place
//! afterwards:
//!
//! - Richardson number and the neutral, sensible and latent conductances
//! - Saturation and actual vapor pressures of both layers, dew point and
//!   precipitable water
//! - Sensible, latent, conduction and advection heat fluxes (W m-2)
//! - Net shortwave, air emissivity and net longwave (W m-2)
//! - `land_surface_net-total-energy__energy_flux` (W m-2)
//!
//! Stages can be run one at a time through the `update_*` methods. A stage that runs
//! before its prerequisite fails with [`SnowMetError::MissingField`].

mod energy;
mod moisture;
mod parameters;
mod radiation;
mod solar;
mod turbulent;

pub use energy::EnergyFluxes;
pub use moisture::{latent_heat_flux, precipitable_water, Layer, PressureUnit, SaturationMethod};
pub use parameters::{MeteorologyConfig, MeteorologyParameters, PhysicalConstants};
pub use radiation::{
    atmospheric_transmittances, clear_sky_shortwave, cos_incidence, optical_air_mass,
    sin_solar_elevation, LongwaveBalance, ShortwaveComponents, ShortwaveSite,
};
pub use solar::{
    day_angle, declination, eccentricity_correction, equation_of_time, hour_angle,
    hours_from_solar_noon, julian_day, true_solar_noon_offset,
};
pub use turbulent::{
    bulk_richardson_number, neutral_conductance, sensible_heat_flux,
    stability_corrected_conductance,
};

use chrono::{NaiveDateTime, TimeDelta};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use snowmet_core::component::{Component, RequirementDefinition};
use snowmet_core::errors::{SnowMetError, SnowMetResult};
use snowmet_core::field::{FieldStore, NodeValue};
use snowmet_core::standard_variables::*;
use snowmet_core::variable::StaticVariableDefinition;
use tracing::{debug, info};

/// Format of the start date-time
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Drivers that must exist before construction
static REQUIRED_DRIVERS: [&StaticVariableDefinition; 4] = [
    &VAR_AIR_TEMPERATURE,
    &VAR_SURFACE_TEMPERATURE,
    &VAR_LATITUDE,
    &VAR_LONGITUDE,
];

/// Drivers created from their registered default when absent
static DEFAULTED_DRIVERS: [&StaticVariableDefinition; 13] = [
    &VAR_ASPECT,
    &VAR_SLOPE,
    &VAR_SNOW_DEPTH,
    &VAR_ALBEDO,
    &VAR_SURFACE_EMISSIVITY,
    &VAR_DUST_ATTENUATION,
    &VAR_CANOPY_FACTOR,
    &VAR_CLOUD_FACTOR,
    &VAR_RELATIVE_HUMIDITY,
    &VAR_AIR_PRESSURE,
    &VAR_ROUGHNESS_LENGTH,
    &VAR_REFERENCE_HEIGHT,
    &VAR_WIND_SPEED,
];

static OUTPUTS: [&StaticVariableDefinition; 18] = [
    &VAR_RICHARDSON_NUMBER,
    &VAR_NEUTRAL_CONDUCTANCE,
    &VAR_SENSIBLE_CONDUCTANCE,
    &VAR_LATENT_CONDUCTANCE,
    &VAR_SENSIBLE_HEAT_FLUX,
    &VAR_AIR_SATURATION_PRESSURE,
    &VAR_SURFACE_SATURATION_PRESSURE,
    &VAR_AIR_VAPOR_PRESSURE,
    &VAR_SURFACE_VAPOR_PRESSURE,
    &VAR_DEW_POINT,
    &VAR_PRECIPITABLE_WATER,
    &VAR_LATENT_HEAT_FLUX,
    &VAR_CONDUCTION_HEAT_FLUX,
    &VAR_ADVECTION_HEAT_FLUX,
    &VAR_NET_SHORTWAVE,
    &VAR_AIR_EMISSIVITY,
    &VAR_NET_LONGWAVE,
    &VAR_NET_ENERGY_FLUX,
];

/// Parse a `YYYY-MM-DD HH:MM:SS` local date-time
pub fn parse_datetime(value: &str) -> SnowMetResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT).map_err(|e| {
        SnowMetError::InvalidDatetime {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Snowpack surface meteorology component
///
/// Holds the clock and the cached solar timing; every per-node quantity lives in the
/// field store passed to each call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteorology {
    #[serde(skip)]
    constants: PhysicalConstants,
    parameters: MeteorologyParameters,
    method: SaturationMethod,
    start_datetime: NaiveDateTime,
    gmt_offset: NodeValue,
    /// Seconds since `start_datetime`
    elapsed: f64,
    julian_day: f64,
    /// Offset of true solar noon from clock noon (hours), per node
    tsn_offset: Array1<f64>,
    air_pressure_unit: PressureUnit,
    surface_pressure_unit: PressureUnit,
}

impl Meteorology {
    /// Construct the component over `fields`.
    ///
    /// Every check runs before the store is touched: a malformed start date-time,
    /// invalid parameters, a missing required driver or a GMT offset of the wrong
    /// length fail without creating any field. On success the defaulted drivers that
    /// were absent are created and the solar timing is initialised for the start time.
    pub fn new(fields: &mut dyn FieldStore, config: MeteorologyConfig) -> SnowMetResult<Self> {
        let start_datetime = parse_datetime(&config.start_datetime)?;
        config.parameters.validate()?;

        if let Some(missing) = REQUIRED_DRIVERS.iter().find(|v| !fields.has(v.name)) {
            return Err(SnowMetError::MissingField(missing.name.to_string()));
        }
        config
            .gmt_offset
            .broadcast("GMT offset", fields.number_of_nodes())?;

        let mut created = 0;
        for variable in DEFAULTED_DRIVERS {
            let default = variable.default.unwrap_or_default();
            if fields.ensure_default(variable.name, default)? {
                debug!(field = variable.name, default, "Created defaulted driver");
                created += 1;
            }
        }

        let mut meteorology = Self {
            constants: PhysicalConstants::STANDARD,
            parameters: config.parameters,
            method: config.method,
            start_datetime,
            gmt_offset: config.gmt_offset,
            elapsed: 0.0,
            julian_day: 0.0,
            tsn_offset: Array1::zeros(fields.number_of_nodes()),
            air_pressure_unit: PressureUnit::default(),
            surface_pressure_unit: PressureUnit::default(),
        };
        meteorology.update_julian_day(&*fields, 0.0)?;

        info!(
            nodes = fields.number_of_nodes(),
            start = %start_datetime,
            method = ?meteorology.method,
            defaults_created = created,
            "Initialised meteorology"
        );
        Ok(meteorology)
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn parameters(&self) -> &MeteorologyParameters {
        &self.parameters
    }

    pub fn set_rho_h2o(&mut self, value: f64) -> SnowMetResult<()> {
        self.parameters.set_rho_h2o(value)
    }

    pub fn set_rho_air(&mut self, value: f64) -> SnowMetResult<()> {
        self.parameters.set_rho_air(value)
    }

    pub fn set_cp_air(&mut self, value: f64) -> SnowMetResult<()> {
        self.parameters.set_cp_air(value)
    }

    pub fn method(&self) -> SaturationMethod {
        self.method
    }

    /// Switch the saturation formula family used by later stages
    pub fn set_method(&mut self, method: SaturationMethod) {
        self.method = method;
    }

    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start_datetime
    }

    pub fn gmt_offset(&self) -> &NodeValue {
        &self.gmt_offset
    }

    /// Seconds advanced since the start date-time
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Zero-based fractional day of year of the current local time
    pub fn julian_day(&self) -> f64 {
        self.julian_day
    }

    /// Offset of true solar noon from clock noon (hours) at each node
    pub fn tsn_offset(&self) -> &Array1<f64> {
        &self.tsn_offset
    }

    /// Unit the vapor pressures of `layer` were last written in
    pub fn pressure_unit_of(&self, layer: Layer) -> PressureUnit {
        match layer {
            Layer::Air => self.air_pressure_unit,
            Layer::Surface => self.surface_pressure_unit,
        }
    }

    /// Local date-time after the elapsed seconds, to the millisecond
    pub fn current_datetime(&self) -> SnowMetResult<NaiveDateTime> {
        self.datetime_after(self.elapsed)
    }

    fn datetime_after(&self, elapsed: f64) -> SnowMetResult<NaiveDateTime> {
        let out_of_range = || SnowMetError::InvalidDatetime {
            value: self.start_datetime.to_string(),
            reason: format!("cannot advance by {} s", elapsed),
        };
        if !elapsed.is_finite() {
            return Err(out_of_range());
        }
        let millis = (elapsed * 1000.0).round();
        if millis.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        TimeDelta::try_milliseconds(millis as i64)
            .and_then(|delta| self.start_datetime.checked_add_signed(delta))
            .ok_or_else(out_of_range)
    }

    /// Advance by `dt` seconds, running every stage in dependency order.
    ///
    /// A failed step may leave some outputs written.
    pub fn run_one_step(&mut self, fields: &mut dyn FieldStore, dt: f64) -> SnowMetResult<()> {
        self.update_bulk_richardson_number(fields)?;
        self.update_bulk_aero_conductance(fields)?;
        self.update_sensible_heat_flux(fields)?;

        self.update_saturation_vapor_pressure(fields, Layer::Air, PressureUnit::Millibar)?;
        self.update_saturation_vapor_pressure(fields, Layer::Surface, PressureUnit::Millibar)?;
        self.update_vapor_pressure(fields, Layer::Air)?;
        self.update_dew_point(fields)?;
        self.update_precipitable_water_content(fields)?;
        self.update_vapor_pressure(fields, Layer::Surface)?;
        self.update_latent_heat_flux(fields)?;

        self.update_conduction_heat_flux(fields)?;
        self.update_advection_heat_flux(fields)?;

        self.update_julian_day(&*fields, dt)?;
        self.update_net_shortwave_radiation(fields)?;
        self.update_em_air(fields)?;
        self.update_net_longwave_radiation(fields)?;

        self.update_net_energy_flux(fields)?;

        info!(elapsed = self.elapsed, julian_day = self.julian_day, "Meteorology step complete");
        Ok(())
    }
}

#[typetag::serde]
impl Component for Meteorology {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        REQUIRED_DRIVERS
            .iter()
            .chain(DEFAULTED_DRIVERS.iter())
            .map(|v| RequirementDefinition::input(v))
            .chain(OUTPUTS.iter().map(|v| RequirementDefinition::output(v)))
            .collect()
    }

    fn run_one_step(&mut self, fields: &mut dyn FieldStore, dt: f64) -> SnowMetResult<()> {
        Meteorology::run_one_step(self, fields, dt)
    }
}
