//! Standard variable definitions for snowmet.
//!
//! These variables are registered at compile-time using the [`define_static_variable!`] macro
//! and are automatically available in the global [`VARIABLE_REGISTRY`](crate::variable::VARIABLE_REGISTRY).
//!
//! # Variable Naming Conventions
//!
//! Names follow the CSDMS standard names: `object__quantity`, where the object part
//! uses `_` between words and the quantity is separated by a double underscore:
//! - `atmosphere_bottom_air__temperature` - air temperature at the reference height
//! - `land_surface__albedo` - surface albedo
//!
//! Drivers with a `default` are created by components that read them when the caller
//! has not supplied them. Drivers without a default must be present before a component
//! is constructed.
//!
//! # Available Variables
//!
//! ## Required drivers
//! - `VAR_AIR_TEMPERATURE`, `VAR_SURFACE_TEMPERATURE`, `VAR_LATITUDE`, `VAR_LONGITUDE`
//!
//! ## Defaulted drivers
//! - `VAR_ASPECT`, `VAR_SLOPE`, `VAR_SNOW_DEPTH`, `VAR_ALBEDO`, `VAR_SURFACE_EMISSIVITY`
//! - `VAR_DUST_ATTENUATION`, `VAR_CANOPY_FACTOR`, `VAR_CLOUD_FACTOR`
//! - `VAR_RELATIVE_HUMIDITY`, `VAR_AIR_PRESSURE`
//! - `VAR_ROUGHNESS_LENGTH`, `VAR_REFERENCE_HEIGHT`, `VAR_WIND_SPEED`
//!
//! ## Turbulent exchange
//! - `VAR_RICHARDSON_NUMBER`, `VAR_NEUTRAL_CONDUCTANCE`, `VAR_SENSIBLE_CONDUCTANCE`,
//!   `VAR_LATENT_CONDUCTANCE`, `VAR_SENSIBLE_HEAT_FLUX`
//!
//! ## Moisture
//! - `VAR_AIR_SATURATION_PRESSURE`, `VAR_SURFACE_SATURATION_PRESSURE`
//! - `VAR_AIR_VAPOR_PRESSURE`, `VAR_SURFACE_VAPOR_PRESSURE`
//! - `VAR_DEW_POINT`, `VAR_PRECIPITABLE_WATER`, `VAR_LATENT_HEAT_FLUX`
//!
//! ## Radiation and energy balance
//! - `VAR_CONDUCTION_HEAT_FLUX`, `VAR_ADVECTION_HEAT_FLUX`
//! - `VAR_NET_SHORTWAVE`, `VAR_AIR_EMISSIVITY`, `VAR_NET_LONGWAVE`
//! - `VAR_NET_ENERGY_FLUX`

use crate::define_static_variable;

// ============================================================================
// Required Drivers
// ============================================================================

define_static_variable!(
    VAR_AIR_TEMPERATURE,
    name = "atmosphere_bottom_air__temperature",
    unit = "deg_C",
    description = "Air temperature at the wind reference height",
);

define_static_variable!(
    VAR_SURFACE_TEMPERATURE,
    name = "land_surface__temperature",
    unit = "deg_C",
    description = "Temperature of the snow or land surface",
);

define_static_variable!(
    VAR_LATITUDE,
    name = "land_surface__latitude",
    unit = "deg",
    description = "Geographic latitude of the node, north positive",
);

define_static_variable!(
    VAR_LONGITUDE,
    name = "land_surface__longitude",
    unit = "deg",
    description = "Geographic longitude of the node, east positive",
);

// ============================================================================
// Defaulted Drivers
// ============================================================================

define_static_variable!(
    VAR_ASPECT,
    name = "land_surface__aspect_angle",
    unit = "rad",
    default = 0.0,
    description = "Direction the slope faces, clockwise from north",
);

define_static_variable!(
    VAR_SLOPE,
    name = "land_surface__slope_angle",
    unit = "rad",
    default = 0.0,
    description = "Inclination of the surface from horizontal",
);

define_static_variable!(
    VAR_SNOW_DEPTH,
    name = "snowpack__depth",
    unit = "m",
    default = 0.0,
    description = "Depth of the snowpack, raising the effective surface",
);

define_static_variable!(
    VAR_ALBEDO,
    name = "land_surface__albedo",
    unit = "1",
    default = 0.3,
    description = "Fraction of incoming shortwave radiation reflected by the surface",
);

define_static_variable!(
    VAR_SURFACE_EMISSIVITY,
    name = "land_surface__emissivity",
    unit = "1",
    default = 0.98,
    description = "Longwave emissivity of the surface",
);

define_static_variable!(
    VAR_DUST_ATTENUATION,
    name = "atmosphere_aerosol_dust__reduction_of_transmittance",
    unit = "1",
    default = 0.0,
    description = "Reduction of direct beam transmittance by atmospheric dust",
);

define_static_variable!(
    VAR_CANOPY_FACTOR,
    name = "atmosphere_bottom_air__brutsaert_emissivity_canopy_factor",
    unit = "1",
    default = 0.0,
    description = "Canopy cover fraction used to correct the Brutsaert air emissivity",
);

define_static_variable!(
    VAR_CLOUD_FACTOR,
    name = "atmosphere_bottom_air__brutsaert_emissivity_cloud_factor",
    unit = "1",
    default = 0.0,
    description = "Cloud cover fraction used to correct the Brutsaert air emissivity",
);

define_static_variable!(
    VAR_RELATIVE_HUMIDITY,
    name = "atmosphere_bottom_air_water-vapor__relative_saturation",
    unit = "1",
    default = 0.5,
    description = "Relative humidity of the air as a fraction",
);

define_static_variable!(
    VAR_AIR_PRESSURE,
    name = "atmosphere_bottom_air__pressure",
    unit = "mbar",
    default = 1000.0,
    description = "Atmospheric pressure at the surface",
);

define_static_variable!(
    VAR_ROUGHNESS_LENGTH,
    name = "atmosphere_bottom_air_flow__log_law_roughness_length",
    unit = "m",
    default = 0.02,
    description = "Aerodynamic roughness length of the log wind profile",
);

define_static_variable!(
    VAR_REFERENCE_HEIGHT,
    name = "atmosphere_bottom_air_flow__speed_reference_height",
    unit = "m",
    default = 2.0,
    description = "Height above ground at which wind speed and air temperature are measured",
);

define_static_variable!(
    VAR_WIND_SPEED,
    name = "atmosphere_bottom_air_flow__reference-height_speed",
    unit = "m s-1",
    default = 3.0,
    description = "Wind speed at the reference height",
);

// ============================================================================
// Turbulent Exchange Variables
// ============================================================================

define_static_variable!(
    VAR_RICHARDSON_NUMBER,
    name = "atmosphere_bottom_air_flow__bulk_richardson_number",
    unit = "1",
    description = "Bulk Richardson number of the surface layer",
);

define_static_variable!(
    VAR_NEUTRAL_CONDUCTANCE,
    name = "atmosphere_bottom_air__neutral_bulk_heat_aerodynamic_conductance",
    unit = "m s-1",
    description = "Aerodynamic conductance for neutral stability",
);

define_static_variable!(
    VAR_SENSIBLE_CONDUCTANCE,
    name = "atmosphere_bottom_air__bulk_sensible_heat_aerodynamic_conductance",
    unit = "m s-1",
    description = "Stability corrected aerodynamic conductance for sensible heat",
);

define_static_variable!(
    VAR_LATENT_CONDUCTANCE,
    name = "atmosphere_bottom_air__bulk_latent_heat_aerodynamic_conductance",
    unit = "m s-1",
    description = "Stability corrected aerodynamic conductance for latent heat",
);

define_static_variable!(
    VAR_SENSIBLE_HEAT_FLUX,
    name = "atmosphere_bottom_air_land_net-sensible-heat__energy_flux",
    unit = "W m-2",
    description = "Net sensible heat flux into the surface",
);

// ============================================================================
// Moisture Variables
// ============================================================================

define_static_variable!(
    VAR_AIR_SATURATION_PRESSURE,
    name = "atmosphere_bottom_air_water-vapor__saturated_partial_pressure",
    unit = "mbar",
    description = "Saturation vapor pressure at the air temperature (kPa when requested)",
);

define_static_variable!(
    VAR_SURFACE_SATURATION_PRESSURE,
    name = "land_surface_air_water-vapor__saturated_partial_pressure",
    unit = "mbar",
    description = "Saturation vapor pressure at the surface temperature (kPa when requested)",
);

define_static_variable!(
    VAR_AIR_VAPOR_PRESSURE,
    name = "atmosphere_bottom_air_water-vapor__partial_pressure",
    unit = "mbar",
    description = "Actual vapor pressure of the air, in the unit of its saturation pressure",
);

define_static_variable!(
    VAR_SURFACE_VAPOR_PRESSURE,
    name = "land_surface_air_water-vapor__partial_pressure",
    unit = "mbar",
    description = "Vapor pressure just above the surface, in the unit of its saturation pressure",
);

define_static_variable!(
    VAR_DEW_POINT,
    name = "atmosphere_bottom_air_water-vapor__dew_point_temperature",
    unit = "deg_C",
    description = "Dew point temperature of the air",
);

define_static_variable!(
    VAR_PRECIPITABLE_WATER,
    name = "atmosphere_air-column_water-vapor__liquid-equivalent_depth",
    unit = "cm",
    description = "Precipitable water content of the air column",
);

define_static_variable!(
    VAR_LATENT_HEAT_FLUX,
    name = "atmosphere_bottom_air_land_net-latent-heat__energy_flux",
    unit = "W m-2",
    description = "Net latent heat flux into the surface",
);

// ============================================================================
// Radiation and Energy Balance Variables
// ============================================================================

define_static_variable!(
    VAR_CONDUCTION_HEAT_FLUX,
    name = "snowpack_land_surface_net-conduction-heat__energy_flux",
    unit = "W m-2",
    description = "Net conductive heat flux between the snowpack and the ground",
);

define_static_variable!(
    VAR_ADVECTION_HEAT_FLUX,
    name = "snowpack_land_surface_net-advection-heat__energy_flux",
    unit = "W m-2",
    description = "Net heat advected to the snowpack by precipitation",
);

define_static_variable!(
    VAR_NET_SHORTWAVE,
    name = "land_surface_net-shortwave-radiation__energy_flux",
    unit = "W m-2",
    description = "Clear-sky net shortwave radiation absorbed by the surface",
);

define_static_variable!(
    VAR_AIR_EMISSIVITY,
    name = "atmosphere_bottom_air__emissivity",
    unit = "1",
    description = "Effective longwave emissivity of the air",
);

define_static_variable!(
    VAR_NET_LONGWAVE,
    name = "land_surface_net-longwave-radiation__energy_flux",
    unit = "W m-2",
    description = "Net longwave radiation at the surface",
);

define_static_variable!(
    VAR_NET_ENERGY_FLUX,
    name = "land_surface_net-total-energy__energy_flux",
    unit = "W m-2",
    description = "Sum of all energy fluxes into the surface",
);
