//! Moisture stage
//!
//! Saturation and actual vapor pressures of the air and of the surface, dew point,
//! precipitable water and the latent heat flux.
//!
//! Vapor pressures may be stored in kPa or mbar. The component remembers which unit
//! each layer's saturation pressure was last written in; the actual vapor pressure
//! of a layer inherits that unit, and stages that need millibars convert from it.

use super::Meteorology;
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};
use snowmet_core::errors::{SnowMetError, SnowMetResult};
use snowmet_core::field::FieldStore;
use snowmet_core::standard_variables::{
    VAR_AIR_PRESSURE, VAR_AIR_SATURATION_PRESSURE, VAR_AIR_TEMPERATURE, VAR_AIR_VAPOR_PRESSURE,
    VAR_DEW_POINT, VAR_LATENT_CONDUCTANCE, VAR_LATENT_HEAT_FLUX, VAR_PRECIPITABLE_WATER,
    VAR_RELATIVE_HUMIDITY, VAR_SURFACE_SATURATION_PRESSURE, VAR_SURFACE_TEMPERATURE,
    VAR_SURFACE_VAPOR_PRESSURE,
};
use tracing::{debug, warn};

/// Which temperature a vapor pressure is evaluated at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layer {
    /// Air at the reference height
    #[default]
    Air,
    /// Air in contact with the surface
    Surface,
}

impl Layer {
    fn temperature_field(self) -> &'static str {
        match self {
            Layer::Air => VAR_AIR_TEMPERATURE.name,
            Layer::Surface => VAR_SURFACE_TEMPERATURE.name,
        }
    }

    fn saturation_field(self) -> &'static str {
        match self {
            Layer::Air => VAR_AIR_SATURATION_PRESSURE.name,
            Layer::Surface => VAR_SURFACE_SATURATION_PRESSURE.name,
        }
    }

    fn vapor_field(self) -> &'static str {
        match self {
            Layer::Air => VAR_AIR_VAPOR_PRESSURE.name,
            Layer::Surface => VAR_SURFACE_VAPOR_PRESSURE.name,
        }
    }
}

/// Unit a vapor pressure field is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PressureUnit {
    #[default]
    Kilopascal,
    Millibar,
}

impl PressureUnit {
    /// Convert a pressure in kPa to this unit
    pub fn convert_from_kilopascal(self, kpa: f64) -> f64 {
        match self {
            PressureUnit::Kilopascal => kpa,
            PressureUnit::Millibar => kpa * 10.0,
        }
    }

    /// Convert a pressure in this unit to millibars
    pub fn to_millibar(self, value: f64) -> f64 {
        match self {
            PressureUnit::Kilopascal => value * 10.0,
            PressureUnit::Millibar => value,
        }
    }
}

/// Empirical formula family for saturation vapor pressure.
///
/// The same family selects the dew point relation and the clear-sky air
/// emissivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaturationMethod {
    /// Tetens-type formula with Brutsaert (1975) emissivity
    #[default]
    Brutsaert,
    /// Satterlund (1979) formula and emissivity
    Satterlund,
}

impl SaturationMethod {
    /// Select Satterlund when `satterlund` is set, Brutsaert otherwise
    pub fn from_satterlund_flag(satterlund: bool) -> Self {
        if satterlund {
            SaturationMethod::Satterlund
        } else {
            SaturationMethod::Brutsaert
        }
    }

    /// Saturation vapor pressure (kPa) over a surface at `temperature` (°C)
    ///
    /// Brutsaert: $e_{sat} = 0.611 \exp\left(\frac{17.3 T}{T + 237.3}\right)$
    ///
    /// Satterlund: $e_{sat} = 10^{11.4 - 2353 / (T + 273.15)}$ Pa
    pub fn saturation_vapor_pressure(self, temperature: f64) -> f64 {
        match self {
            SaturationMethod::Brutsaert => {
                0.611 * (17.3 * temperature / (temperature + 237.3)).exp()
            }
            SaturationMethod::Satterlund => {
                10f64.powf(11.4 - 2353.0 / (temperature + 273.15)) / 1000.0
            }
        }
    }

    /// Dew point (°C) of air with vapor pressure `vapor_pressure` (mbar).
    ///
    /// Brutsaert uses the empirical relation of Dingman (2002) with $e$ in kPa:
    ///
    /// $T_{dew} = \frac{\ln e + 0.4926}{0.0708 - 0.00421 \ln e}$
    ///
    /// which tracks the Tetens curve to within 0.01 °C between -20 and 25 °C.
    /// Satterlund inverts its saturation formula exactly. Air with no vapor has no
    /// dew point; absolute zero is returned in that case.
    pub fn dew_point(self, vapor_pressure: f64) -> f64 {
        if vapor_pressure <= 0.0 {
            return -273.15;
        }
        match self {
            SaturationMethod::Brutsaert => {
                let l = (vapor_pressure / 10.0).ln();
                (l + 0.4926) / (0.0708 - 0.00421 * l)
            }
            SaturationMethod::Satterlund => {
                2353.0 / (11.4 - (100.0 * vapor_pressure).log10()) - 273.15
            }
        }
    }
}

/// Precipitable water (cm) of the air column above a node with dew point `dew_point` (°C)
pub fn precipitable_water(dew_point: f64) -> f64 {
    1.12 * (0.0614 * dew_point).exp()
}

/// Bulk latent heat flux (W m-2), positive towards the surface.
///
/// $Q_e = \rho_{air} L_v D_e \frac{0.662}{p} (e_{air} - e_{surf})$
///
/// All pressures in mbar.
pub fn latent_heat_flux(
    rho_air: f64,
    lv: f64,
    latent_heat_constant: f64,
    conductance: f64,
    e_air: f64,
    e_surf: f64,
    pressure: f64,
) -> f64 {
    rho_air * lv * conductance * (latent_heat_constant / pressure) * (e_air - e_surf)
}

impl Meteorology {
    /// Vapor pressure of a layer converted to mbar
    pub(super) fn vapor_pressure_mbar(
        &self,
        fields: &dyn FieldStore,
        layer: Layer,
    ) -> SnowMetResult<Array1<f64>> {
        let unit = self.pressure_unit_of(layer);
        Ok(fields.get(layer.vapor_field())?.mapv(|e| unit.to_millibar(e)))
    }

    /// Write the saturation vapor pressure of `layer` in `unit`
    pub fn update_saturation_vapor_pressure(
        &mut self,
        fields: &mut dyn FieldStore,
        layer: Layer,
        unit: PressureUnit,
    ) -> SnowMetResult<()> {
        let method = self.method;
        let e_sat = fields
            .get(layer.temperature_field())?
            .mapv(|t| unit.convert_from_kilopascal(method.saturation_vapor_pressure(t)));
        fields.set(layer.saturation_field(), e_sat)?;

        match layer {
            Layer::Air => self.air_pressure_unit = unit,
            Layer::Surface => self.surface_pressure_unit = unit,
        }
        debug!(?layer, ?unit, ?method, "Updated saturation vapor pressure");
        Ok(())
    }

    /// Write the actual vapor pressure of `layer` from the air relative humidity
    pub fn update_vapor_pressure(
        &self,
        fields: &mut dyn FieldStore,
        layer: Layer,
    ) -> SnowMetResult<()> {
        let e = {
            let rh = fields.get(VAR_RELATIVE_HUMIDITY.name)?;
            let e_sat = fields.get(layer.saturation_field())?;
            rh * e_sat
        };
        fields.set(layer.vapor_field(), e)?;
        debug!(?layer, "Updated vapor pressure");
        Ok(())
    }

    pub fn update_dew_point(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let method = self.method;
        let e_air = self.vapor_pressure_mbar(fields, Layer::Air)?;

        let dry_nodes = e_air.iter().filter(|&&e| e <= 0.0).count();
        if dry_nodes > 0 {
            warn!(
                nodes = dry_nodes,
                "Non-positive air vapor pressure; dew point set to absolute zero"
            );
        }

        fields.set(VAR_DEW_POINT.name, e_air.mapv(|e| method.dew_point(e)))?;
        debug!("Updated dew point");
        Ok(())
    }

    pub fn update_precipitable_water_content(
        &self,
        fields: &mut dyn FieldStore,
    ) -> SnowMetResult<()> {
        let w_p = fields.get(VAR_DEW_POINT.name)?.mapv(precipitable_water);
        fields.set(VAR_PRECIPITABLE_WATER.name, w_p)?;
        debug!("Updated precipitable water content");
        Ok(())
    }

    /// Write the latent heat flux.
    ///
    /// Fails if the air pressure is not strictly positive at any node.
    pub fn update_latent_heat_flux(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let e_air = self.vapor_pressure_mbar(fields, Layer::Air)?;
        let e_surf = self.vapor_pressure_mbar(fields, Layer::Surface)?;

        let q_e = {
            let pressure = fields.get(VAR_AIR_PRESSURE.name)?;
            if let Some((node, &value)) = pressure.iter().enumerate().find(|(_, p)| **p <= 0.0) {
                return Err(SnowMetError::NonPositiveField {
                    name: VAR_AIR_PRESSURE.name.to_string(),
                    node,
                    value,
                });
            }
            let de = fields.get(VAR_LATENT_CONDUCTANCE.name)?;

            let c = &self.constants;
            let rho_air = self.parameters.rho_air;
            Zip::from(de)
                .and(&e_air)
                .and(&e_surf)
                .and(pressure)
                .map_collect(|&de, &ea, &es, &p| {
                    latent_heat_flux(rho_air, c.lv, c.latent_heat_constant, de, ea, es, p)
                })
        };
        fields.set(VAR_LATENT_HEAT_FLUX.name, q_e)?;
        debug!("Updated latent heat flux");
        Ok(())
    }
}
