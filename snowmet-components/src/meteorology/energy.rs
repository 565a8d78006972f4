//! Energy balance aggregation
//!
//! Conduction into the ground and heat advected by precipitation are not modelled;
//! both are written as zero so the total keeps all six terms.

use super::Meteorology;
use ndarray::Array1;
use snowmet_core::errors::SnowMetResult;
use snowmet_core::field::FieldStore;
use snowmet_core::standard_variables::{
    VAR_ADVECTION_HEAT_FLUX, VAR_CONDUCTION_HEAT_FLUX, VAR_LATENT_HEAT_FLUX, VAR_NET_ENERGY_FLUX,
    VAR_NET_LONGWAVE, VAR_NET_SHORTWAVE, VAR_SENSIBLE_HEAT_FLUX,
};
use tracing::debug;

/// Energy fluxes into the surface at a node (W m-2)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyFluxes {
    pub shortwave: f64,
    pub longwave: f64,
    pub sensible: f64,
    pub latent: f64,
    pub conduction: f64,
    pub advection: f64,
}

impl EnergyFluxes {
    /// Net energy flux into the surface
    pub fn total(&self) -> f64 {
        self.shortwave
            + self.longwave
            + self.sensible
            + self.latent
            + self.conduction
            + self.advection
    }
}

impl Meteorology {
    pub fn update_conduction_heat_flux(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        fields.add_full(VAR_CONDUCTION_HEAT_FLUX.name, 0.0)
    }

    pub fn update_advection_heat_flux(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        fields.add_full(VAR_ADVECTION_HEAT_FLUX.name, 0.0)
    }

    /// Write the sum of all energy fluxes.
    ///
    /// The radiative and turbulent terms must already exist. Conduction and advection
    /// count as zero until they have been written.
    pub fn update_net_energy_flux(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let q_sum = {
            let q_sw = fields.get(VAR_NET_SHORTWAVE.name)?;
            let q_lw = fields.get(VAR_NET_LONGWAVE.name)?;
            let q_h = fields.get(VAR_SENSIBLE_HEAT_FLUX.name)?;
            let q_e = fields.get(VAR_LATENT_HEAT_FLUX.name)?;
            let q_c = fields.get(VAR_CONDUCTION_HEAT_FLUX.name).ok();
            let q_a = fields.get(VAR_ADVECTION_HEAT_FLUX.name).ok();

            Array1::from_shape_fn(fields.number_of_nodes(), |i| {
                EnergyFluxes {
                    shortwave: q_sw[i],
                    longwave: q_lw[i],
                    sensible: q_h[i],
                    latent: q_e[i],
                    conduction: q_c.map_or(0.0, |q| q[i]),
                    advection: q_a.map_or(0.0, |q| q[i]),
                }
                .total()
            })
        };
        fields.set(VAR_NET_ENERGY_FLUX.name, q_sum)?;
        debug!("Updated net energy flux");
        Ok(())
    }
}
