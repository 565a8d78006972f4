//! Turbulent exchange stage
//!
//! Bulk Richardson number, aerodynamic conductances and the sensible heat flux.
//!
//! $$Ri = \frac{g z (T_{surf} - T_{air})}{u^2 (T_{air} + 273.15)}$$
//!
//! $$D_n = u \left(\frac{\kappa}{\ln((z - h_{snow}) / z_0)}\right)^2$$
//!
//! The stability correction reduces exchange in stable air and enhances it in
//! unstable air:
//!
//! $$D_h = D_e = \begin{cases} D_n / (1 + 10 Ri) & Ri > 0 \\ D_n (1 - 10 Ri) & Ri \le 0 \end{cases}$$

use super::Meteorology;
use ndarray::{Array1, Zip};
use snowmet_core::errors::SnowMetResult;
use snowmet_core::field::FieldStore;
use snowmet_core::standard_variables::{
    VAR_AIR_TEMPERATURE, VAR_LATENT_CONDUCTANCE, VAR_NEUTRAL_CONDUCTANCE, VAR_REFERENCE_HEIGHT,
    VAR_RICHARDSON_NUMBER, VAR_ROUGHNESS_LENGTH, VAR_SENSIBLE_CONDUCTANCE,
    VAR_SENSIBLE_HEAT_FLUX, VAR_SNOW_DEPTH, VAR_SURFACE_TEMPERATURE, VAR_WIND_SPEED,
};
use tracing::{debug, warn};

/// Bulk Richardson number of the layer between the surface and the reference height.
///
/// Calm air (`wind_speed == 0`) has no turbulent exchange, reported as neutral (0).
pub fn bulk_richardson_number(
    g: f64,
    c_to_k: f64,
    reference_height: f64,
    t_air: f64,
    t_surf: f64,
    wind_speed: f64,
) -> f64 {
    if wind_speed == 0.0 {
        return 0.0;
    }
    g * reference_height * (t_surf - t_air) / (wind_speed.powi(2) * (t_air + c_to_k))
}

/// Aerodynamic conductance (m s-1) for neutral stability.
///
/// The log law is undefined once the snowpack buries the reference height to within
/// one roughness length; there is no exchange in that case.
pub fn neutral_conductance(
    kappa: f64,
    wind_speed: f64,
    reference_height: f64,
    snow_depth: f64,
    roughness_length: f64,
) -> f64 {
    let ratio = (reference_height - snow_depth) / roughness_length;
    if ratio.is_nan() || ratio <= 1.0 {
        return 0.0;
    }
    wind_speed * (kappa / ratio.ln()).powi(2)
}

/// Apply the stability correction to a neutral conductance
pub fn stability_corrected_conductance(neutral: f64, richardson_number: f64) -> f64 {
    if richardson_number > 0.0 {
        neutral / (1.0 + 10.0 * richardson_number)
    } else {
        neutral * (1.0 - 10.0 * richardson_number)
    }
}

/// Bulk sensible heat flux (W m-2), positive towards the surface.
pub fn sensible_heat_flux(rho_air: f64, cp_air: f64, conductance: f64, t_air: f64, t_surf: f64) -> f64 {
    rho_air * cp_air * conductance * (t_air - t_surf)
}

impl Meteorology {
    pub fn update_bulk_richardson_number(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let ri = {
            let t_air = fields.get(VAR_AIR_TEMPERATURE.name)?;
            let t_surf = fields.get(VAR_SURFACE_TEMPERATURE.name)?;
            let z = fields.get(VAR_REFERENCE_HEIGHT.name)?;
            let u = fields.get(VAR_WIND_SPEED.name)?;

            let calm = u.iter().filter(|&&u| u == 0.0).count();
            if calm > 0 {
                warn!(nodes = calm, "Zero wind speed; treating the surface layer as neutral");
            }

            let c = &self.constants;
            Zip::from(t_air)
                .and(t_surf)
                .and(z)
                .and(u)
                .map_collect(|&ta, &ts, &z, &u| bulk_richardson_number(c.g, c.c_to_k, z, ta, ts, u))
        };
        fields.set(VAR_RICHARDSON_NUMBER.name, ri)?;
        debug!("Updated bulk Richardson number");
        Ok(())
    }

    /// Write the neutral, sensible heat and latent heat conductances.
    ///
    /// Requires the Richardson number.
    pub fn update_bulk_aero_conductance(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let (dn, dh) = {
            let u = fields.get(VAR_WIND_SPEED.name)?;
            let z = fields.get(VAR_REFERENCE_HEIGHT.name)?;
            let h_snow = fields.get(VAR_SNOW_DEPTH.name)?;
            let z0 = fields.get(VAR_ROUGHNESS_LENGTH.name)?;
            let ri = fields.get(VAR_RICHARDSON_NUMBER.name)?;
            let t_air = fields.get(VAR_AIR_TEMPERATURE.name)?;
            let t_surf = fields.get(VAR_SURFACE_TEMPERATURE.name)?;

            let kappa = self.constants.kappa;
            let dn: Array1<f64> = Zip::from(u)
                .and(z)
                .and(h_snow)
                .and(z0)
                .map_collect(|&u, &z, &h, &z0| neutral_conductance(kappa, u, z, h, z0));

            let buried = Zip::from(z)
                .and(h_snow)
                .and(z0)
                .fold(0usize, |n, &z, &h, &z0| if (z - h) / z0 > 1.0 { n } else { n + 1 });
            if buried > 0 {
                warn!(
                    nodes = buried,
                    "Snow depth reaches the wind reference height; no turbulent exchange"
                );
            }

            // Equal temperatures are neutral however Ri was derived
            let dh = Zip::from(&dn)
                .and(ri)
                .and(t_air)
                .and(t_surf)
                .map_collect(|&dn, &ri, &ta, &ts| {
                    if ta == ts {
                        dn
                    } else {
                        stability_corrected_conductance(dn, ri)
                    }
                });
            (dn, dh)
        };

        fields.set(VAR_NEUTRAL_CONDUCTANCE.name, dn)?;
        fields.set(VAR_LATENT_CONDUCTANCE.name, dh.clone())?;
        fields.set(VAR_SENSIBLE_CONDUCTANCE.name, dh)?;
        debug!("Updated bulk aerodynamic conductances");
        Ok(())
    }

    pub fn update_sensible_heat_flux(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let q_h = {
            let dh = fields.get(VAR_SENSIBLE_CONDUCTANCE.name)?;
            let t_air = fields.get(VAR_AIR_TEMPERATURE.name)?;
            let t_surf = fields.get(VAR_SURFACE_TEMPERATURE.name)?;

            let rho_air = self.parameters.rho_air;
            let cp_air = self.parameters.cp_air;
            Zip::from(dh)
                .and(t_air)
                .and(t_surf)
                .map_collect(|&dh, &ta, &ts| sensible_heat_flux(rho_air, cp_air, dh, ta, ts))
        };
        fields.set(VAR_SENSIBLE_HEAT_FLUX.name, q_h)?;
        debug!("Updated sensible heat flux");
        Ok(())
    }
}
