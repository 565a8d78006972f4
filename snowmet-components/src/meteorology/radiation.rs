//! Radiation stage
//!
//! Clear-sky net shortwave radiation on a sloped surface, effective air emissivity
//! and net longwave radiation.
//!
//! Shortwave follows the TVA clear-sky model as given by Bras (1990): Kasten optical
//! air mass and transmittances driven by precipitable water. The direct beam is
//! projected onto the slope through the equivalent-latitude construction, so a
//! horizontal node with `slope = 0` reduces to the usual zenith-angle form. Half of
//! the scattered beam reaches the ground as diffuse light, and the ground reflection
//! is scattered back down by the atmosphere:
//!
//! $K = \frac{K_{dir} + K_{dif}}{1 - \frac{1}{2} a (1 - \tau_a + d)}$
//!
//! so brighter snow receives more shortwave, not less.

use super::{Layer, Meteorology, SaturationMethod};
use ndarray::{Array1, Zip};
use snowmet_core::errors::{SnowMetError, SnowMetResult};
use snowmet_core::field::FieldStore;
use snowmet_core::standard_variables::{
    VAR_AIR_EMISSIVITY, VAR_AIR_TEMPERATURE, VAR_ALBEDO, VAR_ASPECT, VAR_CANOPY_FACTOR,
    VAR_CLOUD_FACTOR, VAR_DUST_ATTENUATION, VAR_LATITUDE, VAR_NET_LONGWAVE, VAR_NET_SHORTWAVE,
    VAR_PRECIPITABLE_WATER, VAR_SLOPE, VAR_SURFACE_EMISSIVITY, VAR_SURFACE_TEMPERATURE,
};
use tracing::debug;

use super::solar::{declination, eccentricity_correction, hour_angle, hours_from_solar_noon};

/// Sine of the solar elevation over a horizontal surface.
///
/// All angles in radians. Negative when the sun is below the horizon.
pub fn sin_solar_elevation(declination: f64, latitude: f64, hour_angle: f64) -> f64 {
    declination.sin() * latitude.sin()
        + declination.cos() * latitude.cos() * hour_angle.cos()
}

/// Cosine of the angle between the solar beam and the normal of a sloped surface.
///
/// `aspect` is measured clockwise from north, so `aspect = 0` faces the pole in the
/// northern hemisphere. Self-shaded slopes return 0.
pub fn cos_incidence(
    declination: f64,
    latitude: f64,
    hour_angle: f64,
    slope: f64,
    aspect: f64,
) -> f64 {
    let equivalent_latitude =
        (slope.sin() * aspect.cos() * latitude.cos() + slope.cos() * latitude.sin()).asin();
    let longitude_difference = (slope.sin() * aspect.sin())
        .atan2(slope.cos() * latitude.cos() - slope.sin() * aspect.cos() * latitude.sin());

    let cos_i = declination.sin() * equivalent_latitude.sin()
        + declination.cos()
            * equivalent_latitude.cos()
            * (hour_angle + longitude_difference).cos();
    cos_i.max(0.0)
}

/// Kasten optical air mass for a sun at elevation `asin(sin_elevation)`
pub fn optical_air_mass(sin_elevation: f64) -> f64 {
    let elevation_deg = sin_elevation.asin().to_degrees();
    1.0 / (sin_elevation + 0.15 * (elevation_deg + 3.885).powf(-1.253))
}

/// Atmospheric transmittances `(absorption, scattering_and_absorption)` for a column
/// holding `precipitable_water` cm of water along an optical path of `air_mass`.
pub fn atmospheric_transmittances(precipitable_water: f64, air_mass: f64) -> (f64, f64) {
    let w = 0.465 + 0.134 * precipitable_water;
    let tau_a = (-w * (0.129 + 0.171 * (-0.880 * air_mass).exp()) * air_mass).exp();
    let tau_sa = (-w * (0.179 + 0.421 * (-0.721 * air_mass).exp()) * air_mass).exp();
    (tau_a, tau_sa)
}

/// Per-node inputs of the clear-sky shortwave model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortwaveSite {
    /// Latitude (degrees north)
    pub latitude: f64,
    /// Slope (radians)
    pub slope: f64,
    /// Aspect (radians clockwise from north)
    pub aspect: f64,
    /// Hours after true solar noon
    pub hours_from_noon: f64,
    /// Precipitable water (cm)
    pub precipitable_water: f64,
    /// Dust attenuation of the diffuse beam
    pub dust_attenuation: f64,
    /// Ground albedo seen by the atmosphere
    pub albedo: f64,
}

/// Clear-sky shortwave radiation (W m-2) reaching the ground, by path
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShortwaveComponents {
    pub direct: f64,
    pub diffuse: f64,
    /// Ground reflection scattered back down by the atmosphere
    pub reflected: f64,
}

impl ShortwaveComponents {
    pub fn total(&self) -> f64 {
        self.direct + self.diffuse + self.reflected
    }
}

/// Clear-sky shortwave radiation at a node.
///
/// Zero while the sun is at or below the horizon.
pub fn clear_sky_shortwave(
    solar_constant: f64,
    julian_day: f64,
    site: &ShortwaveSite,
) -> ShortwaveComponents {
    let delta = declination(julian_day);
    let latitude = site.latitude.to_radians();
    let omega = hour_angle(site.hours_from_noon);

    let sin_h = sin_solar_elevation(delta, latitude, omega);
    if sin_h <= 0.0 {
        return ShortwaveComponents::default();
    }

    let (tau_a, tau_sa) =
        atmospheric_transmittances(site.precipitable_water, optical_air_mass(sin_h));
    let extraterrestrial = solar_constant * eccentricity_correction(julian_day);
    let cos_i = cos_incidence(delta, latitude, omega, site.slope, site.aspect);

    let direct = extraterrestrial * cos_i * tau_sa;
    let diffuse = 0.5 * extraterrestrial * sin_h * (1.0 - tau_a - site.dust_attenuation);
    let backscatter = 0.5 * site.albedo * (1.0 - tau_a + site.dust_attenuation);
    let total = (direct + diffuse) / (1.0 - backscatter);

    ShortwaveComponents {
        direct,
        diffuse,
        reflected: total - direct - diffuse,
    }
}

impl SaturationMethod {
    /// Effective emissivity of air at `t_air_k` (K) holding `vapor_pressure` (mbar).
    ///
    /// The canopy and cloud corrections apply to the Brutsaert form only:
    ///
    /// $\epsilon = (1 - F) \, 1.72 \left(\frac{e / 10}{T}\right)^{1/7} (1 + 0.22 C^2) + F$
    ///
    /// Satterlund: $\epsilon = 1.08 \left(1 - \exp\left(-e^{T / 2016}\right)\right)$
    pub fn air_emissivity(
        self,
        vapor_pressure: f64,
        t_air_k: f64,
        canopy_factor: f64,
        cloud_factor: f64,
    ) -> f64 {
        match self {
            SaturationMethod::Brutsaert => {
                let clear_sky = 1.72 * (vapor_pressure / 10.0 / t_air_k).powf(1.0 / 7.0);
                (1.0 - canopy_factor) * clear_sky * (1.0 + 0.22 * cloud_factor.powi(2))
                    + canopy_factor
            }
            SaturationMethod::Satterlund => {
                1.08 * (1.0 - (-vapor_pressure.powf(t_air_k / 2016.0)).exp())
            }
        }
    }
}

/// Longwave radiation (W m-2) arriving at and leaving the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongwaveBalance {
    pub incoming: f64,
    /// Surface emission plus the reflected part of the incoming flux
    pub outgoing: f64,
}

impl LongwaveBalance {
    pub fn new(sigma: f64, em_air: f64, em_surf: f64, t_air_k: f64, t_surf_k: f64) -> Self {
        let incoming = em_air * sigma * t_air_k.powi(4);
        let outgoing = em_surf * sigma * t_surf_k.powi(4) + (1.0 - em_surf) * incoming;
        Self { incoming, outgoing }
    }

    pub fn net(&self) -> f64 {
        self.incoming - self.outgoing
    }
}

impl Meteorology {
    /// Write the net shortwave radiation for the cached julian day.
    ///
    /// Requires the precipitable water and a prior call to
    /// [`update_julian_day`](Self::update_julian_day) for the same set of nodes.
    pub fn update_net_shortwave_radiation(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let nodes = fields.number_of_nodes();
        if self.tsn_offset.len() != nodes {
            return Err(SnowMetError::CardinalityMismatch {
                name: "true solar noon offset".to_string(),
                expected: nodes,
                found: self.tsn_offset.len(),
            });
        }

        let q_sw = {
            let latitude = fields.get(VAR_LATITUDE.name)?;
            let slope = fields.get(VAR_SLOPE.name)?;
            let aspect = fields.get(VAR_ASPECT.name)?;
            let w_p = fields.get(VAR_PRECIPITABLE_WATER.name)?;
            let dust = fields.get(VAR_DUST_ATTENUATION.name)?;
            let albedo = fields.get(VAR_ALBEDO.name)?;

            let solar_constant = self.constants.solar_constant;
            let hours_per_day = self.constants.hours_per_day;
            let jd = self.julian_day;
            Array1::from_shape_fn(nodes, |i| {
                let site = ShortwaveSite {
                    latitude: latitude[i],
                    slope: slope[i],
                    aspect: aspect[i],
                    hours_from_noon: hours_from_solar_noon(jd, self.tsn_offset[i], hours_per_day),
                    precipitable_water: w_p[i],
                    dust_attenuation: dust[i],
                    albedo: albedo[i],
                };
                clear_sky_shortwave(solar_constant, jd, &site).total()
            })
        };

        let dark = q_sw.iter().filter(|&&q| q == 0.0).count();
        fields.set(VAR_NET_SHORTWAVE.name, q_sw)?;
        debug!(julian_day = self.julian_day, dark_nodes = dark, "Updated net shortwave radiation");
        Ok(())
    }

    /// Write the effective air emissivity.
    ///
    /// Requires the air vapor pressure.
    pub fn update_em_air(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let e_air = self.vapor_pressure_mbar(fields, Layer::Air)?;
        let em_air = {
            let t_air = fields.get(VAR_AIR_TEMPERATURE.name)?;
            let canopy = fields.get(VAR_CANOPY_FACTOR.name)?;
            let cloud = fields.get(VAR_CLOUD_FACTOR.name)?;

            let method = self.method;
            let c_to_k = self.constants.c_to_k;
            Zip::from(&e_air)
                .and(t_air)
                .and(canopy)
                .and(cloud)
                .map_collect(|&e, &t, &f, &c| method.air_emissivity(e, t + c_to_k, f, c))
        };
        fields.set(VAR_AIR_EMISSIVITY.name, em_air)?;
        debug!(method = ?self.method, "Updated air emissivity");
        Ok(())
    }

    /// Write the net longwave radiation.
    ///
    /// Requires the air emissivity.
    pub fn update_net_longwave_radiation(&self, fields: &mut dyn FieldStore) -> SnowMetResult<()> {
        let q_lw = {
            let em_air = fields.get(VAR_AIR_EMISSIVITY.name)?;
            let em_surf = fields.get(VAR_SURFACE_EMISSIVITY.name)?;
            let t_air = fields.get(VAR_AIR_TEMPERATURE.name)?;
            let t_surf = fields.get(VAR_SURFACE_TEMPERATURE.name)?;

            let sigma = self.constants.sigma;
            let c_to_k = self.constants.c_to_k;
            Zip::from(em_air)
                .and(em_surf)
                .and(t_air)
                .and(t_surf)
                .map_collect(|&ea, &es, &ta, &ts| {
                    LongwaveBalance::new(sigma, ea, es, ta + c_to_k, ts + c_to_k).net()
                })
        };
        fields.set(VAR_NET_LONGWAVE.name, q_lw)?;
        debug!("Updated net longwave radiation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use std::f64::consts::PI;

    fn site(hours_from_noon: f64, precipitable_water: f64) -> ShortwaveSite {
        ShortwaveSite {
            latitude: 40.0,
            slope: 0.0,
            aspect: 0.0,
            hours_from_noon,
            precipitable_water,
            dust_attenuation: 0.0,
            albedo: 0.3,
        }
    }

    // ===== Geometry =====

    #[test]
    fn test_sin_solar_elevation_at_noon() {
        // Equinox noon: elevation is the co-latitude
        let lat = 40f64.to_radians();
        let sin_h = sin_solar_elevation(0.0, lat, 0.0);
        assert!((sin_h - 50f64.to_radians().sin()).abs() < 1e-12);

        // Midnight at the equator on the equinox
        assert!((sin_solar_elevation(0.0, 0.0, PI) - -1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cos_incidence_flat_matches_elevation() {
        let delta = -0.3987401339;
        let lat = 40f64.to_radians();
        for omega in [-1.0, -0.2, 0.0, 0.4, 1.2] {
            let flat = cos_incidence(delta, lat, omega, 0.0, 1.3);
            let sin_h = sin_solar_elevation(delta, lat, omega).max(0.0);
            assert!((flat - sin_h).abs() < 1e-12, "omega {}: {} vs {}", omega, flat, sin_h);
        }
    }

    #[test]
    fn test_cos_incidence_slope_facing_the_sun() {
        let delta = -0.3987401339;
        let lat = 40f64.to_radians();
        let slope = 30f64.to_radians();

        let south = cos_incidence(delta, lat, 0.0, slope, PI);
        let north = cos_incidence(delta, lat, 0.0, slope, 0.0);
        let flat = cos_incidence(delta, lat, 0.0, 0.0, 0.0);
        assert!(south > flat && flat > north, "{} {} {}", south, flat, north);

        // A steep pole-facing slope in winter is in its own shadow
        assert_eq!(cos_incidence(delta, lat, 0.0, 80f64.to_radians(), 0.0), 0.0);
    }

    #[test]
    fn test_optical_air_mass() {
        let zenith = optical_air_mass(1.0);
        assert!((zenith - 0.99949393).abs() < 1e-7, "M = {}", zenith);

        let low_sun = optical_air_mass(0.45627346);
        assert!((low_sun - 2.18197463).abs() < 1e-6, "M = {}", low_sun);
    }

    #[test]
    fn test_transmittances() {
        let (tau_a, tau_sa) = atmospheric_transmittances(0.56881745, 2.18197463);
        assert!((tau_a - 0.83364984).abs() < 1e-6, "tau_a = {}", tau_a);
        assert!((tau_sa - 0.73016101).abs() < 1e-6, "tau_sa = {}", tau_sa);
        assert!(tau_sa < tau_a);
    }

    // ===== Shortwave =====

    #[test]
    fn test_clear_sky_shortwave_winter_noon() {
        let sw = clear_sky_shortwave(1367.0, 2.5, &site(0.07283656, 0.56862521));
        assert!((sw.direct - 471.378410).abs() < 1e-4, "K_dir = {}", sw.direct);
        assert!((sw.diffuse - 53.694977).abs() < 1e-4, "K_dif = {}", sw.diffuse);
        assert!((sw.reflected - 13.436976).abs() < 1e-4, "K_ref = {}", sw.reflected);
        assert!((sw.total() - 538.510363).abs() < 1e-4, "Qn_SW = {}", sw.total());

        // Reference run value for the same site
        assert!((sw.total() - 537.4501879).abs() < 1.5, "Qn_SW = {}", sw.total());
    }

    #[test]
    fn test_clear_sky_shortwave_at_night() {
        let sw = clear_sky_shortwave(1367.0, 0.5, &site(-6.94197946, 0.5));
        assert_eq!(sw, ShortwaveComponents::default());
        assert_eq!(sw.total(), 0.0);
    }

    #[test]
    fn test_clear_sky_shortwave_on_slopes() {
        let slope = 30f64.to_radians();
        let north = ShortwaveSite {
            slope,
            aspect: 0.0,
            ..site(0.07283656, 0.5)
        };
        let south = ShortwaveSite { aspect: PI, ..north };

        let q_north = clear_sky_shortwave(1367.0, 2.5, &north);
        let q_south = clear_sky_shortwave(1367.0, 2.5, &south);
        assert_eq!(q_north.direct, 0.0);
        assert!((q_north.total() - 54.193058).abs() < 1e-4, "north-facing {}", q_north.total());
        assert!((q_south.total() - 948.624787).abs() < 1e-4, "south-facing {}", q_south.total());
    }

    #[test]
    fn test_dust_moves_diffuse_to_reflected() {
        let clean = clear_sky_shortwave(1367.0, 2.5, &site(0.0, 0.5));
        let dusty = clear_sky_shortwave(
            1367.0,
            2.5,
            &ShortwaveSite {
                dust_attenuation: 0.05,
                ..site(0.0, 0.5)
            },
        );
        assert_eq!(dusty.direct, clean.direct);
        assert!(dusty.diffuse < clean.diffuse);
        assert!(dusty.reflected > clean.reflected);
        assert!((clean.total() - 540.191952).abs() < 1e-4, "clean {}", clean.total());
        assert!((dusty.total() - 527.698915).abs() < 1e-4, "dusty {}", dusty.total());
    }

    #[test]
    fn test_brighter_ground_receives_more_shortwave() {
        let black = clear_sky_shortwave(1367.0, 2.5, &ShortwaveSite { albedo: 0.0, ..site(0.0, 0.5) });
        let snow = clear_sky_shortwave(1367.0, 2.5, &ShortwaveSite { albedo: 0.9, ..site(0.0, 0.5) });

        assert!(black.reflected.abs() < 1e-9);
        assert_eq!(black.direct, snow.direct);
        assert_eq!(black.diffuse, snow.diffuse);
        assert!((snow.reflected - 41.913062).abs() < 1e-4, "K_ref = {}", snow.reflected);
        assert!(snow.total() > black.total());
    }

    // ===== Longwave =====

    #[test]
    fn test_brutsaert_air_emissivity() {
        let em = SaturationMethod::Brutsaert.air_emissivity(2.6280276, 274.15, 0.7, 0.5);
        assert!((em - 0.90170103).abs() < 1e-7, "em_air = {}", em);

        // Full canopy radiates as a black body
        let covered = SaturationMethod::Brutsaert.air_emissivity(2.6280276, 274.15, 1.0, 0.5);
        assert!(is_close!(covered, 1.0));
    }

    #[test]
    fn test_satterlund_air_emissivity() {
        let em = SaturationMethod::Satterlund.air_emissivity(2.62523034, 274.15, 0.7, 0.5);
        assert!((em - 0.73468296).abs() < 1e-7, "em_air = {}", em);

        // Canopy and cloud factors do not apply
        let bare = SaturationMethod::Satterlund.air_emissivity(2.62523034, 274.15, 0.0, 0.0);
        assert_eq!(em, bare);
    }

    #[test]
    fn test_longwave_balance() {
        let lw = LongwaveBalance::new(5.67e-8, 0.90170103, 0.98, 274.15, 272.15);
        assert!((lw.incoming - 288.800955).abs() < 1e-4, "LW_in = {}", lw.incoming);
        assert!((lw.net() - -21.7943835).abs() < 1e-4, "Qn_LW = {}", lw.net());
    }

    #[test]
    fn test_longwave_black_body_equilibrium() {
        let lw = LongwaveBalance::new(5.67e-8, 1.0, 1.0, 270.0, 270.0);
        assert_eq!(lw.net(), 0.0);
    }
}
