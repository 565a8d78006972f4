//! Solar geometry stage
//!
//! Julian day of the current local time and, per node, the offset of true solar noon
//! from clock noon. Declination and the eccentricity correction use the Spencer (1971)
//! Fourier series in the day angle $\Gamma = 2\pi \cdot JD / 365$ with a zero-based
//! julian day.

use super::Meteorology;
use chrono::{Datelike, NaiveDateTime, Timelike};
use ndarray::{Array1, Zip};
use snowmet_core::errors::SnowMetResult;
use snowmet_core::field::FieldStore;
use snowmet_core::standard_variables::VAR_LONGITUDE;
use std::f64::consts::PI;
use tracing::debug;

/// Zero-based fractional day of year of `datetime`.
///
/// Noon on 1 January is 0.5.
pub fn julian_day(datetime: &NaiveDateTime) -> f64 {
    let seconds = datetime.num_seconds_from_midnight() as f64
        + datetime.nanosecond() as f64 * 1e-9;
    datetime.ordinal0() as f64 + seconds / 86_400.0
}

/// Day angle (radians)
pub fn day_angle(julian_day: f64) -> f64 {
    2.0 * PI * julian_day / 365.0
}

/// Solar declination (radians)
pub fn declination(julian_day: f64) -> f64 {
    let g = day_angle(julian_day);
    0.006918 - 0.399912 * g.cos() + 0.070257 * g.sin() - 0.006758 * (2.0 * g).cos()
        + 0.000907 * (2.0 * g).sin()
        - 0.002697 * (3.0 * g).cos()
        + 0.00148 * (3.0 * g).sin()
}

/// Correction of the solar constant for the Earth-Sun distance
pub fn eccentricity_correction(julian_day: f64) -> f64 {
    let g = day_angle(julian_day);
    1.000110 + 0.034221 * g.cos() + 0.001280 * g.sin() + 0.000719 * (2.0 * g).cos()
        + 0.000077 * (2.0 * g).sin()
}

/// Equation of time (hours): apparent minus mean solar time
///
/// $B = 2\pi (JD - 81) / 365$, $E = 9.87 \sin 2B - 7.53 \cos B - 1.5 \sin B$ minutes
pub fn equation_of_time(julian_day: f64) -> f64 {
    let b = 2.0 * PI * (julian_day - 81.0) / 365.0;
    (9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()) / 60.0
}

/// Hours to add to clock time to get local solar time at a node.
///
/// $-EoT + (\lambda / 15 - GMT)$. Longitude is east positive and `gmt_offset` is local
/// time minus GMT, so a node on its zone meridian only sees the equation of time.
pub fn true_solar_noon_offset(julian_day: f64, longitude: f64, gmt_offset: f64) -> f64 {
    -equation_of_time(julian_day) + (longitude / 15.0 - gmt_offset)
}

/// Hours after true solar noon at the clock time carried by `julian_day`
pub fn hours_from_solar_noon(julian_day: f64, tsn_offset: f64, hours_per_day: f64) -> f64 {
    julian_day.fract() * hours_per_day - hours_per_day / 2.0 + tsn_offset
}

/// Hour angle (radians) for a time in hours after true solar noon
pub fn hour_angle(hours_from_noon: f64) -> f64 {
    PI / 12.0 * hours_from_noon
}

impl Meteorology {
    /// Advance the clock by `dt` seconds and refresh the cached solar timing.
    ///
    /// The julian day and true-solar-noon offsets are kept on the component rather
    /// than in the field store. Call with `dt = 0` to recompute them for the current
    /// time, e.g. after longitudes change. On error nothing is advanced.
    pub fn update_julian_day(&mut self, fields: &dyn FieldStore, dt: f64) -> SnowMetResult<()> {
        let longitude = fields.get(VAR_LONGITUDE.name)?;
        let gmt_offset: Array1<f64> = self
            .gmt_offset
            .broadcast("GMT offset", fields.number_of_nodes())?;

        let elapsed = self.elapsed + dt;
        let now = self.datetime_after(elapsed)?;
        let jd = julian_day(&now);

        self.tsn_offset = Zip::from(longitude)
            .and(&gmt_offset)
            .map_collect(|&lon, &gmt| true_solar_noon_offset(jd, lon, gmt));
        self.julian_day = jd;
        self.elapsed = elapsed;

        debug!(julian_day = jd, elapsed, %now, "Updated julian day");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    // ===== Julian Day =====

    #[test]
    fn test_julian_day_is_zero_based() {
        assert_eq!(julian_day(&datetime(2023, 1, 1, 0)), 0.0);
        assert_eq!(julian_day(&datetime(2023, 1, 1, 12)), 0.5);
        assert_eq!(julian_day(&datetime(2023, 1, 3, 12)), 2.5);
        assert_eq!(julian_day(&datetime(2023, 12, 31, 18)), 364.75);
        assert_eq!(julian_day(&datetime(2024, 12, 31, 0)), 365.0);
    }

    // ===== Orbital Terms =====

    #[test]
    fn test_declination_extremes() {
        let winter = declination(354.0).to_degrees();
        let summer = declination(171.0).to_degrees();
        assert!((winter - -23.44).abs() < 0.1, "winter declination {}", winter);
        assert!((summer - 23.44).abs() < 0.1, "summer declination {}", summer);
        assert!(declination(79.0).abs().to_degrees() < 0.5);
    }

    #[test]
    fn test_eccentricity_correction_peaks_at_perihelion() {
        let january = eccentricity_correction(2.0);
        let july = eccentricity_correction(184.0);
        assert!(january > 1.03 && january < 1.04, "E0 {}", january);
        assert!(july > 0.96 && july < 0.97, "E0 {}", july);
    }

    #[test]
    fn test_equation_of_time_known_values() {
        // Early November: sundial ahead of the clock by ~16 minutes
        let november = equation_of_time(306.0) * 60.0;
        assert!((november - 16.4).abs() < 0.5, "EoT {} min", november);
        // Mid February: sundial behind by ~14 minutes
        let february = equation_of_time(42.0) * 60.0;
        assert!((february - -14.2).abs() < 0.5, "EoT {} min", february);
    }

    // ===== True Solar Noon =====

    #[test]
    fn test_tsn_offset_per_time_zone() {
        let offsets: Vec<f64> = [(-75.0, -5.0), (-95.0, -6.0), (-105.0, -7.0), (-125.0, -8.0)]
            .iter()
            .map(|&(lon, gmt)| true_solar_noon_offset(2.5, lon, gmt))
            .collect();

        let expected = [0.07271961, -0.26061373, 0.07271961, -0.26061373];
        for (got, want) in offsets.iter().zip(expected) {
            assert!((got - want).abs() < 2e-4, "TSN offset {} vs {}", got, want);
        }
        // 5° west of the zone meridian puts solar noon 20 minutes later
        assert!((offsets[0] - offsets[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(offsets[0], offsets[2]);
    }

    #[test]
    fn test_tsn_offset_shifts_with_gmt_offset() {
        let local = true_solar_noon_offset(0.5, -105.0, -7.0);
        let gmt = true_solar_noon_offset(0.5, -105.0, 0.0);
        assert!((local - 0.05802054).abs() < 1e-7, "{}", local);
        assert!((gmt - local - -7.0).abs() < 1e-12);
    }

    #[test]
    fn test_hours_from_solar_noon() {
        assert_eq!(hours_from_solar_noon(2.5, 0.0, 24.0), 0.0);
        assert!((hours_from_solar_noon(2.75, 0.25, 24.0) - 6.25).abs() < 1e-12);
        // GMT noon is local dawn seven zones west
        assert!((hours_from_solar_noon(0.5, -6.94197946, 24.0) - -6.94197946).abs() < 1e-12);
    }

    #[test]
    fn test_hour_angle() {
        assert_eq!(hour_angle(0.0), 0.0);
        assert!((hour_angle(6.0) - PI / 2.0).abs() < 1e-12);
        assert!((hour_angle(-12.0) + PI).abs() < 1e-12);
    }
}
