//! Time scales: Julian day, ΔT, and sidereal time.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use super::error::ChartError;
use super::normalize_degrees;

/// Julian day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000: f64 = 2_451_545.0;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// First and one-past-last year covered by the planetary elements.
const FIRST_YEAR: i32 = 1800;
const END_YEAR: i32 = 2051;

/// A moment on both the civil (UT) and dynamical (TT) scales.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AstroTime {
    pub jd_ut: f64,
    pub jd_tt: f64,
    pub delta_t: f64,
}

impl AstroTime {
    pub fn from_utc(utc: DateTime<Utc>) -> Result<Self, ChartError> {
        if !in_ephemeris_range(utc) {
            return Err(ChartError::computation(format!(
                "no ephemeris data for {utc}: supported range is {FIRST_YEAR}-01-01 to {}-12-31",
                END_YEAR - 1,
            )));
        }

        let jd_ut = julian_day(utc);
        let year = utc.year() as f64 + (utc.month() as f64 - 0.5) / 12.0;
        let delta_t = delta_t_seconds(year);

        Ok(Self { jd_ut, jd_tt: jd_ut + delta_t / 86_400.0, delta_t })
    }

    /// Julian centuries of TT since J2000.
    pub fn centuries(&self) -> f64 {
        (self.jd_tt - J2000) / DAYS_PER_CENTURY
    }
}

fn in_ephemeris_range(utc: DateTime<Utc>) -> bool {
    let first = Utc.with_ymd_and_hms(FIRST_YEAR, 1, 1, 0, 0, 0).single();
    let end = Utc.with_ymd_and_hms(END_YEAR, 1, 1, 0, 0, 0).single();
    matches!((first, end), (Some(first), Some(end)) if utc >= first && utc < end)
}

/// Julian day number of a UTC instant, with the fraction of day.
pub fn julian_day(utc: DateTime<Utc>) -> f64 {
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / 86_400.0
}

/// Julian centuries since J2000 for a Julian day.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_CENTURY
}

/// TT − UT in seconds (Espenak & Meeus polynomial fits, 1800–2050).
///
/// `year` is a decimal year, `y = year + (month − 0.5) / 12`.
pub fn delta_t_seconds(year: f64) -> f64 {
    match year {
        y if y < 1860.0 => {
            let t = y - 1800.0;
            13.72 - 0.332447 * t + 0.0068612 * t.powi(2) + 0.0041116 * t.powi(3)
                - 0.00037436 * t.powi(4)
                + 0.0000121272 * t.powi(5)
                - 0.0000001699 * t.powi(6)
                + 0.000000000875 * t.powi(7)
        }
        y if y < 1900.0 => {
            let t = y - 1860.0;
            7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
                - 0.0004473624 * t.powi(4)
                + t.powi(5) / 233_174.0
        }
        y if y < 1920.0 => {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4)
        }
        y if y < 1941.0 => {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        }
        y if y < 1961.0 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if y < 1986.0 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if y < 2005.0 => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t.powi(2)
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        }
        y => {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t.powi(2)
        }
    }
}

/// Greenwich mean sidereal time in degrees for a UT Julian day.
pub fn mean_sidereal_time(jd_ut: f64) -> f64 {
    let t = centuries_since_j2000(jd_ut);
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd_ut - J2000) + 0.000_387_933 * t * t
            - t.powi(3) / 38_710_000.0,
    )
}
