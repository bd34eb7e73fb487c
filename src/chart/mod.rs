//! Birth-chart calculation.
//!
//! Everything under this module is pure: a [`BirthInput`] plus a set of
//! [`ChartSettings`] always produces the same [`ChartResult`]. There are no
//! ephemeris files to load and no caches to warm; positions come from
//! analytic series evaluated on demand.
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveTime};
//! use dashagpt::chart::{BirthInput, ChartEngine, Location};
//!
//! let input = BirthInput::new(
//!     NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
//!     NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
//!     Location::new(28.6139, 77.2090).unwrap(),
//!     "Asia/Kolkata".parse().unwrap(),
//! );
//! let chart = ChartEngine::default().calculate(&input).unwrap();
//! assert_eq!(chart.bodies.len(), 9);
//! ```

mod dasha;
mod engine;
mod ephemeris;
mod error;
mod houses;
mod input;
mod nakshatra;
mod settings;
mod time;
mod varga;
mod zodiac;

pub use dasha::{DashaLevel, DashaPeriod, Vimshottari};
pub use engine::{
    AnglePlacement, AyanamsaValue, BodyPosition, ChartEngine, ChartResult, HouseCusp, Moment,
};
pub use error::ChartError;
pub use input::{BirthInput, Location, TimeZoneSpec};
pub use nakshatra::{NakshatraPlacement, nakshatra_for};
pub use settings::{Ayanamsa, ChartSettings, HouseSystem, NodeType, Zodiac};
pub use varga::{Varga, VargaChart, VargaPlacement};
pub use zodiac::{Body, Sign};

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(value: f64) -> f64 {
    let normalized = value.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Shortest signed difference `to - from`, in `(-180, 180]`.
pub(crate) fn angle_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_into_range() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn angle_delta_takes_the_short_way_round() {
        assert_eq!(angle_delta(350.0, 10.0), 20.0);
        assert_eq!(angle_delta(10.0, 350.0), -20.0);
        assert_eq!(angle_delta(0.0, 180.0), 180.0);
    }
}
