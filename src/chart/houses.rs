//! Chart angles and house cusps.
//!
//! All functions here work in the tropical frame; the caller passes the
//! ayanamsa as `shift` to move the result into the sidereal zodiac. Whole-sign
//! houses are the one system where the shift has to happen *before* the cusps
//! are laid out, since the sign boundaries differ between the two zodiacs.

use super::error::ChartError;
use super::settings::HouseSystem;
use super::zodiac::Sign;
use super::{angle_delta, normalize_degrees};

const PLACIDUS_TOLERANCE: f64 = 1e-9;
const PLACIDUS_MAX_ITERATIONS: usize = 100;

/// Tropical ascendant and midheaven.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Angles {
    pub ascendant: f64,
    pub midheaven: f64,
}

impl Angles {
    /// `ramc` is the local apparent sidereal time in degrees.
    pub fn new(ramc: f64, obliquity: f64, latitude: f64) -> Self {
        Self {
            ascendant: ascendant(ramc, obliquity, latitude),
            midheaven: midheaven(ramc, obliquity),
        }
    }
}

pub(crate) fn ascendant(ramc: f64, obliquity: f64, latitude: f64) -> f64 {
    let ramc = ramc.to_radians();
    let eps = obliquity.to_radians();
    let phi = latitude.to_radians();
    let y = ramc.cos();
    let x = -(ramc.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_degrees(y.atan2(x).to_degrees())
}

pub(crate) fn midheaven(ramc: f64, obliquity: f64) -> f64 {
    let ramc = ramc.to_radians();
    normalize_degrees(ramc.sin().atan2(ramc.cos() * obliquity.to_radians().cos()).to_degrees())
}

/// Cusps of houses 1 through 12, in the zodiac selected by `shift`.
pub(crate) fn cusps(
    system: HouseSystem,
    angles: Angles,
    ramc: f64,
    obliquity: f64,
    latitude: f64,
    shift: f64,
) -> Result<[f64; 12], ChartError> {
    let ascendant = normalize_degrees(angles.ascendant - shift);
    match system {
        HouseSystem::WholeSign => {
            let first = Sign::from_longitude(ascendant).start();
            Ok(std::array::from_fn(|house| normalize_degrees(first + 30.0 * house as f64)))
        }
        HouseSystem::Equal => {
            Ok(std::array::from_fn(|house| normalize_degrees(ascendant + 30.0 * house as f64)))
        }
        HouseSystem::Placidus => {
            let tropical = placidus(angles, ramc, obliquity, latitude)?;
            Ok(tropical.map(|cusp| normalize_degrees(cusp - shift)))
        }
    }
}

/// House (1..=12) containing `longitude`, given cusps in the same zodiac.
pub(crate) fn house_of(longitude: f64, cusps: &[f64; 12]) -> u8 {
    for (index, &start) in cusps.iter().enumerate() {
        let end = cusps[(index + 1) % 12];
        let span = normalize_degrees(end - start);
        if normalize_degrees(longitude - start) < span {
            return index as u8 + 1;
        }
    }
    1
}

// ── Placidus ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum SemiArc {
    /// Above the horizon, measured from the MC (houses 11 and 12).
    Diurnal,
    /// Below the horizon, measured from the IC (houses 2 and 3).
    Nocturnal,
}

fn placidus(angles: Angles, ramc: f64, obliquity: f64, latitude: f64) -> Result<[f64; 12], ChartError> {
    let c11 = placidus_cusp(ramc, obliquity, latitude, 1.0 / 3.0, SemiArc::Diurnal)?;
    let c12 = placidus_cusp(ramc, obliquity, latitude, 2.0 / 3.0, SemiArc::Diurnal)?;
    let c2 = placidus_cusp(ramc, obliquity, latitude, 2.0 / 3.0, SemiArc::Nocturnal)?;
    let c3 = placidus_cusp(ramc, obliquity, latitude, 1.0 / 3.0, SemiArc::Nocturnal)?;

    let asc = angles.ascendant;
    let mc = angles.midheaven;
    let opposite = |cusp: f64| normalize_degrees(cusp + 180.0);

    Ok([
        asc,
        c2,
        c3,
        opposite(mc),
        opposite(c11),
        opposite(c12),
        opposite(asc),
        opposite(c2),
        opposite(c3),
        mc,
        c11,
        c12,
    ])
}

/// Ecliptic longitude whose right ascension is `ra`.
fn longitude_from_ra(ra: f64, obliquity: f64) -> f64 {
    let ra = ra.to_radians();
    normalize_degrees(ra.sin().atan2(ra.cos() * obliquity.to_radians().cos()).to_degrees())
}

/// Iterates the cusp that trisects the semi-arc of its own degree.
fn placidus_cusp(
    ramc: f64,
    obliquity: f64,
    latitude: f64,
    fraction: f64,
    arc: SemiArc,
) -> Result<f64, ChartError> {
    let eps = obliquity.to_radians();
    let tan_phi = latitude.to_radians().tan();
    let right_ascension = |semi_arc: f64| match arc {
        SemiArc::Diurnal => ramc + fraction * semi_arc,
        SemiArc::Nocturnal => ramc + 180.0 - fraction * semi_arc,
    };

    let mut longitude = longitude_from_ra(right_ascension(90.0), obliquity);
    for _ in 0..PLACIDUS_MAX_ITERATIONS {
        let declination = (eps.sin() * longitude.to_radians().sin()).asin();
        let ratio = tan_phi * declination.tan();
        if ratio.abs() >= 1.0 {
            return Err(ChartError::computation(format!(
                "Placidus houses are undefined at latitude {latitude:.4}°"
            )));
        }
        let ascensional_difference = ratio.asin().to_degrees();
        let semi_arc = match arc {
            SemiArc::Diurnal => 90.0 + ascensional_difference,
            SemiArc::Nocturnal => 90.0 - ascensional_difference,
        };

        let next = longitude_from_ra(right_ascension(semi_arc), obliquity);
        let converged = angle_delta(longitude, next).abs() < PLACIDUS_TOLERANCE;
        longitude = next;
        if converged {
            return Ok(longitude);
        }
    }

    Err(ChartError::computation(format!(
        "Placidus cusp iteration did not converge at latitude {latitude:.4}°"
    )))
}
