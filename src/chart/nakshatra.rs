//! The 27 lunar mansions.
//!
//! Each nakshatra spans 13°20′ of the sidereal zodiac and is split into four
//! padas of 3°20′. The lord of the Moon's nakshatra seeds the Vimshottari
//! dasha sequence.

use serde::Serialize;

use super::normalize_degrees;
use super::zodiac::Body;

pub const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;
pub const PADA_SPAN: f64 = NAKSHATRA_SPAN / 4.0;

// (slug, display name, lord)
const NAKSHATRAS: [(&str, &str, Body); 27] = [
    ("ashwini", "Ashwini", Body::Ketu),
    ("bharani", "Bharani", Body::Venus),
    ("krittika", "Krittika", Body::Sun),
    ("rohini", "Rohini", Body::Moon),
    ("mrigashira", "Mrigashira", Body::Mars),
    ("ardra", "Ardra", Body::Rahu),
    ("punarvasu", "Punarvasu", Body::Jupiter),
    ("pushya", "Pushya", Body::Saturn),
    ("ashlesha", "Ashlesha", Body::Mercury),
    ("magha", "Magha", Body::Ketu),
    ("purva_phalguni", "Purva Phalguni", Body::Venus),
    ("uttara_phalguni", "Uttara Phalguni", Body::Sun),
    ("hasta", "Hasta", Body::Moon),
    ("chitra", "Chitra", Body::Mars),
    ("swati", "Swati", Body::Rahu),
    ("vishakha", "Vishakha", Body::Jupiter),
    ("anuradha", "Anuradha", Body::Saturn),
    ("jyeshtha", "Jyeshtha", Body::Mercury),
    ("mula", "Mula", Body::Ketu),
    ("purva_ashadha", "Purva Ashadha", Body::Venus),
    ("uttara_ashadha", "Uttara Ashadha", Body::Sun),
    ("shravana", "Shravana", Body::Moon),
    ("dhanishta", "Dhanishta", Body::Mars),
    ("shatabhisha", "Shatabhisha", Body::Rahu),
    ("purva_bhadrapada", "Purva Bhadrapada", Body::Jupiter),
    ("uttara_bhadrapada", "Uttara Bhadrapada", Body::Saturn),
    ("revati", "Revati", Body::Mercury),
];

/// Where a longitude falls among the nakshatras.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NakshatraPlacement {
    /// 1-based, Ashwini = 1.
    pub number: u8,
    pub id: &'static str,
    pub name: &'static str,
    pub lord: Body,
    /// 1..=4
    pub pada: u8,
    /// Fraction of the nakshatra already traversed, in `[0, 1)`.
    pub progress: f64,
}

pub fn nakshatra_for(longitude: f64) -> NakshatraPlacement {
    let longitude = normalize_degrees(longitude);
    let index = ((longitude / NAKSHATRA_SPAN) as usize).min(26);
    let (id, name, lord) = NAKSHATRAS[index];

    let offset = (longitude - index as f64 * NAKSHATRA_SPAN).max(0.0);
    let pada = ((offset / PADA_SPAN) as u8).min(3) + 1;

    NakshatraPlacement {
        number: index as u8 + 1,
        id,
        name,
        lord,
        pada,
        progress: (offset / NAKSHATRA_SPAN).min(1.0 - f64::EPSILON),
    }
}
