//! Divisional charts (vargas).
//!
//! A varga divides every sign into `n` equal parts and maps each part onto a
//! sign of its own. The starting sign of the mapping depends on the varga and
//! on the quality of the sign being divided; the rules below are the
//! Parashari ones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::normalize_degrees;
use super::zodiac::{Body, Sign};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Varga {
    /// Rashi, the birth chart itself.
    D1,
    /// Hora: wealth.
    D2,
    /// Drekkana: siblings.
    D3,
    /// Navamsa: marriage and dharma.
    D9,
    /// Dasamsa: career.
    D10,
    /// Dwadasamsa: parents.
    D12,
}

impl Varga {
    pub fn division(self) -> u32 {
        match self {
            Self::D1  => 1,
            Self::D2  => 2,
            Self::D3  => 3,
            Self::D9  => 9,
            Self::D10 => 10,
            Self::D12 => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::D1  => "Rashi",
            Self::D2  => "Hora",
            Self::D3  => "Drekkana",
            Self::D9  => "Navamsa",
            Self::D10 => "Dasamsa",
            Self::D12 => "Dwadasamsa",
        }
    }

    /// Longitude of `longitude` projected into this divisional chart.
    pub fn project(self, longitude: f64) -> f64 {
        let longitude = normalize_degrees(longitude);
        let sign = Sign::from_longitude(longitude);
        let within = longitude - sign.start();
        let division = f64::from(self.division());
        let segment = 30.0 / division;
        let part = ((within / segment) as usize).min(self.division() as usize - 1);
        let remainder = within - part as f64 * segment;

        let target = match self {
            Self::D1 => sign,
            Self::D2 => {
                let first_half_sun = sign.is_odd();
                if (part == 0) == first_half_sun { Sign::Leo } else { Sign::Cancer }
            }
            // 1st, 5th and 9th from the sign
            Self::D3 => Sign::from_index(sign.index() + part * 4),
            // movable signs count from themselves, fixed from the 9th, dual
            // from the 5th; the cycle is continuous around the zodiac
            Self::D9 => Sign::from_index(sign.index() * 9 + part),
            Self::D10 => {
                let start = if sign.is_odd() { sign.index() } else { sign.index() + 8 };
                Sign::from_index(start + part)
            }
            Self::D12 => Sign::from_index(sign.index() + part),
        };

        normalize_degrees(target.start() + remainder * division)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VargaPlacement {
    pub sign: Sign,
    pub longitude: f64,
}

impl VargaPlacement {
    fn new(varga: Varga, longitude: f64) -> Self {
        let longitude = varga.project(longitude);
        Self { sign: Sign::from_longitude(longitude), longitude }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VargaChart {
    pub label: &'static str,
    pub ascendant: VargaPlacement,
    pub bodies: BTreeMap<Body, VargaPlacement>,
}

impl VargaChart {
    pub(crate) fn build(
        varga: Varga,
        ascendant: f64,
        bodies: impl IntoIterator<Item = (Body, f64)>,
    ) -> Self {
        Self {
            label: varga.label(),
            ascendant: VargaPlacement::new(varga, ascendant),
            bodies: bodies
                .into_iter()
                .map(|(body, longitude)| (body, VargaPlacement::new(varga, longitude)))
                .collect(),
        }
    }
}
