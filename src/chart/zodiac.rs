//! Bodies and signs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::normalize_degrees;

/// A body placed in the chart.
///
/// Declaration order is the traditional weekday order of the navagraha,
/// followed by the outer planets. Maps keyed by `Body` serialize in that
/// order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// The nine grahas of Vedic astrology.
    pub const NAVAGRAHA: [Body; 9] = [
        Body::Sun,
        Body::Moon,
        Body::Mars,
        Body::Mercury,
        Body::Jupiter,
        Body::Venus,
        Body::Saturn,
        Body::Rahu,
        Body::Ketu,
    ];

    pub const OUTER: [Body; 3] = [Body::Uranus, Body::Neptune, Body::Pluto];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sun     => "sun",
            Self::Moon    => "moon",
            Self::Mars    => "mars",
            Self::Mercury => "mercury",
            Self::Jupiter => "jupiter",
            Self::Venus   => "venus",
            Self::Saturn  => "saturn",
            Self::Rahu    => "rahu",
            Self::Ketu    => "ketu",
            Self::Uranus  => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto   => "pluto",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the twelve 30° signs, counted from 0° of the zodiac in use.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn from_longitude(longitude: f64) -> Self {
        Self::from_index((normalize_degrees(longitude) / 30.0) as usize)
    }

    /// Wraps around, so `from_index(12)` is Aries.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Zero-based position, Aries = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Aries, Gemini, Leo and the other signs in odd positions.
    pub fn is_odd(self) -> bool {
        self.index() % 2 == 0
    }

    /// Longitude of the sign's first degree.
    pub fn start(self) -> f64 {
        self.index() as f64 * 30.0
    }

    /// Planetary ruler in the classical scheme.
    pub fn lord(self) -> Body {
        match self {
            Self::Aries | Self::Scorpio       => Body::Mars,
            Self::Taurus | Self::Libra        => Body::Venus,
            Self::Gemini | Self::Virgo        => Body::Mercury,
            Self::Cancer                      => Body::Moon,
            Self::Leo                         => Body::Sun,
            Self::Sagittarius | Self::Pisces  => Body::Jupiter,
            Self::Capricorn | Self::Aquarius  => Body::Saturn,
        }
    }
}
