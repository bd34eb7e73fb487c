//! Calculation choices that change the shape of a chart.

use serde::{Deserialize, Serialize};

use super::dasha::DashaLevel;
use super::varga::Varga;

/// Reference frame for longitudes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zodiac {
    #[default]
    Sidereal,
    Tropical,
}

/// Sidereal offset model. Ignored for the tropical zodiac.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ayanamsa {
    #[default]
    Lahiri,
    Raman,
    Krishnamurti,
    FaganBradley,
}

impl Ayanamsa {
    /// Mean value at J2000.0, in degrees.
    pub(crate) fn at_j2000(self) -> f64 {
        match self {
            Self::Lahiri       => 23.857_092,
            Self::Raman        => 22.410_791,
            Self::Krishnamurti => 23.760_240,
            Self::FaganBradley => 24.740_300,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    /// Each house is one whole sign, starting with the ascendant's sign.
    #[default]
    WholeSign,
    /// Twelve 30° houses measured from the ascendant degree.
    Equal,
    /// Time-trisected semi-arcs. Undefined inside the polar circles.
    Placidus,
}

/// Which lunar node stands in for Rahu (Ketu is always opposite).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Mean,
    True,
}

/// Per-chart calculation settings.
///
/// Every field has a default, so `{}` deserializes to the traditional
/// Vedic configuration: sidereal Lahiri, whole-sign houses, mean node,
/// dashas to antardasha depth and the navamsa.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ChartSettings {
    pub zodiac: Zodiac,
    pub ayanamsa: Ayanamsa,
    pub house_system: HouseSystem,
    pub node_type: NodeType,
    pub dasha_depth: DashaLevel,
    pub vargas: Vec<Varga>,
    pub outer_planets: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            zodiac: Zodiac::default(),
            ayanamsa: Ayanamsa::default(),
            house_system: HouseSystem::default(),
            node_type: NodeType::default(),
            dasha_depth: DashaLevel::default(),
            vargas: vec![Varga::D9],
            outer_planets: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let settings: ChartSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ChartSettings::default());
        assert_eq!(settings.vargas, vec![Varga::D9]);
    }

    #[test]
    fn fields_use_camel_case_and_snake_case_values() {
        let settings: ChartSettings = serde_json::from_str(
            r#"{"zodiac":"tropical","houseSystem":"placidus","ayanamsa":"fagan_bradley",
                "nodeType":"true","dashaDepth":"mahadasha","vargas":["d9","d10"],"outerPlanets":true}"#,
        )
        .unwrap();
        assert_eq!(settings.zodiac, Zodiac::Tropical);
        assert_eq!(settings.house_system, HouseSystem::Placidus);
        assert_eq!(settings.ayanamsa, Ayanamsa::FaganBradley);
        assert_eq!(settings.node_type, NodeType::True);
        assert_eq!(settings.dasha_depth, DashaLevel::Mahadasha);
        assert_eq!(settings.vargas, vec![Varga::D9, Varga::D10]);
        assert!(settings.outer_planets);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<ChartSettings>(r#"{"houses":"koch"}"#);
        assert!(result.is_err());
    }
}
