//! The chart engine: birth input in, fully populated chart out.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dasha::Vimshottari;
use super::ephemeris;
use super::error::ChartError;
use super::houses::{self, Angles};
use super::input::BirthInput;
use super::nakshatra::{NakshatraPlacement, nakshatra_for};
use super::normalize_degrees;
use super::settings::{Ayanamsa, ChartSettings, HouseSystem, Zodiac};
use super::time::{AstroTime, mean_sidereal_time};
use super::varga::{Varga, VargaChart};
use super::zodiac::{Body, Sign};

/// Computes charts. Cheap to clone and safe to share across threads; holds
/// nothing but the settings applied when a request brings none.
#[derive(Clone, Debug, Default)]
pub struct ChartEngine {
    defaults: ChartSettings,
}

impl ChartEngine {
    pub fn new(defaults: ChartSettings) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ChartSettings {
        &self.defaults
    }

    /// Calculates with the engine's default settings.
    pub fn calculate(&self, input: &BirthInput) -> Result<ChartResult, ChartError> {
        self.calculate_with(input, &self.defaults)
    }

    pub fn calculate_with(
        &self,
        input: &BirthInput,
        settings: &ChartSettings,
    ) -> Result<ChartResult, ChartError> {
        let utc = input.utc()?;
        let time = AstroTime::from_utc(utc)?;
        let t = time.centuries();
        let latitude = input.location.latitude();
        let longitude = input.location.longitude();

        // nakshatras and dashas are sidereal whatever zodiac the chart uses
        let sidereal_shift = ephemeris::ayanamsa(settings.ayanamsa, t);
        let ayanamsa = match settings.zodiac {
            Zodiac::Sidereal => Some(AyanamsaValue { kind: settings.ayanamsa, degrees: sidereal_shift }),
            Zodiac::Tropical => None,
        };
        let shift = ayanamsa.as_ref().map_or(0.0, |a| a.degrees);
        let sidereal = |tropical: f64| normalize_degrees(tropical - sidereal_shift);

        // local apparent sidereal time
        let obliquity = ephemeris::true_obliquity(t);
        let equation_of_equinoxes =
            ephemeris::nutation(t).longitude * obliquity.to_radians().cos();
        let ramc = normalize_degrees(mean_sidereal_time(time.jd_ut) + equation_of_equinoxes + longitude);

        let angles = Angles::new(ramc, obliquity, latitude);
        let cusps = houses::cusps(settings.house_system, angles, ramc, obliquity, latitude, shift)?;

        let mut bodies = BTreeMap::new();
        let mut sidereal_moon = None;
        let selected = Body::NAVAGRAHA
            .into_iter()
            .chain(settings.outer_planets.then_some(Body::OUTER).into_iter().flatten());
        for body in selected {
            let state = ephemeris::body_state(body, t, settings.node_type)?;
            let longitude = normalize_degrees(state.longitude - shift);
            let sign = Sign::from_longitude(longitude);
            bodies.insert(body, BodyPosition {
                longitude,
                latitude: state.latitude,
                speed: state.speed,
                retrograde: state.speed < 0.0,
                sign,
                degree_in_sign: longitude - sign.start(),
                house: houses::house_of(longitude, &cusps),
                nakshatra: nakshatra_for(sidereal(state.longitude)),
            });
            if body == Body::Moon {
                sidereal_moon = Some(sidereal(state.longitude));
            }
        }

        let ascendant = AnglePlacement::new(
            normalize_degrees(angles.ascendant - shift),
            sidereal(angles.ascendant),
        );
        let midheaven = AnglePlacement::new(
            normalize_degrees(angles.midheaven - shift),
            sidereal(angles.midheaven),
        );

        let houses = cusps
            .iter()
            .enumerate()
            .map(|(index, &cusp)| {
                (index as u8 + 1, HouseCusp { longitude: cusp, sign: Sign::from_longitude(cusp) })
            })
            .collect();

        let vargas = settings
            .vargas
            .iter()
            .map(|&varga| {
                let longitudes = bodies.iter().map(|(&body, p)| (body, p.longitude));
                (varga, VargaChart::build(varga, ascendant.longitude, longitudes))
            })
            .collect();

        let moon = sidereal_moon.ok_or_else(|| ChartError::computation("Moon position missing"))?;
        let dasha = Vimshottari::compute(utc, moon, settings.dasha_depth);

        Ok(ChartResult {
            moment: Moment {
                utc,
                julian_day_ut: time.jd_ut,
                julian_day_tt: time.jd_tt,
                delta_t_seconds: time.delta_t,
                latitude,
                longitude,
            },
            zodiac: settings.zodiac,
            ayanamsa,
            house_system: settings.house_system,
            ascendant,
            midheaven,
            bodies,
            houses,
            vargas,
            dasha,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResult {
    pub moment: Moment,
    pub zodiac: Zodiac,
    /// Absent for tropical charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ayanamsa: Option<AyanamsaValue>,
    pub house_system: HouseSystem,
    pub ascendant: AnglePlacement,
    pub midheaven: AnglePlacement,
    pub bodies: BTreeMap<Body, BodyPosition>,
    /// Cusps keyed by house number, 1 through 12.
    pub houses: BTreeMap<u8, HouseCusp>,
    pub vargas: BTreeMap<Varga, VargaChart>,
    pub dasha: Vimshottari,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Moment {
    pub utc: DateTime<Utc>,
    pub julian_day_ut: f64,
    pub julian_day_tt: f64,
    pub delta_t_seconds: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AyanamsaValue {
    pub kind: Ayanamsa,
    pub degrees: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnglePlacement {
    pub longitude: f64,
    pub sign: Sign,
    pub degree_in_sign: f64,
    pub nakshatra: NakshatraPlacement,
}

impl AnglePlacement {
    fn new(longitude: f64, sidereal_longitude: f64) -> Self {
        let sign = Sign::from_longitude(longitude);
        Self {
            longitude,
            sign,
            degree_in_sign: longitude - sign.start(),
            nakshatra: nakshatra_for(sidereal_longitude),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPosition {
    pub longitude: f64,
    pub latitude: f64,
    /// Degrees per day.
    pub speed: f64,
    pub retrograde: bool,
    pub sign: Sign,
    pub degree_in_sign: f64,
    pub house: u8,
    pub nakshatra: NakshatraPlacement,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HouseCusp {
    pub longitude: f64,
    pub sign: Sign,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::angle_delta;
    use crate::chart::dasha::DashaLevel;

    fn delhi() -> BirthInput {
        BirthInput::parse("1990-05-17", "14:30", 28.6139, 77.2090, "Asia/Kolkata").unwrap()
    }

    #[test]
    fn default_chart_is_sidereal_whole_sign() {
        let chart = ChartEngine::default().calculate(&delhi()).unwrap();

        assert_eq!(chart.zodiac, Zodiac::Sidereal);
        assert_eq!(chart.house_system, HouseSystem::WholeSign);
        let ayanamsa = chart.ayanamsa.as_ref().unwrap();
        assert!((ayanamsa.degrees - 23.72).abs() < 0.05);

        assert_eq!(chart.bodies.len(), 9);
        assert_eq!(chart.houses.len(), 12);
        assert_eq!(chart.houses[&1].sign, chart.ascendant.sign);
        assert!(chart.vargas.contains_key(&Varga::D9));
        assert_eq!(chart.dasha.depth, DashaLevel::Antardasha);
    }

    #[test]
    fn sun_in_sidereal_taurus_in_mid_may() {
        let chart = ChartEngine::default().calculate(&delhi()).unwrap();
        let sun = &chart.bodies[&Body::Sun];
        assert_eq!(sun.sign, Sign::Taurus);
        assert!(!sun.retrograde);
        assert!((sun.speed - 0.96).abs() < 0.05);
    }

    #[test]
    fn tropical_charts_carry_no_ayanamsa() {
        let settings = ChartSettings { zodiac: Zodiac::Tropical, ..ChartSettings::default() };
        let engine = ChartEngine::default();
        let tropical = engine.calculate_with(&delhi(), &settings).unwrap();
        let sidereal = engine.calculate(&delhi()).unwrap();

        assert!(tropical.ayanamsa.is_none());
        let shift = sidereal.ayanamsa.unwrap().degrees;
        let sun_gap = angle_delta(sidereal.bodies[&Body::Sun].longitude, tropical.bodies[&Body::Sun].longitude);
        assert!((sun_gap - shift).abs() < 1e-9);
    }

    #[test]
    fn longitudes_stay_in_range_and_nodes_oppose() {
        let settings = ChartSettings { outer_planets: true, ..ChartSettings::default() };
        let chart = ChartEngine::default().calculate_with(&delhi(), &settings).unwrap();

        assert_eq!(chart.bodies.len(), 12);
        for (body, position) in &chart.bodies {
            assert!((0.0..360.0).contains(&position.longitude), "{body}");
            assert!((1..=12).contains(&position.house), "{body}");
            assert!((0.0..30.0).contains(&position.degree_in_sign), "{body}");
        }
        let rahu = chart.bodies[&Body::Rahu].longitude;
        let ketu = chart.bodies[&Body::Ketu].longitude;
        assert!((angle_delta(rahu, ketu).abs() - 180.0).abs() < 1e-9);
        assert!(chart.bodies[&Body::Rahu].retrograde);
    }

    #[test]
    fn nakshatras_and_dashas_follow_the_sidereal_moon_in_tropical_charts() {
        let settings = ChartSettings { zodiac: Zodiac::Tropical, ..ChartSettings::default() };
        let engine = ChartEngine::default();
        let tropical = engine.calculate_with(&delhi(), &settings).unwrap();
        let sidereal = engine.calculate(&delhi()).unwrap();

        assert_eq!(tropical.dasha.birth_lord, sidereal.dasha.birth_lord);
        assert!((tropical.dasha.balance_years - sidereal.dasha.balance_years).abs() < 1e-9);
        for (body, position) in &sidereal.bodies {
            assert_eq!(tropical.bodies[body].nakshatra, position.nakshatra, "{body}");
        }
        assert_eq!(tropical.ascendant.nakshatra, sidereal.ascendant.nakshatra);
    }

    #[test]
    fn every_angle_of_a_placidus_chart_stays_in_range() {
        let settings = ChartSettings {
            house_system: HouseSystem::Placidus,
            outer_planets: true,
            vargas: vec![Varga::D1, Varga::D2, Varga::D3, Varga::D9, Varga::D10, Varga::D12],
            ..ChartSettings::default()
        };
        let chart = ChartEngine::default().calculate_with(&delhi(), &settings).unwrap();
        let in_range = |longitude: f64| (0.0..360.0).contains(&longitude);

        assert!(in_range(chart.ascendant.longitude));
        assert!(in_range(chart.midheaven.longitude));
        for (number, cusp) in &chart.houses {
            assert!(in_range(cusp.longitude), "house {number}: {}", cusp.longitude);
        }
        for (varga, varga_chart) in &chart.vargas {
            assert!(in_range(varga_chart.ascendant.longitude), "{varga:?} ascendant");
            for (body, placement) in &varga_chart.bodies {
                assert!(in_range(placement.longitude), "{varga:?} {body}");
            }
        }
    }

    #[test]
    fn calculation_is_deterministic() {
        let engine = ChartEngine::default();
        let settings = ChartSettings {
            house_system: HouseSystem::Placidus,
            vargas: vec![Varga::D1, Varga::D9, Varga::D10],
            ..ChartSettings::default()
        };
        let first = engine.calculate_with(&delhi(), &settings).unwrap();
        let second = engine.calculate_with(&delhi(), &settings).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn rashi_varga_matches_the_birth_chart() {
        let settings = ChartSettings { vargas: vec![Varga::D1], ..ChartSettings::default() };
        let chart = ChartEngine::default().calculate_with(&delhi(), &settings).unwrap();
        let rashi = &chart.vargas[&Varga::D1];
        for (body, position) in &chart.bodies {
            assert_eq!(rashi.bodies[body].sign, position.sign);
        }
        assert_eq!(rashi.ascendant.sign, chart.ascendant.sign);
    }

    #[test]
    fn dates_outside_the_ephemeris_fail_to_compute() {
        let input = BirthInput::parse("1750-01-01", "12:00", 0.0, 0.0, "Z").unwrap();
        let err = ChartEngine::default().calculate(&input).unwrap_err();
        assert!(matches!(err, ChartError::Computation(_)));
    }

    #[test]
    fn placidus_near_the_pole_fails_to_compute() {
        let input = BirthInput::parse("2000-06-21", "12:00", 89.5, 0.0, "Z").unwrap();
        let settings = ChartSettings { house_system: HouseSystem::Placidus, ..ChartSettings::default() };
        let err = ChartEngine::default().calculate_with(&input, &settings).unwrap_err();
        assert!(matches!(err, ChartError::Computation(_)));

        // whole-sign houses are fine at the same place
        assert!(ChartEngine::default().calculate(&input).is_ok());
    }

    #[test]
    fn ambiguous_local_time_is_invalid_input() {
        let input = BirthInput::parse("2021-11-07", "01:30", 40.7, -74.0, "America/New_York").unwrap();
        let err = ChartEngine::default().calculate(&input).unwrap_err();
        assert!(matches!(err, ChartError::InvalidInput { field: "time", .. }));
    }
}
