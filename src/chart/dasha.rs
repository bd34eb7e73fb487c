//! Vimshottari dasha.
//!
//! A 120-year cycle of nine planetary periods. The cycle is entered at the
//! lord of the Moon's natal nakshatra, with that first period already
//! partly spent in proportion to how far the Moon has moved through the
//! nakshatra. Each period subdivides into the same nine lords, starting from
//! its own, with lengths proportional to their share of the 120 years.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::nakshatra::nakshatra_for;
use super::zodiac::Body;

pub const VIMSHOTTARI_YEARS: f64 = 120.0;
/// Days in a dasha year.
pub const YEAR_DAYS: f64 = 365.25;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const SEQUENCE: [(Body, f64); 9] = [
    (Body::Ketu, 7.0),
    (Body::Venus, 20.0),
    (Body::Sun, 6.0),
    (Body::Moon, 10.0),
    (Body::Mars, 7.0),
    (Body::Rahu, 18.0),
    (Body::Jupiter, 16.0),
    (Body::Saturn, 19.0),
    (Body::Mercury, 17.0),
];

#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashaLevel {
    Mahadasha,
    #[default]
    Antardasha,
    Pratyantardasha,
}

impl DashaLevel {
    fn next(self) -> Option<Self> {
        match self {
            Self::Mahadasha       => Some(Self::Antardasha),
            Self::Antardasha      => Some(Self::Pratyantardasha),
            Self::Pratyantardasha => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashaPeriod {
    pub lord: Body,
    pub level: DashaLevel,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub years: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DashaPeriod>,
}

impl DashaPeriod {
    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vimshottari {
    pub depth: DashaLevel,
    /// Lord of the Moon's nakshatra; its mahadasha is running at birth.
    pub birth_lord: Body,
    /// Years of the birth mahadasha still to run at birth.
    pub balance_years: f64,
    /// The nine mahadashas. The first one starts before birth.
    pub periods: Vec<DashaPeriod>,
}

impl Vimshottari {
    pub(crate) fn compute(birth: DateTime<Utc>, moon_longitude: f64, depth: DashaLevel) -> Self {
        let nakshatra = nakshatra_for(moon_longitude);
        let first = sequence_index(nakshatra.lord);
        let (_, first_years) = SEQUENCE[first];
        let elapsed = first_years * nakshatra.progress;
        let anchor = shift(birth, -elapsed);

        let mut offset = 0.0;
        let periods = (0..SEQUENCE.len())
            .map(|step| {
                let (lord, years) = SEQUENCE[(first + step) % SEQUENCE.len()];
                let start = shift(anchor, offset);
                offset += years;
                build_period(lord, DashaLevel::Mahadasha, start, shift(anchor, offset), years, depth)
            })
            .collect();

        Self {
            depth,
            birth_lord: nakshatra.lord,
            balance_years: first_years - elapsed,
            periods,
        }
    }

    /// The chain of periods running at `at`, outermost first. Empty outside
    /// the 120-year cycle.
    pub fn active_at(&self, at: DateTime<Utc>) -> Vec<&DashaPeriod> {
        let mut chain = Vec::new();
        let mut level = &self.periods;
        while let Some(period) = level.iter().find(|p| p.contains(at)) {
            chain.push(period);
            level = &period.children;
        }
        chain
    }
}

fn build_period(
    lord: Body,
    level: DashaLevel,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    years: f64,
    depth: DashaLevel,
) -> DashaPeriod {
    let mut period = DashaPeriod { lord, level, start, end, years, children: Vec::new() };

    let Some(child_level) = level.next().filter(|_| level < depth) else {
        return period;
    };

    let first = sequence_index(lord);
    let mut offset = 0.0;
    for step in 0..SEQUENCE.len() {
        let (child_lord, child_share) = SEQUENCE[(first + step) % SEQUENCE.len()];
        let child_years = years * child_share / VIMSHOTTARI_YEARS;
        let child_start = shift(start, offset);
        offset += child_years;
        // pin the last boundary so rounding never leaves a gap
        let child_end = if step + 1 == SEQUENCE.len() { end } else { shift(start, offset) };
        period.children.push(build_period(
            child_lord,
            child_level,
            child_start,
            child_end,
            child_years,
            depth,
        ));
    }

    period
}

fn sequence_index(lord: Body) -> usize {
    SEQUENCE.iter().position(|(body, _)| *body == lord).unwrap_or(0)
}

fn shift(at: DateTime<Utc>, years: f64) -> DateTime<Utc> {
    at + Duration::milliseconds((years * YEAR_DAYS * MILLIS_PER_DAY).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::nakshatra::NAKSHATRA_SPAN;
    use chrono::TimeZone;

    fn birth() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1990, 5, 17, 9, 0, 0).unwrap()
    }

    fn years_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        (end - start).num_milliseconds() as f64 / MILLIS_PER_DAY / YEAR_DAYS
    }

    #[test]
    fn moon_at_zero_starts_a_full_ketu_period() {
        let dasha = Vimshottari::compute(birth(), 0.0, DashaLevel::Mahadasha);
        assert_eq!(dasha.birth_lord, Body::Ketu);
        assert_eq!(dasha.periods.len(), 9);
        assert_eq!(dasha.periods[0].lord, Body::Ketu);
        assert_eq!(dasha.periods[0].start, birth());
        assert!((dasha.balance_years - 7.0).abs() < 1e-9);
        assert!(dasha.periods.iter().all(|p| p.children.is_empty()));
    }

    #[test]
    fn cycle_spans_one_hundred_twenty_years() {
        let dasha = Vimshottari::compute(birth(), 200.0, DashaLevel::Mahadasha);
        let first = dasha.periods.first().unwrap();
        let last = dasha.periods.last().unwrap();
        assert!((years_between(first.start, last.end) - VIMSHOTTARI_YEARS).abs() < 1e-6);
        for pair in dasha.periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn partly_spent_first_period_starts_before_birth() {
        // halfway through Bharani, ruled by Venus (20 years)
        let dasha = Vimshottari::compute(birth(), NAKSHATRA_SPAN * 1.5, DashaLevel::Mahadasha);
        assert_eq!(dasha.birth_lord, Body::Venus);
        assert!((dasha.balance_years - 10.0).abs() < 1e-6);
        let first = &dasha.periods[0];
        assert!((years_between(first.start, birth()) - 10.0).abs() < 1e-6);
        assert_eq!(dasha.periods[1].lord, Body::Sun);
    }

    #[test]
    fn antardashas_fill_their_mahadasha() {
        let dasha = Vimshottari::compute(birth(), 100.0, DashaLevel::Antardasha);
        for period in &dasha.periods {
            assert_eq!(period.children.len(), 9);
            assert_eq!(period.children[0].lord, period.lord);
            assert_eq!(period.children[0].start, period.start);
            assert_eq!(period.children[8].end, period.end);
            let total: f64 = period.children.iter().map(|c| c.years).sum();
            assert!((total - period.years).abs() < 1e-9);
            assert!(period.children.iter().all(|c| c.level == DashaLevel::Antardasha));
        }
    }

    #[test]
    fn pratyantardasha_depth_nests_three_levels() {
        let dasha = Vimshottari::compute(birth(), 100.0, DashaLevel::Pratyantardasha);
        let grandchild = &dasha.periods[0].children[0].children[0];
        assert_eq!(grandchild.level, DashaLevel::Pratyantardasha);
        assert!(grandchild.children.is_empty());
    }

    #[test]
    fn active_chain_at_birth_starts_with_the_birth_lord() {
        let dasha = Vimshottari::compute(birth(), 100.0, DashaLevel::Antardasha);
        let chain = dasha.active_at(birth());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].lord, dasha.birth_lord);

        let before = birth() - Duration::days(365 * 100);
        assert!(dasha.active_at(before).is_empty());
    }
}
