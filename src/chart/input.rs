//! Birth data and its validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::ChartError;

/// Geographic birth location. East longitudes and north latitudes are
/// positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ChartError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ChartError::invalid(
                "latitude",
                format!("{latitude} is outside -90..=90"),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ChartError::invalid(
                "longitude",
                format!("{longitude} is outside -180..=180"),
            ));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
}

/// The zone the birth time was read in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeZoneSpec {
    /// A fixed offset from UTC, e.g. `+05:30`.
    Offset(FixedOffset),
    /// An IANA zone, e.g. `Asia/Kolkata`. Historical DST rules apply.
    Named(Tz),
}

/// Accepts `Z`, `UTC`, `±HH:MM`, `±HHMM`, `±HH`, or an IANA zone name.
impl FromStr for TimeZoneSpec {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return Ok(Self::Offset(FixedOffset::east_opt(0).ok_or_else(|| unknown_zone(s))?));
        }
        if s.starts_with(['+', '-']) {
            return parse_offset(s).map(Self::Offset).ok_or_else(|| unknown_zone(s));
        }
        s.parse::<Tz>().map(Self::Named).map_err(|_| unknown_zone(s))
    }
}

impl fmt::Display for TimeZoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "{offset}"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

fn unknown_zone(s: &str) -> ChartError {
    ChartError::invalid(
        "timezone",
        format!("`{s}` is neither a UTC offset like +05:30 nor an IANA zone name"),
    )
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, digits) = s.split_at(1);
    let sign = if sign == "-" { -1 } else { 1 };
    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}

/// Birth parameters, as read on a local clock.
#[derive(Clone, Debug, PartialEq)]
pub struct BirthInput {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: Location,
    pub timezone: TimeZoneSpec,
}

impl BirthInput {
    pub fn new(date: NaiveDate, time: NaiveTime, location: Location, timezone: TimeZoneSpec) -> Self {
        Self { date, time, location, timezone }
    }

    /// Parses the textual form used on the wire: `YYYY-MM-DD`, `HH:MM` or
    /// `HH:MM:SS`, and a zone accepted by [`TimeZoneSpec::from_str`].
    pub fn parse(
        date: &str,
        time: &str,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<Self, ChartError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| ChartError::invalid("date", format!("`{date}`: {e}")))?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M"))
            .map_err(|e| ChartError::invalid("time", format!("`{time}`: {e}")))?;
        let location = Location::new(latitude, longitude)?;
        let timezone = timezone.parse()?;
        Ok(Self::new(date, time, location, timezone))
    }

    /// The birth instant in UTC.
    ///
    /// Fails when the local time does not exist in the zone (skipped by a
    /// spring-forward transition) or occurs twice (repeated by a fall-back
    /// transition).
    pub fn utc(&self) -> Result<DateTime<Utc>, ChartError> {
        let local = NaiveDateTime::new(self.date, self.time);
        match self.timezone {
            TimeZoneSpec::Offset(offset) => resolve(offset.from_local_datetime(&local), local, self.timezone),
            TimeZoneSpec::Named(tz) => resolve(tz.from_local_datetime(&local), local, self.timezone),
        }
    }
}

fn resolve<Z: TimeZone>(
    result: LocalResult<DateTime<Z>>,
    local: NaiveDateTime,
    zone: TimeZoneSpec,
) -> Result<DateTime<Utc>, ChartError> {
    match result {
        LocalResult::Single(at) => Ok(at.with_timezone(&Utc)),
        LocalResult::Ambiguous(..) => Err(ChartError::invalid(
            "time",
            format!("{local} occurs twice in {zone}; give a UTC offset instead"),
        )),
        LocalResult::None => Err(ChartError::invalid(
            "time",
            format!("{local} does not exist in {zone}"),
        )),
    }
}
