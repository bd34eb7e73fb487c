//! Analytic ephemeris.
//!
//! Accuracy targets are those of a birth chart, not of an almanac: the Sun
//! and planets come from the JPL approximate Keplerian elements (valid
//! 1800–2050, errors of arc-minutes at worst for Jupiter and Saturn), the
//! Moon from the main periodic terms of ELP-2000/82 as truncated by Meeus
//! (ch. 47). All longitudes returned here are apparent and tropical, referred
//! to the true equinox of date.

use std::f64::consts::PI;

use super::error::ChartError;
use super::settings::{Ayanamsa, NodeType};
use super::zodiac::Body;
use super::{angle_delta, normalize_degrees};

/// Half a day, in Julian centuries.
const HALF_DAY: f64 = 0.5 / 36_525.0;

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EclipticPosition {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BodyState {
    pub longitude: f64,
    pub latitude: f64,
    /// Degrees per day; negative while retrograde.
    pub speed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Nutation {
    /// Δψ, degrees.
    pub longitude: f64,
    /// Δε, degrees.
    pub obliquity: f64,
}

// ── Keplerian elements ────────────────────────────────────────────────────────

/// Osculating elements at J2000 (index 0) and their rates per century
/// (index 1), relative to the J2000 ecliptic and equinox.
struct Elements {
    name: &'static str,
    semi_major_axis: [f64; 2],
    eccentricity: [f64; 2],
    inclination: [f64; 2],
    mean_longitude: [f64; 2],
    perihelion: [f64; 2],
    node: [f64; 2],
}

const EARTH_MOON: Elements = Elements {
    name: "earth-moon barycenter",
    semi_major_axis: [1.000_002_61, 0.000_005_62],
    eccentricity: [0.016_711_23, -0.000_043_92],
    inclination: [-0.000_015_31, -0.012_946_68],
    mean_longitude: [100.464_571_66, 35_999.372_449_81],
    perihelion: [102.937_681_93, 0.323_273_64],
    node: [0.0, 0.0],
};

const MERCURY: Elements = Elements {
    name: "mercury",
    semi_major_axis: [0.387_099_27, 0.000_000_37],
    eccentricity: [0.205_635_93, 0.000_019_06],
    inclination: [7.004_979_02, -0.005_947_49],
    mean_longitude: [252.250_323_50, 149_472.674_111_75],
    perihelion: [77.457_796_28, 0.160_476_89],
    node: [48.330_765_93, -0.125_340_81],
};

const VENUS: Elements = Elements {
    name: "venus",
    semi_major_axis: [0.723_335_66, 0.000_003_90],
    eccentricity: [0.006_776_72, -0.000_041_07],
    inclination: [3.394_676_05, -0.000_788_90],
    mean_longitude: [181.979_099_50, 58_517.815_387_29],
    perihelion: [131.602_467_18, 0.002_683_29],
    node: [76.679_842_55, -0.277_694_18],
};

const MARS: Elements = Elements {
    name: "mars",
    semi_major_axis: [1.523_710_34, 0.000_018_47],
    eccentricity: [0.093_394_10, 0.000_078_82],
    inclination: [1.849_691_42, -0.008_131_31],
    mean_longitude: [-4.553_432_05, 19_140.302_684_99],
    perihelion: [-23.943_629_59, 0.444_410_88],
    node: [49.559_538_91, -0.292_573_43],
};

const JUPITER: Elements = Elements {
    name: "jupiter",
    semi_major_axis: [5.202_887_00, -0.000_116_07],
    eccentricity: [0.048_386_24, -0.000_132_53],
    inclination: [1.304_396_95, -0.001_837_14],
    mean_longitude: [34.396_440_51, 3_034.746_127_75],
    perihelion: [14.728_479_83, 0.212_526_68],
    node: [100.473_909_09, 0.204_691_06],
};

const SATURN: Elements = Elements {
    name: "saturn",
    semi_major_axis: [9.536_675_94, -0.001_250_60],
    eccentricity: [0.053_861_79, -0.000_509_91],
    inclination: [2.485_991_87, 0.001_936_09],
    mean_longitude: [49.954_244_23, 1_222.493_622_01],
    perihelion: [92.598_878_31, -0.418_972_16],
    node: [113.662_424_48, -0.288_677_94],
};

const URANUS: Elements = Elements {
    name: "uranus",
    semi_major_axis: [19.189_164_64, -0.001_961_76],
    eccentricity: [0.047_257_44, -0.000_043_97],
    inclination: [0.772_637_83, -0.002_429_39],
    mean_longitude: [313.238_104_51, 428.482_027_85],
    perihelion: [170.954_276_30, 0.408_052_81],
    node: [74.016_925_03, 0.042_405_89],
};

const NEPTUNE: Elements = Elements {
    name: "neptune",
    semi_major_axis: [30.069_922_76, 0.000_262_91],
    eccentricity: [0.008_590_48, 0.000_051_05],
    inclination: [1.770_043_47, 0.000_353_72],
    mean_longitude: [-55.120_029_69, 218.459_453_25],
    perihelion: [44.964_762_27, -0.322_414_64],
    node: [131.784_225_74, -0.005_086_64],
};

const PLUTO: Elements = Elements {
    name: "pluto",
    semi_major_axis: [39.482_116_75, -0.000_315_96],
    eccentricity: [0.248_827_30, 0.000_051_70],
    inclination: [17.140_012_06, 0.000_048_18],
    mean_longitude: [238.929_038_33, 145.207_805_15],
    perihelion: [224.068_916_29, -0.040_629_42],
    node: [110.303_936_84, -0.011_834_82],
};

fn planet_elements(body: Body) -> Option<&'static Elements> {
    match body {
        Body::Mercury => Some(&MERCURY),
        Body::Venus   => Some(&VENUS),
        Body::Mars    => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn  => Some(&SATURN),
        Body::Uranus  => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
        Body::Pluto   => Some(&PLUTO),
        Body::Sun | Body::Moon | Body::Rahu | Body::Ketu => None,
    }
}

/// Solves Kepler's equation `E − e·sin E = M` by Newton iteration.
fn eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> Option<f64> {
    let mut anomaly = if eccentricity < 0.8 { mean_anomaly } else { PI };
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let step = (anomaly - eccentricity * anomaly.sin() - mean_anomaly)
            / (1.0 - eccentricity * anomaly.cos());
        anomaly -= step;
        if step.abs() < KEPLER_TOLERANCE {
            return Some(anomaly);
        }
    }
    None
}

/// Heliocentric rectangular coordinates (AU), J2000 ecliptic and equinox.
fn heliocentric(elements: &Elements, t: f64) -> Result<[f64; 3], ChartError> {
    let at = |pair: [f64; 2]| pair[0] + pair[1] * t;

    let a = at(elements.semi_major_axis);
    let e = at(elements.eccentricity);
    let inclination = at(elements.inclination).to_radians();
    let node = at(elements.node);
    let perihelion = at(elements.perihelion);
    let argument = (perihelion - node).to_radians();
    let node = node.to_radians();
    let mean_anomaly = angle_delta(0.0, at(elements.mean_longitude) - perihelion).to_radians();

    let anomaly = eccentric_anomaly(mean_anomaly, e).ok_or_else(|| {
        ChartError::computation(format!("Kepler's equation did not converge for {}", elements.name))
    })?;

    let x = a * (anomaly.cos() - e);
    let y = a * (1.0 - e * e).sqrt() * anomaly.sin();

    let (sin_w, cos_w) = argument.sin_cos();
    let (sin_n, cos_n) = node.sin_cos();
    let (sin_i, cos_i) = inclination.sin_cos();

    Ok([
        (cos_w * cos_n - sin_w * sin_n * cos_i) * x + (-sin_w * cos_n - cos_w * sin_n * cos_i) * y,
        (cos_w * sin_n + sin_w * cos_n * cos_i) * x + (-sin_w * sin_n + cos_w * cos_n * cos_i) * y,
        (sin_w * sin_i) * x + (cos_w * sin_i) * y,
    ])
}

fn spherical([x, y, z]: [f64; 3]) -> EclipticPosition {
    EclipticPosition {
        longitude: normalize_degrees(y.atan2(x).to_degrees()),
        latitude: z.atan2(x.hypot(y)).to_degrees(),
    }
}

/// General precession in longitude from J2000 to the mean equinox of date.
pub(crate) fn precession(t: f64) -> f64 {
    (5_029.096_6 * t + 1.111_13 * t * t) / 3_600.0
}

/// Geometric geocentric Sun, mean equinox of date, with annual aberration.
fn sun(t: f64) -> Result<EclipticPosition, ChartError> {
    let [x, y, z] = heliocentric(&EARTH_MOON, t)?;
    let distance = (x * x + y * y + z * z).sqrt();
    let position = spherical([-x, -y, -z]);
    Ok(EclipticPosition {
        longitude: position.longitude + precession(t) - 20.4898 / 3_600.0 / distance,
        latitude: position.latitude,
    })
}

fn planet(elements: &Elements, t: f64) -> Result<EclipticPosition, ChartError> {
    let earth = heliocentric(&EARTH_MOON, t)?;
    let body = heliocentric(elements, t)?;
    let position = spherical([body[0] - earth[0], body[1] - earth[1], body[2] - earth[2]]);
    Ok(EclipticPosition {
        longitude: position.longitude + precession(t),
        latitude: position.latitude,
    })
}

// ── Moon ──────────────────────────────────────────────────────────────────────

struct LunarArguments {
    /// Mean longitude L′.
    mean_longitude: f64,
    /// Mean elongation D.
    elongation: f64,
    /// Sun's mean anomaly M.
    sun_anomaly: f64,
    /// Moon's mean anomaly M′.
    moon_anomaly: f64,
    /// Argument of latitude F.
    latitude: f64,
}

fn lunar_arguments(t: f64) -> LunarArguments {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    LunarArguments {
        mean_longitude: 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2
            + t3 / 538_841.0
            - t4 / 65_194_000.0,
        elongation: 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
            - t4 / 113_065_000.0,
        sun_anomaly: 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2
            + t3 / 24_490_000.0,
        moon_anomaly: 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
            - t4 / 14_712_000.0,
        latitude: 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
            + t4 / 863_310_000.0,
    }
}

/// (D, M, M′, F, coefficient in 1e-6 degrees)
type LunarTerm = (i8, i8, i8, i8, f64);

const MOON_LONGITUDE: &[LunarTerm] = &[
    (0, 0, 1, 0, 6_288_774.0),
    (2, 0, -1, 0, 1_274_027.0),
    (2, 0, 0, 0, 658_314.0),
    (0, 0, 2, 0, 213_618.0),
    (0, 1, 0, 0, -185_116.0),
    (0, 0, 0, 2, -114_332.0),
    (2, 0, -2, 0, 58_793.0),
    (2, -1, -1, 0, 57_066.0),
    (2, 0, 1, 0, 53_322.0),
    (2, -1, 0, 0, 45_758.0),
    (0, 1, -1, 0, -40_923.0),
    (1, 0, 0, 0, -34_720.0),
    (0, 1, 1, 0, -30_383.0),
    (2, 0, 0, -2, 15_327.0),
    (0, 0, 1, 2, -12_528.0),
    (0, 0, 1, -2, 10_980.0),
    (4, 0, -1, 0, 10_675.0),
    (0, 0, 3, 0, 10_034.0),
    (4, 0, -2, 0, 8_548.0),
    (2, 1, -1, 0, -7_888.0),
    (2, 1, 0, 0, -6_766.0),
    (1, 0, -1, 0, -5_163.0),
    (1, 1, 0, 0, 4_987.0),
    (2, -1, 1, 0, 4_036.0),
    (2, 0, 2, 0, 3_994.0),
    (4, 0, 0, 0, 3_861.0),
    (2, 0, -3, 0, 3_665.0),
    (0, 1, -2, 0, -2_689.0),
    (2, 0, -1, 2, -2_602.0),
    (2, -1, -2, 0, 2_390.0),
    (1, 0, 1, 0, -2_348.0),
    (2, -2, 0, 0, 2_236.0),
    (0, 1, 2, 0, -2_120.0),
    (0, 2, 0, 0, -2_069.0),
    (2, -2, -1, 0, 2_048.0),
    (2, 0, 1, -2, -1_773.0),
    (2, 0, 0, 2, -1_595.0),
    (4, -1, -1, 0, 1_215.0),
    (0, 0, 2, 2, -1_110.0),
    (3, 0, -1, 0, -892.0),
    (2, 1, 1, 0, -810.0),
    (4, -1, -2, 0, 759.0),
    (0, 2, -1, 0, -713.0),
    (2, 2, -1, 0, -700.0),
    (2, 1, -2, 0, 691.0),
    (2, -1, 0, -2, 596.0),
    (4, 0, 1, 0, 549.0),
    (0, 0, 4, 0, 537.0),
    (4, -1, 0, 0, 520.0),
    (1, 0, -2, 0, -487.0),
    (2, 1, 0, -2, -399.0),
    (0, 0, 2, -2, -381.0),
    (1, 1, 1, 0, 351.0),
    (3, 0, -2, 0, -340.0),
    (4, 0, -3, 0, 330.0),
    (2, -1, 2, 0, 327.0),
    (0, 2, 1, 0, -323.0),
    (1, 1, -1, 0, 299.0),
    (2, 0, 3, 0, 294.0),
];

const MOON_LATITUDE: &[LunarTerm] = &[
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
    (0, 0, 0, 3, -1_749.0),
    (0, 1, -1, 1, -1_565.0),
    (1, 0, 0, 1, -1_491.0),
    (0, 1, 1, 1, -1_475.0),
    (0, 1, 1, -1, -1_410.0),
    (0, 1, 0, -1, -1_344.0),
    (1, 0, 0, -1, -1_335.0),
    (0, 0, 3, 1, 1_107.0),
    (4, 0, 0, -1, 1_021.0),
    (4, 0, -1, 1, 833.0),
];

fn lunar_series(terms: &[LunarTerm], args: &LunarArguments, eccentricity: f64) -> f64 {
    terms
        .iter()
        .map(|&(d, m, mp, f, coefficient)| {
            let argument = f64::from(d) * args.elongation
                + f64::from(m) * args.sun_anomaly
                + f64::from(mp) * args.moon_anomaly
                + f64::from(f) * args.latitude;
            // terms in M shrink with the decreasing eccentricity of Earth's orbit
            let damping = match m.abs() {
                1 => eccentricity,
                2 => eccentricity * eccentricity,
                _ => 1.0,
            };
            coefficient * damping * argument.to_radians().sin()
        })
        .sum()
}

/// Geometric Moon, mean equinox of date.
fn moon(t: f64) -> EclipticPosition {
    let args = lunar_arguments(t);
    let eccentricity = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let l = args.mean_longitude.to_radians();
    let f = args.latitude.to_radians();
    let mp = args.moon_anomaly.to_radians();

    let longitude = lunar_series(MOON_LONGITUDE, &args, eccentricity)
        + 3_958.0 * a1.sin()
        + 1_962.0 * (l - f).sin()
        + 318.0 * a2.sin();
    let latitude = lunar_series(MOON_LATITUDE, &args, eccentricity) - 2_235.0 * l.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (l - mp).sin()
        - 115.0 * (l + mp).sin();

    EclipticPosition {
        longitude: args.mean_longitude + longitude / 1e6,
        latitude: latitude / 1e6,
    }
}

/// Ascending lunar node, mean equinox of date.
fn lunar_node(t: f64, node: NodeType) -> f64 {
    let mean = 125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t * t + t.powi(3) / 467_441.0
        - t.powi(4) / 60_616_000.0;
    match node {
        NodeType::Mean => mean,
        NodeType::True => {
            let args = lunar_arguments(t);
            let d = args.elongation.to_radians();
            let m = args.sun_anomaly.to_radians();
            let mp = args.moon_anomaly.to_radians();
            let f = args.latitude.to_radians();
            mean - 1.4979 * (2.0 * (d - f)).sin() - 0.1500 * m.sin()
                + 0.1226 * (2.0 * d).sin()
                + 0.1176 * (2.0 * f).sin()
                - 0.0801 * (2.0 * (mp - f)).sin()
        }
    }
}

// ── Earth orientation ─────────────────────────────────────────────────────────

/// Nutation in longitude and obliquity, to about half an arc-second.
pub(crate) fn nutation(t: f64) -> Nutation {
    let omega = (125.044_52 - 1_934.136_261 * t).to_radians();
    let sun = (280.4665 + 36_000.7698 * t).to_radians();
    let moon = (218.3165 + 481_267.8813 * t).to_radians();

    let longitude = -17.20 * omega.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let obliquity = 9.20 * omega.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
        - 0.09 * (2.0 * omega).cos();

    Nutation { longitude: longitude / 3_600.0, obliquity: obliquity / 3_600.0 }
}

pub(crate) fn mean_obliquity(t: f64) -> f64 {
    (84_381.448 - 46.8150 * t - 0.000_59 * t * t + 0.001_813 * t.powi(3)) / 3_600.0
}

pub(crate) fn true_obliquity(t: f64) -> f64 {
    mean_obliquity(t) + nutation(t).obliquity
}

/// Ayanamsa in degrees for `t` Julian centuries of TT since J2000.
pub(crate) fn ayanamsa(kind: Ayanamsa, t: f64) -> f64 {
    kind.at_j2000() + precession(t)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Apparent tropical position of `body` at `t` Julian centuries of TT.
pub(crate) fn apparent_position(
    body: Body,
    t: f64,
    node: NodeType,
) -> Result<EclipticPosition, ChartError> {
    let geometric = match body {
        Body::Sun => sun(t)?,
        Body::Moon => moon(t),
        Body::Rahu => EclipticPosition { longitude: lunar_node(t, node), latitude: 0.0 },
        Body::Ketu => EclipticPosition { longitude: lunar_node(t, node) + 180.0, latitude: 0.0 },
        other => match planet_elements(other) {
            Some(elements) => planet(elements, t)?,
            None => return Err(ChartError::computation(format!("no ephemeris for {other}"))),
        },
    };

    Ok(EclipticPosition {
        longitude: normalize_degrees(geometric.longitude + nutation(t).longitude),
        latitude: geometric.latitude,
    })
}

/// Position plus daily motion, from a central difference over one day.
pub(crate) fn body_state(body: Body, t: f64, node: NodeType) -> Result<BodyState, ChartError> {
    let now = apparent_position(body, t, node)?;
    let before = apparent_position(body, t - HALF_DAY, node)?;
    let after = apparent_position(body, t + HALF_DAY, node)?;

    Ok(BodyState {
        longitude: now.longitude,
        latitude: now.latitude,
        speed: angle_delta(before.longitude, after.longitude),
    })
}
