//! British National Grid: transverse mercator on Airy 1830, anchored to
//! OSGB36, with the 500 km / 100 km square letter pair.

use std::fmt;
use std::str::FromStr;

use crate::datum::Datum;
use crate::tmerc::TransverseMercator;
use crate::Error;

/// True origin and false offsets of the National Grid.
const LAT_0: f64 = 49.0;
const LON_0: f64 = -2.0;
const E_0: f64 = 400_000.0;
const N_0: f64 = -100_000.0;
const K_0: f64 = 0.999_601_271_7;

/// The grid letter alphabet: A..Z with I skipped.
const GRID_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// A British National Grid value. The easting and northing are full grid
/// coordinates (not reduced into the lettered square); the letter pair is
/// a derived label for the 100 km square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BritishGridPoint {
    /// Easting letter, then northing letter
    pub letters: [char; 2],
    pub easting: f64,
    pub northing: f64,
    pub datum: Datum,
}

impl BritishGridPoint {
    /// A grid value from full easting/northing; the square letters are
    /// derived.
    #[must_use]
    pub fn new(easting: f64, northing: f64) -> BritishGridPoint {
        BritishGridPoint {
            letters: square_letters(easting, northing),
            easting,
            northing,
            datum: Datum::Osgb36,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.easting.is_finite() || !self.northing.is_finite() {
            return Err(Error::InvalidCoord("non-finite grid coordinate"));
        }
        if self
            .letters
            .iter()
            .any(|l| !l.is_ascii() || !GRID_LETTERS.contains(&(*l as u8)))
        {
            return Err(Error::InvalidCoord("grid square letter"));
        }
        Ok(())
    }
}

/// `{letters} {easting} {northing}`, meters rounded to integers.
impl fmt::Display for BritishGridPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{} {:.0} {:.0}",
            self.letters[0], self.letters[1], self.easting, self.northing
        )
    }
}

/// Parse `TQ 530340 181680`, letters first, then full easting and northing.
impl FromStr for BritishGridPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<BritishGridPoint, Error> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let &[letters, easting, northing] = tokens.as_slice() else {
            return Err(Error::ParseFailed(format!(
                "expected 'LETTERS EASTING NORTHING', got {s:?}"
            )));
        };

        let mut chars = letters.chars().map(|c| c.to_ascii_uppercase());
        let letters = match (chars.next(), chars.next(), chars.next()) {
            (Some(e), Some(n), None) => [e, n],
            _ => {
                return Err(Error::ParseFailed(format!(
                    "square code must be two letters, got {letters:?}"
                )))
            }
        };

        let parse = |token: &str| -> Result<f64, Error> {
            token
                .parse()
                .map_err(|_| Error::ParseFailed(format!("not a grid distance: {token:?}")))
        };

        let point = BritishGridPoint {
            letters,
            easting: parse(easting)?,
            northing: parse(northing)?,
            datum: Datum::Osgb36,
        };
        point.validate()?;
        Ok(point)
    }
}

/// The OSGB transverse mercator projection.
pub(crate) fn projection() -> TransverseMercator {
    TransverseMercator::osgb()
}

/// The 100 km square letter for one axis: the 500 km index advances the
/// alphabet five letters, the 100 km index one. Indices from coordinates
/// outside the grid wrap around the 25-letter cycle.
fn square_letter(coordinate: f64) -> char {
    let i500k = (coordinate / 500_000.0).floor() as i64;
    let i100k = (coordinate.rem_euclid(500_000.0) / 100_000.0).floor() as i64;
    let index = (i500k * 5 + i100k).rem_euclid(25);
    GRID_LETTERS[index as usize] as char
}

/// The letter pair for a full easting/northing.
pub(crate) fn square_letters(easting: f64, northing: f64) -> [char; 2] {
    [square_letter(easting), square_letter(northing)]
}

/// Inverse of the OSGB transverse mercator, using the Ordnance Survey's
/// iterative formulation for Airy 1830: the footpoint latitude is refined
/// until |Δφ| < 1e-12 (at most ten iterations; hitting the cap keeps the
/// last estimate, good to well under a millimeter anywhere on the grid),
/// then the series in powers of the easting offset recovers latitude and
/// longitude (degrees).
#[allow(clippy::many_single_char_names)] // mimic the OS term numbering
pub(crate) fn inverse_projection(easting: f64, northing: f64) -> (f64, f64) {
    let ellps = Datum::Osgb36.ellipsoid();
    let a = ellps.semimajor_axis();
    let e2 = ellps.eccentricity_squared();
    let lat_0 = LAT_0.to_radians();
    let m_0 = ellps.meridional_distance(lat_0);

    // Footpoint: find the latitude whose scaled arc matches the northing
    let mut phi = lat_0 + (northing - N_0) / (a * K_0);
    for _ in 0..10 {
        let m = K_0 * (ellps.meridional_distance(phi) - m_0);
        let delta = (northing - N_0 - m) / (a * K_0);
        phi += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }

    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = sin_phi / cos_phi;
    let sec_phi = 1.0 / cos_phi;
    let tan2 = tan_phi * tan_phi;
    let tan4 = tan2 * tan2;
    let tan6 = tan4 * tan2;

    let nu = a * K_0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let rho = a * K_0 * (1.0 - e2) / (1.0 - e2 * sin_phi * sin_phi).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let vii = tan_phi / (2.0 * rho * nu);
    let viii = tan_phi / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
    let ix = tan_phi / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
    let x = sec_phi / nu;
    let xi = sec_phi / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
    let xii = sec_phi / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
    let xiia = sec_phi / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

    let de = easting - E_0;
    let de2 = de * de;
    let de3 = de2 * de;
    let de4 = de3 * de;
    let de5 = de4 * de;
    let de6 = de5 * de;
    let de7 = de6 * de;

    let lat = phi - vii * de2 + viii * de4 - ix * de6;
    let lon = LON_0.to_radians() + x * de - xi * de3 + xii * de5 - xiia * de7;

    (lat.to_degrees(), lon.to_degrees())
}

// ----- Tests ---------------------------------------------------------------------
