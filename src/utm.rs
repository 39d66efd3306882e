//! UTM zone and band machinery, and conversions between geographic
//! coordinates and UTM grid values.

use std::fmt;
use std::str::FromStr;

use crate::coord::{is_valid_latitude, is_valid_longitude, GeoCoord};
use crate::datum::Datum;
use crate::ellipsoid::Ellipsoid;
use crate::tmerc::TransverseMercator;
use crate::Error;

/// The southern false northing, applied to output values only.
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// The latitude band letters, 8° bands from 80°S to 84°N, I and O skipped.
const BAND_LETTERS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

/// The UTM zone, 1..60, for a position given in degrees.
///
/// Zone 32 is widened over southern Norway (56°..64°N, 3°..12°E), and the
/// zones over Svalbard (72°..84°N) are 31, 33, 35 and 37 only.
pub fn utm_zone(longitude: f64, latitude: f64) -> Result<u8, Error> {
    if !is_valid_longitude(longitude) || !is_valid_latitude(latitude) {
        return Err(Error::InvalidCoord("latitude or longitude out of range"));
    }

    // Southern Norway
    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        return Ok(32);
    }

    // Svalbard
    if (72.0..84.0).contains(&latitude) {
        match longitude {
            lon if (0.0..9.0).contains(&lon) => return Ok(31),
            lon if (9.0..21.0).contains(&lon) => return Ok(33),
            lon if (21.0..33.0).contains(&lon) => return Ok(35),
            lon if (33.0..42.0).contains(&lon) => return Ok(37),
            _ => (),
        }
    }

    let zone = ((longitude + 180.0) / 6.0).floor() as i32 + 1;
    Ok(zone.clamp(1, 60) as u8)
}

/// The 8°-wide latitude band letter, C (80°S..72°S) through X (72°N..84°N,
/// widened to 12°), never I or O. Latitudes south of 80°S map to C, north
/// of 84°N to X.
#[must_use]
pub fn utm_band(latitude: f64) -> char {
    let index = ((latitude + 80.0) / 8.0).floor().clamp(0.0, 19.0) as usize;
    BAND_LETTERS[index] as char
}

/// Is `band` one of the UTM latitude band letters?
pub(crate) fn is_valid_band(band: char) -> bool {
    band.is_ascii() && BAND_LETTERS.contains(&(band as u8))
}

/// A UTM grid value. The easting includes the 500 km false easting; for
/// band letters south of N, the northing includes the 10 000 km southern
/// false northing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmPoint {
    pub zone: u8,
    pub band: char,
    pub easting: f64,
    pub northing: f64,
    /// Meridian convergence at the point, degrees
    pub convergence: f64,
    /// Scale factor on the central meridian
    pub scale_factor: f64,
    pub datum: Datum,
}

impl UtmPoint {
    #[must_use]
    pub fn new(zone: u8, band: char, easting: f64, northing: f64, datum: Datum) -> UtmPoint {
        UtmPoint {
            zone,
            band,
            easting,
            northing,
            convergence: 0.0,
            scale_factor: 0.9996,
            datum,
        }
    }

    /// Does the band letter place this value in the southern hemisphere?
    #[must_use]
    pub fn is_southern(&self) -> bool {
        self.band < 'N'
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=60).contains(&self.zone) {
            return Err(Error::InvalidUtmZone);
        }
        if !is_valid_band(self.band) {
            return Err(Error::InvalidCoord("latitude band letter"));
        }
        if !(100_000.0..=900_000.0).contains(&self.easting) {
            return Err(Error::InvalidCoord("easting outside 100km..900km"));
        }
        let northing_range = if self.is_southern() {
            10_000_000.0..=20_000_000.0
        } else {
            0.0..=10_000_000.0
        };
        if !northing_range.contains(&self.northing) {
            return Err(Error::InvalidCoord("northing outside hemisphere range"));
        }
        Ok(())
    }
}

/// `{zone}{band} {easting}E {northing}N`, meters rounded to integers.
impl fmt::Display for UtmPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{} {:.0}E {:.0}N",
            self.zone, self.band, self.easting, self.northing
        )
    }
}

/// Parse `50N 447600E 4419300N` (direction suffixes optional), on WGS84.
impl FromStr for UtmPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<UtmPoint, Error> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let &[zone_band, easting, northing] = tokens.as_slice() else {
            return Err(Error::ParseFailed(format!(
                "expected 'ZONEBAND EASTING NORTHING', got {s:?}"
            )));
        };

        let band = zone_band
            .chars()
            .last()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(|| Error::ParseFailed(format!("missing band letter in {zone_band:?}")))?
            .to_ascii_uppercase();
        let zone = zone_band[..zone_band.len() - 1]
            .parse()
            .map_err(|_| Error::ParseFailed(format!("bad zone number in {zone_band:?}")))?;

        let point = UtmPoint::new(
            zone,
            band,
            meters(easting)?,
            meters(northing)?,
            Datum::Wgs84,
        );
        point.validate()?;
        Ok(point)
    }
}

/// A grid distance with an optional trailing direction letter.
fn meters(token: &str) -> Result<f64, Error> {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    digits
        .parse()
        .map_err(|_| Error::ParseFailed(format!("not a grid distance: {token:?}")))
}

/// Project a geographic coordinate to UTM on the given ellipsoid.
pub(crate) fn from_geographic(ellps: Ellipsoid, geo: &GeoCoord) -> Result<UtmPoint, Error> {
    geo.validate()?;
    let zone = utm_zone(geo.longitude, geo.latitude)?;
    let proj = TransverseMercator::utm(ellps, zone)?;

    let (easting, mut northing) = proj.forward(geo.latitude, geo.longitude);
    if geo.latitude < 0.0 {
        // The projection's southern false northing, plus the same amount
        // again lifting the stored value into the southern [1e7, 2e7] range
        northing += 2.0 * FALSE_NORTHING_SOUTH;
    }

    let delta_lon = geo.longitude.to_radians() - proj.central_meridian();
    let convergence = (delta_lon.tan() * geo.latitude.to_radians().sin())
        .atan()
        .to_degrees();

    Ok(UtmPoint {
        zone,
        band: utm_band(geo.latitude),
        easting,
        northing,
        convergence,
        scale_factor: 0.9996,
        datum: geo.datum,
    })
}

/// Invert a UTM value to geographic degrees on the given ellipsoid.
pub(crate) fn to_geographic(ellps: Ellipsoid, utm: &UtmPoint) -> Result<GeoCoord, Error> {
    utm.validate()?;
    let proj = TransverseMercator::utm(ellps, utm.zone)?;

    // Southern values shed the range marker and the projection's false
    // northing, leaving the (negative) scaled meridian arc
    let northing = if utm.is_southern() {
        utm.northing - 2.0 * FALSE_NORTHING_SOUTH
    } else {
        utm.northing
    };

    let (lat, lon) = proj.inverse(utm.easting, northing);
    Ok(GeoCoord::new(lat, lon, 0.0, utm.datum))
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones() {
        assert_eq!(utm_zone(121.47, 31.23).unwrap(), 51); // Shanghai
        assert_eq!(utm_zone(-74.01, 40.71).unwrap(), 18); // New York
        assert_eq!(utm_zone(-0.13, 51.51).unwrap(), 30); // London
        assert_eq!(utm_zone(151.21, -33.87).unwrap(), 56); // Sydney
        assert_eq!(utm_zone(-180.0, 0.0).unwrap(), 1);
        assert_eq!(utm_zone(180.0, 0.0).unwrap(), 60);
        assert!(utm_zone(181.0, 0.0).is_err());
        assert!(utm_zone(0.0, 91.0).is_err());
    }

    #[test]
    fn zone_exceptions() {
        // Southern Norway widening of zone 32
        assert_eq!(utm_zone(7.0, 60.0).unwrap(), 32);
        assert_eq!(utm_zone(7.0, 55.9).unwrap(), 32); // regular rule already says 32
        assert_eq!(utm_zone(2.9, 60.0).unwrap(), 31);
        assert_eq!(utm_zone(7.0, 64.0).unwrap(), 32); // north of the exception band, same by chance
        assert_eq!(utm_zone(4.0, 64.0).unwrap(), 31);

        // Svalbard
        assert_eq!(utm_zone(5.0, 75.0).unwrap(), 31);
        assert_eq!(utm_zone(10.0, 75.0).unwrap(), 33);
        assert_eq!(utm_zone(25.0, 75.0).unwrap(), 35);
        assert_eq!(utm_zone(40.0, 75.0).unwrap(), 37);
        assert_eq!(utm_zone(45.0, 75.0).unwrap(), 38); // east of the exception range
    }

    #[test]
    fn bands() {
        assert_eq!(utm_band(31.23), 'R');
        assert_eq!(utm_band(-33.87), 'H');
        assert_eq!(utm_band(51.51), 'U');
        assert_eq!(utm_band(-85.0), 'C');
        assert_eq!(utm_band(85.0), 'X');
        assert_eq!(utm_band(84.0), 'X');
        assert_eq!(utm_band(0.0), 'N');
        assert_eq!(utm_band(-0.1), 'M');

        // Monotone in 8° steps, I and O never appear
        let mut previous = '\0';
        for i in 0..20 {
            let band = utm_band(-80.0 + 8.0 * i as f64 + 0.5);
            assert!(band > previous);
            assert!(band != 'I' && band != 'O');
            previous = band;
        }
    }

    #[test]
    fn validation() {
        let good = UtmPoint::new(51, 'R', 354_000.0, 3_456_000.0, Datum::Wgs84);
        assert!(good.validate().is_ok());
        assert!(!good.is_southern());

        let bad_zone = UtmPoint { zone: 61, ..good };
        assert_eq!(bad_zone.validate().unwrap_err(), Error::InvalidUtmZone);

        let bad_band = UtmPoint { band: 'I', ..good };
        assert!(bad_band.validate().is_err());

        let bad_easting = UtmPoint {
            easting: 99_000.0,
            ..good
        };
        assert!(bad_easting.validate().is_err());

        // A southern value needs the false northing applied
        let south = UtmPoint::new(56, 'H', 334_000.0, 6_250_000.0, Datum::Wgs84);
        assert!(south.is_southern());
        assert!(south.validate().is_err());
        let south = UtmPoint {
            northing: 16_250_000.0,
            ..south
        };
        assert!(south.validate().is_ok());
    }

    #[test]
    fn projection_roundtrip_south() {
        // A southern value lands in [1e7, 2e7]: the false northing on top
        // of the projection's own southern offset
        let ellps = Ellipsoid::named("GRS80").unwrap();
        let geo = GeoCoord::new(-55.0, 9.0, 0.0, Datum::Wgs84);
        let utm = from_geographic(ellps, &geo).unwrap();

        assert_eq!(utm.zone, 32);
        assert_eq!(utm.band, 'F');
        assert!((utm.easting - 500_000.0).abs() < 1e-6); // on the central meridian
        // On the central meridian the northing collapses to the scaled
        // (negative) meridian arc plus the false northing and the
        // southern range marker
        let arc = ellps.meridional_distance((-55.0_f64).to_radians());
        assert!((utm.northing - (20_000_000.0 + 0.9996 * arc)).abs() < 1e-6);
        assert!(utm.northing > 13_900_000.0 && utm.northing < 13_910_000.0);

        let back = to_geographic(ellps, &utm).unwrap();
        assert!((back.latitude - geo.latitude).abs() < 1e-8);
        assert!((back.longitude - geo.longitude).abs() < 1e-8);
    }

    #[test]
    fn convergence_sign_and_magnitude() {
        let ellps = Ellipsoid::default();
        // West of the central meridian (123°E for zone 51) in the northern
        // hemisphere, the convergence is negative
        let geo = GeoCoord::new(31.23, 121.47, 0.0, Datum::Wgs84);
        let utm = from_geographic(ellps, &geo).unwrap();
        assert!(utm.convergence < 0.0);
        assert!(utm.convergence.abs() < 2.0);
        assert_eq!(utm.scale_factor, 0.9996);
    }

    #[test]
    fn text_roundtrip() {
        let p = UtmPoint::new(50, 'S', 447_600.0, 4_419_300.0, Datum::Wgs84);
        assert_eq!(p.to_string(), "50S 447600E 4419300N");

        let parsed: UtmPoint = "50S 447600E 4419300N".parse().unwrap();
        assert_eq!(parsed.zone, 50);
        assert_eq!(parsed.band, 'S');
        assert_eq!(parsed.easting, 447_600.0);
        assert_eq!(parsed.northing, 4_419_300.0);

        // Suffix-less form
        let parsed: UtmPoint = "50S 447600 4419300".parse().unwrap();
        assert_eq!(parsed.easting, 447_600.0);

        assert!("50 447600 4419300".parse::<UtmPoint>().is_err());
        assert!("50S 447600".parse::<UtmPoint>().is_err());
        assert!("50I 447600 4419300".parse::<UtmPoint>().is_err());
    }
}
