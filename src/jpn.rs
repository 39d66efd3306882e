//! The Japanese plane-rectangular coordinate system: nineteen zones on the
//! Tokyo datum (Bessel 1841), each a transverse mercator with k₀ = 0.9999
//! and no false offsets.
//!
//! Note the axis convention: `x` is the northing and `y` the easting, the
//! other way around from the other grids in this crate.

use std::fmt;
use std::str::FromStr;

use crate::datum::Datum;
use crate::tmerc::TransverseMercator;
use crate::Error;

/// Per-zone true origins, (latitude, longitude) in degrees, zones 1..19.
const ZONE_ORIGINS: [(f64, f64); 19] = [
    (33.0, 129.5),
    (33.0, 131.0),
    (36.0, 132.1667),
    (33.0, 133.5),
    (36.0, 134.3333),
    (36.0, 136.0),
    (36.0, 137.1667),
    (36.0, 138.5),
    (36.0, 139.8333),
    (40.0, 140.8333),
    (44.0, 140.25),
    (44.0, 142.25),
    (44.0, 144.25),
    (26.0, 142.0),
    (26.0, 127.5),
    (26.0, 124.0),
    (26.0, 131.0),
    (20.0, 136.0),
    (26.0, 154.0),
];

/// A plane-rectangular grid value: `x` grows north, `y` grows east, both
/// relative to the zone's true origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JapanGridPoint {
    pub zone: u8,
    /// Northing, meters from the zone origin
    pub x: f64,
    /// Easting, meters from the zone origin
    pub y: f64,
    pub datum: Datum,
}

impl JapanGridPoint {
    #[must_use]
    pub fn new(zone: u8, x: f64, y: f64) -> JapanGridPoint {
        JapanGridPoint {
            zone,
            x,
            y,
            datum: Datum::Tokyo,
        }
    }
}

/// `Zone {zone}: {x}, {y}`, millimeter precision.
impl fmt::Display for JapanGridPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Zone {}: {:.3}, {:.3}", self.zone, self.x, self.y)
    }
}

/// Parse `Zone 9: -35446.190, -9637.412` or the bare `9 -35446.190 -9637.412`.
impl FromStr for JapanGridPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<JapanGridPoint, Error> {
        let s = s.trim();
        let (zone, x, y) = if let Some(rest) = s.strip_prefix("Zone") {
            let (zone, xy) = rest
                .split_once(':')
                .ok_or_else(|| Error::ParseFailed(format!("missing ':' in {s:?}")))?;
            let (x, y) = xy
                .split_once(',')
                .ok_or_else(|| Error::ParseFailed(format!("missing ',' in {s:?}")))?;
            (zone, x, y)
        } else {
            let tokens: Vec<&str> = s.split_whitespace().collect();
            let &[zone, x, y] = tokens.as_slice() else {
                return Err(Error::ParseFailed(format!(
                    "expected 'ZONE X Y', got {s:?}"
                )));
            };
            (zone, x, y)
        };

        let zone = zone
            .trim()
            .parse()
            .map_err(|_| Error::ParseFailed(format!("bad zone number in {s:?}")))?;
        let parse = |token: &str| -> Result<f64, Error> {
            token
                .trim()
                .parse()
                .map_err(|_| Error::ParseFailed(format!("not a coordinate: {token:?}")))
        };

        // Reject unknown zones up front
        zone_origin(zone)?;
        Ok(JapanGridPoint::new(zone, parse(x)?, parse(y)?))
    }
}

/// The true origin of a zone, or InvalidInput for zones outside 1..19.
pub(crate) fn zone_origin(zone: u8) -> Result<(f64, f64), Error> {
    if zone == 0 {
        return Err(Error::InvalidInput("plane-rectangular zone is 1..19"));
    }
    ZONE_ORIGINS
        .get(usize::from(zone) - 1)
        .copied()
        .ok_or(Error::InvalidInput("plane-rectangular zone is 1..19"))
}

/// The zone whose origin is closest (in squared angular distance) to the
/// position. There is no hard geographic bound: every position selects
/// some zone.
pub(crate) fn nearest_zone(latitude: f64, longitude: f64) -> u8 {
    let mut best = 0;
    let mut best_distance = f64::MAX;
    for (i, (lat_0, lon_0)) in ZONE_ORIGINS.iter().enumerate() {
        let d_lat = latitude - lat_0;
        let d_lon = longitude - lon_0;
        let distance = d_lat * d_lat + d_lon * d_lon;
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best as u8 + 1
}

/// The projection for a zone.
pub(crate) fn zone_projection(zone: u8) -> Result<TransverseMercator, Error> {
    let (lat_0, lon_0) = zone_origin(zone)?;
    Ok(TransverseMercator::japan_zone(lat_0, lon_0))
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_selection() {
        // Tokyo sits in zone 9, Osaka in zone 6, Sapporo in zone 12
        assert_eq!(nearest_zone(35.68, 139.77), 9);
        assert_eq!(nearest_zone(34.69, 135.50), 6);
        assert_eq!(nearest_zone(43.06, 141.35), 12);
        // Naha, far to the south-west
        assert_eq!(nearest_zone(26.21, 127.68), 15);
        // No geographic bound: somewhere over the Pacific still picks a zone
        let zone = nearest_zone(30.0, 160.0);
        assert!((1..=19).contains(&zone));
    }

    #[test]
    fn zone_table() {
        assert_eq!(zone_origin(1).unwrap(), (33.0, 129.5));
        assert_eq!(zone_origin(9).unwrap(), (36.0, 139.8333));
        assert_eq!(zone_origin(19).unwrap(), (26.0, 154.0));
        assert!(zone_origin(0).is_err());
        assert!(zone_origin(20).is_err());
    }

    #[test]
    fn origin_projects_to_zero() {
        // No false offsets: each zone's true origin is (0, 0)
        for zone in 1..=19 {
            let (lat_0, lon_0) = zone_origin(zone).unwrap();
            let (easting, northing) = zone_projection(zone).unwrap().forward(lat_0, lon_0);
            assert!(easting.abs() < 1e-6);
            assert!(northing.abs() < 1e-6);
        }
    }

    #[test]
    fn projection_roundtrip() {
        let proj = zone_projection(9).unwrap();
        for (lat, lon) in [(35.68, 139.77), (36.2, 140.1), (35.0, 139.5)] {
            let (easting, northing) = proj.forward(lat, lon);
            let (lat2, lon2) = proj.inverse(easting, northing);
            assert!((lat - lat2).abs() < 1e-9);
            assert!((lon - lon2).abs() < 1e-9);
        }
    }

    #[test]
    fn text_roundtrip() {
        let p = JapanGridPoint::new(9, -35_446.19, -9_637.412);
        assert_eq!(p.to_string(), "Zone 9: -35446.190, -9637.412");

        let parsed: JapanGridPoint = p.to_string().parse().unwrap();
        assert_eq!(parsed.zone, 9);
        assert!((parsed.x - p.x).abs() < 1e-9);
        assert!((parsed.y - p.y).abs() < 1e-9);

        let parsed: JapanGridPoint = "9 -35446.19 -9637.412".parse().unwrap();
        assert_eq!(parsed.zone, 9);

        assert!("Zone 20: 1.0, 2.0".parse::<JapanGridPoint>().is_err());
        assert!("Zone 9 1.0 2.0".parse::<JapanGridPoint>().is_err());
    }
}
