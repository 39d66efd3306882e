//! The geographic coordinate value type, with its textual forms.

use std::fmt;
use std::str::FromStr;

use crate::angular;
use crate::Datum;
use crate::Error;

/// Is `lat` a usable latitude, in [-90, 90] degrees?
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// Is `lon` a usable longitude, in [-180, 180] degrees?
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// A geographic position: latitude and longitude in degrees, altitude in
/// meters, tagged with the datum it refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoord {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub datum: Datum,
}

impl GeoCoord {
    /// A new position. The longitude is wrapped onto [-180, 180] by whole
    /// turns and the latitude clamped to [-90, 90].
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, altitude: f64, datum: Datum) -> GeoCoord {
        GeoCoord {
            latitude: angular::normalize_latitude(latitude),
            longitude: angular::normalize_longitude(longitude),
            altitude,
            datum,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_latitude(self.latitude) && is_valid_longitude(self.longitude)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.is_valid() {
            return Err(Error::InvalidCoord("latitude or longitude out of range"));
        }
        Ok(())
    }

    /// Decimal degrees: `31.230416°N, 121.473701°E`
    #[must_use]
    pub fn to_dd_string(&self) -> String {
        format!(
            "{:.6}°{}, {:.6}°{}",
            self.latitude.abs(),
            hemisphere(self.latitude, 'N', 'S'),
            self.longitude.abs(),
            hemisphere(self.longitude, 'E', 'W'),
        )
    }

    /// Degrees and decimal minutes: `31°13.825'N, 121°28.422'E`
    #[must_use]
    pub fn to_dmm_string(&self) -> String {
        let (lat_d, lat_m) = angular::dd_to_dm(self.latitude.abs());
        let (lon_d, lon_m) = angular::dd_to_dm(self.longitude.abs());
        format!(
            "{}°{:.3}'{}, {}°{:.3}'{}",
            lat_d,
            lat_m,
            hemisphere(self.latitude, 'N', 'S'),
            lon_d,
            lon_m,
            hemisphere(self.longitude, 'E', 'W'),
        )
    }

    /// Degrees, minutes and decimal seconds: `31°13'49.50"N, 121°28'25.32"E`
    #[must_use]
    pub fn to_dms_string(&self) -> String {
        let (lat_d, lat_m, lat_s) = angular::dd_to_dms(self.latitude.abs());
        let (lon_d, lon_m, lon_s) = angular::dd_to_dms(self.longitude.abs());
        format!(
            "{}°{}'{:.2}\"{}, {}°{}'{:.2}\"{}",
            lat_d,
            lat_m,
            lat_s,
            hemisphere(self.latitude, 'N', 'S'),
            lon_d,
            lon_m,
            lon_s,
            hemisphere(self.longitude, 'E', 'W'),
        )
    }

    /// Parse the decimal-degree form, with optional hemisphere letters and
    /// degree signs: `31.230416°N, 121.473701°E` or `31.230416, 121.473701`.
    pub fn parse_dd(s: &str, datum: Datum) -> Result<GeoCoord, Error> {
        let (lat, lon) = split_pair(s)?;
        let lat = parse_dd_component(lat, 'N', 'S')?;
        let lon = parse_dd_component(lon, 'E', 'W')?;
        from_parsed(lat, lon, datum)
    }

    /// Parse the degrees-and-minutes form: `31°13.825'N, 121°28.422'E`.
    pub fn parse_dmm(s: &str, datum: Datum) -> Result<GeoCoord, Error> {
        let (lat, lon) = split_pair(s)?;
        let lat = parse_dmm_component(lat, 'N', 'S')?;
        let lon = parse_dmm_component(lon, 'E', 'W')?;
        from_parsed(lat, lon, datum)
    }

    /// Parse the degrees-minutes-seconds form: `31°13'49.5"N, 121°28'25.32"E`.
    pub fn parse_dms(s: &str, datum: Datum) -> Result<GeoCoord, Error> {
        let (lat, lon) = split_pair(s)?;
        let lat = parse_dms_component(lat, 'N', 'S')?;
        let lon = parse_dms_component(lon, 'E', 'W')?;
        from_parsed(lat, lon, datum)
    }
}

/// The decimal-degree form, as produced by [`GeoCoord::to_dd_string`].
impl fmt::Display for GeoCoord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_dd_string())
    }
}

/// Auto-detecting parser over the three geographic forms, on WGS84.
impl FromStr for GeoCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<GeoCoord, Error> {
        GeoCoord::parse_dd(s, Datum::Wgs84)
            .or_else(|_| GeoCoord::parse_dms(s, Datum::Wgs84))
            .or_else(|_| GeoCoord::parse_dmm(s, Datum::Wgs84))
            .map_err(|_| Error::ParseFailed(format!("unrecognized coordinate {s:?}")))
    }
}

fn hemisphere(value: f64, positive: char, negative: char) -> char {
    if value >= 0.0 {
        positive
    } else {
        negative
    }
}

fn from_parsed(lat: f64, lon: f64, datum: Datum) -> Result<GeoCoord, Error> {
    if !is_valid_latitude(lat) || !is_valid_longitude(lon) {
        return Err(Error::OutOfRange("parsed coordinate out of range"));
    }
    Ok(GeoCoord::new(lat, lon, 0.0, datum))
}

fn split_pair(s: &str) -> Result<(&str, &str), Error> {
    if let Some((lat, lon)) = s.split_once(',') {
        return Ok((lat.trim(), lon.trim()));
    }
    // Without a comma, fall back to a whitespace-separated pair
    let mut parts = s.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => Ok((lat, lon)),
        _ => Err(Error::ParseFailed(format!(
            "expected two comma- or space-separated components in {s:?}"
        ))),
    }
}

/// Strip an optional trailing hemisphere letter, returning the sign it
/// implies and the remainder.
fn strip_hemisphere(s: &str, positive: char, negative: char) -> (f64, &str) {
    let s = s.trim();
    if let Some(rest) = strip_letter(s, positive) {
        return (1.0, rest.trim_end());
    }
    if let Some(rest) = strip_letter(s, negative) {
        return (-1.0, rest.trim_end());
    }
    (1.0, s)
}

fn strip_letter(s: &str, letter: char) -> Option<&str> {
    s.strip_suffix(letter)
        .or_else(|| s.strip_suffix(letter.to_ascii_lowercase()))
}

fn number(s: &str) -> Result<f64, Error> {
    s.trim()
        .parse()
        .map_err(|_| Error::ParseFailed(format!("not a number: {s:?}")))
}

fn parse_dd_component(s: &str, positive: char, negative: char) -> Result<f64, Error> {
    let (sign, s) = strip_hemisphere(s, positive, negative);
    let s = s.strip_suffix('°').unwrap_or(s);
    Ok(sign * number(s)?)
}

fn parse_dmm_component(s: &str, positive: char, negative: char) -> Result<f64, Error> {
    let (sign, s) = strip_hemisphere(s, positive, negative);
    let (d, rest) = s
        .split_once('°')
        .ok_or_else(|| Error::ParseFailed(format!("missing degree sign in {s:?}")))?;
    let m = rest.trim().trim_end_matches('\'');
    Ok(sign * angular::dm_to_dd(integer(d)?, number(m)?))
}

fn parse_dms_component(s: &str, positive: char, negative: char) -> Result<f64, Error> {
    let (sign, s) = strip_hemisphere(s, positive, negative);
    let (d, rest) = s
        .split_once('°')
        .ok_or_else(|| Error::ParseFailed(format!("missing degree sign in {s:?}")))?;
    let (m, rest) = rest
        .split_once('\'')
        .ok_or_else(|| Error::ParseFailed(format!("missing minutes in {s:?}")))?;
    let sec = rest.trim().trim_end_matches('"');
    let minutes: u16 = m
        .trim()
        .parse()
        .map_err(|_| Error::ParseFailed(format!("bad minutes in {s:?}")))?;
    Ok(sign * angular::dms_to_dd(integer(d)?, minutes, number(sec)?))
}

fn integer(s: &str) -> Result<i32, Error> {
    s.trim()
        .parse()
        .map_err(|_| Error::ParseFailed(format!("not an integer: {s:?}")))
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_normalizes() {
        let c = GeoCoord::new(91.0, 190.0, 0.0, Datum::Wgs84);
        assert_eq!(c.latitude, 90.0);
        assert_eq!(c.longitude, -170.0);
        assert!(c.is_valid());
        assert!(c.validate().is_ok());

        let bad = GeoCoord {
            latitude: f64::NAN,
            longitude: 0.0,
            altitude: 0.0,
            datum: Datum::Wgs84,
        };
        assert!(!bad.is_valid());
        assert_eq!(bad.validate().unwrap_err().code(), 6);
    }

    #[test]
    fn display_forms() {
        let shanghai = GeoCoord::new(31.230416, 121.473701, 0.0, Datum::Wgs84);
        assert_eq!(shanghai.to_dd_string(), "31.230416°N, 121.473701°E");
        assert_eq!(shanghai.to_dmm_string(), "31°13.825'N, 121°28.422'E");
        assert_eq!(shanghai.to_dms_string(), "31°13'49.50\"N, 121°28'25.32\"E");
        assert_eq!(shanghai.to_string(), shanghai.to_dd_string());

        let south_west = GeoCoord::new(-33.868820, -151.209296, 0.0, Datum::Wgs84);
        assert_eq!(south_west.to_dd_string(), "33.868820°S, 151.209296°W");
    }

    #[test]
    fn parse_dd() {
        let c = GeoCoord::parse_dd("31.230416°N, 121.473701°E", Datum::Wgs84).unwrap();
        assert!((c.latitude - 31.230416).abs() < 1e-9);
        assert!((c.longitude - 121.473701).abs() < 1e-9);

        // Bare numbers, southern and western hemispheres by sign
        let c = GeoCoord::parse_dd("-33.8688, -151.2093", Datum::Wgs84).unwrap();
        assert!((c.latitude + 33.8688).abs() < 1e-9);
        assert!((c.longitude + 151.2093).abs() < 1e-9);

        // Hemisphere letters instead of signs
        let c = GeoCoord::parse_dd("33.8688°S, 151.2093°E", Datum::Wgs84).unwrap();
        assert!((c.latitude + 33.8688).abs() < 1e-9);
        assert!((c.longitude - 151.2093).abs() < 1e-9);

        assert!(GeoCoord::parse_dd("91.0, 0.0", Datum::Wgs84).is_err());
        assert!(GeoCoord::parse_dd("gibberish", Datum::Wgs84).is_err());
    }

    #[test]
    fn parse_dmm_and_dms() {
        let c = GeoCoord::parse_dmm("31°13.825'N, 121°28.422'E", Datum::Wgs84).unwrap();
        assert!((c.latitude - 31.230416).abs() < 1e-4);
        assert!((c.longitude - 121.4737).abs() < 1e-4);

        let c = GeoCoord::parse_dms("31°13'49.5\"N, 121°28'25.32\"E", Datum::Wgs84).unwrap();
        assert!((c.latitude - 31.230416).abs() < 1e-5);
        assert!((c.longitude - 121.473701).abs() < 1e-5);

        let c = GeoCoord::parse_dms("33°52'7.9\"S, 151°12'33.5\"E", Datum::Wgs84).unwrap();
        assert!(c.latitude < 0.0);
        assert!(c.longitude > 0.0);
    }

    #[test]
    fn roundtrip_through_text() {
        let original = GeoCoord::new(-33.868820, 151.209296, 0.0, Datum::Wgs84);
        let parsed: GeoCoord = original.to_dd_string().parse().unwrap();
        assert!((parsed.latitude - original.latitude).abs() < 1e-6);
        assert!((parsed.longitude - original.longitude).abs() < 1e-6);

        let parsed = GeoCoord::parse_dms(&original.to_dms_string(), Datum::Wgs84).unwrap();
        assert!((parsed.latitude - original.latitude).abs() < 1e-4);
        assert!((parsed.longitude - original.longitude).abs() < 1e-4);
    }
}
