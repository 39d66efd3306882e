//! MGRS 100 km square lettering on top of UTM.
//!
//! Column letters run through the 24-letter alphabet (I and O skipped) in
//! the six-set cycle with origins A, J, S, A, J, S selected by the zone
//! number; row letters use the first twenty letters of the same alphabet,
//! shifted by five rows in even zones.

use std::fmt;
use std::str::FromStr;

use crate::datum::Datum;
use crate::utm::{is_valid_band, UtmPoint};
use crate::Error;

/// The 24-letter MGRS alphabet: A..Z with I and O skipped.
const GRID_LETTERS: &[u8; 24] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Column-letter origins for the six zone sets.
const SET_ORIGINS: &[u8; 6] = b"AJSAJS";

/// Rows repeat every 20 squares, i.e. every 2000 km of northing.
const ROWS_PER_CYCLE: i64 = 20;

/// An MGRS reference: UTM zone and band, the 100 km square letter pair
/// (column, then row), and intra-square easting/northing in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MgrsPoint {
    pub zone: u8,
    pub band: char,
    pub square: [char; 2],
    pub easting: f64,
    pub northing: f64,
    pub datum: Datum,
}

impl MgrsPoint {
    #[must_use]
    pub fn new(
        zone: u8,
        band: char,
        square: [char; 2],
        easting: f64,
        northing: f64,
        datum: Datum,
    ) -> MgrsPoint {
        MgrsPoint {
            zone,
            band,
            square,
            easting,
            northing,
            datum,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=60).contains(&self.zone) {
            return Err(Error::InvalidUtmZone);
        }
        if !is_valid_band(self.band) {
            return Err(Error::InvalidCoord("latitude band letter"));
        }
        if letter_index(self.square[0]).is_none() {
            return Err(Error::InvalidCoord("column letter"));
        }
        match letter_index(self.square[1]) {
            Some(row) if row < ROWS_PER_CYCLE as usize => (),
            _ => return Err(Error::InvalidCoord("row letter")),
        }
        if !(0.0..100_000.0).contains(&self.easting) || !(0.0..100_000.0).contains(&self.northing)
        {
            return Err(Error::InvalidCoord("intra-square offset outside 100 km"));
        }
        Ok(())
    }
}

/// `{zone}{band} {square} {easting} {northing}`, offsets zero-padded to
/// five digits.
impl fmt::Display for MgrsPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{} {}{} {:05.0} {:05.0}",
            self.zone, self.band, self.square[0], self.square[1], self.easting, self.northing
        )
    }
}

/// Parse `51R UQ 54731 56575` or `51RUQ 54731 56575`, on WGS84.
impl FromStr for MgrsPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<MgrsPoint, Error> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let (head, square, easting, northing) = match tokens[..] {
            [head, square, easting, northing] => (head, square, easting, northing),
            [head_and_square, easting, northing]
                if head_and_square.len() > 2 && head_and_square.is_ascii() =>
            {
                let split = head_and_square.len() - 2;
                (
                    &head_and_square[..split],
                    &head_and_square[split..],
                    easting,
                    northing,
                )
            }
            _ => {
                return Err(Error::ParseFailed(format!(
                    "expected 'ZONEBAND SQUARE EASTING NORTHING', got {s:?}"
                )))
            }
        };

        let band = head
            .chars()
            .last()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(|| Error::ParseFailed(format!("missing band letter in {head:?}")))?
            .to_ascii_uppercase();
        let zone = head[..head.len() - 1]
            .parse()
            .map_err(|_| Error::ParseFailed(format!("bad zone number in {head:?}")))?;

        let mut square_letters = square.chars().map(|c| c.to_ascii_uppercase());
        let square = match (square_letters.next(), square_letters.next(), square_letters.next()) {
            (Some(column), Some(row), None) => [column, row],
            _ => {
                return Err(Error::ParseFailed(format!(
                    "square must be two letters, got {square:?}"
                )))
            }
        };

        let parse = |token: &str| -> Result<f64, Error> {
            token
                .parse()
                .map_err(|_| Error::ParseFailed(format!("not a grid offset: {token:?}")))
        };

        let point = MgrsPoint::new(zone, band, square, parse(easting)?, parse(northing)?, Datum::Wgs84);
        point.validate()?;
        Ok(point)
    }
}

/// Position of a letter in the 24-letter alphabet.
fn letter_index(letter: char) -> Option<usize> {
    GRID_LETTERS.iter().position(|l| *l as char == letter)
}

/// The column-letter origin of a zone, from the six-set cycle.
fn column_origin(zone: u8) -> usize {
    let origin = SET_ORIGINS[(usize::from(zone) - 1) % 6] as char;
    // The origins are members of the alphabet, so the lookup cannot miss
    letter_index(origin).unwrap_or(0)
}

/// The column letter of the `col_100k`-th 100 km column (1-based, false
/// easting included), stepping through the alphabet from the zone's origin.
fn column_letter(zone: u8, col_100k: usize) -> char {
    GRID_LETTERS[(column_origin(zone) + col_100k - 1) % GRID_LETTERS.len()] as char
}

/// Inverse of [`column_letter`]: the 1-based 100 km column index.
fn column_index(zone: u8, letter: char) -> Result<usize, Error> {
    let position = letter_index(letter).ok_or(Error::InvalidCoord("column letter"))?;
    let steps = (position + GRID_LETTERS.len() - column_origin(zone)) % GRID_LETTERS.len();
    Ok(steps + 1)
}

/// The row-letter shift: odd/even zones alternate by five rows, with the
/// parity reversed in the southern hemisphere.
fn row_offset(zone: u8, southern: bool) -> i64 {
    let shifted = if southern { zone % 2 == 1 } else { zone % 2 == 0 };
    if shifted {
        5
    } else {
        0
    }
}

/// The lowest northing of a latitude band, in the hemisphere convention of
/// [`UtmPoint`] (southern bands carry the false northing). Disambiguates
/// the 2000 km row-letter cycle when decoding.
fn band_min_northing(band: char) -> Result<f64, Error> {
    let min = match band {
        'C' => 1_100_000.0,
        'D' => 2_000_000.0,
        'E' => 2_800_000.0,
        'F' => 3_700_000.0,
        'G' => 4_600_000.0,
        'H' => 5_500_000.0,
        'J' => 6_400_000.0,
        'K' => 7_300_000.0,
        'L' => 8_200_000.0,
        'M' => 9_100_000.0,
        'N' => 0.0,
        'P' => 800_000.0,
        'Q' => 1_700_000.0,
        'R' => 2_600_000.0,
        'S' => 3_500_000.0,
        'T' => 4_400_000.0,
        'U' => 5_300_000.0,
        'V' => 6_200_000.0,
        'W' => 7_000_000.0,
        'X' => 7_900_000.0,
        _ => return Err(Error::InvalidCoord("latitude band letter")),
    };
    Ok(min)
}

/// Encode a UTM value as an MGRS reference.
pub(crate) fn from_utm(utm: &UtmPoint) -> Result<MgrsPoint, Error> {
    utm.validate()?;

    let col_100k = (utm.easting / 100_000.0).floor() as usize;
    let column = column_letter(utm.zone, col_100k);

    // Rows count true northing: the southern false northing comes off first
    let true_northing = if utm.is_southern() {
        utm.northing - 10_000_000.0
    } else {
        utm.northing
    };
    let row_100k = true_northing.div_euclid(100_000.0) as i64;
    let row_index = (row_100k + row_offset(utm.zone, utm.is_southern())).rem_euclid(ROWS_PER_CYCLE);
    let row = GRID_LETTERS[row_index as usize] as char;

    Ok(MgrsPoint {
        zone: utm.zone,
        band: utm.band,
        square: [column, row],
        easting: utm.easting.rem_euclid(100_000.0),
        northing: true_northing.rem_euclid(100_000.0),
        datum: utm.datum,
    })
}

/// Decode an MGRS reference to the UTM value it names.
pub(crate) fn to_utm(mgrs: &MgrsPoint) -> Result<UtmPoint, Error> {
    mgrs.validate()?;

    let col_100k = column_index(mgrs.zone, mgrs.square[0])?;
    let easting = col_100k as f64 * 100_000.0 + mgrs.easting;

    let southern = mgrs.band < 'N';
    let row_position = letter_index(mgrs.square[1]).ok_or(Error::InvalidCoord("row letter"))? as i64;
    let row_100k = (row_position - row_offset(mgrs.zone, southern)).rem_euclid(ROWS_PER_CYCLE);

    // The row cycle repeats every 2000 km; the band picks the repetition
    let minimum = band_min_northing(mgrs.band)?;
    let mut northing = row_100k as f64 * 100_000.0 + mgrs.northing;
    while northing < minimum {
        northing += 2_000_000.0;
    }
    if southern {
        northing += 10_000_000.0;
    }

    let utm = UtmPoint::new(mgrs.zone, mgrs.band, easting, northing, mgrs.datum);
    utm.validate()?;
    Ok(utm)
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_follow_the_six_set_cycle() {
        // Zone 50 falls in set 2, whose origin is J; the fifth column is N
        assert_eq!(column_letter(50, 5), 'N');

        // Set origins repeat with period 6
        assert_eq!(column_letter(1, 1), 'A');
        assert_eq!(column_letter(2, 1), 'J');
        assert_eq!(column_letter(3, 1), 'S');
        assert_eq!(column_letter(4, 1), 'A');
        assert_eq!(column_letter(7, 1), 'A');
        assert_eq!(column_letter(60, 1), 'S');

        // Stepping over I and O: H is followed by J, and the eighth column
        // of an A-origin zone is H
        assert_eq!(column_letter(1, 8), 'H');
        assert_eq!(column_letter(2, 8), 'R');
    }

    #[test]
    fn column_letters_never_i_or_o() {
        for zone in 1..=60 {
            for col in 1..=8 {
                let letter = column_letter(zone, col);
                assert!(letter != 'I' && letter != 'O');
                // and the decode inverts the encode
                assert_eq!(column_index(zone, letter).unwrap(), col);
            }
        }
    }

    #[test]
    fn row_offsets() {
        assert_eq!(row_offset(51, false), 0);
        assert_eq!(row_offset(50, false), 5);
        assert_eq!(row_offset(51, true), 5);
        assert_eq!(row_offset(50, true), 0);
    }

    #[test]
    fn encode_northern_point() {
        // Shanghai-ish: zone 51R, easting 354 731, northing 3 456 575
        let utm = UtmPoint::new(51, 'R', 354_731.0, 3_456_575.0, Datum::Wgs84);
        let mgrs = from_utm(&utm).unwrap();

        assert_eq!(mgrs.zone, 51);
        assert_eq!(mgrs.band, 'R');
        // col 3 in an S-origin zone: S, T, U
        assert_eq!(mgrs.square[0], 'U');
        // row 34 mod 20 = 14, no shift in an odd zone: letter Q
        assert_eq!(mgrs.square[1], 'Q');
        assert_eq!(mgrs.easting, 54_731.0);
        assert_eq!(mgrs.northing, 56_575.0);
    }

    #[test]
    fn decode_inverts_encode() {
        let utm = UtmPoint::new(51, 'R', 354_731.0, 3_456_575.0, Datum::Wgs84);
        let mgrs = from_utm(&utm).unwrap();
        let back = to_utm(&mgrs).unwrap();

        assert_eq!(back.zone, utm.zone);
        assert_eq!(back.band, utm.band);
        assert!((back.easting - utm.easting).abs() < 1e-9);
        assert!((back.northing - utm.northing).abs() < 1e-9);
    }

    #[test]
    fn southern_hemisphere_roundtrip() {
        // Sydney-ish (band H) and a deep-southern band C value
        for (zone, band, easting, northing) in [
            (56, 'H', 334_786.0, 16_251_004.0),
            (20, 'C', 500_000.0, 11_400_000.0),
            (33, 'F', 450_000.0, 13_901_092.0),
        ] {
            let utm = UtmPoint::new(zone, band, easting, northing, Datum::Wgs84);
            let mgrs = from_utm(&utm).unwrap();
            assert!(mgrs.square.iter().all(|l| *l != 'I' && *l != 'O'));

            let back = to_utm(&mgrs).unwrap();
            assert_eq!(back.band, band);
            assert!((back.easting - easting).abs() < 1e-9);
            assert!((back.northing - northing).abs() < 1e-9);
        }
    }

    #[test]
    fn display_and_parse() {
        let utm = UtmPoint::new(51, 'R', 354_731.4, 3_456_575.9, Datum::Wgs84);
        let mgrs = from_utm(&utm).unwrap();
        let text = mgrs.to_string();
        assert_eq!(text, "51R UQ 54731 56576");

        let parsed: MgrsPoint = text.parse().unwrap();
        assert_eq!(parsed.zone, 51);
        assert_eq!(parsed.band, 'R');
        assert_eq!(parsed.square, ['U', 'Q']);

        // Compact head, lowercase letters
        let parsed: MgrsPoint = "51rUQ 54731 56576".parse().unwrap();
        assert_eq!(parsed.square, ['U', 'Q']);

        // Small offsets are zero-padded on output
        let narrow = MgrsPoint::new(51, 'R', ['U', 'Q'], 12.0, 7.0, Datum::Wgs84);
        assert_eq!(narrow.to_string(), "51R UQ 00012 00007");

        assert!("51R UQI 54731 56576".parse::<MgrsPoint>().is_err());
        assert!("51R IQ 54731 56576".parse::<MgrsPoint>().is_err());
        assert!("51R UW 54731 56576".parse::<MgrsPoint>().is_err()); // W is not a row letter
        assert!("51R UQ 54731".parse::<MgrsPoint>().is_err());
    }

    #[test]
    fn band_minimums_cover_all_bands() {
        for band in "CDEFGHJKLMNPQRSTUVWX".chars() {
            assert!(band_min_northing(band).is_ok());
        }
        assert!(band_min_northing('I').is_err());
    }
}
