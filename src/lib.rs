#![doc = include_str!("../README.md")]

mod angular;
mod bng;
mod context;
mod coord;
mod datum;
mod ellipsoid;
mod jpn;
mod mgrs;
mod tmerc;
mod utm;

pub use crate::bng::BritishGridPoint;
pub use crate::context::{Context, ErrorSink, GeodesicResult};
pub use crate::coord::{is_valid_latitude, is_valid_longitude, GeoCoord};
pub use crate::datum::{Datum, DatumTransform};
pub use crate::ellipsoid::Ellipsoid;
pub use crate::jpn::JapanGridPoint;
pub use crate::mgrs::MgrsPoint;
pub use crate::tmerc::TransverseMercator;
pub use crate::utm::{utm_band, utm_zone, UtmPoint};

use thiserror::Error as ThisError;

/// The crate-wide error enumeration. Every variant corresponds to one of
/// the stable integer codes of the external interface, exposed through
/// [`Error::code`] (0 is reserved for success and has no variant).
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("out of range: {0}")]
    OutOfRange(&'static str),

    #[error("parse error: {0}")]
    ParseFailed(String),

    #[error("format error: {0}")]
    Format(&'static str),

    /// Kept for code-table stability. Allocation failure aborts in Rust,
    /// so nothing in this crate constructs the variant.
    #[error("memory allocation failed")]
    Memory,

    #[error("invalid coordinate: {0}")]
    InvalidCoord(&'static str),

    #[error("invalid UTM zone")]
    InvalidUtmZone,

    #[error("datum transformation failed: {0}")]
    DatumTransform(&'static str),

    #[error("calculation error: {0}")]
    Calculation(&'static str),

    #[error("unsupported format")]
    UnsupportedFormat,
}

impl Error {
    /// The stable integer code of this error kind.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidInput(_) => 1,
            Error::OutOfRange(_) => 2,
            Error::ParseFailed(_) => 3,
            Error::Format(_) => 4,
            Error::Memory => 5,
            Error::InvalidCoord(_) => 6,
            Error::InvalidUtmZone => 7,
            Error::DatumTransform(_) => 8,
            Error::Calculation(_) => 9,
            Error::UnsupportedFormat => 10,
        }
    }
}

/// The textual coordinate representations the [`Context`] dispatcher
/// produces ([`Context::convert`]) and consumes ([`Context::parse`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Decimal degrees: `31.230416°N, 121.473701°E`
    Dd,
    /// Degrees and decimal minutes: `31°13.825'N, 121°28.422'E`
    Dmm,
    /// Degrees, minutes and decimal seconds: `31°13'49.50"N, 121°28'25.32"E`
    Dms,
    /// UTM zone, band, easting and northing: `51R 354731E 3456575N`
    Utm,
    /// MGRS with the 100 km square letter pair: `51R UQ 54731 56575`
    Mgrs,
    /// British National Grid: `FB 530340 181680`
    BritishGrid,
    /// Japanese plane-rectangular grid: `Zone 9: -35446.190, -5966.417`
    JapanGrid,
}
