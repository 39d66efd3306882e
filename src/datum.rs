//! Datums and the seven-parameter Helmert shift between them.

use enum_iterator::Sequence;

use crate::ellipsoid::{registry, Ellipsoid};

pub(crate) const ARC_SEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);
pub(crate) const PPM_TO_SCALE: f64 = 1e-6;

/// The reference frames known to the crate.
///
/// `MgrsGrid` and `UtmGrid` are pseudo-datums aliasing WGS84; they carry no
/// physical meaning of their own and exist so grid-tagged values can flow
/// through the same dispatcher paths as the true datums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum Datum {
    /// World Geodetic System 1984
    Wgs84,
    /// Alias of WGS84 for MGRS-tagged values
    MgrsGrid,
    /// Alias of WGS84 for UTM-tagged values
    UtmGrid,
    /// North American Datum 1983, on GRS80
    Nad83,
    /// North American Datum 1927, on Clarke 1866
    Nad27,
    /// European Datum 1950, on International 1924
    Ed50,
    /// Tokyo Datum, on Bessel 1841
    Tokyo,
    /// Ordnance Survey of Great Britain 1936, on Airy 1830
    Osgb36,
}

/// Number of datums; sizes the dense per-pair transform table.
pub(crate) const DATUM_COUNT: usize = Datum::CARDINALITY;

impl Datum {
    /// Position in dense per-pair tables.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The identifier of the ellipsoid this datum is anchored on.
    #[must_use]
    pub fn ellipsoid_name(self) -> &'static str {
        match self {
            Datum::Wgs84 | Datum::MgrsGrid | Datum::UtmGrid => "WGS84",
            Datum::Nad83 => "GRS80",
            Datum::Nad27 => "clrk66",
            Datum::Ed50 => "intl",
            Datum::Tokyo => "bessel",
            Datum::Osgb36 => "airy",
        }
    }

    /// The ellipsoid this datum is anchored on.
    #[must_use]
    pub fn ellipsoid(self) -> Ellipsoid {
        registry(self.ellipsoid_name())
    }
}

/// Seven-parameter Helmert transformation, position-vector convention:
/// translations in meters, rotations in arc seconds, scale in parts per
/// million. The all-zero default is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DatumTransform {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub scale: f64,
}

impl DatumTransform {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(dx: f64, dy: f64, dz: f64, rx: f64, ry: f64, rz: f64, scale: f64) -> DatumTransform {
        DatumTransform {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
            scale,
        }
    }

    /// Apply to a geocentric cartesian coordinate, in the linearized
    /// (small-angle) position-vector form.
    #[must_use]
    pub fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let rx = self.rx * ARC_SEC_TO_RAD;
        let ry = self.ry * ARC_SEC_TO_RAD;
        let rz = self.rz * ARC_SEC_TO_RAD;
        let s = 1.0 + self.scale * PPM_TO_SCALE;

        [
            self.dx + s * x + rz * y - ry * z,
            self.dy - rz * x + s * y + rx * z,
            self.dz + ry * x - rx * y + s * z,
        ]
    }

    /// The analytically derived reverse parameter set: negated scale and
    /// rotations, translations scaled by 1/(1+σ) with a first-order
    /// rotation-coupling correction.
    #[must_use]
    pub fn inverted(&self) -> DatumTransform {
        let factor = 1.0 / (1.0 + self.scale * PPM_TO_SCALE);

        let mut inverse = DatumTransform {
            dx: -self.dx * factor,
            dy: -self.dy * factor,
            dz: -self.dz * factor,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
            scale: -self.scale,
        };

        // r × d, with the rotations taken to radians
        let dx_coupling = (self.ry * self.dz - self.rz * self.dy) * ARC_SEC_TO_RAD;
        let dy_coupling = (self.rz * self.dx - self.rx * self.dz) * ARC_SEC_TO_RAD;
        let dz_coupling = (self.rx * self.dy - self.ry * self.dx) * ARC_SEC_TO_RAD;

        inverse.dx -= dx_coupling * factor;
        inverse.dy -= dy_coupling * factor;
        inverse.dz -= dz_coupling * factor;
        inverse
    }
}

// ----- Tests ---------------------------------------------------------------------
