//! The ellipsoid model: size-and-shape parameters, derived descriptors,
//! and the registry of the builtin reference ellipsoids.

mod cartesians;
mod meridians;

use phf::phf_map;

use crate::Error;

/// An ellipsoid of revolution, defined by its semimajor axis and
/// flattening. Everything else is derived on demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    name: &'static str,
    a: f64,
    f: f64,
}

/// The builtin ellipsoids, keyed by their PROJ-style identifiers.
static ELLIPSOIDS: phf::Map<&'static str, Ellipsoid> = phf_map! {
    "WGS84"  => Ellipsoid { name: "WGS84",  a: 6_378_137.0,   f: 1. / 298.257_223_563 },
    "GRS80"  => Ellipsoid { name: "GRS80",  a: 6_378_137.0,   f: 1. / 298.257_222_101 },
    "clrk66" => Ellipsoid { name: "clrk66", a: 6_378_206.4,   f: 1. / 294.978_698_2 },
    "intl"   => Ellipsoid { name: "intl",   a: 6_378_388.0,   f: 1. / 297. },
    "bessel" => Ellipsoid { name: "bessel", a: 6_377_397.155, f: 1. / 299.152_812_8 },
    "airy"   => Ellipsoid { name: "airy",   a: 6_377_563.396, f: 1. / 299.324_964_6 },
};

/// Registry lookup that cannot fail: unknown names fall back to WGS84.
pub(crate) fn registry(name: &str) -> Ellipsoid {
    match ELLIPSOIDS.get(name) {
        Some(ellps) => *ellps,
        None => ELLIPSOIDS["WGS84"],
    }
}

impl Default for Ellipsoid {
    fn default() -> Ellipsoid {
        registry("WGS84")
    }
}

/// Constructors
impl Ellipsoid {
    /// A user-defined ellipsoid. The parameters are taken at face value;
    /// the validating entry point is `Context::set_custom_ellipsoid`.
    #[must_use]
    pub fn new(semimajor_axis: f64, flattening: f64) -> Ellipsoid {
        Ellipsoid {
            name: "custom",
            a: semimajor_axis,
            f: flattening,
        }
    }

    /// One of the builtin ellipsoids, by its PROJ-style identifier.
    pub fn named(name: &str) -> Result<Ellipsoid, Error> {
        ELLIPSOIDS
            .get(name)
            .copied()
            .ok_or(Error::InvalidInput("unknown ellipsoid name"))
    }
}

/// Size and shape
impl Ellipsoid {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The semimajor axis, *a*
    #[must_use]
    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    /// The flattening, *f = (a - b)/a*
    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    /// The semiminor axis, *b*
    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// The squared eccentricity, *e² = (a² - b²) / a² = f (2 - f)*
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// The squared second eccentricity, *e'² = (a² - b²) / b² = e² / (1 - e²)*
    #[must_use]
    pub fn second_eccentricity_squared(&self) -> f64 {
        let es = self.eccentricity_squared();
        es / (1.0 - es)
    }

    /// The radius of curvature in the prime vertical, *N*, at `latitude`
    /// (in radians)
    #[must_use]
    pub fn prime_vertical_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        self.a / (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).sqrt()
    }

    /// The meridian radius of curvature, *M*, at `latitude` (in radians)
    #[must_use]
    pub fn meridian_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        let es = self.eccentricity_squared();
        let num = self.a * (1.0 - es);
        let denom = (1.0 - latitude.sin().powi(2) * es).powf(1.5);
        num / denom
    }
}

// ----- Tests ---------------------------------------------------------------------
