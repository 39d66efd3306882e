//! Transverse Mercator, as the 6th-order Gauss-Krüger series in the
//! longitude difference from the central meridian (Snyder 1987, eq. 8-9
//! through 8-25, with the footpoint-latitude inverse).

use crate::datum::Datum;
use crate::ellipsoid::Ellipsoid;
use crate::Error;

/// A transverse mercator projection, pinned to an ellipsoid, an origin
/// (central meridian and latitude of origin), a scale factor, and false
/// offsets. The meridional distance of the origin latitude is precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    ellps: Ellipsoid,
    lat_0: f64, // radians
    lon_0: f64, // radians
    k_0: f64,
    x_0: f64,
    y_0: f64,
    m_0: f64,
}

impl TransverseMercator {
    /// General constructor. Angular arguments in degrees, offsets in meters.
    #[must_use]
    pub fn new(
        ellps: Ellipsoid,
        lat_0: f64,
        lon_0: f64,
        k_0: f64,
        x_0: f64,
        y_0: f64,
    ) -> TransverseMercator {
        let lat_0 = lat_0.to_radians();
        TransverseMercator {
            ellps,
            lat_0,
            lon_0: lon_0.to_radians(),
            k_0,
            x_0,
            y_0,
            m_0: ellps.meridional_distance(lat_0),
        }
    }

    /// The UTM projection for a zone: the central meridian follows from the
    /// zone number, k₀ = 0.9996, 500 km false easting, base parallel at the
    /// equator. The southern false northing of 10 000 km is the caller's
    /// concern, since it applies to output values only.
    pub fn utm(ellps: Ellipsoid, zone: u8) -> Result<TransverseMercator, Error> {
        if !(1..=60).contains(&zone) {
            return Err(Error::InvalidUtmZone);
        }
        let lon_0 = f64::from(zone) * 6.0 - 183.0;
        Ok(TransverseMercator::new(ellps, 0.0, lon_0, 0.9996, 500_000.0, 0.0))
    }

    /// The British National Grid projection: Airy 1830, true origin at
    /// 49°N 2°W, k₀ = 0.9996012717, false origin 400 km west / 100 km north
    /// of the true origin.
    #[must_use]
    pub fn osgb() -> TransverseMercator {
        TransverseMercator::new(
            Datum::Osgb36.ellipsoid(),
            49.0,
            -2.0,
            0.999_601_271_7,
            400_000.0,
            -100_000.0,
        )
    }

    /// A Japanese plane-rectangular zone projection: Bessel 1841,
    /// k₀ = 0.9999, and no false offsets, so coordinates are relative to
    /// the zone's true origin.
    #[must_use]
    pub fn japan_zone(lat_0: f64, lon_0: f64) -> TransverseMercator {
        TransverseMercator::new(Datum::Tokyo.ellipsoid(), lat_0, lon_0, 0.9999, 0.0, 0.0)
    }

    /// The central meridian, in radians.
    pub(crate) fn central_meridian(&self) -> f64 {
        self.lon_0
    }

    /// Forward projection: geographic degrees to (easting, northing) meters.
    #[must_use]
    pub fn forward(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let lat = latitude.to_radians();
        let lon = longitude.to_radians();
        let es = self.ellps.eccentricity_squared();

        let (sin_lat, cos_lat) = lat.sin_cos();
        let tan_lat = sin_lat / cos_lat;

        let n = self.ellps.prime_vertical_radius_of_curvature(lat);
        let t = tan_lat * tan_lat;
        let c = es * cos_lat * cos_lat / (1.0 - es);
        let a = (lon - self.lon_0) * cos_lat;
        let m = self.ellps.meridional_distance(lat);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let easting = self.x_0
            + self.k_0
                * n
                * (a + (1.0 - t + c) * a3 / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * es) * a5 / 120.0);

        let northing = self.y_0
            + self.k_0
                * (m - self.m_0
                    + n * tan_lat
                        * (a2 / 2.0
                            + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                            + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * es) * a6 / 720.0));

        (easting, northing)
    }

    /// Inverse projection: (easting, northing) meters to geographic
    /// (latitude, longitude) degrees, through the footpoint latitude.
    #[must_use]
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let eps = self.ellps.second_eccentricity_squared();

        let x = easting - self.x_0;
        let m = self.m_0 + (northing - self.y_0) / self.k_0;
        let fp = self.ellps.footpoint_latitude(m);

        let (sin_fp, cos_fp) = fp.sin_cos();
        let tan_fp = sin_fp / cos_fp;

        let c1 = eps * cos_fp * cos_fp;
        let t1 = tan_fp * tan_fp;
        let r1 = self.ellps.meridian_radius_of_curvature(fp);
        let n1 = self.ellps.prime_vertical_radius_of_curvature(fp);

        let d = x / (n1 * self.k_0);
        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = fp
            - (n1 * tan_fp / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * eps) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * eps
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.lon_0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * eps + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cos_fp;

        (lat.to_degrees(), lon.to_degrees())
    }
}

// ----- Tests ---------------------------------------------------------------------
