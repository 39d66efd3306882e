use std::f64::consts::FRAC_PI_2;

use super::Ellipsoid;

impl Ellipsoid {
    /// Geographic to geocentric cartesian conversion. Angular input in
    /// radians, height in meters.
    #[must_use]
    pub fn cartesian(&self, longitude: f64, latitude: f64, height: f64) -> [f64; 3] {
        let n = self.prime_vertical_radius_of_curvature(latitude);
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();

        [
            (n + height) * cos_lat * cos_lon,
            (n + height) * cos_lat * sin_lon,
            (n * (1.0 - self.eccentricity_squared()) + height) * sin_lat,
        ]
    }

    /// Geocentric cartesian to geographic conversion, by the closed form
    /// with the auxiliary angle θ = atan2(Z·a, p·b). Returns
    /// [longitude, latitude, height], angles in radians.
    #[must_use]
    #[allow(clippy::many_single_char_names)] // mimic the textbook notation
    pub fn geographic(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        let a = self.semimajor_axis();
        let b = self.semiminor_axis();
        let es = self.eccentricity_squared();
        let eps = self.second_eccentricity_squared();

        let lon = y.atan2(x);

        // Distance from the rotation axis
        let p = x.hypot(y);

        // On (or numerically at) the axis, the latitude is a pole and the
        // height is measured along the axis
        if p < 1.0e-12 {
            let lat = FRAC_PI_2.copysign(z);
            return [lon, lat, z.abs() - b];
        }

        let theta = (z * a).atan2(p * b);
        let (sin_theta, cos_theta) = theta.sin_cos();
        let lat = (z + eps * b * sin_theta.powi(3)).atan2(p - es * a * cos_theta.powi(3));

        let n = self.prime_vertical_radius_of_curvature(lat);
        let height = p / lat.cos() - n;

        [lon, lat, height]
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn geo_to_cart_roundtrip() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;
        let (lon, lat, h) = (12_f64.to_radians(), 55_f64.to_radians(), 100.0);

        let [x, y, z] = ellps.cartesian(lon, lat, h);
        let [lon2, lat2, h2] = ellps.geographic(x, y, z);

        assert!((lon - lon2).abs() < 1e-12);
        assert!((lat - lat2).abs() < 1e-12);
        assert!((h - h2).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn equator_and_pole() -> Result<(), Error> {
        let ellps = Ellipsoid::named("WGS84")?;

        // On the equator at the prime meridian, X is the semimajor axis
        let [x, y, z] = ellps.cartesian(0.0, 0.0, 0.0);
        assert!((x - ellps.semimajor_axis()).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        assert!(z.abs() < 1e-9);

        // At the pole, Z is the semiminor axis, and the inverse conversion
        // takes the on-axis branch
        let [x, y, z] = ellps.cartesian(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        assert!(x.abs() < 1e-8);
        assert!((z - ellps.semiminor_axis()).abs() < 1e-8);

        let [_, lat, h] = ellps.geographic(0.0, y, z);
        assert!((lat - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(h.abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn geocentric_radius_stays_between_axes() -> Result<(), Error> {
        let ellps = Ellipsoid::named("WGS84")?;
        for lat in [-80.0, -45.0, -10.0, 0.0, 30.0, 60.0, 89.0_f64] {
            for lon in [-170.0, -60.0, 0.0, 45.0, 120.0_f64] {
                let [x, y, z] = ellps.cartesian(lon.to_radians(), lat.to_radians(), 0.0);
                let r = (x * x + y * y + z * z).sqrt();
                assert!(r <= ellps.semimajor_axis() + 1e-6);
                assert!(r >= ellps.semiminor_axis() - 1e-6);

                let [lon2, lat2, h2] = ellps.geographic(x, y, z);
                assert!((lon2.to_degrees() - lon).abs() < 1e-10);
                assert!((lat2.to_degrees() - lat).abs() < 1e-10);
                assert!(h2.abs() < 1e-3);
            }
        }
        Ok(())
    }
}
