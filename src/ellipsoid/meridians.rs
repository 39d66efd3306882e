use super::Ellipsoid;

// ----- Meridian geometry -----------------------------------------------------

impl Ellipsoid {
    /// The distance, *M*, along a meridian from the equator to the given
    /// latitude (in radians), by the classical series in the eccentricity
    /// squared (Snyder 1987, eq. 3-21), truncated after the e⁶ term.
    #[must_use]
    pub fn meridional_distance(&self, latitude: f64) -> f64 {
        let e2 = self.eccentricity_squared();
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        self.semimajor_axis()
            * ((1. - e2 / 4. - 3. * e4 / 64. - 5. * e6 / 256.) * latitude
                - (3. * e2 / 8. + 3. * e4 / 32. + 45. * e6 / 1024.) * (2. * latitude).sin()
                + (15. * e4 / 256. + 45. * e6 / 1024.) * (4. * latitude).sin()
                - (35. * e6 / 3072.) * (6. * latitude).sin())
    }

    /// The footpoint latitude: the latitude (in radians) on the central
    /// meridian whose meridional arc equals `distance_from_equator`.
    /// Computed through the rectifying latitude μ and the series in
    /// e₁ = (1 - √(1-e²)) / (1 + √(1-e²)) (Snyder 1987, eq. 3-26).
    #[must_use]
    pub fn footpoint_latitude(&self, distance_from_equator: f64) -> f64 {
        let e2 = self.eccentricity_squared();
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        let mu = distance_from_equator
            / (self.semimajor_axis() * (1. - e2 / 4. - 3. * e4 / 64. - 5. * e6 / 256.));

        let e1 = (1. - (1. - e2).sqrt()) / (1. + (1. - e2).sqrt());
        let j1 = 3. * e1 / 2. - 27. * e1.powi(3) / 32.;
        let j2 = 21. * e1 * e1 / 16. - 55. * e1.powi(4) / 32.;
        let j3 = 151. * e1.powi(3) / 96.;
        let j4 = 1097. * e1.powi(4) / 512.;

        mu + j1 * (2. * mu).sin() + j2 * (4. * mu).sin() + j3 * (6. * mu).sin()
            + j4 * (8. * mu).sin()
    }
}

// ----- Tests ---------------------------------------------------------------------
