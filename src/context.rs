//! The central administration of the transformation functionality: the
//! active ellipsoid, the geodesic engine, the per-pair datum transform
//! table, and the format dispatcher.

use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};
use log::warn;

use crate::bng::{self, BritishGridPoint};
use crate::coord::GeoCoord;
use crate::datum::{Datum, DatumTransform, DATUM_COUNT};
use crate::ellipsoid::Ellipsoid;
use crate::jpn::{self, JapanGridPoint};
use crate::mgrs::{self, MgrsPoint};
use crate::utm::{self, UtmPoint};
use crate::{Error, Format};

/// The per-context error side channel. Installed with
/// [`Context::set_error_sink`]; without one, failing context operations
/// are reported through the `log` facade.
pub type ErrorSink = Box<dyn Fn(&Error) + Send + Sync>;

/// Result of an inverse geodesic computation: distance in meters, forward
/// and reverse azimuths in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeodesicResult {
    pub distance: f64,
    pub azimuth1: f64,
    pub azimuth2: f64,
}

/// A transformation context. Owns the active ellipsoid, a geodesic engine
/// initialized on it, and the dense per-pair table of datum transform
/// parameters. Not meant to be shared between threads; create one per
/// thread instead.
pub struct Context {
    datum: Datum,
    ellipsoid: Ellipsoid,
    geod: Geodesic,
    transforms: [[Option<DatumTransform>; DATUM_COUNT]; DATUM_COUNT],
    sink: Option<ErrorSink>,
}

impl Context {
    /// A fresh context on the given datum. The transform table is seeded
    /// with the well-known parameter sets from WGS84 (reverse entries
    /// derived); pairs without an entry are treated as coincident.
    #[must_use]
    pub fn new(datum: Datum) -> Context {
        let ellipsoid = datum.ellipsoid();
        let geod = Geodesic::new(ellipsoid.semimajor_axis(), ellipsoid.flattening());
        let mut ctx = Context {
            datum,
            ellipsoid,
            geod,
            transforms: [[None; DATUM_COUNT]; DATUM_COUNT],
            sink: None,
        };

        // WGS84 <-> NAD83, MGRS grid and UTM grid stay identities.
        // NAD27: National Geodetic Survey (CONUS); ED50: EPSG; Tokyo: the
        // EPSG-documented triple; OSGB36: Ordnance Survey national set.
        ctx.set_transform_params(
            Datum::Wgs84,
            Datum::Nad27,
            DatumTransform::new(-8.0, 160.0, 176.0, -0.25, 0.75, -0.06, -0.34),
        );
        ctx.set_transform_params(
            Datum::Wgs84,
            Datum::Ed50,
            DatumTransform::new(-87.0, -98.0, -121.0, -0.59, -0.32, -1.12, -3.72),
        );
        ctx.set_transform_params(
            Datum::Wgs84,
            Datum::Tokyo,
            DatumTransform::new(-148.0, 507.0, 685.0, 0.0, 0.0, 0.0, 0.0),
        );
        ctx.set_transform_params(
            Datum::Wgs84,
            Datum::Osgb36,
            DatumTransform::new(-446.448, 125.157, -542.060, -0.1502, -0.2470, -0.8421, 20.4894),
        );
        ctx
    }

    #[must_use]
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// The active ellipsoid: the datum's, unless a custom one is installed.
    #[must_use]
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Switch the active datum. Replaces the active ellipsoid and
    /// re-initializes the geodesic engine; the transform table is kept.
    pub fn set_datum(&mut self, datum: Datum) {
        self.datum = datum;
        self.ellipsoid = datum.ellipsoid();
        self.geod = Geodesic::new(self.ellipsoid.semimajor_axis(), self.ellipsoid.flattening());
    }

    /// Override the active ellipsoid with a custom one. Requires a > 0 and
    /// 0 < f < 1; re-initializes the geodesic engine.
    pub fn set_custom_ellipsoid(&mut self, a: f64, f: f64) -> Result<(), Error> {
        if !(a > 0.0 && f > 0.0 && f < 1.0) {
            return Err(self.fail(Error::InvalidInput(
                "custom ellipsoid requires a > 0 and 0 < f < 1",
            )));
        }
        self.ellipsoid = Ellipsoid::new(a, f);
        self.geod = Geodesic::new(a, f);
        Ok(())
    }

    /// Install the error side channel.
    pub fn set_error_sink(&mut self, sink: ErrorSink) {
        self.sink = Some(sink);
    }

    /// Report a failure through the sink (or the log facade) and hand the
    /// error back for propagation. Errors are never fatal to the context.
    fn fail(&self, err: Error) -> Error {
        match &self.sink {
            Some(sink) => sink(&err),
            None => warn!("{err}"),
        }
        err
    }

    fn guard<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        result.map_err(|e| self.fail(e))
    }

    // ----- Datum shift ---------------------------------------------------------

    /// Store the transform parameters for an ordered datum pair, and derive
    /// and store the reverse entry for the opposite order.
    pub fn set_transform_params(&mut self, from: Datum, to: Datum, params: DatumTransform) {
        self.transforms[from.index()][to.index()] = Some(params);
        if from != to {
            self.transforms[to.index()][from.index()] = Some(params.inverted());
        }
    }

    /// The stored parameters for an ordered pair; `None` means the datums
    /// are treated as coincident.
    #[must_use]
    pub fn transform_params(&self, from: Datum, to: Datum) -> Option<DatumTransform> {
        self.transforms[from.index()][to.index()]
    }

    /// Shift a coordinate onto another datum: geographic to geocentric
    /// cartesian on the source ellipsoid, the seven-parameter Helmert
    /// transform, and back to geographic on the target ellipsoid. Altitude
    /// rides through the cartesian leg. Coincident pairs only rewrite the
    /// datum tag.
    pub fn convert_datum(&self, src: &GeoCoord, target: Datum) -> Result<GeoCoord, Error> {
        self.guard(self.shift(src, target))
    }

    fn shift(&self, src: &GeoCoord, target: Datum) -> Result<GeoCoord, Error> {
        if src.datum == target {
            return Ok(*src);
        }
        src.validate()?;

        let Some(params) = self.transforms[src.datum.index()][target.index()] else {
            let mut dst = *src;
            dst.datum = target;
            return Ok(dst);
        };

        let cartesian = src.datum.ellipsoid().cartesian(
            src.longitude.to_radians(),
            src.latitude.to_radians(),
            src.altitude,
        );
        let [x, y, z] = params.apply(cartesian);
        let [lon, lat, height] = target.ellipsoid().geographic(x, y, z);

        Ok(GeoCoord::new(
            lat.to_degrees(),
            lon.to_degrees(),
            height,
            target,
        ))
    }

    // ----- Grid conversions ----------------------------------------------------

    /// Project a geographic coordinate to UTM on the active ellipsoid.
    pub fn to_utm(&self, geo: &GeoCoord) -> Result<UtmPoint, Error> {
        self.guard(utm::from_geographic(self.ellipsoid, geo))
    }

    /// Invert a UTM value to geographic, on the active ellipsoid.
    pub fn from_utm(&self, utm: &UtmPoint) -> Result<GeoCoord, Error> {
        self.guard(utm::to_geographic(self.ellipsoid, utm))
    }

    /// Project to UTM and encode the 100 km square lettering.
    pub fn to_mgrs(&self, geo: &GeoCoord) -> Result<MgrsPoint, Error> {
        self.guard(
            utm::from_geographic(self.ellipsoid, geo).and_then(|utm| mgrs::from_utm(&utm)),
        )
    }

    /// Decode an MGRS reference and invert the underlying UTM value.
    pub fn from_mgrs(&self, mgrs: &MgrsPoint) -> Result<GeoCoord, Error> {
        self.guard(mgrs::to_utm(mgrs).and_then(|utm| utm::to_geographic(self.ellipsoid, &utm)))
    }

    /// Project onto the British National Grid. The input is shifted to
    /// OSGB36 first, whatever its source datum.
    pub fn to_british_grid(&self, geo: &GeoCoord) -> Result<BritishGridPoint, Error> {
        self.guard(self.british_forward(geo))
    }

    fn british_forward(&self, geo: &GeoCoord) -> Result<BritishGridPoint, Error> {
        geo.validate()?;
        let osgb = self.shift(geo, Datum::Osgb36)?;
        let (easting, northing) = bng::projection().forward(osgb.latitude, osgb.longitude);
        Ok(BritishGridPoint::new(easting, northing))
    }

    /// Invert a British National Grid value and shift the result from
    /// OSGB36 onto the requested datum.
    pub fn from_british_grid(
        &self,
        point: &BritishGridPoint,
        datum: Datum,
    ) -> Result<GeoCoord, Error> {
        self.guard(self.british_inverse(point, datum))
    }

    fn british_inverse(&self, point: &BritishGridPoint, datum: Datum) -> Result<GeoCoord, Error> {
        point.validate()?;
        let (lat, lon) = bng::inverse_projection(point.easting, point.northing);
        let osgb = GeoCoord::new(lat, lon, 0.0, Datum::Osgb36);
        self.shift(&osgb, datum)
    }

    /// Project onto the Japanese plane-rectangular grid. The input is
    /// shifted to the Tokyo datum first; the zone is the one whose origin
    /// lies closest.
    pub fn to_japan_grid(&self, geo: &GeoCoord) -> Result<JapanGridPoint, Error> {
        self.guard(self.japan_forward(geo))
    }

    fn japan_forward(&self, geo: &GeoCoord) -> Result<JapanGridPoint, Error> {
        geo.validate()?;
        let tokyo = self.shift(geo, Datum::Tokyo)?;
        let zone = jpn::nearest_zone(tokyo.latitude, tokyo.longitude);
        let (easting, northing) = jpn::zone_projection(zone)?.forward(tokyo.latitude, tokyo.longitude);
        // x is the northing, y the easting, by the national convention
        Ok(JapanGridPoint::new(zone, northing, easting))
    }

    /// Invert a plane-rectangular value and shift the result from the
    /// Tokyo datum onto the requested datum.
    pub fn from_japan_grid(&self, point: &JapanGridPoint, datum: Datum) -> Result<GeoCoord, Error> {
        self.guard(self.japan_inverse(point, datum))
    }

    fn japan_inverse(&self, point: &JapanGridPoint, datum: Datum) -> Result<GeoCoord, Error> {
        let (lat, lon) = jpn::zone_projection(point.zone)?.inverse(point.y, point.x);
        let tokyo = GeoCoord::new(lat, lon, 0.0, Datum::Tokyo);
        self.shift(&tokyo, datum)
    }

    // ----- Geodesics -----------------------------------------------------------

    /// The inverse geodesic problem: distance and azimuths between two
    /// points. A second point on a different datum is shifted onto the
    /// first point's datum before solving.
    pub fn inverse(&self, p1: &GeoCoord, p2: &GeoCoord) -> Result<GeodesicResult, Error> {
        self.guard(self.geodesic_inverse(p1, p2))
    }

    fn geodesic_inverse(&self, p1: &GeoCoord, p2: &GeoCoord) -> Result<GeodesicResult, Error> {
        p1.validate()?;
        p2.validate()?;
        let p2 = if p1.datum == p2.datum {
            *p2
        } else {
            self.shift(p2, p1.datum)?
        };

        let (distance, azimuth1, azimuth2, _arc): (f64, f64, f64, f64) =
            self.geod
                .inverse(p1.latitude, p1.longitude, p2.latitude, p2.longitude);
        Ok(GeodesicResult {
            distance,
            azimuth1,
            azimuth2,
        })
    }

    /// The geodesic distance between two points, meters.
    pub fn distance(&self, p1: &GeoCoord, p2: &GeoCoord) -> Result<f64, Error> {
        Ok(self.inverse(p1, p2)?.distance)
    }

    /// The direct geodesic problem: the destination reached from `start`
    /// along the initial `azimuth` (degrees) after `distance` meters. The
    /// destination inherits the start's datum.
    pub fn direct(&self, start: &GeoCoord, distance: f64, azimuth: f64) -> Result<GeoCoord, Error> {
        self.guard(self.geodesic_direct(start, distance, azimuth))
    }

    fn geodesic_direct(
        &self,
        start: &GeoCoord,
        distance: f64,
        azimuth: f64,
    ) -> Result<GeoCoord, Error> {
        start.validate()?;
        if distance < 0.0 {
            return Err(Error::OutOfRange("geodesic distance must be non-negative"));
        }
        let (lat, lon, _azimuth2): (f64, f64, f64) =
            self.geod
                .direct(start.latitude, start.longitude, azimuth, distance);
        Ok(GeoCoord::new(lat, lon, 0.0, start.datum))
    }

    // ----- Format dispatcher ---------------------------------------------------

    /// Route a point to a target format and datum, producing the textual
    /// form: datum shift first, then projection and encoding.
    pub fn convert(&self, src: &GeoCoord, format: Format, datum: Datum) -> Result<String, Error> {
        self.guard(self.dispatch(src, format, datum))
    }

    fn dispatch(&self, src: &GeoCoord, format: Format, datum: Datum) -> Result<String, Error> {
        src.validate()?;
        let geo = self.shift(src, datum)?;

        Ok(match format {
            Format::Dd => geo.to_dd_string(),
            Format::Dmm => geo.to_dmm_string(),
            Format::Dms => geo.to_dms_string(),
            Format::Utm => utm::from_geographic(self.ellipsoid, &geo)?.to_string(),
            Format::Mgrs => {
                let utm = utm::from_geographic(self.ellipsoid, &geo)?;
                mgrs::from_utm(&utm)?.to_string()
            }
            Format::BritishGrid => self.british_forward(&geo)?.to_string(),
            Format::JapanGrid => self.japan_forward(&geo)?.to_string(),
        })
    }

    /// The dispatcher's inverse: interpret a textual coordinate as the
    /// given format and hand back a geographic coordinate on the given
    /// datum.
    pub fn parse(&self, s: &str, format: Format, datum: Datum) -> Result<GeoCoord, Error> {
        self.guard(self.undispatch(s, format, datum))
    }

    fn undispatch(&self, s: &str, format: Format, datum: Datum) -> Result<GeoCoord, Error> {
        match format {
            Format::Dd => GeoCoord::parse_dd(s, datum),
            Format::Dmm => GeoCoord::parse_dmm(s, datum),
            Format::Dms => GeoCoord::parse_dms(s, datum),
            Format::Utm => {
                let mut utm: UtmPoint = s.parse()?;
                utm.datum = datum;
                utm::to_geographic(self.ellipsoid, &utm)
            }
            Format::Mgrs => {
                let mut mgrs: MgrsPoint = s.parse()?;
                mgrs.datum = datum;
                let utm = mgrs::to_utm(&mgrs)?;
                utm::to_geographic(self.ellipsoid, &utm)
            }
            Format::BritishGrid => {
                let point: BritishGridPoint = s.parse()?;
                self.british_inverse(&point, datum)
            }
            Format::JapanGrid => {
                let point: JapanGridPoint = s.parse()?;
                self.japan_inverse(&point, datum)
            }
        }
    }
}

// ----- Tests ---------------------------------------------------------------------
