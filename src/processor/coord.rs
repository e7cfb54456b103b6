/// A rational component of an EXIF GPS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub num: i64,
    pub denom: i64,
}

impl Ratio {
    pub fn new(num: i64, denom: i64) -> Ratio {
        Ratio { num, denom }
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl From<exif::Rational> for Ratio {
    fn from(r: exif::Rational) -> Self {
        Ratio::new(r.num as i64, r.denom as i64)
    }
}

impl From<exif::SRational> for Ratio {
    fn from(r: exif::SRational) -> Self {
        Ratio::new(r.num as i64, r.denom as i64)
    }
}

/// Converts a degrees/minutes/seconds triple into an unsigned decimal degree value.
///
/// No validation is done here: a zero denominator yields an infinite or NaN
/// result, so callers reading untrusted metadata must check denominators first.
/// Hemisphere sign is applied by the caller.
pub fn to_decimal_degrees(degrees: Ratio, minutes: Ratio, seconds: Ratio) -> f64 {
    degrees.to_f64() + (minutes.to_f64() / 60.0) + (seconds.to_f64() / 3600.0)
}

/// A signed latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Returns `None` when either component is non-finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Option<GeoCoordinate> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }

        Some(GeoCoordinate { latitude, longitude })
    }
}
