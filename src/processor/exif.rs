use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use exif::{Exif, In, Reader, Tag, Value};
use log::debug;

use crate::processor::coord::{to_decimal_degrees, GeoCoordinate, Ratio};

/// Reads the GPS position embedded in an image's EXIF block.
///
/// Never fails: unreadable files, images without metadata and incomplete GPS
/// tags all come back as `None` so that one bad photo cannot stop a batch.
pub fn extract_gps(path: &Path) -> Option<GeoCoordinate> {
    match read_gps(path) {
        Ok(coord) => coord,
        Err(e) => {
            debug!("no usable metadata in '{}': {:#}", path.display(), e);
            None
        }
    }
}

fn read_gps(path: &Path) -> Result<Option<GeoCoordinate>> {
    let exif = {
        // file handle is released at the end of this block, parse error or not
        let file = File::open(path)
            .with_context(|| format!("Failed to open '{}'", path.display()))?;
        let mut reader = BufReader::new(file);

        Reader::new().read_from_container(&mut reader)?
    };

    gps_from_exif(&exif)
}

fn gps_from_exif(exif: &Exif) -> Result<Option<GeoCoordinate>> {
    let (lat, lon) = match (
        exif.get_field(Tag::GPSLatitude, In::PRIMARY),
        exif.get_field(Tag::GPSLongitude, In::PRIMARY),
    ) {
        (Some(lat), Some(lon)) => (&lat.value, &lon.value),
        _ => return Ok(None),
    };

    let mut lat = magnitude(lat)?;
    let mut lon = magnitude(lon)?;

    // a missing reference flips the sign as well
    if reference(exif, Tag::GPSLatitudeRef).as_deref() != Some("N") {
        lat = -lat;
    }
    if reference(exif, Tag::GPSLongitudeRef).as_deref() != Some("E") {
        lon = -lon;
    }

    match GeoCoordinate::new(lat, lon) {
        Some(coord) => Ok(Some(coord)),
        None => Err(anyhow!("coordinate out of range ({}, {})", lat, lon)),
    }
}

fn magnitude(value: &Value) -> Result<f64> {
    let parts: Vec<Ratio> = match value {
        Value::Rational(v) => v.iter().map(|r| Ratio::from(*r)).collect(),
        Value::SRational(v) => v.iter().map(|r| Ratio::from(*r)).collect(),
        _ => return Err(anyhow!("unexpected GPS value type")),
    };

    if parts.len() < 3 {
        return Err(anyhow!("expected 3 rationals, found {}", parts.len()));
    }

    if parts[..3].iter().any(|r| r.denom == 0) {
        return Err(anyhow!("zero denominator in GPS value"));
    }

    Ok(to_decimal_degrees(parts[0], parts[1], parts[2]))
}

fn reference(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;

    match &field.value {
        Value::Ascii(v) => v
            .first()
            .map(|s| String::from_utf8_lossy(s).trim_end_matches('\0').to_string()),
        _ => None,
    }
}
