pub mod coord;
pub mod exif;
pub mod photos;
pub mod track;

#[cfg(test)]
pub(crate) mod testdata;

pub use coord::{to_decimal_degrees, GeoCoordinate, Ratio};
pub use photos::{scan_photos, GeotaggedPhoto};
pub use track::{load_track, Track, TrackError, TrackPoint};
