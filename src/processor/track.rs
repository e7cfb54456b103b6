use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use gpx::{Gpx, Waypoint};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

impl From<&Waypoint> for TrackPoint {
    fn from(waypoint: &Waypoint) -> Self {
        let point = waypoint.point();

        TrackPoint {
            latitude: point.y(),
            longitude: point.x(),
            elevation: waypoint.elevation,
            time: waypoint.time.as_ref()
                .and_then(|t| t.format().ok())
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// All points of a track file as one continuous path, in file order.
///
/// Never empty.
#[derive(Debug, Clone)]
pub struct Track {
    points: Vec<TrackPoint>,
}

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track file '{0}' not found")]
    NotFound(PathBuf),

    #[error("failed to read track file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse track: {0}")]
    Parse(String),

    #[error("no points found in track")]
    Empty,
}

impl Track {
    /// Flattens tracks and segments into a single sequence, keeping duplicates.
    pub fn from_gpx(gpx: &Gpx) -> Result<Track, TrackError> {
        let points: Vec<TrackPoint> = gpx.tracks.iter()
            .flat_map(|track| track.segments.iter())
            .flat_map(|segment| segment.points.iter())
            .map(TrackPoint::from)
            .collect();

        if points.is_empty() {
            return Err(TrackError::Empty);
        }

        Ok(Track { points })
    }

    pub fn first(&self) -> &TrackPoint {
        // never empty, checked on construction
        &self.points[0]
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn has_elevation(&self) -> bool {
        self.points.iter().any(|p| p.elevation.is_some())
    }

    pub fn summary(&self) -> TrackSummary {
        let elevations: Vec<f64> = self.points.iter().filter_map(|p| p.elevation).collect();
        let times: Vec<DateTime<Utc>> = self.points.iter().filter_map(|p| p.time).collect();

        TrackSummary {
            points: self.points.len(),
            with_elevation: elevations.len(),
            min_elevation: elevations.iter().copied().reduce(f64::min),
            max_elevation: elevations.iter().copied().reduce(f64::max),
            started_at: times.iter().min().copied(),
            finished_at: times.iter().max().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackSummary {
    pub points: usize,
    pub with_elevation: usize,
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TrackSummary {
    /// e.g. "2 points, elevation 100 m to 110 m, 2023-02-03 04:54 to 09:58 UTC"
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("{} points", self.points)];

        match (self.min_elevation, self.max_elevation) {
            (Some(min), Some(max)) => parts.push(format!("elevation {:.0} m to {:.0} m", min, max)),
            _ => parts.push(String::from("no elevation")),
        }

        if let (Some(start), Some(end)) = (self.started_at, self.finished_at) {
            if start.date_naive() == end.date_naive() {
                parts.push(format!("{} to {} UTC", start.format("%Y-%m-%d %H:%M"), end.format("%H:%M")));
            } else {
                parts.push(format!("{} to {} UTC", start.format("%Y-%m-%d %H:%M"), end.format("%Y-%m-%d %H:%M")));
            }
        }

        parts.join(", ")
    }
}

pub fn parse_track<R: Read>(reader: R) -> Result<Track, TrackError> {
    let gpx = gpx::read(reader).map_err(|e| TrackError::Parse(e.to_string()))?;
    Track::from_gpx(&gpx)
}

pub fn load_track(path: &Path) -> Result<Track, TrackError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TrackError::NotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(TrackError::Io { path: path.to_path_buf(), source: e });
        }
    };

    parse_track(BufReader::new(file))
}
