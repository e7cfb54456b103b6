use anyhow::Result;
use serde::Serialize;

use crate::config::MapConfig;
use crate::map::{escape_html, script_json};
use crate::processor::photos::GeotaggedPhoto;
use crate::processor::track::{Track, TrackPoint};

/// A plotly.js figure: x is longitude, y latitude, z elevation in meters.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Line {
    pub color: String,
    pub width: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Marker {
    pub color: String,
    pub size: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: Text,
    pub scene: Scene,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Scene {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Axis {
    pub title: Text,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
}

impl Text {
    fn new(s: &str) -> Text {
        Text { text: s.to_string() }
    }
}

const PHOTO_COLOR: &str = "red";
const PHOTO_SIZE: u32 = 5;

impl Figure {
    /// Points without elevation sit at zero, so a track without any elevation renders flat.
    pub fn build(track: &Track, photos: &[GeotaggedPhoto], conf: &MapConfig, title: &str) -> Figure {
        let mut data = vec![Trace {
            kind: "scatter3d",
            mode: "lines",
            name: String::from("Track"),
            x: track.iter().map(|p| p.longitude).collect(),
            y: track.iter().map(|p| p.latitude).collect(),
            z: track.iter().map(|p| p.elevation.unwrap_or(0.0)).collect(),
            text: None,
            line: Some(Line {
                color: conf.line_color.clone(),
                width: conf.line_width,
            }),
            marker: None,
        }];

        if !photos.is_empty() {
            data.push(Trace {
                kind: "scatter3d",
                mode: "markers",
                name: String::from("Photos"),
                x: photos.iter().map(|p| p.coordinate.longitude).collect(),
                y: photos.iter().map(|p| p.coordinate.latitude).collect(),
                z: photos.iter()
                    .map(|p| nearest_elevation(track, p.coordinate.latitude, p.coordinate.longitude))
                    .collect(),
                text: Some(photos.iter().map(|p| p.display_name.clone()).collect()),
                line: None,
                marker: Some(Marker {
                    color: String::from(PHOTO_COLOR),
                    size: PHOTO_SIZE,
                }),
            });
        }

        Figure {
            data,
            layout: Layout {
                title: Text::new(title),
                scene: Scene {
                    xaxis: Axis { title: Text::new("Longitude") },
                    yaxis: Axis { title: Text::new("Latitude") },
                    zaxis: Axis { title: Text::new("Elevation (m)") },
                },
            },
        }
    }

    pub fn to_html(&self) -> Result<String> {
        Ok(TEMPLATE
            .replace("{{TITLE}}", &escape_html(&self.layout.title.text))
            .replace("{{FIGURE}}", &script_json(self)?))
    }
}

/// Elevation of the track point closest to (lat, lon), 0 when it has none.
fn nearest_elevation(track: &Track, lat: f64, lon: f64) -> f64 {
    let scale = lat.to_radians().cos();
    let distance = |p: &TrackPoint| {
        let dy = p.latitude - lat;
        let dx = (p.longitude - lon) * scale;
        dx * dx + dy * dy
    };

    track.iter()
        .min_by(|a, b| distance(*a).total_cmp(&distance(*b)))
        .and_then(|p| p.elevation)
        .unwrap_or(0.0)
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <title>{{TITLE}}</title>
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js" charset="utf-8"></script>
    <style>
        html, body { height: 100%; margin: 0; }
        #plot { height: 100%; width: 100%; }
    </style>
</head>
<body>
    <div id="plot"></div>
    <script>
        const figure = {{FIGURE}};
        Plotly.newPlot('plot', figure.data, figure.layout, { responsive: true });
    </script>
</body>
</html>
"#;
