use std::env;
use std::fs;
use std::path::Path;

use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use log::warn;
use serde::Serialize;
use url::Url;

use crate::config::MapConfig;
use crate::map::{escape_html, script_json};
use crate::processor::photos::GeotaggedPhoto;
use crate::processor::track::Track;

/// A Leaflet map: the track as one polyline plus a marker per photo.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Map2d {
    pub center: [f64; 2],
    pub zoom: u8,
    pub path: Vec<[f64; 2]>,
    pub line_color: String,
    pub line_width: u32,
    pub markers: Vec<PhotoMarker>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PhotoMarker {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub popup: String,
    pub popup_width: u32,
}

impl Map2d {
    pub fn build(track: &Track, photos: &[GeotaggedPhoto], conf: &MapConfig) -> Map2d {
        let first = track.first();

        Map2d {
            center: [first.latitude, first.longitude],
            zoom: conf.zoom_start,
            path: track.iter().map(|p| [p.latitude, p.longitude]).collect(),
            line_color: conf.line_color.clone(),
            line_width: conf.line_width,
            markers: photos.iter().map(|photo| PhotoMarker::build(photo, conf)).collect(),
        }
    }

    pub fn to_html(&self, title: &str) -> Result<String> {
        Ok(TEMPLATE
            .replace("{{TITLE}}", &escape_html(title))
            .replace("{{MAP_DATA}}", &script_json(self)?))
    }
}

impl PhotoMarker {
    fn build(photo: &GeotaggedPhoto, conf: &MapConfig) -> PhotoMarker {
        let src = if conf.popup.inline_images {
            match inline_image(&photo.file_path) {
                Ok(src) => src,
                Err(e) => {
                    warn!("Failed to inline '{}', linking it instead: {}", photo.file_path.display(), e);
                    file_reference(&photo.file_path)
                }
            }
        } else {
            file_reference(&photo.file_path)
        };

        let name = escape_html(&photo.display_name);
        let popup = format!(r#"<img src="{}" width="{}" alt="{}"><p>{}</p>"#,
                            escape_html(&src), conf.popup.image_width, name, name);

        PhotoMarker {
            lat: photo.coordinate.latitude,
            lon: photo.coordinate.longitude,
            name: photo.display_name.clone(),
            popup,
            popup_width: conf.popup.image_width + 20,
        }
    }
}

fn inline_image(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!("data:image/jpeg;base64,{}", general_purpose::STANDARD.encode(bytes)))
}

/// A percent-encoded `file://` URL; the file does not need to exist.
fn file_reference(path: &Path) -> String {
    let abs = fs::canonicalize(path)
        .or_else(|_| env::current_dir().map(|cwd| cwd.join(path)));

    match abs.ok().and_then(|abs| Url::from_file_path(&abs).ok()) {
        Some(url) => url.to_string(),
        None => path.display().to_string(),
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{{TITLE}}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <style>
        html, body { height: 100%; margin: 0; }
        #map { height: 100%; width: 100%; }
        .leaflet-popup-content p { margin: 4px 0 0; font-size: 12px; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script>
        const data = {{MAP_DATA}};

        const map = L.map('map').setView(data.center, data.zoom);

        L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            maxZoom: 19,
            attribution: '&copy; <a href="http://www.openstreetmap.org/copyright">OpenStreetMap</a>'
        }).addTo(map);

        L.polyline(data.path, { color: data.line_color, weight: data.line_width }).addTo(map);

        data.markers.forEach(function (photo) {
            L.marker([photo.lat, photo.lon], { title: photo.name })
                .bindPopup(photo.popup, { maxWidth: photo.popup_width })
                .addTo(map);
        });
    </script>
</body>
</html>
"#;
