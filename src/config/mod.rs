use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use thiserror::Error;

const MAX_ZOOM: u8 = 19;

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    input: Input,
    output: Output,
    map: MapConfig,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Input {
    gpx: PathBuf,
    photos: PathBuf,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            gpx: PathBuf::from("route.gpx"),
            photos: PathBuf::from("photos"),
        }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Output {
    dir: PathBuf,
    map_2d: String,
    map_3d: String,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            dir: PathBuf::from("."),
            map_2d: String::from("map_2d.html"),
            map_3d: String::from("map_3d.html"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub zoom_start: u8,
    pub line_color: String,
    pub line_width: u32,
    pub popup: Popup,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            title: String::from("GPX track"),
            zoom_start: 15,
            line_color: String::from("blue"),
            line_width: 4,
            popup: Popup::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Popup {
    /// Embed photos into the 2D map as base64 instead of linking the files
    pub inline_images: bool,
    pub image_width: u32,
}

impl Default for Popup {
    fn default() -> Self {
        Popup {
            inline_images: true,
            image_width: 300,
        }
    }
}

impl Config {
    pub fn build_from_file(path: &Path) -> Result<Config, Error> {
        match fs::read_to_string(path) {
            Ok(contents) => Config::build(&contents),
            Err(err) => Err(Error::Io(format!("'{}': {}", path.display(), err))),
        }
    }

    pub fn build(contents: &str) -> Result<Config, Error> {
        let conf = deserialize(contents)?;
        conf.validate()?;

        Ok(conf)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.map.zoom_start > MAX_ZOOM {
            return Err(Error::Invalid(format!("zoom_start must be at most {}, got {}",
                                              MAX_ZOOM, self.map.zoom_start)));
        }

        if self.map.line_width == 0 {
            return Err(Error::Invalid(String::from("line_width must be positive")));
        }

        if self.map.popup.image_width == 0 {
            return Err(Error::Invalid(String::from("popup image_width must be positive")));
        }

        if self.output.map_2d.trim().is_empty() || self.output.map_3d.trim().is_empty() {
            return Err(Error::Invalid(String::from("output file names must not be empty")));
        }

        Ok(())
    }

    pub fn gpx_path(&self) -> &Path {
        &self.input.gpx
    }

    pub fn photos_dir(&self) -> &Path {
        &self.input.photos
    }

    pub fn map_2d_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.map_2d)
    }

    pub fn map_3d_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.map_3d)
    }

    pub fn out_dir(&self) -> &Path {
        &self.output.dir
    }

    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    pub fn set_gpx_path(&mut self, path: PathBuf) {
        self.input.gpx = path;
    }

    pub fn set_photos_dir(&mut self, dir: PathBuf) {
        self.input.photos = dir;
    }

    pub fn set_out_dir(&mut self, dir: PathBuf) {
        self.output.dir = dir;
    }

    pub fn set_inline_images(&mut self, inline: bool) {
        self.map.popup.inline_images = inline;
    }
}

fn deserialize(s: &str) -> Result<Config, Error> {
    // an empty document means "all defaults"
    if s.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(s).map_err(|e| Error::Parse(e.to_string()))
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration {0}")]
    Io(String),

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub struct DefaultPath {
    home_dir: PathBuf,
}

impl DefaultPath {
    pub fn dir(&self) -> PathBuf {
        self.home_dir.join(".gpxmap")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir().join("config.yaml")
    }
}

pub fn default_path() -> Result<DefaultPath> {
    match home::home_dir() {
        Some(home_dir) => Ok(DefaultPath { home_dir }),
        None => Err(anyhow!("Failed to get home directory")),
    }
}

/// Loads `path` when given explicitly; otherwise the default file if it exists, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config, Error> {
    if let Some(path) = explicit {
        return Config::build_from_file(path);
    }

    match default_path() {
        Ok(default_path) => {
            let path = default_path.config_path();
            if path.is_file() {
                Config::build_from_file(&path)
            } else {
                Ok(Config::default())
            }
        }
        Err(_) => Ok(Config::default()),
    }
}

pub const DEFAULT_CONF_YAML: &str = r#"input:
  gpx: route.gpx       # track file
  photos: photos       # folder of geotagged .jpg/.jpeg files
output:
  dir: .
  map_2d: map_2d.html
  map_3d: map_3d.html
map:
  title: GPX track
  zoom_start: 15
  line_color: blue
  line_width: 4
  popup:
    inline_images: true  # embed photos in the 2D map; false links the files
    image_width: 300
"#;

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn build_from_str() {
        let yaml = r#"input:
  gpx: /data/2023-02-03.gpx
output:
  dir: /tmp/maps
map:
  zoom_start: 12
  popup:
    inline_images: false"#;

        let conf = Config::build(yaml).expect("Failed to deserialize from string");

        assert_eq!(conf.gpx_path(), Path::new("/data/2023-02-03.gpx"));
        // unspecified values stay at their defaults
        assert_eq!(conf.photos_dir(), Path::new("photos"));
        assert_eq!(conf.map_2d_path(), PathBuf::from("/tmp/maps/map_2d.html"));
        assert_eq!(conf.map_3d_path(), PathBuf::from("/tmp/maps/map_3d.html"));
        assert_eq!(conf.map().zoom_start, 12);
        assert_eq!(conf.map().line_color, "blue");
        assert!(!conf.map().popup.inline_images);
        assert_eq!(conf.map().popup.image_width, 300);
    }

    #[test]
    fn default_yaml_matches_defaults() {
        let conf = Config::build(DEFAULT_CONF_YAML).unwrap();
        assert_eq!(conf, Config::default());

        assert_eq!(Config::build("").unwrap(), Config::default());
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(Config::build("map:\n  zoom_start: 20"), Err(Error::Invalid(_))));
        assert!(matches!(Config::build("map:\n  line_width: 0"), Err(Error::Invalid(_))));
        assert!(matches!(Config::build("output:\n  map_2d: ''"), Err(Error::Invalid(_))));
        assert!(matches!(Config::build("map:\n  zoom_start: high"), Err(Error::Parse(_))));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(load(Some(dir.path().join("none.yaml").as_path())), Err(Error::Io(_))));
    }

    #[test]
    fn overrides() {
        let mut conf = Config::default();
        conf.set_gpx_path(PathBuf::from("a.gpx"));
        conf.set_photos_dir(PathBuf::from("pics"));
        conf.set_out_dir(PathBuf::from("out"));
        conf.set_inline_images(false);

        assert_eq!(conf.gpx_path(), Path::new("a.gpx"));
        assert_eq!(conf.photos_dir(), Path::new("pics"));
        assert_eq!(conf.map_2d_path(), PathBuf::from("out/map_2d.html"));
        assert!(!conf.map().popup.inline_images);
    }
}
