use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use console::style;
use log::info;

use crate::config::Config;
use crate::map::{self, Figure, Map2d};
use crate::processor::photos::{self, GeotaggedPhoto, ScanEvent};
use crate::processor::track::{self, Track};
use crate::progress::{Progress, Update};

pub fn do_render(conf: Config) {
    println!("Rendering maps...");

    if let Err(e) = render_maps(&conf) {
        eprintln!("{:#}", e);
        process::exit(1);
    }

    println!("\nMaps saved to '{}'", style(conf.out_dir().display()).cyan());
}

/// Loads the track, geotags the photos and writes both maps.
///
/// The track is required: nothing is written unless it loads.
fn render_maps(conf: &Config) -> Result<()> {
    print!("\tLoading track '{}'...", conf.gpx_path().display());
    let track = report(track::load_track(conf.gpx_path()).context("Failed to load track"))?;

    let summary = track.summary();
    println!("\t{}", summary.describe());
    info!("track summary: {:?}", summary);

    let photos = collect_photos(conf.photos_dir());
    let title = format!("{} ({})", conf.map().title, summary.describe());

    print!("\tWriting 2D map '{}'...", conf.map_2d_path().display());
    let written_2d = report(write_2d(conf, &track, &photos, &title));

    // a failed 2D map does not stop the 3D one
    print!("\tWriting 3D map '{}'...", conf.map_3d_path().display());
    let written_3d = report(write_3d(conf, &track, &photos, &title));

    match written_2d {
        Ok(()) => written_3d,
        Err(e) => {
            if let Err(e_3d) = written_3d {
                eprintln!("{:#}", e_3d);
            }
            Err(e)
        }
    }
}

fn collect_photos(dir: &Path) -> Vec<GeotaggedPhoto> {
    let entries = photos::photo_entries(dir);
    if entries.is_empty() {
        println!("\tNo photos found in '{}'", dir.display());
        return Vec::new();
    }

    println!("\tReading {} photos from '{}'...", entries.len(), dir.display());
    let mut progress = Progress::new(entries.len() as u64);

    let geotagged = photos::scan_entries(&entries, |event| match event {
        ScanEvent::Added(photo) => progress.update(Update::Added(&photo.display_name)),
        ScanEvent::Skipped(path) => {
            let name = path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            progress.update(Update::Skipped(&name));
        }
    });

    let (added, skipped) = progress.finish();
    println!("\t{} photos added, {} skipped", added, skipped);

    geotagged
}

fn write_2d(conf: &Config, track: &Track, photos: &[GeotaggedPhoto], title: &str) -> Result<()> {
    let html = Map2d::build(track, photos, conf.map()).to_html(title)?;
    map::write_html(&conf.map_2d_path(), &html)
}

fn write_3d(conf: &Config, track: &Track, photos: &[GeotaggedPhoto], title: &str) -> Result<()> {
    let html = Figure::build(track, photos, conf.map(), title).to_html()?;
    map::write_html(&conf.map_3d_path(), &html)
}

fn report<T>(result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => println!("\t{}", style("[  OK  ]").green()),
        Err(_) => println!("\t{}", style("[FAILED]").red()),
    }
    result
}
