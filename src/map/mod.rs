//! Standalone HTML maps built from a track and geotagged photos.
//!
//! The maps are plain data models serialised to JSON and dropped into a static
//! page that loads the viewer library from a CDN, so the files open in a
//! browser without a server.

pub mod leaflet;
pub mod plotly;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

pub use leaflet::Map2d;
pub use plotly::Figure;

/// Writes a complete document, creating the parent directory if needed.
pub fn write_html(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
    }

    fs::write(path, html).with_context(|| format!("Failed to write '{}'", path.display()))
}

/// Serialises `value` for inclusion inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize map data")?;
    Ok(json.replace("</", "<\\/"))
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
