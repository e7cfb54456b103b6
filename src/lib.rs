mod init;
mod render;
mod progress;

pub mod config;
pub mod map;
pub mod processor;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(author, version, about = "Render a GPX track and geotagged photos as 2D and 3D HTML maps", long_about = None)]
struct Cli {
    /// Set a custom config file
    #[arg(short, long, value_name = "CONF_PATH", global = true)]
    config: Option<PathBuf>,

    /// Print debug diagnostics
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, PartialEq, Debug)]
enum Commands {
    /// Render the track and photos into 2D and 3D maps
    Render {
        /// Set the GPX track file
        #[arg(long, value_name = "GPX_PATH")]
        gpx: Option<PathBuf>,

        /// Set the folder of geotagged photos
        #[arg(long, value_name = "PHOTOS_DIR")]
        photos: Option<PathBuf>,

        /// Set the directory to write maps to
        #[arg(long, value_name = "OUT_DIR")]
        out_dir: Option<PathBuf>,

        /// Link photos from the 2D map instead of embedding them
        #[arg(long, default_value_t = false)]
        link_photos: bool,
    },

    /// Initialize to make configuration file
    Init {
        /// Force overwritten
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

pub fn run() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    // do initialization if 'init' command
    if let Commands::Init { force } = cli.command {
        return init::do_init(force);
    }

    let mut conf = config::load(cli.config.as_deref()).unwrap_or_else(|err| {
        eprintln!("Failed to build configuration: {}", err);
        process::exit(1);
    });

    match cli.command {
        Commands::Render { gpx, photos, out_dir, link_photos } => {
            if let Some(gpx) = gpx {
                conf.set_gpx_path(gpx);
            }

            if let Some(photos) = photos {
                conf.set_photos_dir(photos);
            }

            if let Some(out_dir) = out_dir {
                conf.set_out_dir(out_dir);
            }

            if link_photos {
                conf.set_inline_images(false);
            }

            render::do_render(conf)
        }
        Commands::Init { .. } => {
            // handled above
        }
    }
}
