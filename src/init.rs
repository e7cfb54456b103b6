use std::{fs, process};
use std::io::Write;

use console::style;

use crate::config;

pub fn do_init(force: bool) {
    println!("Initializing gpxmap...");

    let default_path = match config::default_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to get default config path: {}", e);
            process::exit(1);
        }
    };
    let conf_dir = default_path.dir();
    let conf_path = default_path.config_path();

    // check configuration file is already existed
    if fs::metadata(&conf_path).is_ok() && !force {
        println!("Already initialized, config is on '{}'", conf_path.display());
        process::exit(0);
    }

    print!("\tCreating gpxmap home directory '{}'...", conf_dir.display());
    match fs::create_dir_all(&conf_dir) {
        Ok(()) => println!("\t{}", style("[  OK  ]").green()),
        Err(e) => {
            println!("\t{}", style("[FAILED]").red());
            eprintln!("Failed to create directory: {}", e);
            process::exit(1);
        }
    }

    print!("\tCreating configurations on '{}'...", conf_path.display());
    match fs::File::create(&conf_path) {
        Ok(mut file) => {
            match file.write_all(config::DEFAULT_CONF_YAML.as_bytes()) {
                Ok(_) => println!("\t{}", style("[  OK  ]").green()),
                Err(e) => {
                    println!("\t{}", style("[FAILED]").red());
                    eprintln!("Failed to write configuration to file: {}", e);
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            println!("\t{}", style("[FAILED]").red());
            eprintln!("Failed to create file: {}", e);
            process::exit(1);
        }
    }

    println!("\nYou can edit configurations on '{}'",
             style(conf_path.display()).cyan());
}
