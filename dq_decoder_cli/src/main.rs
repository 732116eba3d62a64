//! # dq_decoder_cli
//!
//! Part of the dq_decoder crate family.
//!
//! ## Use
//!
//! Make a template configuration file
//!
//! ```bash
//! dq_decoder_cli new -p config.yml
//! ```
//!
//! Decode every file listed in the configuration
//!
//! ```bash
//! dq_decoder_cli -p config.yml
//! ```
//!
//! List the flags a file carries
//!
//! ```bash
//! dq_decoder_cli describe -p H-H1_GWOSC_4KHZ_R1-1126257415-4096.hdf5
//! ```
use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use libdq_decoder::catalog::FlagCatalog;
use libdq_decoder::config::Config;
use libdq_decoder::error::HDFReaderError;
use libdq_decoder::hdf_reader::HDFReader;
use libdq_decoder::process::process;

const LOG_FILE: &str = "./dq_decoder.log";

fn make_template_config(path: &Path) -> Result<(), std::io::Error> {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let mut file = File::create(path)?;
    file.write_all(yaml_str.as_bytes())
}

fn log_catalog(label: &str, catalog: &FlagCatalog) {
    for flag in catalog {
        log::info!(
            "{} bit {:>2}: {:<20} {}",
            label,
            flag.bit,
            flag.name,
            flag.description
        );
    }
}

fn describe_file(path: &Path) -> Result<(), HDFReaderError> {
    let reader = HDFReader::open(path)?;
    let time_base = reader.read_time_base(None)?;
    log::info!(
        "Detector: {}",
        reader.read_detector()?.as_deref().unwrap_or("unknown")
    );
    log::info!(
        "GPS start: {} Duration: {} s Strain rate: {} Hz",
        time_base.gps_start,
        time_base.duration,
        time_base.strain_rate
    );
    log_catalog("DQ", &reader.read_dq(&time_base)?.catalog);
    match reader.read_injections(&time_base)? {
        Some(injections) => log_catalog("INJ", &injections.catalog),
        None => log::info!("No injection mask in this file"),
    }
    Ok(())
}

fn main() {
    // Create a cli
    let matches = Command::new("dq_decoder_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(Command::new("describe").about("List the flag catalogs of an HDF5 file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the file"),
        )
        .get_matches();

    // Initialize feedback
    let term_logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![term_logger];
    match File::create(LOG_FILE) {
        Ok(file) => loggers.push(simplelog::WriteLogger::new(
            simplelog::LevelFilter::Debug,
            simplelog::Config::default(),
            file,
        )),
        Err(e) => eprintln!("Could not create log file {LOG_FILE}: {e}"),
    }
    let logger = simplelog::CombinedLogger::new(loggers);

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");
    log::set_max_level(log::LevelFilter::Debug);

    // Parse the cli
    let path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A path must be given with -p/--path");
            return;
        }
    };

    match matches.subcommand() {
        Some(("new", _)) => {
            log::info!("Making a template config at {}...", path.to_string_lossy());
            match make_template_config(&path) {
                Ok(()) => log::info!("Done."),
                Err(e) => log::error!("Failed to write template config: {e}"),
            }
            return;
        }
        Some(("describe", _)) => {
            if let Err(e) = describe_file(&path) {
                log::error!("{e}");
            }
            return;
        }
        _ => (),
    }

    // Load our config
    log::info!("Loading config from {}...", path.to_string_lossy());
    let config = match Config::read_config_file(&path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Input files: {}", config.input_files.len());
    log::info!("Report Path: {}", config.report_path.to_string_lossy());
    log::info!("DQ flags: {}", config.flags.join(", "));
    if config.has_injection_selection() {
        log::info!("Injection flags: {}", config.injection_flags.join(", "));
    }

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(config.input_files.len() as u64));
    match process(&config, |n_done| pb.set_position(n_done as u64)) {
        Ok(()) => log::info!("Successfully decoded data quality!"),
        Err(e) => log::error!("Decoding failed with error: {e}"),
    }

    pb.finish();

    log::info!("Done.");
}
