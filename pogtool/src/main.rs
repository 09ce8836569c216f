use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::Parser as ClapParser;
use log::{LevelFilter, info};
use pogcore::{CodecConfig, PogStats, read_path, write_document};

/// Load a proof obligation document and write it back to standard output.
#[derive(ClapParser)]
#[command(name = "loadpog", version)]
pub struct Arguments {
    /// Path to the POG file
    input: PathBuf,

    /// Configuration file; defaults to $POG_CONFIG_PATH, then the user configuration
    /// directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print entity counts to standard error
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over the flags.
    env_logger::Builder::new()
        .filter_level(level)
        .filter_module("xml5ever", LevelFilter::Error)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&Path>) -> pogcore::PogResult<CodecConfig> {
    match path {
        Some(path) => CodecConfig::load_from_toml(path),
        None => CodecConfig::load_default(),
    }
}

fn main() {
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(error) => {
            // `--help` and `--version` also end up here and are not failures.
            let _ = error.print();
            process::exit(if error.use_stderr() { 1 } else { 0 });
        }
    };

    init_logging(args.verbose);

    if !args.input.exists() {
        eprintln!("Error: File {} does not exist.", args.input.display());
        process::exit(1);
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    let pog = match read_path(&args.input, &config.reader) {
        Ok(pog) => pog,
        Err(error) => {
            eprintln!("POGLIB error: {}", error);
            process::exit(1);
        }
    };
    info!("Loaded {}", args.input.display());

    if let Err(error) = write_document(&pog, io::stdout().lock(), &config.writer) {
        eprintln!("Error: {}", error);
        process::exit(1);
    }

    if args.stats {
        eprintln!("{}", PogStats::collect(&pog));
    }
}
