use std::io;
use std::path::PathBuf;
use std::process::exit;

use anyhow::{bail, Result};
use clap::Parser;
use log::{error, info};
use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger};

mod input;
mod lang;

use lang::build::BuildMode;
use lang::runtime::Runtime;

#[derive(Parser)]
#[command(version, about)]
struct Opt {
    /// Program to run
    #[arg(default_value = "program.json")]
    program: PathBuf,
    /// Show debug output
    #[arg(short, long)]
    debug: bool,
    /// Abort before running if any record fails to build
    #[arg(short, long)]
    strict: bool,
}

fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    };

    match SimpleLogger::init(filter, LogConfig::default()) {
        Ok(_) => Ok(()),
        Err(e) => bail!("Failed to init logger: {}", e),
    }
}

fn main() -> Result<()> {
    let opts = Opt::parse();
    init_logging(opts.debug)?;

    let records = input::load_program(&opts.program)?;
    info!("Loaded {} records from {}", records.len(), opts.program.display());

    let mode = if opts.strict {
        BuildMode::Strict
    } else {
        BuildMode::Lenient
    };

    let stdout = io::stdout();
    let mut sink = stdout.lock();
    let report = Runtime::new(&mut sink, mode).run(&records);

    for diag in &report.diagnostics {
        eprintln!("{}", diag);
    }

    match report.value {
        Ok(v) => info!("Program returned {}", v),
        Err(e) => {
            error!("{:#}", e);
            exit(1);
        }
    }

    Ok(())
}
