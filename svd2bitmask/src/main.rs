// Licensed under the Apache-2.0 license

use clap::Parser;
use log::LevelFilter;
use registers_generator_c::FieldCoverage;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use svd2bitmask::{run, Options};

#[derive(Parser, Debug)]
#[command(
    name = "svd2bitmask",
    author,
    version,
    about = "Generate C bitmask headers from an SVD file"
)]
struct Cli {
    /// Output extra information when parsing (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input SVD file to parse
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Output directory for header files
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Create the output directory if it does not exist
    #[arg(short, long)]
    create: bool,

    /// Output header file prefix (<prefix>_<peripheral name>.h), defaults to the chip name
    #[arg(short, long)]
    prefix: Option<String>,

    /// Pad bit fields to the declared register size instead of 32 bits
    #[arg(long)]
    fit_register_size: bool,
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new()
        .with_level(level_for(cli.verbose))
        .without_timestamps()
        .init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }

    let options = Options {
        file: cli.file,
        output: cli.output,
        create: cli.create,
        prefix: cli.prefix,
        field_coverage: if cli.fit_register_size {
            FieldCoverage::RegisterSize
        } else {
            FieldCoverage::Fixed32
        },
    };

    if let Err(e) = run(&options) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
