// Licensed under the Apache-2.0 license

//! Command driver for the SVD to C bitmask header generator.
//!
//! [`run`] validates the output directory, parses the document, runs every
//! peripheral through the generator and writes the resulting headers and
//! duplicate diffs. Progress and totals are printed; diagnostics go through
//! `log`.

pub mod output;

use anyhow::Result;
use registers_generator_c::{generate, FieldCoverage, GeneratorConfig, RunSummary};
use std::path::PathBuf;

pub use output::{prepare_output_dir, write_diffs, write_headers, OutputError};

/// Prefix used when neither the command line nor the document names the chip.
pub const DEFAULT_PREFIX: &str = "svd";

/// Options for a single run.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Input SVD file.
    pub file: PathBuf,
    /// Output directory. Nothing is written when absent.
    pub output: Option<PathBuf>,
    /// Create the output directory if it does not exist.
    pub create: bool,
    /// Header file prefix; defaults to the chip name.
    pub prefix: Option<String>,
    pub field_coverage: FieldCoverage,
}

/// Runs the generator end to end and returns the totals.
pub fn run(options: &Options) -> Result<RunSummary> {
    println!("Opening file {}", options.file.display());

    let output_dir = match &options.output {
        Some(dir) => Some(prepare_output_dir(dir, options.create)?),
        None => None,
    };

    let device = registers_svd::parse_file(&options.file)?;
    println!("{}", device.summary());

    let prefix = options
        .prefix
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| device.name.clone())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

    let mut config = GeneratorConfig::new(&prefix).field_coverage(options.field_coverage);
    if let Some(dir) = output_dir {
        config = config.output_dir(dir);
    }

    println!("Loading peripherals...");
    let generation = generate(&device, &config);

    if config.writes_output() {
        write_headers(&generation.catalog, &config)?;
        write_diffs(generation.catalog.duplicates())?;
    }

    let summary = generation.summary;
    println!();
    println!(
        "Found {} peripherals with {} Derived",
        summary.peripherals, summary.derived
    );
    if summary.skipped > 0 {
        println!("Skipped {} peripherals that failed to load", summary.skipped);
    }
    if summary.divergent > 0 {
        println!("{} divergent duplicate peripherals", summary.divergent);
    }
    println!(
        "Total {} registers with {} fields",
        summary.registers, summary.fields
    );

    Ok(summary)
}
