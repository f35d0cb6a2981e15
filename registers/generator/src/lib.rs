// Licensed under the Apache-2.0 license

//! SVD to C bitmask header generator.
//!
//! This crate turns the records extracted by `registers-svd` into C headers:
//! one bit-field union per register, position/mask macros for every named
//! field, and a pair of peripheral structs that overlay the register block.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use registers_generator_c::{generate, render_header, GeneratorConfig};
//!
//! let device = registers_svd::parse_file(Path::new("chip.svd")).unwrap();
//! let config = GeneratorConfig::new("chip").output_dir("include");
//! let generation = generate(&device, &config);
//! for entry in generation.catalog.entries() {
//!     let text = render_header(&entry.peripheral, &config.prefix);
//!     println!("{}: {} bytes", entry.peripheral.name, text.len());
//! }
//! ```
//!
//! ## Generation Flow
//!
//! ```text
//! Device (registers-svd)
//!   → layout::load_peripheral   fields/registers sorted, gaps filled
//!   → dedup::Catalog::accept    canonical name grouping, output path
//!   → render::render_header     C text
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Output prefix, output directory and field coverage policy
//! - [`model`]: [`Peripheral`], [`Register`], [`Field`] and [`CType`]
//! - [`layout`]: Field and register gap filling ([`LayoutError`])
//! - [`dedup`]: Duplicate peripheral classification ([`Catalog`])
//! - [`render`]: Mask arithmetic and C text emission
//! - [`generate`]: Per-peripheral pipeline step and run summary
//! - [`util`]: Name canonicalization and formatting helpers

pub mod config;
pub mod dedup;
pub mod generate;
pub mod layout;
pub mod model;
pub mod render;
pub mod util;

pub use config::{FieldCoverage, GeneratorConfig};
pub use dedup::{Catalog, CatalogEntry, Classification, DuplicatePair};
pub use generate::{generate, process_peripheral, Generation, PeripheralOutcome, RunSummary};
pub use layout::{load_peripheral, LayoutError};
pub use model::{CType, Field, Peripheral, Register};
pub use render::{field_mask, register_mask, render_header, render_register, render_struct};
pub use util::canonical_name;
