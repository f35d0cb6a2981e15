// Licensed under the Apache-2.0 license

//! SVD document adapter.
//!
//! This crate walks a CMSIS-SVD style XML document and extracts the subset of
//! it needed to generate register headers: the device identification, and for
//! every peripheral its registers and their bit fields. No layout decisions are
//! made here; the records are plain data with numbers already converted.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let device = registers_svd::parse_file(Path::new("chip.svd")).unwrap();
//! for peripheral in &device.peripherals {
//!     println!("{}: {} registers", peripheral.name, peripheral.registers.len());
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`error`]: Fatal document errors ([`SvdError`])
//! - [`text`]: Text cleanup and numeric conversion helpers
//! - [`node`]: The extracted records ([`Device`], [`PeripheralNode`], ...)

pub mod error;
pub mod node;
pub mod text;

pub use error::{SvdError, SvdResult};
pub use node::{Device, FieldNode, PeripheralNode, RegisterNode};

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use xmltree::Element;

/// Parse an SVD document held in memory.
pub fn parse(xml: &str) -> SvdResult<Device> {
    let root = Element::parse(xml.as_bytes()).map_err(|e| SvdError::MalformedXml(e.to_string()))?;
    Device::from_element(&root)
}

/// Open and parse the SVD document at `path`.
pub fn parse_file(path: &Path) -> SvdResult<Device> {
    if path.is_dir() {
        return Err(SvdError::InputIsDirectory(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SvdError::MissingInputFile(path.to_path_buf()),
        _ => SvdError::Io(e),
    })?;
    let root = Element::parse(BufReader::new(file))
        .map_err(|e| SvdError::MalformedXml(e.to_string()))?;
    Device::from_element(&root)
}
