// Licensed under the Apache-2.0 license

//! Configuration for header generation.
//!
//! [`GeneratorConfig`] carries the output file prefix, the optional output
//! directory and the [`FieldCoverage`] policy that decides how many bits a
//! register's field list is padded to.

use crate::model::Peripheral;
use std::path::{Path, PathBuf};

/// Name of the subdirectory that receives divergent duplicate peripherals.
pub const DUPLICATE_DIR: &str = "duplicate";

/// How far reserved fields pad a register's field list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldCoverage {
    /// Always pad to bit 32, whatever the register size. This reproduces the
    /// layout of previously generated headers.
    #[default]
    Fixed32,
    /// Pad to the declared register size.
    RegisterSize,
}

impl FieldCoverage {
    /// Number of bits a register of `register_size` bits is padded to.
    pub fn width(self, register_size: u64) -> u64 {
        match self {
            FieldCoverage::Fixed32 => 32,
            FieldCoverage::RegisterSize => register_size,
        }
    }
}

/// Configuration for a generation run.
///
/// # Example
///
/// ```
/// use registers_generator_c::config::{FieldCoverage, GeneratorConfig};
///
/// let config = GeneratorConfig::new("stm32f4")
///     .output_dir("include")
///     .field_coverage(FieldCoverage::RegisterSize);
/// assert_eq!(config.prefix, "stm32f4");
/// assert!(config.writes_output());
/// ```
#[derive(Clone, Debug, Default)]
pub struct GeneratorConfig {
    /// Header file prefix: `<prefix>_<peripheral>.h`. Also used in include guards.
    pub prefix: String,

    /// Directory headers are written to. `None` means nothing is written and
    /// paths are reported relative to the current directory.
    pub output_dir: Option<PathBuf>,

    /// Field padding policy.
    pub field_coverage: FieldCoverage,
}

impl GeneratorConfig {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            ..Default::default()
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn field_coverage(mut self, coverage: FieldCoverage) -> Self {
        self.field_coverage = coverage;
        self
    }

    /// True when an output directory was configured.
    pub fn writes_output(&self) -> bool {
        self.output_dir.is_some()
    }

    fn base_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// `<dir>/<prefix>_<canonical name lowercase>.h`
    pub fn primary_path(&self, peripheral: &Peripheral) -> PathBuf {
        self.base_dir().join(format!(
            "{}_{}.h",
            self.prefix,
            peripheral.name.to_lowercase()
        ))
    }

    /// `<dir>/duplicate/<prefix>_<original name lowercase>.h`
    pub fn duplicate_path(&self, peripheral: &Peripheral) -> PathBuf {
        self.base_dir().join(DUPLICATE_DIR).join(format!(
            "{}_{}.h",
            self.prefix,
            peripheral.realname.to_lowercase()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uart(realname: &str) -> Peripheral {
        Peripheral::new(realname, "UART", Vec::new())
    }

    #[test]
    fn test_coverage_width() {
        assert_eq!(FieldCoverage::Fixed32.width(8), 32);
        assert_eq!(FieldCoverage::Fixed32.width(64), 32);
        assert_eq!(FieldCoverage::RegisterSize.width(8), 8);
        assert_eq!(FieldCoverage::RegisterSize.width(64), 64);
        assert_eq!(FieldCoverage::default(), FieldCoverage::Fixed32);
    }

    #[test]
    fn test_paths() {
        let config = GeneratorConfig::new("chip").output_dir("/out");
        assert_eq!(
            config.primary_path(&uart("UART1")),
            PathBuf::from("/out/chip_uart.h")
        );
        assert_eq!(
            config.duplicate_path(&uart("UART1")),
            PathBuf::from("/out/duplicate/chip_uart1.h")
        );
    }

    #[test]
    fn test_paths_without_output_dir() {
        let config = GeneratorConfig::new("chip");
        assert!(!config.writes_output());
        assert_eq!(config.primary_path(&uart("UART0")), PathBuf::from("chip_uart.h"));
    }
}
