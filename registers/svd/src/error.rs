// Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make an input document unusable. Any of these aborts the run.
#[derive(Error, Debug)]
pub enum SvdError {
    #[error("Failed to open input file {0}: No such file or directory")]
    MissingInputFile(PathBuf),
    #[error("Failed to open input file {0}: Is a directory")]
    InputIsDirectory(PathBuf),
    #[error("Failed to parse SVD: Invalid XML ({0})")]
    MalformedXml(String),
    #[error("Failed to parse SVD: XML missing <device> root, found <{0}>")]
    MissingRoot(String),
    #[error("Failed to load SVD: No peripherals")]
    NoPeripheralsSection,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SvdResult<T> = std::result::Result<T, SvdError>;
