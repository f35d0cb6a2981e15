// Licensed under the Apache-2.0 license

//! Grouping of peripheral instances under their canonical name.
//!
//! Repeated hardware blocks (`TIMER0`, `TIMER1`, ...) share a canonical name.
//! The first instance accepted owns the primary header. Later instances are
//! either structurally equal to it, and add nothing, or divergent, in which
//! case they get their own header under `duplicate/` and a diff against the
//! primary.

use crate::config::GeneratorConfig;
use crate::model::Peripheral;
use std::path::PathBuf;

/// How a peripheral relates to those accepted before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// First peripheral with this canonical name.
    Unique,
    /// Same canonical name and same structure as the entry at `original`.
    Redundant { original: usize },
    /// Same canonical name as the entry at `original` but a different structure.
    Divergent { original: usize },
}

/// Header paths of a divergent duplicate and the primary it diverges from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicatePair {
    pub original: PathBuf,
    pub duplicate: PathBuf,
}

impl DuplicatePair {
    /// `<duplicate stem>.diff`, next to the duplicate header.
    pub fn diff_path(&self) -> PathBuf {
        self.duplicate.with_extension("diff")
    }
}

#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub peripheral: Peripheral,
    pub classification: Classification,
}

impl CatalogEntry {
    /// False for redundant instances, whose header would repeat the primary's.
    pub fn emits_header(&self) -> bool {
        !matches!(self.classification, Classification::Redundant { .. })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.peripheral.path.as_ref()
    }
}

/// Accepted peripherals, in acceptance order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    duplicates: Vec<DuplicatePair>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `peripheral` against the first accepted entry sharing its
    /// canonical name.
    pub fn classify(&self, peripheral: &Peripheral) -> Classification {
        match self
            .entries
            .iter()
            .position(|e| e.peripheral.name == peripheral.name)
        {
            None => Classification::Unique,
            Some(original) if self.entries[original].peripheral == *peripheral => {
                Classification::Redundant { original }
            }
            Some(original) => Classification::Divergent { original },
        }
    }

    /// Classifies `peripheral`, assigns its output path and stores it.
    pub fn accept(&mut self, mut peripheral: Peripheral, config: &GeneratorConfig) -> &CatalogEntry {
        let classification = self.classify(&peripheral);
        let path = match classification {
            Classification::Divergent { original } => {
                let original = &self.entries[original].peripheral;
                log::warn!(
                    "Duplicate found for peripheral {} ({}, {})",
                    peripheral.name,
                    original.realname,
                    peripheral.realname
                );
                let path = config.duplicate_path(&peripheral);
                self.duplicates.push(DuplicatePair {
                    original: original
                        .path
                        .clone()
                        .unwrap_or_else(|| config.primary_path(original)),
                    duplicate: path.clone(),
                });
                path
            }
            Classification::Unique | Classification::Redundant { .. } => {
                config.primary_path(&peripheral)
            }
        };
        peripheral.path = Some(path);

        let index = self.entries.len();
        self.entries.push(CatalogEntry {
            peripheral,
            classification,
        });
        &self.entries[index]
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn duplicates(&self) -> &[DuplicatePair] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
