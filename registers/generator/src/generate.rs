// Licensed under the Apache-2.0 license

//! The per-peripheral pipeline step and the run summary it folds into.
//!
//! Each peripheral record goes through [`process_peripheral`], which returns
//! a [`PeripheralOutcome`]. The caller folds outcomes into a [`RunSummary`];
//! nothing is counted behind its back.

use crate::config::GeneratorConfig;
use crate::dedup::{Catalog, Classification};
use crate::layout::{load_peripheral, LayoutError};
use registers_svd::{Device, PeripheralNode};

/// What happened to one peripheral record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeripheralOutcome {
    /// Marked `derivedFrom`; not loaded.
    Derived { name: String },
    /// Could not be laid out; not emitted.
    Skipped(LayoutError),
    /// Normalized and added to the catalog.
    Accepted {
        classification: Classification,
        registers: usize,
        fields: usize,
    },
}

/// Totals over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub peripherals: usize,
    pub derived: usize,
    pub skipped: usize,
    pub divergent: usize,
    pub registers: usize,
    pub fields: usize,
}

impl RunSummary {
    /// Adds one outcome to the totals.
    pub fn record(mut self, outcome: &PeripheralOutcome) -> Self {
        match outcome {
            PeripheralOutcome::Derived { .. } => self.derived += 1,
            PeripheralOutcome::Skipped(_) => self.skipped += 1,
            PeripheralOutcome::Accepted {
                classification,
                registers,
                fields,
            } => {
                self.peripherals += 1;
                self.registers += registers;
                self.fields += fields;
                if matches!(classification, Classification::Divergent { .. }) {
                    self.divergent += 1;
                }
            }
        }
        self
    }
}

/// Loads, normalizes and classifies one peripheral record.
pub fn process_peripheral(
    node: &PeripheralNode,
    device: &Device,
    config: &GeneratorConfig,
    catalog: &mut Catalog,
) -> PeripheralOutcome {
    if let Some(base) = &node.derived_from {
        log::debug!("{} derived from {base}, skipping", node.name);
        return PeripheralOutcome::Derived {
            name: node.name.clone(),
        };
    }

    let peripheral = match load_peripheral(node, device, config) {
        Ok(peripheral) => peripheral,
        Err(e) => {
            log::warn!("Failed to load SVD: {e}");
            return PeripheralOutcome::Skipped(e);
        }
    };

    let entry = catalog.accept(peripheral, config);
    let peripheral = &entry.peripheral;
    log::info!("--> {}: {}", peripheral.name, peripheral.description);
    if let Some(path) = &peripheral.path {
        log::info!("  └>{}", path.display());
    }

    PeripheralOutcome::Accepted {
        classification: entry.classification,
        registers: peripheral.register_count(),
        fields: peripheral.field_count(),
    }
}

/// Result of running every peripheral of a device through the pipeline.
#[derive(Clone, Debug, Default)]
pub struct Generation {
    pub catalog: Catalog,
    pub summary: RunSummary,
}

/// Runs every peripheral of `device` through [`process_peripheral`].
pub fn generate(device: &Device, config: &GeneratorConfig) -> Generation {
    let mut catalog = Catalog::new();
    let summary = device
        .peripherals
        .iter()
        .map(|node| process_peripheral(node, device, config, &mut catalog))
        .fold(RunSummary::default(), |summary, outcome| {
            summary.record(&outcome)
        });
    Generation { catalog, summary }
}
