//! Helpers behind the `labeltool` diagnostics.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::batch::species::{SpeciesIndex, is_label_name, list_files};
use crate::decoder::Decoder;
use crate::error::BatchError;
use crate::models::OutcomeKind;

/// Decode result of one label in a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Label image
    pub label: PathBuf,
    /// Outcome tag
    pub kind: OutcomeKind,
    /// Decoded text when found
    pub payload: Option<String>,
}

/// Summary counts for a dry run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanStats {
    /// Labels examined
    pub total: usize,
    /// Labels that decoded
    pub decoded: usize,
}

impl ScanStats {
    /// Share of labels that decoded, in percent
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.decoded as f64 / self.total as f64 * 100.0
        }
    }
}

/// Decode every `*lbl*` file of `dir` in parallel without writing anything.
///
/// Entries come back sorted by label path.
pub fn scan_labels(dir: &Path, decoder: &Decoder) -> Result<Vec<ScanEntry>, BatchError> {
    let labels = list_files(dir, is_label_name)?;
    let mut entries: Vec<ScanEntry> = labels
        .into_par_iter()
        .map(|label| {
            let outcome = decoder.decode_file(&label);
            ScanEntry {
                kind: outcome.kind(),
                payload: outcome.into_payload().map(|p| p.into_string()),
                label,
            }
        })
        .collect();
    entries.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(entries)
}

/// Count decoded labels
pub fn scan_stats(entries: &[ScanEntry]) -> ScanStats {
    ScanStats {
        total: entries.len(),
        decoded: entries.iter().filter(|e| e.kind == OutcomeKind::Found).count(),
    }
}

/// Index `dir` the same way a batch run does
pub fn species_index(dir: &Path) -> Result<SpeciesIndex, BatchError> {
    SpeciesIndex::build(dir)
}
