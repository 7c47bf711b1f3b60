//! specimen_labels - accession label decoding for specimen photography
//!
//! Decodes the accession number printed on a label photograph (1D barcode
//! first, DataMatrix as a fallback) and copies the matching specimen/label
//! image pair under that number.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Audit overlays for decoded labels
pub mod annotate;
/// Batch workflow (species index, decode loop, transactional copies)
pub mod batch;
/// Decoder and rename tunables
pub mod config;
/// Barcode and DataMatrix decoding
pub mod decoder;
/// Candidate region detection
pub mod detector;
/// Error types
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Core data structures (regions, payloads, outcomes)
pub mod models;
/// Helpers used by the command-line tools
pub mod tools;
/// Utility functions (loading, thresholding, geometry)
pub mod utils;

pub use batch::{BatchRenamer, BatchSummary};
pub use config::{CandidateOrder, DecoderConfig, ExistingTarget, RenameConfig};
pub use decoder::Decoder;
pub use error::{BatchError, DecodeError, PairingError, RenameError};
pub use models::{Annotation, CandidateRegion, DecodeOutcome, OutcomeKind, Payload};

use std::path::Path;

/// Decode a label image with the default `rxing`-backed decoder
///
/// # Example
/// ```no_run
/// let outcome = specimen_labels::decode("Abies_12_lbl.tif");
/// if let Some(accession) = outcome.payload() {
///     println!("accession {accession}");
/// }
/// ```
pub fn decode<P: AsRef<Path>>(path: P) -> DecodeOutcome {
    Decoder::new().decode_file(path)
}

/// Run a batch with default settings, reporting to stdout
pub fn rename_directory(input: &Path, output: &Path) -> Result<BatchSummary, BatchError> {
    let mut reporter = batch::ConsoleReporter;
    BatchRenamer::new(RenameConfig::default()).run(input, output, &mut reporter)
}
