//! Batch renaming workflow
//!
//! Index the species of an input directory, decode every label image and copy
//! each specimen/label pair under its accession number.

/// Transactional pair copy
pub mod pair_copy;
/// Decode loop and summary types
pub mod renamer;
/// Progress events and reporters
pub mod report;
/// Species index and file roles
pub mod species;

pub use renamer::{BatchRenamer, BatchSummary, FailureRecord, RenamedPair};
pub use report::{BatchEvent, BatchReporter, ConsoleReporter, RecordingReporter};
pub use species::{FileRole, ImageFile, SpeciesIndex, SpeciesPair};
