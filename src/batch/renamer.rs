use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::batch::pair_copy::{CopyPlan, copy_all};
use crate::batch::report::{BatchEvent, BatchReporter};
use crate::batch::species::{SpeciesIndex, is_label_name, list_files, species_token};
use crate::config::{ExistingTarget, RenameConfig};
use crate::decoder::Decoder;
use crate::error::{BatchError, RenameError};
use crate::models::{AnnotationSource, DecodeOutcome, Payload};

/// A label whose pair was copied under its accession number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedPair {
    /// Label image that was decoded
    pub label: PathBuf,
    /// Decoded accession number
    pub payload: Payload,
    /// Decoder that produced the payload
    pub decoded_by: AnnotationSource,
    /// Committed copies, specimen first
    pub copies: Vec<CopyPlan>,
}

impl RenamedPair {
    /// New file paths, specimen first
    pub fn targets(&self) -> Vec<PathBuf> {
        self.copies.iter().map(|c| c.target.clone()).collect()
    }
}

/// A label that needs manual renaming
#[derive(Debug)]
pub struct FailureRecord {
    /// Label image
    pub label: PathBuf,
    /// Why it failed
    pub error: RenameError,
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Unique species tokens of the input
    pub species: Vec<String>,
    /// Successfully renamed pairs in processing order
    pub renamed: Vec<RenamedPair>,
    /// Failed labels in processing order
    pub failures: Vec<FailureRecord>,
}

impl BatchSummary {
    /// Paths of the failed labels
    pub fn failed_labels(&self) -> Vec<PathBuf> {
        self.failures.iter().map(|f| f.label.clone()).collect()
    }
}

/// Decodes every label image of a directory and copies its pair under the accession number
pub struct BatchRenamer {
    decoder: Decoder,
    existing: ExistingTarget,
}

impl BatchRenamer {
    /// `rxing`-backed renamer
    pub fn new(config: RenameConfig) -> Self {
        Self::with_decoder(Decoder::with_config(config.decoder), config.existing)
    }

    /// Renamer over an arbitrary decoder
    pub fn with_decoder(decoder: Decoder, existing: ExistingTarget) -> Self {
        Self { decoder, existing }
    }

    /// Run the whole batch.
    ///
    /// Only problems with the directories themselves are returned as errors;
    /// every per-label problem ends up in [`BatchSummary::failures`].
    pub fn run<R: BatchReporter + ?Sized>(
        &self,
        input: &Path,
        output: &Path,
        reporter: &mut R,
    ) -> Result<BatchSummary, BatchError> {
        reporter.report(&BatchEvent::SourcesResolved {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });

        let index = SpeciesIndex::build(input)?;
        reporter.report(&BatchEvent::SpeciesIndexed {
            species: index.species().to_vec(),
        });

        fs::create_dir_all(output).map_err(|source| BatchError::Io {
            path: output.to_path_buf(),
            source,
        })?;

        let labels = list_files(input, is_label_name)?;
        info!(labels = labels.len(), "processing label files");

        let mut summary = BatchSummary {
            species: index.species().to_vec(),
            ..BatchSummary::default()
        };

        for label in labels {
            reporter.report(&BatchEvent::DecodeStarted {
                label: label.clone(),
            });
            let result = self.decode_label(&label).and_then(|(payload, decoded_by)| {
                reporter.report(&BatchEvent::Decoded {
                    label: label.clone(),
                    payload: payload.as_str().to_string(),
                    decoded_by,
                });
                self.copy_pair(&label, payload, decoded_by, &index, output)
            });
            match result {
                Ok(pair) => {
                    for copy in &pair.copies {
                        reporter.report(&BatchEvent::Renamed {
                            source: copy.source.clone(),
                            target: copy.target.clone(),
                        });
                    }
                    summary.renamed.push(pair);
                }
                Err(error) => {
                    warn!(label = %label.display(), error = %error, "label failed");
                    reporter.report(&BatchEvent::LabelFailed {
                        label: label.clone(),
                        reason: error.to_string(),
                    });
                    summary.failures.push(FailureRecord { label, error });
                }
            }
        }

        reporter.report(&BatchEvent::Finished {
            renamed: summary.renamed.len(),
            failed: summary.failed_labels(),
        });
        Ok(summary)
    }

    /// Decode one label image, reporting which decoder succeeded
    pub fn decode_label(&self, label: &Path) -> Result<(Payload, AnnotationSource), RenameError> {
        let (outcome, annotations) = self.decoder.decode_file_annotated(label);
        match outcome {
            DecodeOutcome::Found(payload) => {
                // the symbol that decoded is always annotated last
                let decoded_by = annotations
                    .last()
                    .map_or(AnnotationSource::Barcode, |a| a.source);
                Ok((payload, decoded_by))
            }
            other => Err(RenameError::Decode(other.kind())),
        }
    }

    /// Copy the specimen/label pair of `label` into `output` under `payload`
    pub fn copy_pair(
        &self,
        label: &Path,
        payload: Payload,
        decoded_by: AnnotationSource,
        index: &SpeciesIndex,
        output: &Path,
    ) -> Result<RenamedPair, RenameError> {
        let pair = index.pair_for(species_of(label))?;
        let plans = pair
            .files()
            .iter()
            .map(|file| {
                let name = target_name(&payload, &file.name)?;
                Ok(CopyPlan::new(&file.path, output.join(name)))
            })
            .collect::<Result<Vec<_>, RenameError>>()?;

        copy_all(&plans, self.existing)?;
        info!(label = %label.display(), payload = %payload, "pair renamed");
        Ok(RenamedPair {
            label: label.to_path_buf(),
            payload,
            decoded_by,
            copies: plans,
        })
    }
}

fn species_of(label: &Path) -> &str {
    label
        .file_name()
        .and_then(|n| n.to_str())
        .map(species_token)
        .unwrap_or_default()
}

/// `<payload>_<original name>`, refusing payloads that would escape the output directory
pub fn target_name(payload: &Payload, original: &str) -> Result<String, RenameError> {
    let text = payload.as_str();
    if text.contains(['/', '\\', '\0']) {
        return Err(RenameError::InvalidPayload(text.to_string()));
    }
    Ok(format!("{text}_{original}"))
}
