//! Batch progress events and the sinks that consume them.

use std::path::PathBuf;

use crate::models::AnnotationSource;

/// Something an operator (or a test) may want to know about a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Input and output directories resolved
    SourcesResolved {
        /// Directory holding the photographs
        input: PathBuf,
        /// Directory receiving the renamed copies
        output: PathBuf,
    },
    /// Unique species tokens found in the input
    SpeciesIndexed {
        /// Sorted species tokens
        species: Vec<String>,
    },
    /// A label image is about to be decoded
    DecodeStarted {
        /// Label image
        label: PathBuf,
    },
    /// A label yielded its accession number
    Decoded {
        /// Label image
        label: PathBuf,
        /// Accession number
        payload: String,
        /// Decoder that read it
        decoded_by: AnnotationSource,
    },
    /// A file was copied under its accession name
    Renamed {
        /// Original file
        source: PathBuf,
        /// New copy
        target: PathBuf,
    },
    /// A label could not be processed
    LabelFailed {
        /// Label image
        label: PathBuf,
        /// Human-readable cause
        reason: String,
    },
    /// All labels processed
    Finished {
        /// Labels whose pair was renamed
        renamed: usize,
        /// Labels needing manual attention, in processing order
        failed: Vec<PathBuf>,
    },
}

/// Receives batch events
pub trait BatchReporter {
    /// Handle one event
    fn report(&mut self, event: &BatchEvent);
}

/// Plain-text operator report on stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl BatchReporter for ConsoleReporter {
    fn report(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::SourcesResolved { input, output } => {
                println!("\nSource files: {}", input.display());
                println!("Output destination: {}", output.display());
            }
            BatchEvent::SpeciesIndexed { species } => {
                println!("\nList of species:");
                for s in species {
                    println!("{s}");
                }
            }
            BatchEvent::DecodeStarted { label } => {
                println!("\nDecoding label file... {}", label.display());
            }
            BatchEvent::Decoded {
                payload,
                decoded_by,
                ..
            } => {
                if *decoded_by == AnnotationSource::DataMatrix {
                    println!("Barcode not found, trying datamatrix decoder...");
                }
                println!("Label successfully decoded by {decoded_by} decoder: {payload}");
            }
            BatchEvent::Renamed { target, .. } => {
                println!("File successfully renamed as... {}", target.display());
            }
            BatchEvent::LabelFailed { reason, .. } => {
                println!("Unable to process label file: {reason}");
            }
            BatchEvent::Finished { renamed, failed } => {
                println!("\nRenamed {renamed} label pair(s).");
                if failed.is_empty() {
                    println!("All label files were decoded.");
                } else {
                    println!(
                        "\nFollowing label files could not be decoded, rename these manually:"
                    );
                    for f in failed {
                        println!("{}", f.display());
                    }
                }
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    /// Events in emission order
    pub events: Vec<BatchEvent>,
}

impl RecordingReporter {
    /// Targets of every `Renamed` event
    pub fn renamed_targets(&self) -> Vec<PathBuf> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Renamed { target, .. } => Some(target.clone()),
                _ => None,
            })
            .collect()
    }

    /// Payload and decoder of every `Decoded` event
    pub fn decoded(&self) -> Vec<(String, AnnotationSource)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Decoded {
                    payload,
                    decoded_by,
                    ..
                } => Some((payload.clone(), *decoded_by)),
                _ => None,
            })
            .collect()
    }

    /// Labels of every `LabelFailed` event
    pub fn failed_labels(&self) -> Vec<PathBuf> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::LabelFailed { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }
}

impl BatchReporter for RecordingReporter {
    fn report(&mut self, event: &BatchEvent) {
        self.events.push(event.clone());
    }
}

impl<R: BatchReporter + ?Sized> BatchReporter for &mut R {
    fn report(&mut self, event: &BatchEvent) {
        (**self).report(event);
    }
}
