//! Error types for label decoding and batch renaming.
//!
//! Decode failures never escape the [`Decoder`](crate::decoder::Decoder): they
//! are folded into a [`DecodeOutcome`](crate::models::DecodeOutcome). Rename
//! failures never escape a single label file: the batch loop records them and
//! moves on.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::OutcomeKind;

/// Errors raised while turning an image into a payload
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The image file could not be opened or decoded
    #[error("image load")]
    Image(#[from] image::ImageError),

    /// The symbol reader reported an error other than "not found"
    #[error("symbol reader: {0}")]
    Backend(String),

    /// Symbol data was not valid UTF-8
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Fatal errors that stop a batch before any label is processed
#[derive(Error, Debug)]
pub enum BatchError {
    /// Input path is missing or not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Listing the input or preparing the output directory failed
    #[error("cannot access {path}")]
    Io {
        /// Directory being listed or created
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// A label could not be matched to exactly one specimen/label pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairingError {
    /// No `*.tif*` file carries the label's species token
    #[error("no images indexed for species '{0}'")]
    UnknownSpecies(String),

    /// The species group does not hold one specimen and one label
    #[error("species '{species}' has {specimens} specimen and {labels} label images")]
    IncompleteGroup {
        /// Species token
        species: String,
        /// Number of specimen images found
        specimens: usize,
        /// Number of label images found
        labels: usize,
    },
}

/// Per-label failure inside the batch loop
#[derive(Error, Debug)]
pub enum RenameError {
    /// Neither decoder produced a payload
    #[error("could not decode label ({0})")]
    Decode(OutcomeKind),

    /// The label has no usable partner file
    #[error(transparent)]
    Pairing(#[from] PairingError),

    /// Payload cannot be used inside a file name
    #[error("payload '{0}' is not usable in a file name")]
    InvalidPayload(String),

    /// Target exists and the policy forbids replacing it
    #[error("target already exists: {0}")]
    TargetExists(PathBuf),

    /// Copy, staging or commit failed
    #[error("io on {path}")]
    Io {
        /// File being written or read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl RenameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenameError::Io {
            path: path.into(),
            source,
        }
    }
}
