//! Species index over the input directory.
//!
//! File names follow `<Species>_<rest>.tif`; label images additionally carry
//! `lbl` somewhere in the name (`Abies_12_lbl.tif`).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{BatchError, PairingError};

/// Marker that identifies a label image
pub const LABEL_MARKER: &str = "lbl";
/// Marker that identifies an image the index should consider (`*.tif*`)
pub const TIFF_MARKER: &str = ".tif";

/// Role of an image within its species pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// Photograph of the specimen itself
    Specimen,
    /// Photograph of the specimen's label
    Label,
}

impl FileRole {
    /// Infer the role from a base file name
    pub fn from_name(name: &str) -> Self {
        if name.contains(LABEL_MARKER) {
            FileRole::Label
        } else {
            FileRole::Specimen
        }
    }
}

/// Species token: the base name up to the first underscore
pub fn species_token(name: &str) -> &str {
    match name.split_once('_') {
        Some((species, _)) => species,
        None => name,
    }
}

/// `*.tif*` glob semantics: visible files whose name contains `.tif`
pub fn is_tiff_name(name: &str) -> bool {
    !name.starts_with('.') && name.contains(TIFF_MARKER)
}

/// `*lbl*` glob semantics: visible files whose name contains `lbl`
pub fn is_label_name(name: &str) -> bool {
    !name.starts_with('.') && name.contains(LABEL_MARKER)
}

/// List regular files directly inside `dir` whose name satisfies `accept`, sorted by name
pub fn list_files<F>(dir: &Path, accept: F) -> Result<Vec<PathBuf>, BatchError>
where
    F: Fn(&str) -> bool,
{
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| BatchError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BatchError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if accept(name) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// One indexed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Full path
    pub path: PathBuf,
    /// Base file name
    pub name: String,
    /// Species token
    pub species: String,
    /// Specimen or label
    pub role: FileRole,
}

impl ImageFile {
    /// Index a path; `None` when it has no UTF-8 file name
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            species: species_token(&name).to_string(),
            role: FileRole::from_name(&name),
            name,
            path,
        })
    }
}

/// Specimen and label image of one species
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesPair<'a> {
    /// Specimen photograph
    pub specimen: &'a ImageFile,
    /// Label photograph
    pub label: &'a ImageFile,
}

impl<'a> SpeciesPair<'a> {
    /// Both files, specimen first
    pub fn files(&self) -> [&'a ImageFile; 2] {
        [self.specimen, self.label]
    }
}

/// All `*.tif*` images of a batch grouped by species token
#[derive(Debug, Clone, Default)]
pub struct SpeciesIndex {
    files: Vec<ImageFile>,
    species: Vec<String>,
}

impl SpeciesIndex {
    /// Index every `*.tif*` file directly inside `dir`
    pub fn build(dir: &Path) -> Result<Self, BatchError> {
        let paths = list_files(dir, is_tiff_name)?;
        let index = Self::from_paths(paths);
        debug!(
            files = index.files.len(),
            species = index.species.len(),
            "species index built"
        );
        Ok(index)
    }

    /// Index an explicit list of paths, kept in the given order
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let files: Vec<ImageFile> = paths.into_iter().filter_map(ImageFile::from_path).collect();
        let species: BTreeSet<&str> = files.iter().map(|f| f.species.as_str()).collect();
        let species = species.into_iter().map(str::to_string).collect();
        Self { files, species }
    }

    /// Unique species tokens, sorted
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Every indexed file in listing order
    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    /// Files of one species in listing order
    pub fn group<'a>(&'a self, species: &'a str) -> impl Iterator<Item = &'a ImageFile> + 'a {
        self.files.iter().filter(move |f| f.species == species)
    }

    /// The specimen/label pair of a species.
    ///
    /// Fails loudly unless the group holds exactly one image of each role.
    pub fn pair_for(&self, species: &str) -> Result<SpeciesPair<'_>, PairingError> {
        let mut specimens = Vec::new();
        let mut labels = Vec::new();
        for file in self.files.iter().filter(|f| f.species == species) {
            match file.role {
                FileRole::Specimen => specimens.push(file),
                FileRole::Label => labels.push(file),
            }
        }

        match (specimens.as_slice(), labels.as_slice()) {
            ([], []) => Err(PairingError::UnknownSpecies(species.to_string())),
            ([specimen], [label]) => Ok(SpeciesPair {
                specimen: *specimen,
                label: *label,
            }),
            _ => Err(PairingError::IncompleteGroup {
                species: species.to_string(),
                specimens: specimens.len(),
                labels: labels.len(),
            }),
        }
    }
}
