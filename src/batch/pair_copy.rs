//! All-or-nothing copy of a specimen/label pair.
//!
//! Every source is first staged as a hidden temp file next to its target and
//! only then renamed into place, so an interrupted or failing pair leaves no
//! half-renamed state behind.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::ExistingTarget;
use crate::error::RenameError;

/// One file to copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    /// Original file, never modified
    pub source: PathBuf,
    /// New name
    pub target: PathBuf,
}

impl CopyPlan {
    /// Plan a copy of `source` to `target`
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Copy every planned file or none of them; returns the committed targets.
pub fn copy_all(plans: &[CopyPlan], existing: ExistingTarget) -> Result<Vec<PathBuf>, RenameError> {
    if existing == ExistingTarget::Keep {
        if let Some(plan) = plans.iter().find(|p| p.target.exists()) {
            return Err(RenameError::TargetExists(plan.target.clone()));
        }
    }

    let mut staged = Vec::with_capacity(plans.len());
    for plan in plans {
        staged.push(stage(plan)?);
    }

    let mut committed: Vec<(PathBuf, bool)> = Vec::with_capacity(plans.len());
    for (tmp, plan) in staged.into_iter().zip(plans) {
        let replaced = plan.target.exists();
        let result = match existing {
            ExistingTarget::Replace => tmp.persist(&plan.target),
            ExistingTarget::Keep => tmp.persist_noclobber(&plan.target),
        };
        if let Err(err) = result {
            rollback(&committed);
            return Err(RenameError::io(&plan.target, err.error));
        }
        debug!(target = %plan.target.display(), replaced, "committed copy");
        committed.push((plan.target.clone(), replaced));
    }

    Ok(committed.into_iter().map(|(target, _)| target).collect())
}

fn stage(plan: &CopyPlan) -> Result<NamedTempFile, RenameError> {
    let dir = plan
        .target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = plan
        .target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut source = File::open(&plan.source).map_err(|e| RenameError::io(&plan.source, e))?;
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(|e| RenameError::io(dir, e))?;

    io::copy(&mut source, tmp.as_file_mut()).map_err(|e| RenameError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| RenameError::io(tmp.path(), e))?;

    let permissions = fs::metadata(&plan.source)
        .map_err(|e| RenameError::io(&plan.source, e))?
        .permissions();
    fs::set_permissions(tmp.path(), permissions).map_err(|e| RenameError::io(tmp.path(), e))?;

    Ok(tmp)
}

fn rollback(committed: &[(PathBuf, bool)]) {
    for (target, replaced) in committed.iter().rev() {
        if *replaced {
            warn!(
                target = %target.display(),
                "cannot restore replaced file during rollback"
            );
            continue;
        }
        if let Err(err) = fs::remove_file(target) {
            warn!(target = %target.display(), error = %err, "rollback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_copies_both_files() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.tif"), b"specimen").unwrap();
        fs::write(src.path().join("a_lbl.tif"), b"label").unwrap();

        let plans = [
            CopyPlan::new(src.path().join("a.tif"), out.path().join("X_a.tif")),
            CopyPlan::new(src.path().join("a_lbl.tif"), out.path().join("X_a_lbl.tif")),
        ];
        let done = copy_all(&plans, ExistingTarget::Replace).unwrap();

        assert_eq!(done.len(), 2);
        assert_eq!(names(out.path()), vec!["X_a.tif", "X_a_lbl.tif"]);
        assert_eq!(fs::read(out.path().join("X_a.tif")).unwrap(), b"specimen");
        assert!(src.path().join("a.tif").exists());
    }

    #[test]
    fn test_missing_second_source_leaves_nothing() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.tif"), b"specimen").unwrap();

        let plans = [
            CopyPlan::new(src.path().join("a.tif"), out.path().join("X_a.tif")),
            CopyPlan::new(src.path().join("gone.tif"), out.path().join("X_gone.tif")),
        ];
        let err = copy_all(&plans, ExistingTarget::Replace).unwrap_err();

        assert!(matches!(err, RenameError::Io { .. }));
        assert!(names(out.path()).is_empty());
    }

    #[test]
    fn test_failed_commit_rolls_back_first_target() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.tif"), b"specimen").unwrap();
        fs::write(src.path().join("a_lbl.tif"), b"label").unwrap();
        // a directory squatting on the second target makes its rename fail
        fs::create_dir(out.path().join("X_a_lbl.tif")).unwrap();
        fs::write(out.path().join("X_a_lbl.tif").join("keep"), b"").unwrap();

        let plans = [
            CopyPlan::new(src.path().join("a.tif"), out.path().join("X_a.tif")),
            CopyPlan::new(src.path().join("a_lbl.tif"), out.path().join("X_a_lbl.tif")),
        ];
        assert!(copy_all(&plans, ExistingTarget::Replace).is_err());
        assert_eq!(names(out.path()), vec!["X_a_lbl.tif"]);
    }

    #[test]
    fn test_keep_refuses_existing_target() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.tif"), b"new").unwrap();
        fs::write(out.path().join("X_a.tif"), b"old").unwrap();

        let plans = [CopyPlan::new(src.path().join("a.tif"), out.path().join("X_a.tif"))];
        let err = copy_all(&plans, ExistingTarget::Keep).unwrap_err();
        assert!(matches!(err, RenameError::TargetExists(_)));
        assert_eq!(fs::read(out.path().join("X_a.tif")).unwrap(), b"old");

        copy_all(&plans, ExistingTarget::Replace).unwrap();
        assert_eq!(fs::read(out.path().join("X_a.tif")).unwrap(), b"new");
    }
}
