//! Deleting or trashing flagged entries.

use crate::error::RemediationError;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Asks whether a flagged entry may be removed.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Interactive confirmation on a reader/writer pair, stdin/stdout by default.
/// Only `y` or `yes` (any case) counts as agreement.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl PromptConfirm<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        PromptConfirm::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        PromptConfirm { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{}", prompt)
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Totals from a remediation pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemediationSummary {
    pub deleted: usize,
    pub trashed: usize,
    pub declined: usize,
    pub failed: usize,
    pub parents_removed: usize,
}

/// Delete, or move into `trash_dir`, every path in `paths`.
///
/// Without `force` each path is confirmed first. Failures are logged and the
/// remaining paths are still processed.
pub fn remediate(
    paths: &[PathBuf],
    force: bool,
    trash_dir: Option<&Path>,
    confirm: &mut dyn Confirm,
) -> RemediationSummary {
    let mut summary = RemediationSummary::default();

    for path in paths {
        if !force && !confirm.confirm(&format!("Delete {}? (y/N) ", path.display())) {
            summary.declined += 1;
            continue;
        }

        warn!("DELETING {}", path.display());
        let outcome = match trash_dir {
            Some(trash) => move_to_trash(path, trash).map(|_| summary.trashed += 1),
            None => remove_path(path).map(|_| summary.deleted += 1),
        };
        if let Err(err) = outcome {
            error!("{}", err);
            summary.failed += 1;
            continue;
        }

        if remove_empty_parent(path) {
            summary.parents_removed += 1;
        }
    }

    summary
}

/// Remove a file, symlink or whole directory tree.
pub fn remove_path(path: &Path) -> Result<(), RemediationError> {
    let metadata = fs::symlink_metadata(path).map_err(|source| RemediationError::Delete {
        path: path.to_path_buf(),
        source,
    })?;
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|source| RemediationError::Delete {
        path: path.to_path_buf(),
        source,
    })
}

/// Rename `path` to `trash/<basename>`. Never replaces something already in
/// the trash.
pub fn move_to_trash(path: &Path, trash: &Path) -> Result<PathBuf, RemediationError> {
    let name = path.file_name().ok_or_else(|| RemediationError::NoFileName {
        path: path.to_path_buf(),
    })?;
    let destination = trash.join(name);
    if fs::symlink_metadata(&destination).is_ok() {
        return Err(RemediationError::TrashOccupied {
            path: path.to_path_buf(),
            destination,
        });
    }
    fs::rename(path, &destination).map_err(|source| RemediationError::Move {
        path: path.to_path_buf(),
        destination: destination.clone(),
        source,
    })?;
    Ok(destination)
}

/// Remove the parent of a just-removed entry if nothing is left in it.
fn remove_empty_parent(path: &Path) -> bool {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return false;
    };
    let is_empty = match fs::read_dir(parent) {
        Ok(mut children) => children.next().is_none(),
        Err(_) => false,
    };
    if !is_empty {
        return false;
    }

    warn!("EMPTY DIRECTORY - DELETING {}", parent.display());
    match remove_path(parent) {
        Ok(()) => true,
        Err(err) => {
            error!("{}", err);
            false
        }
    }
}
