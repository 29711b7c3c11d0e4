//! Depth-bounded tree scanning and violation collection.

use crate::age::Threshold;
use crate::error::ScanError;
use crate::evaluator::{check_entry, Direction};
use crate::ignore_list::IgnoreList;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// One configured root and the rules applied beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTarget {
    pub name: String,
    pub root: PathBuf,
    /// Depth 0 is the root itself.
    pub min_depth: usize,
    pub max_depth: usize,
    pub threshold: Threshold,
    pub reverse: bool,
    /// Flag an entry only when it is both empty and age-violating.
    pub require_both: bool,
}

impl ScanTarget {
    pub fn direction(&self) -> Direction {
        Direction::from_reverse(self.reverse)
    }
}

/// Options that apply to every target in a run
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Also flag empty directories.
    pub flag_empty: bool,
}

/// Counters gathered while scanning
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub entries_checked: usize,
    pub ignored: usize,
    pub empty_dirs: usize,
    pub errors: usize,
}

/// Result of scanning one or more targets
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Flagged paths in target order, then enumeration order. Not de-duplicated.
    pub violations: Vec<PathBuf>,
    pub stats: ScanStats,
}

/// Scan every target against the current time and return the flagged paths.
pub fn scan(targets: &[ScanTarget], ignore_list: &IgnoreList, flag_empty: bool) -> Vec<PathBuf> {
    scan_at(
        targets,
        ignore_list,
        ScanOptions { flag_empty },
        SystemTime::now(),
    )
    .violations
}

/// Scan every target, evaluating ages relative to `now`.
pub fn scan_at(
    targets: &[ScanTarget],
    ignore_list: &IgnoreList,
    options: ScanOptions,
    now: SystemTime,
) -> ScanResult {
    let mut result = ScanResult::default();
    for target in targets {
        scan_target(target, ignore_list, options, now, &mut result);
    }
    result
}

/// Returns true for a directory, or a link to one, with no children.
/// Unreadable directories are not considered empty.
fn is_empty_dir(entry: &DirEntry) -> bool {
    if !entry.path().is_dir() {
        return false;
    }
    match fs::read_dir(entry.path()) {
        Ok(mut children) => children.next().is_none(),
        Err(err) => {
            debug!("Could not list {}: {}", entry.path().display(), err);
            false
        }
    }
}

fn scan_target(
    target: &ScanTarget,
    ignore_list: &IgnoreList,
    options: ScanOptions,
    now: SystemTime,
    result: &mut ScanResult,
) {
    info!("{}: {}", target.name, target.root.display());

    // Require-both only means something when emptiness is being checked
    let require_both = target.require_both && options.flag_empty;
    let direction = target.direction();

    let walker = WalkDir::new(&target.root)
        .min_depth(target.min_depth)
        .max_depth(target.max_depth)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("{}", ScanError::from(err));
                result.stats.errors += 1;
                continue;
            }
        };
        let path = entry.path();
        result.stats.entries_checked += 1;

        let empty_ok = options.flag_empty && is_empty_dir(&entry);
        if empty_ok {
            result.stats.empty_dirs += 1;
            if !require_both {
                info!("{} is empty", path.display());
                result.violations.push(path.to_path_buf());
                continue;
            }
        }

        debug!("Checking {}", path.display());
        let age_ok = if ignore_list.path_in_scope(path) {
            evaluate(path, now, target.threshold, direction, &mut result.stats)
        } else {
            info!("Ignoring {}", path.display());
            result.stats.ignored += 1;
            false
        };

        if require_both {
            if empty_ok && age_ok {
                result.violations.push(path.to_path_buf());
            }
        } else if age_ok {
            result.violations.push(path.to_path_buf());
        }
    }
}

fn evaluate(
    path: &Path,
    now: SystemTime,
    threshold: Threshold,
    direction: Direction,
    stats: &mut ScanStats,
) -> bool {
    match check_entry(path, now, threshold, direction) {
        Ok(violated) => violated,
        Err(err) => {
            tracing::error!("{}", err);
            stats.errors += 1;
            false
        }
    }
}
