//! Old/new decision for a single entry.

use crate::age::Threshold;
use crate::error::ScanError;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::info;

/// Which side of the threshold counts as a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Flag entries older than the threshold.
    #[default]
    Old,
    /// Flag entries newer than the threshold.
    New,
}

impl Direction {
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Direction::New
        } else {
            Direction::Old
        }
    }
}

/// Age of something modified at `mod_time`, in seconds relative to `now`.
/// Negative when `mod_time` lies in the future.
fn age_seconds(mod_time: SystemTime, now: SystemTime) -> f64 {
    match now.duration_since(mod_time) {
        Ok(age) => age.as_secs_f64(),
        Err(ahead) => -ahead.duration().as_secs_f64(),
    }
}

/// Decide whether a modification time violates `threshold`.
///
/// An age exactly equal to the threshold is never a violation.
pub fn is_violation(
    mod_time: SystemTime,
    now: SystemTime,
    threshold: Threshold,
    direction: Direction,
) -> bool {
    let age = age_seconds(mod_time, now);
    let limit = threshold.seconds();
    match direction {
        Direction::Old => age > limit,
        Direction::New => age < limit,
    }
}

/// Read the modification time of `path`, following symlinks. A dangling link
/// is a [`ScanError::Stat`].
pub fn modified_time(path: &Path) -> Result<SystemTime, ScanError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| ScanError::Stat {
            path: path.to_path_buf(),
            source,
        })
}

/// Stat `path` and check it against `threshold`.
///
/// The modification time is read here rather than at enumeration so an entry
/// removed in between surfaces as [`ScanError::Stat`].
pub fn check_entry(
    path: &Path,
    now: SystemTime,
    threshold: Threshold,
    direction: Direction,
) -> Result<bool, ScanError> {
    let mod_time = modified_time(path)?;
    let violated = is_violation(mod_time, now, threshold, direction);
    if violated {
        match direction {
            Direction::Old => info!("----{} is old----", path.display()),
            Direction::New => info!("----{} is new----", path.display()),
        }
    }
    Ok(violated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // 2008-07-03 21:42:10 UTC
    const OLD_MTIME: u64 = 1_215_121_330;

    fn two_days() -> Threshold {
        Threshold::from_days(2.0)
    }

    fn old_time() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(OLD_MTIME)
    }

    #[test]
    fn test_old_entry_normal_mode() {
        let now = SystemTime::now();
        assert!(is_violation(old_time(), now, two_days(), Direction::Old));
    }

    #[test]
    fn test_old_entry_reverse_mode() {
        let now = SystemTime::now();
        assert!(!is_violation(old_time(), now, two_days(), Direction::New));
    }

    #[test]
    fn test_fresh_entry_both_modes() {
        let now = SystemTime::now();
        assert!(!is_violation(now, now, two_days(), Direction::Old));
        assert!(is_violation(now, now, two_days(), Direction::New));
    }

    #[test]
    fn test_equal_age_is_never_a_violation() {
        let now = SystemTime::now();
        let exactly = now - Duration::from_secs(2 * 86_400);
        assert!(!is_violation(exactly, now, two_days(), Direction::Old));
        assert!(!is_violation(exactly, now, two_days(), Direction::New));
    }

    #[test]
    fn test_future_mtime_counts_as_new() {
        let now = SystemTime::now();
        let future = now + Duration::from_secs(3600);
        assert!(!is_violation(future, now, two_days(), Direction::Old));
        assert!(is_violation(future, now, two_days(), Direction::New));
    }

    #[test]
    fn test_direction_from_reverse() {
        assert_eq!(Direction::from_reverse(false), Direction::Old);
        assert_eq!(Direction::from_reverse(true), Direction::New);
    }

    #[test]
    fn test_check_entry_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old");
        let new = dir.path().join("new");
        fs::write(&old, "").unwrap();
        fs::write(&new, "").unwrap();
        filetime::set_file_mtime(&old, filetime::FileTime::from_unix_time(OLD_MTIME as i64, 0))
            .unwrap();

        let now = SystemTime::now();
        assert!(check_entry(&old, now, two_days(), Direction::Old).unwrap());
        assert!(!check_entry(&new, now, two_days(), Direction::Old).unwrap());
        assert!(!check_entry(&old, now, two_days(), Direction::New).unwrap());
        assert!(check_entry(&new, now, two_days(), Direction::New).unwrap());
    }

    #[test]
    fn test_check_entry_vanished() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");
        let result = check_entry(&gone, SystemTime::now(), two_days(), Direction::Old);
        assert!(matches!(result, Err(ScanError::Stat { .. })));
    }
}
