//! Redwood - Age-Based Tree Pruner
//!
//! Redwood walks configured directory trees and flags entries whose modification time
//! is older than a configured age, or in reverse mode newer than it. Flagged entries are
//! written to a report and can then be deleted or moved to a trash directory.
//!
//! ## Pipeline
//!
//! - [`config`] reads `.redwood.yaml` and merges it with command-line flags
//! - [`age`] turns specs such as `"2w"` or `"10mon"` into day thresholds
//! - [`ignore_list`] decides which paths are out of scope (literal prefix match)
//! - [`evaluator`] makes the old/new call for one entry
//! - [`scanner`] walks each target within its depth bounds and collects violations
//! - [`report`] writes `report.txt`; [`remediate`] deletes or trashes what was found

pub mod age;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod ignore_list;
pub mod logging;
pub mod remediate;
pub mod report;
pub mod scanner;

// Re-export commonly used items
pub use age::{parse_age, Threshold, DEFAULT_AGE_DAYS};
pub use config::{CliOverrides, Config, RunOptions, TargetConfig};
pub use error::{ConfigError, RemediationError, ScanError};
pub use evaluator::{check_entry, is_violation, Direction};
pub use ignore_list::{in_scope, IgnoreList};
pub use remediate::{remediate, Confirm, PromptConfirm, RemediationSummary};
pub use scanner::{scan, scan_at, ScanOptions, ScanResult, ScanStats, ScanTarget};
