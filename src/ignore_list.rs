//! Ignore list loading and scope matching.

use crate::error::ConfigError;
use std::fs;
use std::path::Path;
use tracing::info;

/// Ordered path prefixes excluded from age evaluation.
///
/// Matching is a literal string prefix test, not path-segment aware:
/// `/home/a` also covers `/home/abc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    prefixes: Vec<String>,
}

impl IgnoreList {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IgnoreList {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse newline-delimited prefixes. Blank lines are skipped since an
    /// empty prefix would match every path.
    pub fn parse(contents: &str) -> Self {
        IgnoreList::new(
            contents
                .lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.is_empty()),
        )
    }

    /// Read the ignore file named by the config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::IgnoreFile {
            path: path.to_path_buf(),
            source,
        })?;
        let list = IgnoreList::parse(&contents);
        info!("Ignoring {:?}", list.prefixes);
        Ok(list)
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns true if `path` is eligible for age evaluation.
    pub fn in_scope(&self, path: &str) -> bool {
        in_scope(&self.prefixes, path)
    }

    /// Same as [`IgnoreList::in_scope`] for filesystem paths. Non-UTF-8
    /// components are compared lossily.
    pub fn path_in_scope(&self, path: &Path) -> bool {
        self.in_scope(&path.to_string_lossy())
    }
}

/// Returns false iff `path` starts with any entry of `ignore_list`.
pub fn in_scope<S: AsRef<str>>(ignore_list: &[S], path: &str) -> bool {
    !ignore_list
        .iter()
        .any(|prefix| path.starts_with(prefix.as_ref()))
}
