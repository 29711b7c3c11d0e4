//! YAML configuration and the merge with command-line flags.

use crate::age::Threshold;
use crate::error::ConfigError;
use crate::scanner::ScanTarget;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file read when `--optionfile` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "./.redwood.yaml";

/// Threshold for `--directory` targets when `--age` is not given.
pub const DEFAULT_CLI_AGE: &str = "7d";

/// Contents of `.redwood.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logfile: PathBuf,
    #[serde(default)]
    pub clean: bool,
    pub ignorefile: PathBuf,
    #[serde(default)]
    pub empty: bool,
    /// Require both emptiness and age before flagging.
    #[serde(default)]
    pub and: bool,
    /// Target name to target settings, in file order.
    #[serde(default)]
    pub directory_list: Mapping,
}

/// Settings for one entry of `directory_list`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetConfig {
    pub directory: PathBuf,
    #[serde(default)]
    pub mindepth: usize,
    /// Unbounded when absent.
    #[serde(default)]
    pub maxdepth: Option<usize>,
    pub age: String,
    #[serde(default)]
    pub reverse: bool,
}

/// A target is either a plain mapping or a list of single-key mappings,
/// e.g. `[{directory: /tmp}, {mindepth: 1}, ...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetEntry {
    Fields(TargetConfig),
    Pairs(Vec<Mapping>),
}

impl TargetEntry {
    fn into_config(self) -> Result<TargetConfig, serde_yaml::Error> {
        match self {
            TargetEntry::Fields(config) => Ok(config),
            TargetEntry::Pairs(pairs) => {
                let merged: Mapping = pairs.into_iter().flatten().collect();
                serde_yaml::from_value(Value::Mapping(merged))
            }
        }
    }
}

impl Config {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::parse(&contents, path)
    }

    /// Parse config text; `path` is only used in error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        // Surface bad targets at load time rather than mid-run
        config.target_configs()?;
        Ok(config)
    }

    /// Named target settings in file order.
    pub fn target_configs(&self) -> Result<Vec<(String, TargetConfig)>, ConfigError> {
        self.directory_list
            .iter()
            .map(|(key, value)| {
                let name = key_name(key);
                let target = serde_yaml::from_value::<TargetEntry>(value.clone())
                    .and_then(TargetEntry::into_config)
                    .map_err(|err| ConfigError::InvalidTarget {
                        name: name.clone(),
                        message: err.to_string(),
                    })?;
                Ok((name, target))
            })
            .collect()
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Command-line flags that adjust the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub and: bool,
    pub clean: bool,
    pub empty: bool,
    pub reverse: bool,
    pub logfile: Option<PathBuf>,
    pub directories: Vec<PathBuf>,
    pub age: Option<String>,
}

/// Everything a run needs, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub logfile: PathBuf,
    pub clean: bool,
    pub ignorefile: PathBuf,
    pub flag_empty: bool,
    pub targets: Vec<ScanTarget>,
}

impl RunOptions {
    /// Merge config and flags.
    ///
    /// Boolean switches are on when either side sets them. `and` is dropped
    /// unless `empty` is also on. `--reverse` applies to every target, and
    /// each `--directory` becomes an extra target after the configured ones.
    pub fn resolve(config: &Config, cli: &CliOverrides) -> Result<Self, ConfigError> {
        let flag_empty = cli.empty || config.empty;
        let require_both = (cli.and || config.and) && flag_empty;

        let mut targets = Vec::new();
        for (name, target) in config.target_configs()? {
            targets.push(ScanTarget {
                name,
                root: target.directory,
                min_depth: target.mindepth,
                max_depth: target.maxdepth.unwrap_or(usize::MAX),
                threshold: Threshold::from_spec(&target.age),
                reverse: target.reverse || cli.reverse,
                require_both,
            });
        }

        let cli_age = cli.age.as_deref().unwrap_or(DEFAULT_CLI_AGE);
        for directory in &cli.directories {
            targets.push(ScanTarget {
                name: directory.display().to_string(),
                root: directory.clone(),
                min_depth: 1,
                max_depth: usize::MAX,
                threshold: Threshold::from_spec(cli_age),
                reverse: cli.reverse,
                require_both,
            });
        }

        Ok(RunOptions {
            logfile: cli.logfile.clone().unwrap_or_else(|| config.logfile.clone()),
            clean: cli.clean || config.clean,
            ignorefile: config.ignorefile.clone(),
            flag_empty,
            targets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING_FORM: &str = r#"
logfile: ./redwood.log
clean: false
ignorefile: ./.redwoodignore
empty: true
and: false
directory_list:
  tmp:
    directory: /tmp
    mindepth: 1
    maxdepth: 3
    age: 2w
    reverse: false
  downloads:
    directory: /home/user/Downloads
    age: 10mon
"#;

    const PAIRS_FORM: &str = r#"
logfile: ./redwood.log
clean: true
ignorefile: ./.redwoodignore
empty: false
and: true
directory_list:
  scratch:
    - directory: /scratch
    - mindepth: 2
    - maxdepth: 4
    - age: 36h
    - reverse: true
"#;

    fn parse(text: &str) -> Config {
        Config::parse(text, Path::new("test.yaml")).unwrap()
    }

    #[test]
    fn test_parse_mapping_form_keeps_order() {
        let config = parse(MAPPING_FORM);
        let targets = config.target_configs().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, "tmp");
        assert_eq!(targets[1].0, "downloads");
        assert_eq!(targets[0].1.maxdepth, Some(3));
        assert_eq!(targets[1].1.mindepth, 0);
        assert_eq!(targets[1].1.maxdepth, None);
        assert!(config.empty);
    }

    #[test]
    fn test_parse_pairs_form() {
        let config = parse(PAIRS_FORM);
        let targets = config.target_configs().unwrap();
        assert_eq!(
            targets[0].1,
            TargetConfig {
                directory: PathBuf::from("/scratch"),
                mindepth: 2,
                maxdepth: Some(4),
                age: "36h".to_string(),
                reverse: true,
            }
        );
    }

    #[test]
    fn test_parse_missing_required_key() {
        let result = Config::parse("clean: true\n", Path::new("bad.yaml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_parse_bad_target() {
        let text = "logfile: l\nignorefile: i\ndirectory_list:\n  broken:\n    mindepth: 1\n";
        let result = Config::parse(text, Path::new("bad.yaml"));
        match result {
            Err(ConfigError::InvalidTarget { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidTarget, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/.redwood.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_resolve_targets() {
        let options = RunOptions::resolve(&parse(MAPPING_FORM), &CliOverrides::default()).unwrap();
        assert_eq!(options.targets.len(), 2);
        let tmp = &options.targets[0];
        assert_eq!(tmp.root, PathBuf::from("/tmp"));
        assert_eq!((tmp.min_depth, tmp.max_depth), (1, 3));
        assert_eq!(tmp.threshold.days(), 14.0);
        assert_eq!(options.targets[1].max_depth, usize::MAX);
        assert!(options.flag_empty);
        assert!(!options.clean);
    }

    #[test]
    fn test_and_requires_empty() {
        // config sets `and` but not `empty`
        let options = RunOptions::resolve(&parse(PAIRS_FORM), &CliOverrides::default()).unwrap();
        assert!(!options.flag_empty);
        assert!(options.targets.iter().all(|t| !t.require_both));

        let cli = CliOverrides {
            empty: true,
            ..Default::default()
        };
        let options = RunOptions::resolve(&parse(PAIRS_FORM), &cli).unwrap();
        assert!(options.targets.iter().all(|t| t.require_both));
    }

    #[test]
    fn test_cli_and_without_empty_is_disabled() {
        let cli = CliOverrides {
            and: true,
            ..Default::default()
        };
        let mut config = parse(MAPPING_FORM);
        config.empty = false;
        let options = RunOptions::resolve(&config, &cli).unwrap();
        assert!(options.targets.iter().all(|t| !t.require_both));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = CliOverrides {
            clean: true,
            reverse: true,
            logfile: Some(PathBuf::from("/var/log/redwood.log")),
            directories: vec![PathBuf::from("/srv/cache")],
            age: Some("1d".to_string()),
            ..Default::default()
        };
        let options = RunOptions::resolve(&parse(MAPPING_FORM), &cli).unwrap();
        assert!(options.clean);
        assert_eq!(options.logfile, PathBuf::from("/var/log/redwood.log"));
        assert!(options.targets.iter().all(|t| t.reverse));

        let extra = options.targets.last().unwrap();
        assert_eq!(extra.root, PathBuf::from("/srv/cache"));
        assert_eq!(extra.min_depth, 1);
        assert_eq!(extra.threshold.days(), 1.0);
    }
}
