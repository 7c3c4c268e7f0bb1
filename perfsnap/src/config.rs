//! This module controls configuration parsing from the end user. Every field
//! has a default, an absent configuration file is equivalent to an empty one.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use perfsnap_model::key;
use serde::Deserialize;

/// Errors produced by [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error for a serde [`serde_yaml`].
    #[error("Failed to deserialize yaml: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    /// Error reading config file
    #[error("Failed to read config file {path:?}: {source}")]
    ReadFile {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: Box<io::Error>,
    },
}

fn default_precision() -> usize {
    3
}

/// Main configuration struct for this program
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The category to report on. Compared case-insensitively.
    #[serde(default)]
    pub category: Option<String>,
    /// Report only these counters, all counters if unset. Compared
    /// case-insensitively.
    #[serde(default)]
    pub counters: Option<Vec<String>>,
    /// Number of decimal places for fractional values.
    #[serde(default = "default_precision")]
    pub precision: usize,
    /// List base counters as not displayable rather than skipping them.
    #[serde(default)]
    pub include_base_counters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            category: None,
            counters: None,
            precision: default_precision(),
            include_base_counters: false,
        }
    }
}

impl Config {
    /// Whether `counter_name` passes the configured counter filter.
    #[must_use]
    pub fn wants_counter(&self, counter_name: &str) -> bool {
        match &self.counters {
            None => true,
            Some(counters) => {
                let wanted = key::counter_key(counter_name);
                counters
                    .iter()
                    .any(|counter| key::counter_key(counter) == wanted)
            }
        }
    }
}

/// Load the configuration file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for
/// [`Config`].
pub fn load_config_from_path(path: &Path) -> Result<Config, Error> {
    let contents = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    serde_yaml::from_str(&contents).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn config_deserializes() -> Result<(), Error> {
        let contents = r#"
category: "Processor"
counters:
  - "% Processor Time"
  - "Interrupts/sec"
precision: 1
"#;
        let config: Config = serde_yaml::from_str(contents)?;
        assert_eq!(
            config,
            Config {
                category: Some(String::from("Processor")),
                counters: Some(vec![
                    String::from("% Processor Time"),
                    String::from("Interrupts/sec"),
                ]),
                precision: 1,
                include_base_counters: false,
            }
        );
        Ok(())
    }

    #[test]
    fn empty_config_is_default() -> Result<(), Error> {
        let config: Config = serde_yaml::from_str("{}")?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn unknown_fields_rejected() {
        let res: Result<Config, _> = serde_yaml::from_str("colour: blue\n");
        assert!(res.is_err());
    }

    #[test]
    fn counter_filter_ignores_case() {
        let config = Config {
            counters: Some(vec![String::from("% Processor Time")]),
            ..Config::default()
        };
        assert!(config.wants_counter("% PROCESSOR TIME"));
        assert!(!config.wants_counter("% Idle Time"));
        assert!(Config::default().wants_counter("anything"));
    }

    #[test]
    fn load_single_file_works() -> Result<(), Error> {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "category: Memory\ninclude_base_counters: true")
            .expect("write config");

        let config = load_config_from_path(file.path())?;
        assert_eq!(config.category.as_deref(), Some("Memory"));
        assert!(config.include_base_counters);
        assert_eq!(config.precision, 3);
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("absent.yaml");
        match load_config_from_path(&path) {
            Err(Error::ReadFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected ReadFile error, got {other:?}"),
        }
    }
}
