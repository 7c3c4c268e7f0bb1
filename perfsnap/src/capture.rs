//! Line-delimited capture files
//!
//! A capture holds one JSON object per line, each a single counter instance
//! read:
//!
//! ```text
//! {"category":"Processor","counter":"% Processor Time","instance":"_Total","sample":{...}}
//! ```
//!
//! `instance` may be omitted or null for single-instance counters. A
//! [`FileSource`] serves as the [`SampleSource`] for every category present
//! in a capture.

use std::{
    fs,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use perfsnap_model::{RawSample, Reading, SampleSource, key};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors produced while loading a capture.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The capture file could not be opened.
    #[error("Failed to open capture {path:?}: {source}")]
    Open {
        /// Capture path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: Box<io::Error>,
    },
    /// Reading from the capture failed.
    #[error("Failed to read capture line {line}: {source}")]
    Read {
        /// One-based line number
        line: usize,
        /// Underlying IO error
        #[source]
        source: Box<io::Error>,
    },
    /// A capture line is not a valid [`Record`].
    #[error("Malformed capture line {line}: {source}")]
    Malformed {
        /// One-based line number
        line: usize,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// The structure of a capture file line.
pub struct Record {
    /// Category the counter belongs to.
    pub category: String,
    /// Counter name.
    pub counter: String,
    /// Instance name, absent for single-instance counters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// The sample read.
    pub sample: RawSample,
}

#[derive(Debug, Clone, Default)]
/// A [`SampleSource`] backed by the records of one capture.
pub struct FileSource {
    records: Vec<Record>,
}

impl FileSource {
    /// Load every record of the capture at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line is not a valid
    /// [`Record`].
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = fs::File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load every record from `reader`. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or a line is not a valid [`Record`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|source| Error::Read {
                line: line_no,
                source: Box::new(source),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(&line).map_err(|source| Error::Malformed {
                line: line_no,
                source,
            })?;
            records.push(record);
        }
        debug!(records = records.len(), "capture loaded");
        Ok(Self { records })
    }

    /// Create a source over records already in memory.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Distinct category names in the capture, first spelling wins, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<(String, &str)> = Vec::new();
        for record in &self.records {
            let folded = key::fold(&record.category);
            if !seen.iter().any(|(k, _)| *k == folded) {
                seen.push((folded, record.category.as_str()));
            }
        }
        seen.sort();
        seen.into_iter().map(|(_, name)| name).collect()
    }

    /// Whether any record belongs to `category`, compared case-insensitively.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        let wanted = key::fold(category);
        self.records
            .iter()
            .any(|record| key::fold(&record.category) == wanted)
    }

    /// Number of records loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the capture held no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SampleSource for FileSource {
    type Error = Error;

    fn read(&mut self, category: &str) -> Result<Vec<Reading>, Self::Error> {
        let wanted = key::fold(category);
        Ok(self
            .records
            .iter()
            .filter(|record| key::fold(&record.category) == wanted)
            .map(|record| {
                Reading::new(
                    record.counter.as_str(),
                    record.instance.as_deref().unwrap_or_default(),
                    record.sample,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsnap_model::{CounterType, builder, read_category};

    const CAPTURE: &str = r#"
{"category":"Processor","counter":"% Processor Time","instance":"_Total","sample":{"raw_value":1500,"time_stamp":1000,"counter_frequency":1000,"counter_type":"counter_timer"}}
{"category":"Processor","counter":"% Processor Time","instance":"0","sample":{"raw_value":700,"time_stamp":1000,"counter_frequency":1000,"counter_type":"counter_timer"}}

{"category":"memory","counter":"Available Bytes","sample":{"raw_value":4096,"counter_type":"number_of_items64"}}
{"category":"Memory","counter":"Pages/sec","instance":null,"sample":{"raw_value":12,"counter_type":"rate_of_counts_per_second32"}}
"#;

    #[test]
    fn reads_every_record() {
        let source = FileSource::from_reader(CAPTURE.as_bytes()).expect("valid capture");
        assert_eq!(source.len(), 4);
        assert_eq!(source.categories(), vec!["memory", "Processor"]);
    }

    #[test]
    fn category_presence() {
        let source = FileSource::from_reader(CAPTURE.as_bytes()).expect("valid capture");
        assert!(source.has_category("PROCESSOR"));
        assert!(!source.has_category("Network Interface"));
        assert!(!FileSource::default().has_category("Processor"));
    }

    #[test]
    fn category_read_is_case_insensitive() {
        let mut source = FileSource::from_reader(CAPTURE.as_bytes()).expect("valid capture");
        let snapshot = read_category(&mut source, "MEMORY").expect("read");
        assert_eq!(snapshot.len(), 2);
        let sample = snapshot
            .sample("available bytes", "")
            .expect("single instance present");
        assert_eq!(sample.raw_value(), 4096);
        assert_eq!(sample.counter_type(), CounterType::NumberOfItems64);
        assert!(snapshot.get("Pages/sec").expect("present").contains(""));
    }

    #[test]
    fn unknown_category_is_empty() {
        let mut source = FileSource::from_reader(CAPTURE.as_bytes()).expect("valid capture");
        let snapshot = read_category(&mut source, "Network Interface").expect("read");
        assert!(snapshot.is_empty());
    }

    #[test]
    fn malformed_line_reports_number() {
        let capture = "\n{\"category\":\"Processor\"}\n";
        match FileSource::from_reader(capture.as_bytes()) {
            Err(Error::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected a malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_instances_surface_from_read() {
        let record = Record {
            category: "Process".to_string(),
            counter: "Thread Count".to_string(),
            instance: Some("sshd".to_string()),
            sample: RawSample::new(CounterType::NumberOfItems32, 3),
        };
        let mut twin = record.clone();
        twin.instance = Some("SSHD".to_string());
        let mut source = FileSource::from_records(vec![record, twin]);
        assert!(matches!(
            read_category(&mut source, "process"),
            Err(builder::Error::Collection(
                perfsnap_model::CollectionError::DuplicateKey { .. }
            ))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("absent.jsonl");
        assert!(matches!(
            FileSource::from_path(&path),
            Err(Error::Open { .. })
        ));
    }
}
