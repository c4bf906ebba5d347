//! Where athlete records come from.
//!
//! A [`RecordSource`] hides whether the dashboard runs on the built-in
//! sample cohort or on a file exported from a collection system. Sources
//! are selected through [`DataSourceConfig`]; [`load_records`] falls back
//! to the sample cohort when the configured source cannot deliver.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::loader;
use super::model::AthleteDataset;
use super::sample;

/// Environment variable naming an export file to load instead of the sample.
pub const DATA_FILE_ENV: &str = "ATHLETE_DATA_FILE";

// ---------------------------------------------------------------------------
// Source strategy
// ---------------------------------------------------------------------------

/// A place athlete records can be loaded from.
pub trait RecordSource {
    /// Human-readable label for log lines.
    fn describe(&self) -> String;

    /// Load the full dataset from this source.
    fn load(&self) -> Result<AthleteDataset>;
}

/// Built-in deterministic sample cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSource {
    pub count: usize,
    pub seed: u64,
}

impl Default for SampleSource {
    fn default() -> Self {
        SampleSource {
            count: sample::DEFAULT_COUNT,
            seed: sample::DEFAULT_SEED,
        }
    }
}

impl RecordSource for SampleSource {
    fn describe(&self) -> String {
        format!("sample cohort ({} athletes, seed {})", self.count, self.seed)
    }

    fn load(&self) -> Result<AthleteDataset> {
        let records = sample::generate(self.count, self.seed);
        AthleteDataset::from_records(records).context("building sample dataset")
    }
}

/// Records exported to a file (JSON, CSV or Parquet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    pub path: PathBuf,
}

impl RecordSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load(&self) -> Result<AthleteDataset> {
        loader::load_file(&self.path)
            .with_context(|| format!("loading {}", self.path.display()))
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which source the dashboard should boot from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceConfig {
    Sample { count: usize, seed: u64 },
    File { path: PathBuf },
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        let sample = SampleSource::default();
        DataSourceConfig::Sample {
            count: sample.count,
            seed: sample.seed,
        }
    }
}

impl DataSourceConfig {
    /// Read the source from the environment: point [`DATA_FILE_ENV`] at an
    /// export file to load it, otherwise the sample cohort is used.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(DATA_FILE_ENV))
    }

    fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => DataSourceConfig::File {
                path: PathBuf::from(path),
            },
            _ => DataSourceConfig::default(),
        }
    }

    fn source(&self) -> Box<dyn RecordSource> {
        match self {
            DataSourceConfig::Sample { count, seed } => Box::new(SampleSource {
                count: *count,
                seed: *seed,
            }),
            DataSourceConfig::File { path } => Box::new(FileSource { path: path.clone() }),
        }
    }
}

/// Load a dataset per `config`, falling back to the built-in sample when
/// the configured source fails.
pub fn load_records(config: &DataSourceConfig) -> Result<AthleteDataset> {
    let source = config.source();
    match source.load() {
        Ok(dataset) => {
            log::info!("Loaded {} athletes from {}", dataset.len(), source.describe());
            Ok(dataset)
        }
        Err(e) => {
            let fallback = SampleSource::default();
            log::warn!(
                "Failed to load {}: {e:#}; falling back to {}",
                source.describe(),
                fallback.describe()
            );
            fallback.load()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_source_loads_the_default_cohort() {
        let ds = SampleSource::default().load().unwrap();
        assert_eq!(ds.len(), sample::DEFAULT_COUNT);
        assert!(SampleSource::default().describe().contains("sample cohort"));
    }

    #[test]
    fn sample_source_is_repeatable() {
        let a = SampleSource { count: 5, seed: 9 }.load().unwrap();
        let b = SampleSource { count: 5, seed: 9 }.load().unwrap();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn unreadable_file_falls_back_to_the_sample() {
        let config = DataSourceConfig::File {
            path: PathBuf::from("/no/such/dir/athletes.json"),
        };
        let ds = load_records(&config).unwrap();
        assert_eq!(ds.len(), sample::DEFAULT_COUNT);
    }

    // Exercises the value arms directly: tests run concurrently, so nothing
    // here may touch the process environment.
    #[test]
    fn env_value_selects_between_file_and_sample() {
        assert_eq!(
            DataSourceConfig::from_env_value(Some(OsString::from("/tmp/athletes.parquet"))),
            DataSourceConfig::File {
                path: PathBuf::from("/tmp/athletes.parquet"),
            }
        );
        assert_eq!(
            DataSourceConfig::from_env_value(Some(OsString::new())),
            DataSourceConfig::default()
        );
        assert_eq!(
            DataSourceConfig::from_env_value(None),
            DataSourceConfig::default()
        );
    }
}
