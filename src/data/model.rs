use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// Gender – open category, serialized as the short codes used in the data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    /// Anything outside the M/F codes found in a source file.
    #[serde(rename = "X")]
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "X",
        };
        write!(f, "{code}")
    }
}

impl FromStr for Gender {
    type Err = std::convert::Infallible;

    /// Never fails: unrecognized codes become [`Gender::Other`] so a single
    /// odd cell does not reject a whole file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "M" | "m" | "Male" | "male" => Gender::Male,
            "F" | "f" | "Female" | "female" => Gender::Female,
            _ => Gender::Other,
        })
    }
}

// Deserialization shares `FromStr`'s mapping, so every loader treats an
// unrecognized code the same way.
impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(code.parse().unwrap_or(Gender::Other))
    }
}

// ---------------------------------------------------------------------------
// AthleteRecord – one row of the record set
// ---------------------------------------------------------------------------

/// A single athlete assessment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AthleteRecord {
    #[validate(length(min = 1, message = "athlete_id must be non-empty"))]
    pub athlete_id: String,
    #[validate(length(min = 1, message = "name must be non-empty"))]
    pub name: String,
    #[validate(range(min = 1, max = 129, message = "age must be between 1 and 129"))]
    pub age: u8,
    pub gender: Gender,
    #[validate(length(min = 1, message = "sport must be non-empty"))]
    pub sport: String,
    #[validate(length(min = 1, message = "state must be non-empty"))]
    pub state: String,
    #[validate(range(min = 0.0, max = 100.0, message = "score must be between 0 and 100"))]
    pub score: f64,
    /// Optional geographic coordinates.
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub lon: Option<f64>,
    pub date: NaiveDate,
    pub verified: bool,
    /// Empty string means "no video".
    #[serde(default)]
    pub video_url: String,
    /// Empty string means "no photo".
    #[serde(default)]
    pub photo_url: String,
}

impl AthleteRecord {
    /// Video URL, with the empty string mapped to `None`.
    pub fn video(&self) -> Option<&str> {
        non_empty(&self.video_url)
    }

    /// Photo URL, with the empty string mapped to `None`.
    pub fn photo(&self) -> Option<&str> {
        non_empty(&self.photo_url)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

// ---------------------------------------------------------------------------
// AthleteDataset – the complete loaded record set
// ---------------------------------------------------------------------------

/// The full record set with pre-computed category indices.
///
/// Immutable once built: filtering and aggregation only ever read it.
#[derive(Debug, Clone)]
pub struct AthleteDataset {
    /// All records, in load order.
    records: Vec<AthleteRecord>,
    /// Sorted set of distinct sports.
    pub sports: BTreeSet<String>,
    /// Sorted set of distinct states.
    pub states: BTreeSet<String>,
    /// athlete_id → row index, for profile lookup.
    id_index: BTreeMap<String, usize>,
}

impl AthleteDataset {
    /// Build a dataset from loaded records, validating per-field constraints
    /// and athlete_id uniqueness.
    pub fn from_records(records: Vec<AthleteRecord>) -> Result<Self, DataError> {
        let mut sports = BTreeSet::new();
        let mut states = BTreeSet::new();
        let mut id_index = BTreeMap::new();

        for (row, rec) in records.iter().enumerate() {
            rec.validate().map_err(|source| DataError::InvalidRecord {
                athlete_id: rec.athlete_id.clone(),
                source,
            })?;
            if id_index.insert(rec.athlete_id.clone(), row).is_some() {
                return Err(DataError::DuplicateAthleteId(rec.athlete_id.clone()));
            }
            sports.insert(rec.sport.clone());
            states.insert(rec.state.clone());
        }

        Ok(AthleteDataset {
            records,
            sports,
            states,
            id_index,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the record set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in load order.
    pub fn records(&self) -> &[AthleteRecord] {
        &self.records
    }

    /// Look up a record by athlete_id.
    pub fn get(&self, athlete_id: &str) -> Option<&AthleteRecord> {
        self.id_index.get(athlete_id).map(|&row| &self.records[row])
    }

    /// Minimum and maximum age present, `None` when empty.
    pub fn age_span(&self) -> Option<(u8, u8)> {
        let min = self.records.iter().map(|r| r.age).min()?;
        let max = self.records.iter().map(|r| r.age).max()?;
        Some((min, max))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Record-set construction errors.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid record `{athlete_id}`: {source}")]
    InvalidRecord {
        athlete_id: String,
        source: validator::ValidationErrors,
    },

    #[error("duplicate athlete_id `{0}`")]
    DuplicateAthleteId(String),
}
