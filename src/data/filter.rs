use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::{AthleteDataset, AthleteRecord};

// ---------------------------------------------------------------------------
// AgeRange – closed interval over ages
// ---------------------------------------------------------------------------

/// Closed age interval `[min, max]`.
///
/// `min > max` is a valid, empty range: filtering with it yields no records
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    /// The widest range any valid record can fall in.
    pub const FULL: AgeRange = AgeRange { min: 1, max: 129 };

    pub fn new(min: u8, max: u8) -> Self {
        AgeRange { min, max }
    }

    /// Whether `age` lies inside the interval.
    pub fn contains(&self, age: u8) -> bool {
        self.min <= age && age <= self.max
    }

    /// True when the interval contains no ages at all (`min > max`).
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        AgeRange::FULL
    }
}

impl FromStr for AgeRange {
    type Err = FilterError;

    /// Parse `"14-30"` or `"14..30"`; this text boundary is where a
    /// non-numeric bound surfaces as [`FilterError::InvalidRange`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s
            .split_once("..")
            .or_else(|| s.split_once('-'))
            .ok_or_else(|| FilterError::InvalidRange(s.to_string()))?;

        let parse = |tok: &str| {
            tok.trim()
                .parse::<u8>()
                .map_err(|_| FilterError::InvalidRange(s.to_string()))
        };
        Ok(AgeRange::new(parse(lo)?, parse(hi)?))
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – which categories and ages are selected
// ---------------------------------------------------------------------------

/// The user's current filter choices.
///
/// Category sets are *explicit selections*: an empty set means "nothing
/// selected" and excludes every record. Callers meaning "no filter" pass the
/// full category set, which [`FilterSelection::all_of`] builds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub sports: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub ages: AgeRange,
}

impl FilterSelection {
    /// Selection with every sport and state of `dataset` selected and the
    /// age range spanning the dataset: the "show everything" state.
    pub fn all_of(dataset: &AthleteDataset) -> Self {
        let ages = match dataset.age_span() {
            Some((min, max)) => AgeRange::new(min, max),
            None => AgeRange::FULL,
        };
        FilterSelection {
            sports: dataset.sports.clone(),
            states: dataset.states.clone(),
            ages,
        }
    }

    /// The conjunctive inclusion predicate: sport selected AND state
    /// selected AND age in range.
    pub fn matches(&self, rec: &AthleteRecord) -> bool {
        self.sports.contains(rec.sport.as_str())
            && self.states.contains(rec.state.as_str())
            && self.ages.contains(rec.age)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the records passing `selection`, preserving input order.
///
/// Never mutates its input; the result borrows from it.
pub fn filter<'a, I>(records: I, selection: &FilterSelection) -> Vec<&'a AthleteRecord>
where
    I: IntoIterator<Item = &'a AthleteRecord>,
{
    records
        .into_iter()
        .filter(|rec| selection.matches(rec))
        .collect()
}

/// Return indices of dataset rows that pass `selection`, for callers that
/// cache a visible set rather than holding borrows.
pub fn filtered_indices(dataset: &AthleteDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Filter input errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("invalid age range `{0}`: bounds must be numeric, like `14-30`")]
    InvalidRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Gender;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(id: &str, sport: &str, state: &str, age: u8) -> AthleteRecord {
        AthleteRecord {
            athlete_id: id.to_string(),
            name: format!("Athlete {id}"),
            age,
            gender: Gender::Male,
            sport: sport.to_string(),
            state: state.to_string(),
            score: 70.0,
            lat: None,
            lon: None,
            date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            verified: false,
            video_url: String::new(),
            photo_url: String::new(),
        }
    }

    fn fixture() -> Vec<AthleteRecord> {
        vec![
            record("A001", "Sprinting", "Kerala", 16),
            record("A002", "Swimming", "Goa", 15),
            record("A003", "Sprinting", "Punjab", 17),
            record("A004", "Javelin", "Kerala", 14),
            record("A005", "Swimming", "Kerala", 18),
        ]
    }

    fn select(sports: &[&str], states: &[&str], min: u8, max: u8) -> FilterSelection {
        FilterSelection {
            sports: sports.iter().map(|s| s.to_string()).collect(),
            states: states.iter().map(|s| s.to_string()).collect(),
            ages: AgeRange::new(min, max),
        }
    }

    #[test]
    fn filter_is_exactly_the_predicate() {
        let records = fixture();
        let sel = select(&["Sprinting", "Swimming"], &["Kerala"], 15, 18);
        let got = filter(&records, &sel);

        // Every survivor satisfies all three clauses…
        for rec in &got {
            assert!(sel.sports.contains(rec.sport.as_str()));
            assert!(sel.states.contains(rec.state.as_str()));
            assert!(sel.ages.contains(rec.age));
        }
        // …and nothing satisfying them was dropped.
        let ids: Vec<&str> = got.iter().map(|r| r.athlete_id.as_str()).collect();
        assert_eq!(ids, vec!["A001", "A005"]);
    }

    #[test]
    fn all_of_passes_everything() {
        let records = fixture();
        let ds = AthleteDataset::from_records(records.clone()).unwrap();
        let sel = FilterSelection::all_of(&ds);

        assert_eq!(filter(&records, &sel).len(), records.len());
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn empty_category_set_excludes_all() {
        let records = fixture();
        let sel = select(&[], &["Kerala", "Goa", "Punjab"], 1, 129);
        assert!(filter(&records, &sel).is_empty());

        let sel = select(&["Sprinting", "Swimming", "Javelin"], &[], 1, 129);
        assert!(filter(&records, &sel).is_empty());
    }

    #[test]
    fn inverted_age_range_yields_empty_not_error() {
        let records = fixture();
        let sel = select(
            &["Sprinting", "Swimming", "Javelin"],
            &["Kerala", "Goa", "Punjab"],
            20,
            10,
        );
        assert!(sel.ages.is_empty());
        assert!(filter(&records, &sel).is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let records = fixture();
        let sel = select(
            &["Sprinting", "Swimming", "Javelin"],
            &["Kerala", "Goa", "Punjab"],
            14,
            18,
        );
        let ids: Vec<&str> = filter(&records, &sel)
            .iter()
            .map(|r| r.athlete_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A001", "A002", "A003", "A004", "A005"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let records = fixture();
        let sel = select(&["Sprinting", "Swimming"], &["Kerala"], 15, 18);

        let once = filter(&records, &sel);
        let twice = filter(once.iter().copied(), &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn age_range_parses_from_text() {
        assert_eq!("14-30".parse::<AgeRange>().unwrap(), AgeRange::new(14, 30));
        assert_eq!("14..30".parse::<AgeRange>().unwrap(), AgeRange::new(14, 30));
        assert_eq!(
            " 16 - 18 ".parse::<AgeRange>().unwrap(),
            AgeRange::new(16, 18)
        );
    }

    #[test]
    fn non_numeric_bound_is_invalid_range() {
        let err = "abc-30".parse::<AgeRange>().unwrap_err();
        assert_eq!(err, FilterError::InvalidRange("abc-30".to_string()));

        let err = "14".parse::<AgeRange>().unwrap_err();
        assert_eq!(err, FilterError::InvalidRange("14".to_string()));
    }
}
