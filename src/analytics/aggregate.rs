use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::model::AthleteRecord;

// ---------------------------------------------------------------------------
// Grouping key
// ---------------------------------------------------------------------------

/// Which categorical field a grouped aggregate keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    Sport,
    State,
}

impl GroupKey {
    fn of(self, rec: &AthleteRecord) -> &str {
        match self {
            GroupKey::Sport => &rec.sport,
            GroupKey::State => &rec.state,
        }
    }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Mean score per distinct value of `key`.
///
/// The map holds exactly the key values observed in the input; an empty
/// input yields an empty map. Means are plain sum/count in `f64`, with no
/// rounding; display formatting belongs to the presentation layer.
pub fn group_mean<'a, I>(records: I, key: GroupKey) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a AthleteRecord>,
{
    let mut acc: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for rec in records {
        let entry = acc.entry(key.of(rec).to_string()).or_insert((0.0, 0));
        entry.0 += rec.score;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / f64::from(n)))
        .collect()
}

/// Mean score per `(row_key, col_key)` pair, for heatmap-style charts.
///
/// Only pairs with at least one observation appear; the full cross-product
/// is never zero-filled.
pub fn group_mean_2d<'a, I>(
    records: I,
    row_key: GroupKey,
    col_key: GroupKey,
) -> BTreeMap<(String, String), f64>
where
    I: IntoIterator<Item = &'a AthleteRecord>,
{
    let mut acc: BTreeMap<(String, String), (f64, u32)> = BTreeMap::new();
    for rec in records {
        let pair = (row_key.of(rec).to_string(), col_key.of(rec).to_string());
        let entry = acc.entry(pair).or_insert((0.0, 0));
        entry.0 += rec.score;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / f64::from(n)))
        .collect()
}

// ---------------------------------------------------------------------------
// Top-N leaderboard selection
// ---------------------------------------------------------------------------

/// The `n` records with the highest scores, descending.
///
/// The sort is stable, so records with equal scores keep their input order.
/// Asking for more records than exist returns them all; `n == 0` or an
/// empty input returns an empty vec.
pub fn top_n<'a, I>(records: I, n: usize) -> Vec<&'a AthleteRecord>
where
    I: IntoIterator<Item = &'a AthleteRecord>,
{
    if n == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<&AthleteRecord> = records.into_iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Gender;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(id: &str, sport: &str, state: &str, score: f64) -> AthleteRecord {
        AthleteRecord {
            athlete_id: id.to_string(),
            name: format!("Athlete {id}"),
            age: 16,
            gender: Gender::Female,
            sport: sport.to_string(),
            state: state.to_string(),
            score,
            lat: None,
            lon: None,
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            verified: false,
            video_url: String::new(),
            photo_url: String::new(),
        }
    }

    #[test]
    fn group_mean_matches_manual_sum_over_count() {
        let records = vec![
            record("A001", "Sprinting", "Kerala", 78.0),
            record("A002", "Swimming", "Kerala", 84.0),
            record("A003", "Sprinting", "Goa", 69.5),
            record("A004", "Swimming", "Kerala", 91.0),
        ];
        let means = group_mean(&records, GroupKey::State);

        assert_eq!(means.len(), 2);
        assert_eq!(means["Goa"], 69.5);
        assert_eq!(means["Kerala"], (78.0 + 84.0 + 91.0) / 3.0);
    }

    #[test]
    fn group_mean_keys_are_exactly_the_observed_values() {
        let records = vec![
            record("A001", "Sprinting", "Kerala", 50.0),
            record("A002", "Javelin", "Goa", 60.0),
        ];
        let means = group_mean(&records, GroupKey::Sport);
        let keys: Vec<&str> = means.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Javelin", "Sprinting"]);
    }

    #[test]
    fn group_mean_of_empty_input_is_empty() {
        let means = group_mean([], GroupKey::State);
        assert!(means.is_empty());
        let means = group_mean_2d([], GroupKey::State, GroupKey::Sport);
        assert!(means.is_empty());
    }

    #[test]
    fn group_mean_2d_skips_unobserved_pairs() {
        // 2 states × 2 sports, but only 3 combinations occur.
        let records = vec![
            record("A001", "Sprinting", "Kerala", 80.0),
            record("A002", "Swimming", "Kerala", 60.0),
            record("A003", "Sprinting", "Goa", 70.0),
            record("A004", "Sprinting", "Kerala", 90.0),
        ];
        let means = group_mean_2d(&records, GroupKey::State, GroupKey::Sport);

        assert_eq!(means.len(), 3);
        assert_eq!(means[&("Kerala".to_string(), "Sprinting".to_string())], 85.0);
        assert_eq!(means[&("Kerala".to_string(), "Swimming".to_string())], 60.0);
        assert_eq!(means[&("Goa".to_string(), "Sprinting".to_string())], 70.0);
        assert!(!means.contains_key(&("Goa".to_string(), "Swimming".to_string())));
    }

    #[test]
    fn top_n_orders_by_score_descending() {
        let records = vec![
            record("A001", "Sprinting", "Kerala", 78.0),
            record("A002", "Swimming", "Goa", 84.0),
            record("A003", "Javelin", "Punjab", 69.0),
            record("A004", "Discus", "Delhi", 91.0),
            record("A005", "Cycling", "Assam", 72.0),
        ];
        let top = top_n(&records, 3);
        let scores: Vec<f64> = top.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![91.0, 84.0, 78.0]);
    }

    #[test]
    fn top_n_ties_keep_input_order() {
        let records = vec![
            record("A001", "Sprinting", "Kerala", 80.0),
            record("A002", "Swimming", "Goa", 90.0),
            record("A003", "Javelin", "Punjab", 80.0),
            record("A004", "Discus", "Delhi", 80.0),
        ];
        let ids: Vec<&str> = top_n(&records, 4)
            .iter()
            .map(|r| r.athlete_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A002", "A001", "A003", "A004"]);
    }

    #[test]
    fn top_n_degenerate_inputs() {
        let records = vec![record("A001", "Sprinting", "Kerala", 80.0)];
        assert!(top_n(&records, 0).is_empty());
        assert!(top_n([], 5).is_empty());
        // Fewer records than requested: return them all.
        assert_eq!(top_n(&records, 5).len(), 1);
    }
}
