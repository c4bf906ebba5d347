use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::model::AthleteRecord;

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

/// Headline figures for a set of records.
///
/// Optional fields are `None` when the input is empty: an absent mean is
/// not the same thing as a mean of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub count: usize,
    pub mean_score: Option<f64>,
    pub verified_count: usize,
    pub distinct_sport_count: usize,
    pub age_min: Option<u8>,
    pub age_max: Option<u8>,
}

/// Compute the KPI card figures in a single pass.
pub fn summarize<'a, I>(records: I) -> KpiSummary
where
    I: IntoIterator<Item = &'a AthleteRecord>,
{
    let mut count = 0usize;
    let mut score_sum = 0.0f64;
    let mut verified_count = 0usize;
    let mut sports: BTreeSet<&str> = BTreeSet::new();
    let mut age_min: Option<u8> = None;
    let mut age_max: Option<u8> = None;

    for rec in records {
        count += 1;
        score_sum += rec.score;
        if rec.verified {
            verified_count += 1;
        }
        sports.insert(&rec.sport);
        age_min = Some(age_min.map_or(rec.age, |m| m.min(rec.age)));
        age_max = Some(age_max.map_or(rec.age, |m| m.max(rec.age)));
    }

    KpiSummary {
        count,
        mean_score: (count > 0).then(|| score_sum / count as f64),
        verified_count,
        distinct_sport_count: sports.len(),
        age_min,
        age_max,
    }
}
