//! Render-ready projection of the dashboard.
//!
//! [`DashboardView::build`] turns a dataset plus the current
//! [`DashboardState`] into plain series and rows that a chart or table
//! widget can consume directly. KPI cards always describe the full
//! dataset; every chart series describes the filtered view; drill-down
//! profiles are looked up against the full dataset regardless of filters.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::aggregate::{GroupKey, group_mean, group_mean_2d, top_n};
use crate::analytics::summary::{KpiSummary, summarize};
use crate::data::model::{AthleteDataset, AthleteRecord, Gender};
use crate::state::{DashboardState, Theme};

/// Rows shown in the leaderboard table.
pub const LEADERBOARD_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Series and row types
// ---------------------------------------------------------------------------

/// One observation in the score distribution, tagged for colouring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePoint {
    pub gender: Gender,
    pub score: f64,
}

/// One cell of the state × sport mean-score heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub state: String,
    pub sport: String,
    pub mean_score: f64,
}

/// One marker on the assessment-location map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub name: String,
    pub sport: String,
    pub score: f64,
    pub lat: f64,
    pub lon: f64,
}

/// One row of the top-scores table, already ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    /// 1-based position.
    pub rank: u32,
    pub athlete_id: String,
    pub name: String,
    pub sport: String,
    pub state: String,
    pub score: f64,
    pub date: NaiveDate,
}

/// Everything the drill-down panel shows for one athlete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteProfile {
    pub athlete_id: String,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub sport: String,
    pub state: String,
    pub score: f64,
    pub date: NaiveDate,
    pub verified: bool,
    pub video_url: Option<String>,
    pub photo_url: Option<String>,
}

impl From<&AthleteRecord> for AthleteProfile {
    fn from(rec: &AthleteRecord) -> Self {
        AthleteProfile {
            athlete_id: rec.athlete_id.clone(),
            name: rec.name.clone(),
            age: rec.age,
            gender: rec.gender,
            sport: rec.sport.clone(),
            state: rec.state.clone(),
            score: rec.score,
            date: rec.date,
            verified: rec.verified,
            video_url: rec.video().map(str::to_string),
            photo_url: rec.photo().map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// The view itself
// ---------------------------------------------------------------------------

/// A fully computed dashboard frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub theme: Theme,

    /// Headline cards, always over the full dataset.
    pub kpis: KpiSummary,

    /// How many records pass the current filters.
    pub filtered_count: usize,

    /// Score per filtered record, for the distribution chart.
    pub score_distribution: Vec<ScorePoint>,

    /// Mean score per state over the filtered records, best state first.
    pub mean_score_by_state: Vec<(String, f64)>,

    /// Sparse state × sport mean scores over the filtered records.
    pub score_heatmap: Vec<HeatmapCell>,

    /// Map markers for filtered records that carry both coordinates.
    pub locations: Vec<MapPoint>,

    /// Top scorers among the filtered records.
    pub leaderboard: Vec<LeaderboardRow>,

    /// Drill-down profiles for the selected athletes.
    pub profiles: Vec<AthleteProfile>,
}

impl DashboardView {
    /// Project `dataset` through `state` into chart-ready series.
    ///
    /// `state.visible` must have been computed against this dataset.
    pub fn build(dataset: &AthleteDataset, state: &DashboardState) -> Self {
        let visible: Vec<&AthleteRecord> = state
            .visible
            .iter()
            .map(|&idx| &dataset.records()[idx])
            .collect();

        let mut mean_score_by_state: Vec<(String, f64)> =
            group_mean(visible.iter().copied(), GroupKey::State)
                .into_iter()
                .collect();
        // Stable sort on top of the map's alphabetical order, so ties
        // stay alphabetical.
        mean_score_by_state.sort_by(|a, b| b.1.total_cmp(&a.1));

        let score_heatmap = group_mean_2d(visible.iter().copied(), GroupKey::State, GroupKey::Sport)
            .into_iter()
            .map(|((state, sport), mean_score)| HeatmapCell {
                state,
                sport,
                mean_score,
            })
            .collect();

        let locations = visible
            .iter()
            .filter_map(|rec| match (rec.lat, rec.lon) {
                (Some(lat), Some(lon)) => Some(MapPoint {
                    name: rec.name.clone(),
                    sport: rec.sport.clone(),
                    score: rec.score,
                    lat,
                    lon,
                }),
                _ => None,
            })
            .collect();

        let leaderboard = top_n(visible.iter().copied(), LEADERBOARD_SIZE)
            .into_iter()
            .enumerate()
            .map(|(i, rec)| LeaderboardRow {
                rank: i as u32 + 1,
                athlete_id: rec.athlete_id.clone(),
                name: rec.name.clone(),
                sport: rec.sport.clone(),
                state: rec.state.clone(),
                score: rec.score,
                date: rec.date,
            })
            .collect();

        let mut profiles = Vec::with_capacity(state.selected_athletes.len());
        for id in &state.selected_athletes {
            match dataset.get(id) {
                Some(rec) => profiles.push(AthleteProfile::from(rec)),
                None => log::warn!("Drill-down athlete '{id}' not in the dataset; skipping"),
            }
        }

        DashboardView {
            theme: state.theme,
            kpis: summarize(dataset.records()),
            filtered_count: visible.len(),
            score_distribution: visible
                .iter()
                .map(|rec| ScorePoint {
                    gender: rec.gender,
                    score: rec.score,
                })
                .collect(),
            mean_score_by_state,
            score_heatmap,
            locations,
            leaderboard,
            profiles,
        }
    }
}
