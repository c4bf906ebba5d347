use serde::{Deserialize, Serialize};

use crate::data::filter::{AgeRange, FilterSelection, filtered_indices};
use crate::data::model::AthleteDataset;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Colour scheme requested by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// The full dashboard state, independent of rendering.
///
/// The state never owns the dataset; callers keep the [`AthleteDataset`]
/// themselves and pass it to the mutators that need to recompute the
/// visible set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Active colour scheme.
    pub theme: Theme,

    /// Current sport / state / age selections.
    pub filters: FilterSelection,

    /// Athlete ids picked for the drill-down panel.
    pub selected_athletes: Vec<String>,

    /// Indices of records passing the current filters (cached).
    pub visible: Vec<usize>,
}

impl DashboardState {
    /// Fresh state for a dataset: everything selected, every record
    /// visible, and the first athlete pre-picked for drill-down.
    pub fn new(dataset: &AthleteDataset) -> Self {
        let selected_athletes = dataset
            .records()
            .first()
            .map(|rec| rec.athlete_id.clone())
            .into_iter()
            .collect();

        Self {
            theme: Theme::default(),
            filters: FilterSelection::all_of(dataset),
            selected_athletes,
            visible: (0..dataset.len()).collect(),
        }
    }

    /// Recompute `visible` after a filter change.
    pub fn refilter(&mut self, dataset: &AthleteDataset) {
        self.visible = filtered_indices(dataset, &self.filters);
    }

    /// Toggle a single sport in the filter.
    pub fn toggle_sport(&mut self, dataset: &AthleteDataset, sport: &str) {
        if self.filters.sports.contains(sport) {
            self.filters.sports.remove(sport);
        } else {
            self.filters.sports.insert(sport.to_string());
        }
        self.refilter(dataset);
    }

    /// Toggle a single state in the filter.
    pub fn toggle_state(&mut self, dataset: &AthleteDataset, state: &str) {
        if self.filters.states.contains(state) {
            self.filters.states.remove(state);
        } else {
            self.filters.states.insert(state.to_string());
        }
        self.refilter(dataset);
    }

    /// Select every sport present in the dataset.
    pub fn select_all_sports(&mut self, dataset: &AthleteDataset) {
        self.filters.sports = dataset.sports.clone();
        self.refilter(dataset);
    }

    /// Deselect all sports, hiding every record.
    pub fn select_no_sports(&mut self, dataset: &AthleteDataset) {
        self.filters.sports.clear();
        self.refilter(dataset);
    }

    /// Select every state present in the dataset.
    pub fn select_all_states(&mut self, dataset: &AthleteDataset) {
        self.filters.states = dataset.states.clone();
        self.refilter(dataset);
    }

    /// Deselect all states, hiding every record.
    pub fn select_no_states(&mut self, dataset: &AthleteDataset) {
        self.filters.states.clear();
        self.refilter(dataset);
    }

    /// Replace the age window.
    pub fn set_age_range(&mut self, dataset: &AthleteDataset, ages: AgeRange) {
        self.filters.ages = ages;
        self.refilter(dataset);
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    /// Add an athlete to the drill-down selection (no duplicates).
    pub fn select_athlete(&mut self, athlete_id: &str) {
        if !self.selected_athletes.iter().any(|id| id == athlete_id) {
            self.selected_athletes.push(athlete_id.to_string());
        }
    }

    /// Remove an athlete from the drill-down selection.
    pub fn deselect_athlete(&mut self, athlete_id: &str) {
        self.selected_athletes.retain(|id| id != athlete_id);
    }
}
