//! Athlete assessment dashboard, minus the pixels.
//!
//! The data core behind an athlete assessment dashboard: record loading
//! and validation, sport/state/age filtering, grouped score aggregates,
//! KPI summaries, and a render-ready view projection. Rendering is left
//! to whatever chart or table frontend sits on top.

pub mod analytics;
pub mod data;
pub mod state;
pub mod view;

// Re-export commonly used types
pub use analytics::aggregate::{GroupKey, group_mean, group_mean_2d, top_n};
pub use analytics::summary::{KpiSummary, summarize};
pub use data::filter::{AgeRange, FilterError, FilterSelection, filter, filtered_indices};
pub use data::loader::load_file;
pub use data::model::{AthleteDataset, AthleteRecord, DataError, Gender};
pub use data::source::{DataSourceConfig, FileSource, RecordSource, SampleSource, load_records};
pub use state::{DashboardState, Theme};
pub use view::{DashboardView, LEADERBOARD_SIZE};
