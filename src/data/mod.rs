//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv          sample generator
//!        │                                │
//!        ▼                                ▼
//!   ┌──────────┐                    ┌──────────┐
//!   │  loader   │                    │  sample   │
//!   └──────────┘                    └──────────┘
//!        │        (via RecordSource)      │
//!        └──────────────┬────────────────┘
//!                       ▼
//!              ┌────────────────┐
//!              │ AthleteDataset  │  Vec<AthleteRecord>, category indices
//!              └────────────────┘
//!                       │
//!                       ▼
//!                ┌──────────┐
//!                │  filter   │  sport / state / age predicates → indices
//!                └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
pub mod source;
