//! Aggregations over athlete records.
//!
//! Everything here is a pure function over `&AthleteRecord` iterators:
//! callers pick the slice of data (full dataset or a filtered view) and
//! the functions never mutate or cache anything.

pub mod aggregate;
pub mod summary;
