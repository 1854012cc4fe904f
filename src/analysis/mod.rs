//! Aggregations over the visible (filtered) records.
//!
//! Everything here takes the dataset plus the visible indices produced by
//! [`crate::data::filter::filtered_indices`] and returns plain values the UI
//! can draw directly.

pub mod stats;
pub mod students;
pub mod words;
