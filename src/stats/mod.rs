//! Watering statistics.
//!
//! Everything here is a pure function of a plant's ascending watering dates:
//! - [`intervals`] turns dates into day gaps
//! - [`report`] summarizes gaps (mean, median, spread, histogram, timeline)
//! - [`freshness`] measures days since the last watering and ranks plants

pub mod freshness;
pub mod intervals;
pub mod report;

pub use freshness::{freshness, rank, watered_today, Freshness, RankedPlant};
pub use intervals::{gaps, gaps_from_strs};
pub use report::{format_days, Histogram, Report, Statistic, Timeline};
