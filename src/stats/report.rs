//! Descriptive statistics over watering gaps.
//!
//! A [`Report`] is a pure function of a gap sequence and is recomputed on
//! every request.
//!
//! Empty input policy:
//! - mean, standard deviation, min and max are `None` ("no data", `null`
//!   in JSON); [`Report::require`] turns that into
//!   [`PlantsError::InsufficientData`]
//! - median is `0.0`
//! - histogram and timeline are empty

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::date::parse_dates;
use crate::error::{PlantsError, Result};
use crate::stats::intervals::gaps;

/// The scalar statistics of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    Median,
    StdDev,
    Longest,
    Shortest,
}

impl Statistic {
    /// Every statistic, in display order.
    pub const ALL: [Statistic; 5] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::StdDev,
        Statistic::Longest,
        Statistic::Shortest,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Mean => "Mean time between water",
            Statistic::Median => "Median time between water",
            Statistic::StdDev => "Standard deviation of time between water",
            Statistic::Longest => "Longest time between water",
            Statistic::Shortest => "Shortest time between water",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::StdDev => "stddev",
            Statistic::Longest => "max",
            Statistic::Shortest => "min",
        }
    }
}

/// Arithmetic mean, `None` for no gaps.
pub fn mean(gaps: &[f64]) -> Option<f64> {
    if gaps.is_empty() {
        return None;
    }
    Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
}

/// Median; `0.0` for no gaps.
pub fn median(gaps: &[f64]) -> f64 {
    if gaps.is_empty() {
        return 0.0;
    }
    let mut sorted = gaps.to_vec();
    sorted.sort_by(f64::total_cmp);
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2.0
    } else {
        sorted[middle]
    }
}

/// Population standard deviation, `None` for no gaps.
pub fn stddev(gaps: &[f64]) -> Option<f64> {
    let avg = mean(gaps)?;
    let sum: f64 = gaps.iter().map(|g| (avg - g) * (avg - g)).sum();
    Some((sum / gaps.len() as f64).sqrt())
}

/// Smallest gap, `None` for no gaps.
pub fn min(gaps: &[f64]) -> Option<f64> {
    gaps.iter().copied().reduce(f64::min)
}

/// Largest gap, `None` for no gaps.
pub fn max(gaps: &[f64]) -> Option<f64> {
    gaps.iter().copied().reduce(f64::max)
}

/// Occurrences of each distinct gap value, ascending by value.
///
/// No range binning: every distinct value is its own bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Distinct gap values.
    pub labels: Vec<f64>,
    /// Count for the label at the same index.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Build a histogram from gaps.
    pub fn from_gaps(gaps: &[f64]) -> Self {
        let mut sorted = gaps.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut histogram = Self::default();
        for value in sorted {
            match histogram.labels.last() {
                Some(last) if *last == value => {
                    if let Some(count) = histogram.counts.last_mut() {
                        *count += 1;
                    }
                }
                _ => {
                    histogram.labels.push(value);
                    histogram.counts.push(1);
                }
            }
        }
        histogram
    }

    /// `(value, count)` pairs.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.labels.iter().copied().zip(self.counts.iter().copied())
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The gaps in chronological order, ready for a time-series chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// One empty label per point.
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl Timeline {
    pub fn from_gaps(gaps: &[f64]) -> Self {
        Self {
            labels: vec![String::new(); gaps.len()],
            data: gaps.to_vec(),
        }
    }
}

/// Statistics of one plant's watering gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Number of gaps the report was computed from.
    pub samples: usize,
    pub mean: Option<f64>,
    pub median: f64,
    pub stddev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub histogram: Histogram,
    pub timeline: Timeline,
}

impl Report {
    /// Compute a report from a gap sequence.
    pub fn from_gaps(gaps: &[f64]) -> Self {
        Self {
            samples: gaps.len(),
            mean: mean(gaps),
            median: median(gaps),
            stddev: stddev(gaps),
            min: min(gaps),
            max: max(gaps),
            histogram: Histogram::from_gaps(gaps),
            timeline: Timeline::from_gaps(gaps),
        }
    }

    /// Compute a report from ascending watering dates.
    pub fn from_dates(dates: &[NaiveDate]) -> Self {
        Self::from_gaps(&gaps(dates))
    }

    /// Compute a report from ISO date strings.
    pub fn from_date_strs<S: AsRef<str>>(dates: &[S]) -> Result<Self> {
        let parsed = parse_dates(dates)?;
        Ok(Self::from_dates(&parsed))
    }

    /// Whether there was at least one gap.
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }

    /// The value of a statistic, if defined.
    pub fn get(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::Mean => self.mean,
            Statistic::Median => Some(self.median),
            Statistic::StdDev => self.stddev,
            Statistic::Longest => self.max,
            Statistic::Shortest => self.min,
        }
    }

    /// The value of a statistic, or `InsufficientData`.
    pub fn require(&self, statistic: Statistic) -> Result<f64> {
        self.get(statistic)
            .ok_or_else(|| PlantsError::insufficient_data(statistic.key()))
    }

    /// Labelled rows for display, in the order of [`Statistic::ALL`].
    pub fn summary_lines(&self) -> Vec<(&'static str, Option<f64>)> {
        Statistic::ALL
            .iter()
            .map(|s| (s.label(), self.get(*s)))
            .collect()
    }
}

/// Format a day count without trailing zeros (`4`, `4.5`, `0.333`).
pub fn format_days(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.3}", value);
        match s.trim_end_matches('0').trim_end_matches('.') {
            "-0" => "0".to_string(),
            trimmed => trimmed.to_string(),
        }
    }
}
