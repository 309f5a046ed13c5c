//! Stats command.
//!
//! Displays the watering report of one plant: scalar statistics over the
//! gaps between waterings, a histogram of gap lengths, and the gaps in
//! chronological order.

use serde::Serialize;

use crate::config::Config;
use crate::core::{Clock, PlantId};
use crate::error::Result;
use crate::stats::{format_days, Freshness, RankedPlant, Report};
use crate::storage::GardenStore;

/// Widest histogram bar, in characters.
const MAX_BAR_WIDTH: usize = 40;

/// Options for the stats command.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Include histogram and timeline in human-readable output.
    pub detailed: bool,
}

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    /// Whether the report was computed.
    pub success: bool,
    pub plant_id: PlantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of recorded waterings.
    pub waterings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<Freshness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    /// Error message if the report failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatsOutput {
    /// Create a failed output.
    pub fn failure(plant_id: PlantId, error: impl Into<String>) -> Self {
        Self {
            success: false,
            plant_id,
            name: None,
            waterings: 0,
            freshness: None,
            report: None,
            error: Some(error.into()),
        }
    }
}

/// The stats command implementation.
pub struct StatsCommand<S: GardenStore> {
    store: S,
    clock: Clock,
}

impl<S: GardenStore> StatsCommand<S> {
    /// Create a new stats command.
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            clock: config.clock(),
        }
    }

    /// Use a specific clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Compute the report for a plant.
    pub fn run(&self, plant_id: PlantId) -> StatsOutput {
        match self.compute(plant_id) {
            Ok(output) => output,
            Err(e) => StatsOutput::failure(plant_id, e.to_string()),
        }
    }

    fn compute(&self, plant_id: PlantId) -> Result<StatsOutput> {
        let history = self.store.history(plant_id)?;
        let report = Report::from_dates(&history.dates);
        let ranked = RankedPlant::new(history, self.clock.today());

        tracing::debug!(
            plant_id,
            samples = report.samples,
            "computed watering report"
        );

        Ok(StatsOutput {
            success: true,
            plant_id,
            name: Some(ranked.history.plant.name.clone()),
            waterings: ranked.history.dates.len(),
            freshness: Some(ranked.freshness),
            report: Some(report),
            error: None,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output, options)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if !output.success {
            return format!(
                "Stats failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let Some(report) = &output.report else {
            return String::new();
        };

        let mut lines = vec![format!(
            "Statistics for {} (#{})",
            output.name.as_deref().unwrap_or("plant"),
            output.plant_id
        )];
        lines.push(format!("  Waterings recorded: {}", output.waterings));
        if let Some(freshness) = output.freshness {
            lines.push(format!("  Days since last water: {}", freshness));
        }
        lines.push(String::new());

        if !report.has_data() {
            lines.push("Not enough waterings yet (need at least two).".to_string());
            lines.push(String::new());
            return lines.join("\n");
        }

        for (label, value) in report.summary_lines() {
            let value = value
                .map(|v| format!("{} days", format_days(v)))
                .unwrap_or_else(|| "n/a".to_string());
            lines.push(format!("  {:<42} {}", label, value));
        }

        if options.detailed {
            lines.push(String::new());
            lines.push("Histogram (days between water: count)".to_string());
            let peak = report.histogram.counts.iter().copied().max().unwrap_or(1);
            for (value, count) in report.histogram.buckets() {
                let width = (count * MAX_BAR_WIDTH).div_ceil(peak);
                lines.push(format!(
                    "  {:>6} | {} {}",
                    format_days(value),
                    "#".repeat(width),
                    count
                ));
            }

            lines.push(String::new());
            lines.push("Timeline (days between water, oldest first)".to_string());
            let timeline: Vec<String> = report.timeline.data.iter().map(|v| format_days(*v)).collect();
            lines.push(format!("  {}", timeline.join(" ")));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_date;
    use crate::storage::MemoryGardenStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn setup(dates: &[&str]) -> (StatsCommand<Arc<MemoryGardenStore>>, PlantId) {
        let store = Arc::new(MemoryGardenStore::new());
        let place = store.add_place("Window").unwrap();
        let plant = store.add_plant(place.id, "Geranium").unwrap();
        for date in dates {
            store.add_date(plant.id, d(date)).unwrap();
        }
        let cmd = StatsCommand::new(Arc::clone(&store), &Config::default())
            .with_clock(Clock::fixed(d("2023-01-12")));
        (cmd, plant.id)
    }

    #[test]
    fn test_stats_example() {
        let (cmd, plant) = setup(&["2023-01-05", "2023-01-01", "2023-01-10"]);
        let output = cmd.run(plant);

        assert!(output.success);
        assert_eq!(output.waterings, 3);
        assert_eq!(output.freshness, Some(Freshness::Days(2)));
        let report = output.report.unwrap();
        assert_eq!(report.mean, Some(4.5));
        assert_eq!(report.median, 4.5);
        assert_eq!(report.stddev, Some(0.5));
        assert_eq!(report.histogram.labels, vec![4.0, 5.0]);
        assert_eq!(report.timeline.data, vec![4.0, 5.0]);
    }

    #[test]
    fn test_stats_never_watered() {
        let (cmd, plant) = setup(&[]);
        let output = cmd.run(plant);

        assert!(output.success);
        assert_eq!(output.freshness, Some(Freshness::Never));
        let report = output.report.as_ref().unwrap();
        assert_eq!(report.mean, None);
        assert_eq!(report.median, 0.0);

        let formatted = cmd.format_output(&output, &StatsOptions::default());
        assert!(formatted.contains("Not enough waterings yet"));
        assert!(formatted.contains("Days since last water: Never"));
    }

    #[test]
    fn test_stats_unknown_plant() {
        let (cmd, _plant) = setup(&[]);
        let output = cmd.run(31);
        assert!(!output.success);
        assert_eq!(output.error.as_deref(), Some("plant not found: 31"));
        assert!(cmd
            .format_output(&output, &StatsOptions::default())
            .starts_with("Stats failed"));
    }

    #[test]
    fn test_format_output_human_readable() {
        let (cmd, plant) = setup(&["2023-01-01", "2023-01-05", "2023-01-10"]);
        let output = cmd.run(plant);
        let formatted = cmd.format_output(&output, &StatsOptions::default());

        assert!(formatted.contains("Statistics for Geranium (#1)"));
        assert!(formatted.contains("Mean time between water"));
        assert!(formatted.contains("4.5 days"));
        assert!(formatted.contains("Shortest time between water"));
        assert!(!formatted.contains("Histogram"));
    }

    #[test]
    fn test_format_output_detailed() {
        let (cmd, plant) = setup(&["2023-01-01", "2023-01-04", "2023-01-07", "2023-01-08"]);
        let output = cmd.run(plant);
        let options = StatsOptions {
            detailed: true,
            ..Default::default()
        };
        let formatted = cmd.format_output(&output, &options);

        assert!(formatted.contains("Histogram"));
        assert!(formatted.contains(&format!("     3 | {} 2", "#".repeat(MAX_BAR_WIDTH))));
        assert!(formatted.contains(&format!("     1 | {} 1", "#".repeat(MAX_BAR_WIDTH / 2))));
        assert!(formatted.contains("  3 3 1"));
    }

    #[test]
    fn test_format_output_json() {
        let (cmd, plant) = setup(&["2023-01-01"]);
        let options = StatsOptions {
            json: true,
            ..Default::default()
        };
        let output = cmd.run(plant);
        let parsed: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &options)).unwrap();

        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["freshness"]["days"], 11);
        assert!(parsed["report"]["mean"].is_null());
        assert_eq!(parsed["report"]["median"], 0.0);
        assert_eq!(parsed["report"]["histogram"]["labels"], serde_json::json!([]));
    }

    #[test]
    fn test_format_output_quiet() {
        let (cmd, plant) = setup(&["2023-01-01", "2023-01-02"]);
        let options = StatsOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(plant);
        assert!(cmd.format_output(&output, &options).is_empty());
    }
}
