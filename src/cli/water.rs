//! Water command.
//!
//! Records and removes watering dates.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::core::{parse_date, Clock, PlantId};
use crate::error::{PlantsError, Result};
use crate::stats::{freshness, Freshness};
use crate::storage::GardenStore;

/// What to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaterAction {
    /// Watered today, shifted by `offset` days (`-1` for yesterday).
    Now { plant: PlantId, offset: i64 },
    /// Watered on an explicit `YYYY-MM-DD` date.
    Add { plant: PlantId, date: String },
    /// Remove one watering on a `YYYY-MM-DD` date.
    Remove { plant: PlantId, date: String },
    /// List the watering dates.
    List { plant: PlantId },
}

impl WaterAction {
    fn plant(&self) -> PlantId {
        match self {
            WaterAction::Now { plant, .. }
            | WaterAction::Add { plant, .. }
            | WaterAction::Remove { plant, .. }
            | WaterAction::List { plant } => *plant,
        }
    }
}

/// Options for the water command.
#[derive(Debug, Clone, Default)]
pub struct WaterOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the water command.
#[derive(Debug, Clone, Serialize)]
pub struct WaterOutput {
    /// Whether the action was successful.
    pub success: bool,
    pub plant_id: PlantId,
    /// The date recorded or removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Whether a watering was removed (remove only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    /// All watering dates after the action, ascending.
    pub dates: Vec<NaiveDate>,
    /// Freshness after the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<Freshness>,
    /// Error message if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WaterOutput {
    /// Create a failed output.
    pub fn failure(plant_id: PlantId, error: impl Into<String>) -> Self {
        Self {
            success: false,
            plant_id,
            date: None,
            removed: None,
            dates: Vec::new(),
            freshness: None,
            error: Some(error.into()),
        }
    }
}

/// The water command implementation.
pub struct WaterCommand<S: GardenStore> {
    store: S,
    clock: Clock,
}

impl<S: GardenStore> WaterCommand<S> {
    /// Create a new water command.
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

    /// Run an action.
    pub fn run(&self, action: &WaterAction) -> WaterOutput {
        match self.apply(action) {
            Ok(output) => output,
            Err(e) => WaterOutput::failure(action.plant(), e.to_string()),
        }
    }

    fn apply(&self, action: &WaterAction) -> Result<WaterOutput> {
        let plant = action.plant();
        if self.store.plant(plant)?.is_none() {
            return Err(PlantsError::PlantNotFound { id: plant });
        }

        let (date, removed) = match action {
            WaterAction::Now { offset, .. } => {
                let date = self.clock.today_offset(*offset)?;
                self.store.add_date(plant, date)?;
                (Some(date), None)
            }
            WaterAction::Add { date, .. } => {
                let date = parse_date(date)?;
                self.store.add_date(plant, date)?;
                (Some(date), None)
            }
            WaterAction::Remove { date, .. } => {
                let date = parse_date(date)?;
                let removed = self.store.remove_date(plant, date)?;
                (Some(date), Some(removed))
            }
            WaterAction::List { .. } => (None, None),
        };

        let dates = self.store.dates_for_plant(plant)?;
        Ok(WaterOutput {
            success: true,
            plant_id: plant,
            date,
            removed,
            freshness: Some(freshness(&dates, self.clock.today())),
            dates,
            error: None,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &WaterOutput, options: &WaterOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &WaterOutput) -> String {
        if !output.success {
            return format!(
                "Water failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        match (output.date, output.removed) {
            (Some(date), Some(true)) => {
                format!("Removed watering on {} from plant #{}\n", date, output.plant_id)
            }
            (Some(date), Some(false)) => {
                format!("Plant #{} has no watering on {}\n", output.plant_id, date)
            }
            (Some(date), None) => {
                format!("Plant #{} watered on {}\n", output.plant_id, date)
            }
            (None, _) => {
                if output.dates.is_empty() {
                    return format!("Plant #{} has never been watered\n", output.plant_id);
                }
                let mut lines = vec![format!(
                    "Plant #{}: {} watering(s)",
                    output.plant_id,
                    output.dates.len()
                )];
                lines.extend(output.dates.iter().map(|d| format!("  {}", d)));
                lines.push(String::new());
                lines.join("\n")
            }
        }
    }
}
