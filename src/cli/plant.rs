//! Plant command.
//!
//! Creates, renames, hides, shows, and deletes plants.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::core::{Clock, Plant, PlaceId, PlantId};
use crate::error::{PlantsError, Result};
use crate::stats::RankedPlant;
use crate::storage::GardenStore;

use super::places::PlantRow;

/// What to do with a plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlantAction {
    /// Create a plant; `None` uses the configured default name.
    Add {
        place: PlaceId,
        name: Option<String>,
    },
    /// Change the name, keeping the hidden flag.
    Rename { id: PlantId, name: String },
    /// Set the hidden flag, keeping the name.
    SetHidden { id: PlantId, hidden: bool },
    /// Show the plant with all of its dates.
    Show { id: PlantId },
    /// Delete the plant and its waterings.
    Delete { id: PlantId },
}

impl PlantAction {
    fn verb(&self) -> &'static str {
        match self {
            PlantAction::Add { .. } => "add",
            PlantAction::Rename { .. } => "rename",
            PlantAction::SetHidden { hidden: true, .. } => "hide",
            PlantAction::SetHidden { hidden: false, .. } => "unhide",
            PlantAction::Show { .. } => "show",
            PlantAction::Delete { .. } => "delete",
        }
    }
}

/// Options for the plant command.
#[derive(Debug, Clone, Default)]
pub struct PlantOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the plant command.
#[derive(Debug, Clone, Serialize)]
pub struct PlantOutput {
    /// Whether the action was successful.
    pub success: bool,
    /// The action performed.
    pub action: String,
    /// The plant after the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<Plant>,
    /// Freshness summary (show only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlantRow>,
    /// Watering dates, ascending (show only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<NaiveDate>>,
    /// Waterings deleted along with the plant (delete only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_removed: Option<usize>,
    /// Error message if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlantOutput {
    fn empty(action: &PlantAction, success: bool) -> Self {
        Self {
            success,
            action: action.verb().to_string(),
            plant: None,
            status: None,
            dates: None,
            events_removed: None,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(action: &PlantAction, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(action, false)
        }
    }
}

/// The plant command implementation.
pub struct PlantCommand<S: GardenStore> {
    store: S,
    config: Config,
    clock: Clock,
}

impl<S: GardenStore> PlantCommand<S> {
    /// Create a new plant command.
    pub fn new(store: S, config: Config) -> Self {
        let clock = config.clock();
        Self {
            store,
            config,
            clock,
        }
    }

    /// Use a specific clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run an action.
    pub fn run(&self, action: &PlantAction) -> PlantOutput {
        match self.apply(action) {
            Ok(output) => output,
            Err(e) => PlantOutput::failure(action, e.to_string()),
        }
    }

    fn existing(&self, id: PlantId) -> Result<Plant> {
        self.store.plant(id)?.ok_or(PlantsError::PlantNotFound { id })
    }

    fn apply(&self, action: &PlantAction) -> Result<PlantOutput> {
        let mut output = PlantOutput::empty(action, true);

        match action {
            PlantAction::Add { place, name } => {
                let name = name
                    .as_deref()
                    .unwrap_or(self.config.display.default_plant_name.as_str());
                output.plant = Some(self.store.add_plant(*place, name)?);
            }
            PlantAction::Rename { id, name } => {
                output.plant = Some(self.store.rename_plant(*id, name)?);
            }
            PlantAction::SetHidden { id, hidden } => {
                output.plant = Some(self.store.set_plant_hidden(*id, *hidden)?);
            }
            PlantAction::Show { id } => {
                let history = self.store.history(*id)?;
                let ranked = RankedPlant::new(history, self.clock.today());
                output.status = Some(PlantRow::from(&ranked));
                output.dates = Some(ranked.history.dates.clone());
                output.plant = Some(ranked.history.plant);
            }
            PlantAction::Delete { id } => {
                let current = self.existing(*id)?;
                output.events_removed = Some(self.store.delete_plant(*id)?);
                output.plant = Some(current);
            }
        }

        Ok(output)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &PlantOutput, options: &PlantOptions) -> String {
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
    fn format_human_readable(&self, output: &PlantOutput) -> String {
        if !output.success {
            return format!(
                "Plant {} failed: {}\n",
                output.action,
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let Some(plant) = &output.plant else {
            return String::new();
        };

        match output.action.as_str() {
            "add" => format!(
                "Added plant '{}' (#{}) to place #{}\n",
                plant.name, plant.id, plant.place
            ),
            "rename" => format!("Renamed plant #{} to '{}'\n", plant.id, plant.name),
            "hide" => format!("Plant '{}' is now hidden\n", plant.name),
            "unhide" => format!("Plant '{}' is now visible\n", plant.name),
            "delete" => format!(
                "Deleted plant '{}' and {} watering(s)\n",
                plant.name,
                output.events_removed.unwrap_or(0)
            ),
            _ => {
                let mut lines = vec![format!(
                    "{} (#{}) in place #{}{}",
                    plant.name,
                    plant.id,
                    plant.place,
                    if plant.hidden { " [hidden]" } else { "" }
                )];
                if let Some(status) = &output.status {
                    let days = match status.freshness.days() {
                        Some(_) => format!("{} day(s) since water {}", status.text, status.text_alt),
                        None => "Never watered".to_string(),
                    };
                    lines.push(format!("  {}", days.trim_end()));
                    if status.watered_today {
                        lines.push("  Watered today".to_string());
                    }
                }
                if let Some(dates) = &output.dates {
                    lines.push(format!("  Waterings: {}", dates.len()));
                    for date in dates {
                        lines.push(format!("    {}", date));
                    }
                }
                lines.push(String::new());
                lines.join("\n")
            }
        }
    }
}
