//! Places command.
//!
//! Shows every place with its plants ranked most-overdue first, and creates
//! new places.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::core::{Clock, Place, PlaceId, PlantId};
use crate::error::{PlantsError, Result};
use crate::stats::{rank, Freshness, RankedPlant};
use crate::storage::GardenStore;

/// Options for the places command.
#[derive(Debug, Clone, Default)]
pub struct PlacesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Include hidden plants.
    pub show_hidden: bool,
    /// Only this place.
    pub place: Option<PlaceId>,
}

/// One plant line of the overview.
#[derive(Debug, Clone, Serialize)]
pub struct PlantRow {
    pub id: PlantId,
    pub name: String,
    pub hidden: bool,
    pub freshness: Freshness,
    /// `Never` or the day count.
    pub text: String,
    /// `(YYYY-MM-DD)` of the last watering, or empty.
    pub text_alt: String,
    pub watered_today: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_watered: Option<NaiveDate>,
    /// Number of recorded waterings.
    pub waterings: usize,
}

impl From<&RankedPlant> for PlantRow {
    fn from(ranked: &RankedPlant) -> Self {
        Self {
            id: ranked.history.plant.id,
            name: ranked.history.plant.name.clone(),
            hidden: ranked.history.plant.hidden,
            freshness: ranked.freshness,
            text: ranked.text(),
            text_alt: ranked.text_alt(),
            watered_today: ranked.watered_today,
            last_watered: ranked.history.last_watered(),
            waterings: ranked.history.dates.len(),
        }
    }
}

/// One place of the overview.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceOverview {
    pub id: PlaceId,
    pub name: String,
    /// Plants, most overdue first.
    pub plants: Vec<PlantRow>,
    /// Plants left out because they are hidden.
    pub hidden_count: usize,
}

/// Output format for the places command.
#[derive(Debug, Clone, Serialize)]
pub struct PlacesOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The day freshness was measured against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<NaiveDate>,
    pub places: Vec<PlaceOverview>,
    /// The place created by `place add`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Place>,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlacesOutput {
    /// Create a successful overview output.
    pub fn success(today: NaiveDate, places: Vec<PlaceOverview>) -> Self {
        Self {
            success: true,
            today: Some(today),
            places,
            created: None,
            error: None,
        }
    }

    /// Create a successful output for a new place.
    pub fn created(place: Place) -> Self {
        Self {
            success: true,
            today: None,
            places: Vec::new(),
            created: Some(place),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            today: None,
            places: Vec::new(),
            created: None,
            error: Some(error.into()),
        }
    }
}

/// The places command implementation.
pub struct PlacesCommand<S: GardenStore> {
    store: S,
    config: Config,
    clock: Clock,
}

impl<S: GardenStore> PlacesCommand<S> {
    /// Create a new places command.
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

    /// Build the ranked overview.
    pub fn run(&self, options: &PlacesOptions) -> PlacesOutput {
        let today = self.clock.today();
        match self.overview(options, today) {
            Ok(places) => PlacesOutput::success(today, places),
            Err(e) => PlacesOutput::failure(e.to_string()),
        }
    }

    fn overview(&self, options: &PlacesOptions, today: NaiveDate) -> Result<Vec<PlaceOverview>> {
        let show_hidden = options.show_hidden || self.config.display.show_hidden;

        let places = match options.place {
            Some(id) => vec![self
                .store
                .place(id)?
                .ok_or(PlantsError::PlaceNotFound { id })?],
            None => self.store.places()?,
        };

        places
            .into_iter()
            .map(|place| {
                let histories = self.store.histories_in(place.id)?;
                let total = histories.len();
                let visible: Vec<_> = histories
                    .into_iter()
                    .filter(|h| show_hidden || !h.plant.hidden)
                    .collect();
                let hidden_count = total - visible.len();
                let plants = rank(visible, today).iter().map(PlantRow::from).collect();
                Ok(PlaceOverview {
                    id: place.id,
                    name: place.name,
                    plants,
                    hidden_count,
                })
            })
            .collect()
    }

    /// Create a place.
    pub fn add(&self, name: &str) -> PlacesOutput {
        match self.store.add_place(name) {
            Ok(place) => PlacesOutput::created(place),
            Err(e) => PlacesOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &PlacesOutput, options: &PlacesOptions) -> String {
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
    fn format_human_readable(&self, output: &PlacesOutput) -> String {
        if !output.success {
            return format!(
                "Failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if let Some(place) = &output.created {
            return format!("Created place '{}' (#{})\n", place.name, place.id);
        }

        if output.places.is_empty() {
            return "No places yet. Create one with `plants place add <name>`.\n".to_string();
        }

        let mut lines = Vec::new();
        for place in &output.places {
            lines.push(format!("{} (#{})", place.name, place.id));

            if place.plants.is_empty() {
                lines.push("  (no plants)".to_string());
            }

            for plant in &place.plants {
                let marker = if plant.watered_today { "*" } else { " " };
                let hidden = if plant.hidden { " [hidden]" } else { "" };
                lines.push(format!(
                    "  {} {:<24} {:>6} {}{}",
                    marker,
                    format!("{} (#{})", plant.name, plant.id),
                    plant.text,
                    plant.text_alt,
                    hidden
                ));
            }

            if place.hidden_count > 0 {
                lines.push(format!("  ({} hidden)", place.hidden_count));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_date;
    use crate::storage::MemoryGardenStore;
    use std::sync::Arc;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn setup() -> (Arc<MemoryGardenStore>, PlacesCommand<Arc<MemoryGardenStore>>) {
        let store = Arc::new(MemoryGardenStore::new());
        let cmd = PlacesCommand::new(Arc::clone(&store), Config::default())
            .with_clock(Clock::fixed(d("2023-01-10")));
        (store, cmd)
    }

    fn seed(store: &MemoryGardenStore) -> PlaceId {
        let kitchen = store.add_place("Kitchen").unwrap();
        let basil = store.add_plant(kitchen.id, "Basil").unwrap();
        let mint = store.add_plant(kitchen.id, "Mint").unwrap();
        let _chili = store.add_plant(kitchen.id, "Chili").unwrap();
        let aloe = store.add_plant(kitchen.id, "Aloe").unwrap();

        store.add_date(basil.id, d("2023-01-10")).unwrap();
        store.add_date(mint.id, d("2023-01-02")).unwrap();
        store.add_date(aloe.id, d("2022-12-01")).unwrap();
        store.update_plant(aloe.id, "Aloe", true).unwrap();
        kitchen.id
    }

    #[test]
    fn test_empty_overview() {
        let (_store, cmd) = setup();
        let output = cmd.run(&PlacesOptions::default());
        assert!(output.success);
        assert!(output.places.is_empty());
        assert!(cmd
            .format_output(&output, &PlacesOptions::default())
            .contains("No places yet"));
    }

    #[test]
    fn test_overview_ranks_and_hides() {
        let (store, cmd) = setup();
        seed(&store);

        let output = cmd.run(&PlacesOptions::default());
        assert!(output.success);
        let place = &output.places[0];
        let names: Vec<&str> = place.plants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Chili", "Mint", "Basil"]);
        assert_eq!(place.hidden_count, 1);

        assert_eq!(place.plants[0].text, "Never");
        assert_eq!(place.plants[1].freshness, Freshness::Days(8));
        assert_eq!(place.plants[1].text_alt, "(2023-01-02)");
        assert!(place.plants[2].watered_today);
    }

    #[test]
    fn test_overview_show_hidden() {
        let (store, cmd) = setup();
        seed(&store);

        let options = PlacesOptions {
            show_hidden: true,
            ..Default::default()
        };
        let output = cmd.run(&options);
        let place = &output.places[0];
        assert_eq!(place.plants.len(), 4);
        assert_eq!(place.hidden_count, 0);
        // Never-watered first, then the hidden aloe at 40 days
        assert_eq!(place.plants[1].name, "Aloe");
    }

    #[test]
    fn test_config_show_hidden() {
        let store = Arc::new(MemoryGardenStore::new());
        seed(&store);
        let mut config = Config::default();
        config.display.show_hidden = true;
        let cmd = PlacesCommand::new(Arc::clone(&store), config)
            .with_clock(Clock::fixed(d("2023-01-10")));

        let output = cmd.run(&PlacesOptions::default());
        assert_eq!(output.places[0].plants.len(), 4);
    }

    #[test]
    fn test_single_place_filter() {
        let (store, cmd) = setup();
        seed(&store);
        let office = store.add_place("Office").unwrap();

        let options = PlacesOptions {
            place: Some(office.id),
            ..Default::default()
        };
        let output = cmd.run(&options);
        assert_eq!(output.places.len(), 1);
        assert_eq!(output.places[0].name, "Office");

        let missing = cmd.run(&PlacesOptions {
            place: Some(99),
            ..Default::default()
        });
        assert!(!missing.success);
        assert!(missing.error.unwrap().contains("place not found"));
    }

    #[test]
    fn test_add_place() {
        let (store, cmd) = setup();
        let output = cmd.add("Balcony");
        assert!(output.success);
        assert_eq!(output.created.as_ref().unwrap().name, "Balcony");
        assert_eq!(store.places().unwrap().len(), 1);

        let formatted = cmd.format_output(&output, &PlacesOptions::default());
        assert!(formatted.contains("Created place 'Balcony'"));
    }

    #[test]
    fn test_add_place_empty_name_fails() {
        let (_store, cmd) = setup();
        let output = cmd.add("  ");
        assert!(!output.success);
        assert!(output.error.unwrap().contains("must not be empty"));
    }

    #[test]
    fn test_format_output_json() {
        let (store, cmd) = setup();
        seed(&store);
        let options = PlacesOptions {
            json: true,
            ..Default::default()
        };
        let output = cmd.run(&options);
        let formatted = cmd.format_output(&output, &options);

        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["today"], "2023-01-10");
        assert_eq!(parsed["places"][0]["plants"][0]["freshness"]["status"], "never");
    }

    #[test]
    fn test_format_output_quiet() {
        let (store, cmd) = setup();
        seed(&store);
        let options = PlacesOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(&options);
        assert!(cmd.format_output(&output, &options).is_empty());
    }

    #[test]
    fn test_format_output_human_readable() {
        let (store, cmd) = setup();
        seed(&store);
        let output = cmd.run(&PlacesOptions::default());
        let formatted = cmd.format_output(&output, &PlacesOptions::default());

        assert!(formatted.contains("Kitchen (#1)"));
        assert!(formatted.contains("Never"));
        assert!(formatted.contains("(2023-01-02)"));
        assert!(formatted.contains("(1 hidden)"));
    }
}
