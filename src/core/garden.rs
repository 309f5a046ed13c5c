//! Places, plants, and watering events.
//!
//! A [`Garden`] is the complete persisted document. Every store keeps one and
//! delegates mutations to it, so the rules below hold regardless of where the
//! data lives:
//!
//! - a plant always belongs to exactly one existing place
//! - deleting a plant removes every event that references it
//! - the dates of a plant are read back in ascending order, with duplicate
//!   dates kept in insertion order
//! - removing a date removes at most one matching event

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlantsError, Result};

/// Identifier of a place.
pub type PlaceId = u64;
/// Identifier of a plant.
pub type PlantId = u64;
/// Identifier of a watering event.
pub type EventId = u64;

/// Schema version of the garden document.
///
/// Increment when the document layout changes in a breaking way.
pub const GARDEN_SCHEMA_VERSION: u8 = 1;

/// A named location holding plants (a room, a balcony).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
}

/// A tracked plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    /// The owning place.
    pub place: PlaceId,
    pub name: String,
    /// Hidden plants are left out of overviews unless asked for.
    #[serde(default)]
    pub hidden: bool,
}

/// A single recorded watering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub plant: PlantId,
    pub date: NaiveDate,
}

/// A plant together with its ascending watering dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantHistory {
    #[serde(flatten)]
    pub plant: Plant,
    pub dates: Vec<NaiveDate>,
}

impl PlantHistory {
    /// The most recent watering, if any.
    pub fn last_watered(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// The whole persisted garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GardenDocument")]
pub struct Garden {
    /// Schema version for forward compatibility.
    pub version: u8,
    places: Vec<Place>,
    plants: Vec<Plant>,
    events: Vec<Event>,
    next_place_id: PlaceId,
    next_plant_id: PlantId,
    next_event_id: EventId,
}

impl Default for Garden {
    fn default() -> Self {
        Self {
            version: GARDEN_SCHEMA_VERSION,
            places: Vec::new(),
            plants: Vec::new(),
            events: Vec::new(),
            next_place_id: 0,
            next_plant_id: 0,
            next_event_id: 0,
        }
    }
}

/// The garden as read from disk, before the id counters are checked.
#[derive(Deserialize)]
struct GardenDocument {
    version: u8,
    #[serde(default)]
    places: Vec<Place>,
    #[serde(default)]
    plants: Vec<Plant>,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    next_place_id: PlaceId,
    #[serde(default)]
    next_plant_id: PlantId,
    #[serde(default)]
    next_event_id: EventId,
}

impl From<GardenDocument> for Garden {
    // Counters never fall below an id already in use, so a document with
    // missing or stale counters cannot hand out duplicates.
    fn from(doc: GardenDocument) -> Self {
        let max_place = doc.places.iter().map(|p| p.id).max().unwrap_or(0);
        let max_plant = doc.plants.iter().map(|p| p.id).max().unwrap_or(0);
        let max_event = doc.events.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            version: doc.version,
            next_place_id: doc.next_place_id.max(max_place),
            next_plant_id: doc.next_plant_id.max(max_plant),
            next_event_id: doc.next_event_id.max(max_event),
            places: doc.places,
            plants: doc.plants,
            events: doc.events,
        }
    }
}

fn validate_name(kind: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PlantsError::invalid_input(format!(
            "{} name must not be empty",
            kind
        )));
    }
    Ok(trimmed.to_string())
}

impl Garden {
    /// Create an empty garden.
    pub fn new() -> Self {
        Self::default()
    }

    /// All places, in creation order.
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Look up a place.
    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    /// Create a place.
    pub fn add_place(&mut self, name: &str) -> Result<Place> {
        let name = validate_name("place", name)?;
        self.next_place_id += 1;
        let place = Place {
            id: self.next_place_id,
            name,
        };
        self.places.push(place.clone());
        Ok(place)
    }

    /// The plants of a place, in creation order.
    pub fn plants_in(&self, place: PlaceId) -> Result<Vec<Plant>> {
        if self.place(place).is_none() {
            return Err(PlantsError::PlaceNotFound { id: place });
        }
        Ok(self
            .plants
            .iter()
            .filter(|p| p.place == place)
            .cloned()
            .collect())
    }

    /// Look up a plant.
    pub fn plant(&self, id: PlantId) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    fn plant_mut(&mut self, id: PlantId) -> Result<&mut Plant> {
        self.plants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlantsError::PlantNotFound { id })
    }

    fn require_plant(&self, id: PlantId) -> Result<&Plant> {
        self.plant(id).ok_or(PlantsError::PlantNotFound { id })
    }

    /// Create a visible plant in `place`.
    pub fn add_plant(&mut self, place: PlaceId, name: &str) -> Result<Plant> {
        if self.place(place).is_none() {
            return Err(PlantsError::PlaceNotFound { id: place });
        }
        let name = validate_name("plant", name)?;
        self.next_plant_id += 1;
        let plant = Plant {
            id: self.next_plant_id,
            place,
            name,
            hidden: false,
        };
        self.plants.push(plant.clone());
        Ok(plant)
    }

    /// Replace a plant's name and hidden flag together.
    pub fn update_plant(&mut self, id: PlantId, name: &str, hidden: bool) -> Result<Plant> {
        let name = validate_name("plant", name)?;
        let plant = self.plant_mut(id)?;
        plant.name = name;
        plant.hidden = hidden;
        Ok(plant.clone())
    }

    /// Change a plant's name, keeping its hidden flag.
    pub fn rename_plant(&mut self, id: PlantId, name: &str) -> Result<Plant> {
        let name = validate_name("plant", name)?;
        let plant = self.plant_mut(id)?;
        plant.name = name;
        Ok(plant.clone())
    }

    /// Set a plant's hidden flag, keeping its name.
    pub fn set_plant_hidden(&mut self, id: PlantId, hidden: bool) -> Result<Plant> {
        let plant = self.plant_mut(id)?;
        plant.hidden = hidden;
        Ok(plant.clone())
    }

    /// Delete a plant and all of its events.
    ///
    /// Returns the number of events removed with it. Nothing changes when the
    /// plant does not exist.
    pub fn delete_plant(&mut self, id: PlantId) -> Result<usize> {
        self.require_plant(id)?;
        let before = self.events.len();
        self.events.retain(|e| e.plant != id);
        self.plants.retain(|p| p.id != id);
        Ok(before - self.events.len())
    }

    /// The watering dates of a plant, ascending.
    pub fn dates_for_plant(&self, id: PlantId) -> Result<Vec<NaiveDate>> {
        self.require_plant(id)?;
        let mut dates: Vec<NaiveDate> = self
            .events
            .iter()
            .filter(|e| e.plant == id)
            .map(|e| e.date)
            .collect();
        // Stable, so equal dates stay in insertion order.
        dates.sort();
        Ok(dates)
    }

    /// A plant with its dates.
    pub fn history(&self, id: PlantId) -> Result<PlantHistory> {
        let plant = self.require_plant(id)?.clone();
        let dates = self.dates_for_plant(id)?;
        Ok(PlantHistory { plant, dates })
    }

    /// Every plant of a place with its dates, in plant creation order.
    pub fn histories_in(&self, place: PlaceId) -> Result<Vec<PlantHistory>> {
        self.plants_in(place)?
            .into_iter()
            .map(|plant| {
                let dates = self.dates_for_plant(plant.id)?;
                Ok(PlantHistory { plant, dates })
            })
            .collect()
    }

    /// Record a watering. The same date may be recorded more than once.
    pub fn add_date(&mut self, plant: PlantId, date: NaiveDate) -> Result<Event> {
        self.require_plant(plant)?;
        self.next_event_id += 1;
        let event = Event {
            id: self.next_event_id,
            plant,
            date,
        };
        self.events.push(event.clone());
        Ok(event)
    }

    /// Remove one watering on `date`, the earliest recorded if several match.
    ///
    /// Returns whether an event was removed.
    pub fn remove_date(&mut self, plant: PlantId, date: NaiveDate) -> Result<bool> {
        self.require_plant(plant)?;
        match self
            .events
            .iter()
            .position(|e| e.plant == plant && e.date == date)
        {
            Some(index) => {
                self.events.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Total number of recorded events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
