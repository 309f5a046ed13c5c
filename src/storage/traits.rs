//! Garden storage traits.
//!
//! This module defines the `GardenStore` trait: the event store that
//! supplies ordered watering dates to the statistics code, plus the CRUD
//! operations on places and plants around it.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{Place, PlaceId, Plant, PlantHistory, PlantId};
use crate::error::{PlantsError, Result};

/// Trait for garden storage backends.
///
/// Implementations must return dates in ascending order and must delete a
/// plant together with all of its events, or not at all.
pub trait GardenStore: Send + Sync {
    /// All places.
    fn places(&self) -> Result<Vec<Place>>;

    /// Retrieve a place by ID.
    ///
    /// Returns `Ok(None)` if the place doesn't exist.
    fn place(&self, id: PlaceId) -> Result<Option<Place>>;

    /// Create a place.
    fn add_place(&self, name: &str) -> Result<Place>;

    /// Plants belonging to a place.
    fn plants_in(&self, place: PlaceId) -> Result<Vec<Plant>>;

    /// Retrieve a plant by ID.
    ///
    /// Returns `Ok(None)` if the plant doesn't exist.
    fn plant(&self, id: PlantId) -> Result<Option<Plant>>;

    /// Create a plant in a place.
    fn add_plant(&self, place: PlaceId, name: &str) -> Result<Plant>;

    /// Replace a plant's name and hidden flag.
    fn update_plant(&self, id: PlantId, name: &str, hidden: bool) -> Result<Plant>;

    /// Change a plant's name, keeping its hidden flag.
    fn rename_plant(&self, id: PlantId, name: &str) -> Result<Plant>;

    /// Set a plant's hidden flag, keeping its name.
    fn set_plant_hidden(&self, id: PlantId, hidden: bool) -> Result<Plant>;

    /// Delete a plant and its events. Returns the number of events removed.
    fn delete_plant(&self, id: PlantId) -> Result<usize>;

    /// Watering dates of a plant, ascending.
    fn dates_for_plant(&self, id: PlantId) -> Result<Vec<NaiveDate>>;

    /// Record a watering.
    fn add_date(&self, plant: PlantId, date: NaiveDate) -> Result<()>;

    /// Remove at most one watering on `date`. Returns whether one was removed.
    fn remove_date(&self, plant: PlantId, date: NaiveDate) -> Result<bool>;

    /// A plant with its dates.
    ///
    /// The default reads through several calls; stores that can answer from
    /// one consistent view should override this and [`histories_in`].
    ///
    /// [`histories_in`]: GardenStore::histories_in
    fn history(&self, id: PlantId) -> Result<PlantHistory> {
        let plant = self.plant(id)?.ok_or(PlantsError::PlantNotFound { id })?;
        let dates = self.dates_for_plant(id)?;
        Ok(PlantHistory { plant, dates })
    }

    /// Every plant of a place with its dates.
    fn histories_in(&self, place: PlaceId) -> Result<Vec<PlantHistory>> {
        self.plants_in(place)?
            .into_iter()
            .map(|plant| {
                let dates = self.dates_for_plant(plant.id)?;
                Ok(PlantHistory { plant, dates })
            })
            .collect()
    }
}

/// Blanket implementation of GardenStore for Arc-wrapped stores.
impl<T: GardenStore + ?Sized> GardenStore for Arc<T> {
    fn places(&self) -> Result<Vec<Place>> {
        (**self).places()
    }

    fn place(&self, id: PlaceId) -> Result<Option<Place>> {
        (**self).place(id)
    }

    fn add_place(&self, name: &str) -> Result<Place> {
        (**self).add_place(name)
    }

    fn plants_in(&self, place: PlaceId) -> Result<Vec<Plant>> {
        (**self).plants_in(place)
    }

    fn plant(&self, id: PlantId) -> Result<Option<Plant>> {
        (**self).plant(id)
    }

    fn add_plant(&self, place: PlaceId, name: &str) -> Result<Plant> {
        (**self).add_plant(place, name)
    }

    fn update_plant(&self, id: PlantId, name: &str, hidden: bool) -> Result<Plant> {
        (**self).update_plant(id, name, hidden)
    }

    fn rename_plant(&self, id: PlantId, name: &str) -> Result<Plant> {
        (**self).rename_plant(id, name)
    }

    fn set_plant_hidden(&self, id: PlantId, hidden: bool) -> Result<Plant> {
        (**self).set_plant_hidden(id, hidden)
    }

    fn delete_plant(&self, id: PlantId) -> Result<usize> {
        (**self).delete_plant(id)
    }

    fn dates_for_plant(&self, id: PlantId) -> Result<Vec<NaiveDate>> {
        (**self).dates_for_plant(id)
    }

    fn add_date(&self, plant: PlantId, date: NaiveDate) -> Result<()> {
        (**self).add_date(plant, date)
    }

    fn remove_date(&self, plant: PlantId, date: NaiveDate) -> Result<bool> {
        (**self).remove_date(plant, date)
    }

    fn history(&self, id: PlantId) -> Result<PlantHistory> {
        (**self).history(id)
    }

    fn histories_in(&self, place: PlaceId) -> Result<Vec<PlantHistory>> {
        (**self).histories_in(place)
    }
}
