//! In-memory garden storage.
//!
//! Thread-safe implementation of the GardenStore trait, used by tests and
//! when embedding the library without persistence.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::core::{Garden, Place, PlaceId, Plant, PlantHistory, PlantId};
use crate::error::{PlantsError, Result};
use crate::storage::GardenStore;

/// In-memory garden store.
///
/// The garden is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryGardenStore {
    garden: RwLock<Garden>,
}

impl MemoryGardenStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing garden.
    pub fn with_garden(garden: Garden) -> Self {
        Self {
            garden: RwLock::new(garden),
        }
    }

    /// A copy of the current garden.
    pub fn snapshot(&self) -> Garden {
        self.read().clone()
    }

    // A panic while holding the lock cannot leave the garden half-updated:
    // every mutation is a single call on `Garden`.
    fn read(&self) -> RwLockReadGuard<'_, Garden> {
        self.garden.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Garden> {
        self.garden.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GardenStore for MemoryGardenStore {
    fn places(&self) -> Result<Vec<Place>> {
        Ok(self.read().places().to_vec())
    }

    fn place(&self, id: PlaceId) -> Result<Option<Place>> {
        Ok(self.read().place(id).cloned())
    }

    fn add_place(&self, name: &str) -> Result<Place> {
        self.write().add_place(name)
    }

    fn plants_in(&self, place: PlaceId) -> Result<Vec<Plant>> {
        self.read().plants_in(place)
    }

    fn plant(&self, id: PlantId) -> Result<Option<Plant>> {
        Ok(self.read().plant(id).cloned())
    }

    fn add_plant(&self, place: PlaceId, name: &str) -> Result<Plant> {
        self.write().add_plant(place, name)
    }

    fn update_plant(&self, id: PlantId, name: &str, hidden: bool) -> Result<Plant> {
        self.write().update_plant(id, name, hidden)
    }

    fn rename_plant(&self, id: PlantId, name: &str) -> Result<Plant> {
        self.write().rename_plant(id, name)
    }

    fn set_plant_hidden(&self, id: PlantId, hidden: bool) -> Result<Plant> {
        self.write().set_plant_hidden(id, hidden)
    }

    fn delete_plant(&self, id: PlantId) -> Result<usize> {
        self.write().delete_plant(id)
    }

    fn dates_for_plant(&self, id: PlantId) -> Result<Vec<NaiveDate>> {
        self.read().dates_for_plant(id)
    }

    fn add_date(&self, plant: PlantId, date: NaiveDate) -> Result<()> {
        self.write().add_date(plant, date).map(|_| ())
    }

    fn remove_date(&self, plant: PlantId, date: NaiveDate) -> Result<bool> {
        self.write().remove_date(plant, date)
    }

    fn history(&self, id: PlantId) -> Result<PlantHistory> {
        self.read().history(id)
    }

    fn histories_in(&self, place: PlaceId) -> Result<Vec<PlantHistory>> {
        self.read().histories_in(place)
    }
}

impl From<Garden> for MemoryGardenStore {
    fn from(garden: Garden) -> Self {
        Self::with_garden(garden)
    }
}

impl TryFrom<&str> for MemoryGardenStore {
    type Error = PlantsError;

    /// Load a store from a garden JSON document.
    fn try_from(json: &str) -> Result<Self> {
        let garden: Garden = serde_json::from_str(json)?;
        Ok(Self::with_garden(garden))
    }
}
