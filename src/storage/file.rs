//! File-based garden storage.
//!
//! The garden is one JSON document (`garden.json`) in the data directory.
//! Every mutation loads the document, applies the change, and writes it back
//! atomically via a unique temp file + rename, so a failed change (an unknown
//! plant, a crash mid-write) never leaves a partially updated garden on disk.
//!
//! An advisory lock on `.garden.json.lock` covers each whole cycle: shared
//! for reads, exclusive for load-modify-save. Handles in other threads and
//! other processes therefore never interleave their changes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::config::{data_dir, Config};
use crate::core::{Garden, Place, PlaceId, Plant, PlantHistory, PlantId, GARDEN_SCHEMA_VERSION};
use crate::error::{PlantsError, Result};
use crate::storage::GardenStore;

/// File name of the garden document.
pub const GARDEN_FILE: &str = "garden.json";

/// File name of the lock guarding the garden document.
pub const LOCK_FILE: &str = ".garden.json.lock";

/// File-based garden storage.
#[derive(Debug)]
pub struct FileGardenStore {
    /// Directory holding the document and its lock.
    dir: PathBuf,
    /// Path of the garden document.
    path: PathBuf,
}

impl FileGardenStore {
    /// Create a store in the default data directory.
    ///
    /// Uses `~/.plants/` or `$PLANTS_HOME/`.
    pub fn new() -> Result<Self> {
        let dir = data_dir().ok_or_else(|| {
            PlantsError::config("Could not determine data directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a store in the directory named by the configuration, falling
    /// back to the default data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.storage.data_dir {
            Some(dir) => Self::with_dir(dir),
            None => Self::new(),
        }
    }

    /// Create a store in a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| PlantsError::storage(&dir, e))?;
        }

        Ok(Self {
            path: dir.join(GARDEN_FILE),
            dir,
        })
    }

    /// Path of the garden document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    /// Open the lock file. The lock is released when the handle is dropped.
    fn open_lock(&self) -> Result<File> {
        let path = self.lock_path();
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| PlantsError::storage(&path, e))
    }

    fn lock_shared(&self) -> Result<File> {
        let lock = self.open_lock()?;
        lock.lock_shared()
            .map_err(|e| PlantsError::storage(self.lock_path(), e))?;
        Ok(lock)
    }

    fn lock_exclusive(&self) -> Result<File> {
        let lock = self.open_lock()?;
        lock.lock()
            .map_err(|e| PlantsError::storage(self.lock_path(), e))?;
        Ok(lock)
    }

    /// Read the garden, or an empty one if nothing was saved yet.
    pub fn load(&self) -> Result<Garden> {
        let _lock = self.lock_shared()?;
        self.read_document()
    }

    /// Read the document without locking. Callers hold the lock.
    fn read_document(&self) -> Result<Garden> {
        if !self.path.exists() {
            return Ok(Garden::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| PlantsError::storage(&self.path, e))?;
        let garden: Garden = serde_json::from_str(&content)?;

        if garden.version > GARDEN_SCHEMA_VERSION {
            return Err(PlantsError::serde(format!(
                "{} has schema version {}, newest supported is {}",
                self.path.display(),
                garden.version,
                GARDEN_SCHEMA_VERSION
            )));
        }

        Ok(garden)
    }

    /// Write the garden atomically using a fresh temp file + rename.
    ///
    /// The temp file lives in the same directory so the rename never crosses
    /// filesystems. It is removed if anything fails before the rename.
    fn atomic_write(&self, garden: &Garden) -> Result<()> {
        let json = serde_json::to_string_pretty(garden)?;

        let mut temp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| PlantsError::storage(&self.dir, e))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| PlantsError::storage(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| PlantsError::storage(temp.path(), e))?;

        temp.persist(&self.path)
            .map_err(|e| PlantsError::storage(&self.path, e.error))?;

        Ok(())
    }

    /// Apply a change and persist it. Nothing is written if the change fails.
    fn mutate<T>(&self, change: impl FnOnce(&mut Garden) -> Result<T>) -> Result<T> {
        let _lock = self.lock_exclusive()?;
        let mut garden = self.read_document()?;
        let value = change(&mut garden)?;
        self.atomic_write(&garden)?;
        Ok(value)
    }
}

impl GardenStore for FileGardenStore {
    fn places(&self) -> Result<Vec<Place>> {
        Ok(self.load()?.places().to_vec())
    }

    fn place(&self, id: PlaceId) -> Result<Option<Place>> {
        Ok(self.load()?.place(id).cloned())
    }

    fn add_place(&self, name: &str) -> Result<Place> {
        let place = self.mutate(|g| g.add_place(name))?;
        tracing::debug!(place_id = place.id, name = %place.name, "added place");
        Ok(place)
    }

    fn plants_in(&self, place: PlaceId) -> Result<Vec<Plant>> {
        self.load()?.plants_in(place)
    }

    fn plant(&self, id: PlantId) -> Result<Option<Plant>> {
        Ok(self.load()?.plant(id).cloned())
    }

    fn add_plant(&self, place: PlaceId, name: &str) -> Result<Plant> {
        let plant = self.mutate(|g| g.add_plant(place, name))?;
        tracing::debug!(plant_id = plant.id, place_id = place, "added plant");
        Ok(plant)
    }

    fn update_plant(&self, id: PlantId, name: &str, hidden: bool) -> Result<Plant> {
        let plant = self.mutate(|g| g.update_plant(id, name, hidden))?;
        tracing::debug!(plant_id = id, hidden, "updated plant");
        Ok(plant)
    }

    fn rename_plant(&self, id: PlantId, name: &str) -> Result<Plant> {
        let plant = self.mutate(|g| g.rename_plant(id, name))?;
        tracing::debug!(plant_id = id, name = %plant.name, "renamed plant");
        Ok(plant)
    }

    fn set_plant_hidden(&self, id: PlantId, hidden: bool) -> Result<Plant> {
        let plant = self.mutate(|g| g.set_plant_hidden(id, hidden))?;
        tracing::debug!(plant_id = id, hidden, "changed plant visibility");
        Ok(plant)
    }

    fn delete_plant(&self, id: PlantId) -> Result<usize> {
        let removed = self.mutate(|g| g.delete_plant(id))?;
        tracing::debug!(plant_id = id, events_removed = removed, "deleted plant");
        Ok(removed)
    }

    fn dates_for_plant(&self, id: PlantId) -> Result<Vec<NaiveDate>> {
        self.load()?.dates_for_plant(id)
    }

    fn add_date(&self, plant: PlantId, date: NaiveDate) -> Result<()> {
        self.mutate(|g| g.add_date(plant, date))?;
        tracing::debug!(plant_id = plant, %date, "recorded watering");
        Ok(())
    }

    fn remove_date(&self, plant: PlantId, date: NaiveDate) -> Result<bool> {
        let removed = self.mutate(|g| g.remove_date(plant, date))?;
        if removed {
            tracing::debug!(plant_id = plant, %date, "removed watering");
        } else {
            tracing::debug!(plant_id = plant, %date, "no watering on that date");
        }
        Ok(removed)
    }

    fn history(&self, id: PlantId) -> Result<PlantHistory> {
        self.load()?.history(id)
    }

    fn histories_in(&self, place: PlaceId) -> Result<Vec<PlantHistory>> {
        self.load()?.histories_in(place)
    }
}
