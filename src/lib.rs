//! Plants - watering tracker
//!
//! Plants keeps a garden of places, plants, and watering dates. It ranks
//! plants by how long ago they were last watered and summarizes the gaps
//! between waterings.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod stats;
pub mod storage;

pub use config::Config;
pub use core::{
    format_date, parse_date, Clock, Event, Garden, Place, PlaceId, Plant, PlantHistory, PlantId,
    TimezonePolicy,
};
pub use error::{PlantsError, Result};
pub use stats::{freshness, gaps, rank, Freshness, RankedPlant, Report, Statistic};
pub use storage::{FileGardenStore, GardenStore, MemoryGardenStore};

// CLI commands
pub use cli::{PlacesCommand, PlantCommand, StatsCommand, WaterCommand};
