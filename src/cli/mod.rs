//! CLI commands for plants.
//!
//! Each command owns a store handle, produces a serializable output, and
//! formats it as JSON or human-readable text:
//! - **places**: ranked overview of every place, and place creation
//! - **plant**: add, rename, hide, show, and delete plants
//! - **water**: record, remove, and list watering dates
//! - **stats**: watering report of one plant

pub mod places;
pub mod plant;
pub mod stats;
pub mod water;

pub use places::{PlaceOverview, PlacesCommand, PlacesOptions, PlacesOutput, PlantRow};
pub use plant::{PlantAction, PlantCommand, PlantOptions, PlantOutput};
pub use stats::{StatsCommand, StatsOptions, StatsOutput};
pub use water::{WaterAction, WaterCommand, WaterOptions, WaterOutput};
