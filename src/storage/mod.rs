//! Garden storage.
//!
//! This module provides persistent storage for places, plants, and watering
//! events, supporting file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::{FileGardenStore, GARDEN_FILE};
pub use memory::MemoryGardenStore;
pub use traits::GardenStore;
