//! Core types for the plants tracker.
//!
//! This module holds the garden document (places, plants, watering events),
//! calendar date handling, and the clock that decides what "today" is.

pub mod clock;
pub mod date;
pub mod garden;

pub use clock::{Clock, TimezonePolicy, VALID_TIMEZONES};
pub use date::{format_date, parse_date, parse_dates, DATE_FORMAT};
pub use garden::{
    Event, EventId, Garden, Place, PlaceId, Plant, PlantHistory, PlantId, GARDEN_SCHEMA_VERSION,
};
