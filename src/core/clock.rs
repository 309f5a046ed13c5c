//! "Today" under a single timezone policy.
//!
//! Stored dates carry no timezone, so the same policy must be used when
//! recording a watering and when measuring how long ago it was.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlantsError, Result};

/// Which calendar "today" belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezonePolicy {
    /// The machine's local timezone.
    #[default]
    Local,
    /// UTC.
    Utc,
}

/// Valid values for the timezone policy.
pub const VALID_TIMEZONES: &[&str] = &["local", "utc"];

impl FromStr for TimezonePolicy {
    type Err = PlantsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(PlantsError::config(format!(
                "unknown timezone policy '{}', expected one of {:?}",
                other, VALID_TIMEZONES
            ))),
        }
    }
}

impl fmt::Display for TimezonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "utc"),
        }
    }
}

/// Source of the current calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    policy: TimezonePolicy,
    fixed: Option<NaiveDate>,
}

impl Clock {
    /// A clock reading the system time under `policy`.
    pub fn new(policy: TimezonePolicy) -> Self {
        Self {
            policy,
            fixed: None,
        }
    }

    /// A clock that always reports `today`.
    pub fn fixed(today: NaiveDate) -> Self {
        Self {
            policy: TimezonePolicy::default(),
            fixed: Some(today),
        }
    }

    /// The timezone policy in effect.
    pub fn policy(&self) -> TimezonePolicy {
        self.policy
    }

    /// Today's calendar date.
    pub fn today(&self) -> NaiveDate {
        if let Some(today) = self.fixed {
            return today;
        }
        match self.policy {
            TimezonePolicy::Local => Local::now().date_naive(),
            TimezonePolicy::Utc => Utc::now().date_naive(),
        }
    }

    /// Today shifted by `offset` days (negative for the past).
    pub fn today_offset(&self, offset: i64) -> Result<NaiveDate> {
        let today = self.today();
        let shifted = if offset >= 0 {
            today.checked_add_days(Days::new(offset.unsigned_abs()))
        } else {
            today.checked_sub_days(Days::new(offset.unsigned_abs()))
        };
        shifted.ok_or_else(|| {
            PlantsError::invalid_input(format!("day offset {} is out of range", offset))
        })
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(TimezonePolicy::default())
    }
}
