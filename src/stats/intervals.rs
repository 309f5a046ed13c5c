//! Gaps between consecutive waterings.
//!
//! For dates `d0 <= d1 <= ... <= dn` the gaps are `d1 - d0, ..., dn - dn-1`
//! in days. Fewer than two dates give no gaps. Gaps are `f64` so that the
//! statistics downstream never round.

use chrono::NaiveDate;

use crate::core::date::parse_dates;
use crate::error::Result;

/// Day gaps between consecutive dates, in input order.
pub fn gaps(dates: &[NaiveDate]) -> Vec<f64> {
    dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days() as f64)
        .collect()
}

/// Parse ISO dates and compute their gaps.
///
/// A malformed entry fails the whole computation; skipping it would pair the
/// wrong neighbours.
pub fn gaps_from_strs<S: AsRef<str>>(dates: &[S]) -> Result<Vec<f64>> {
    let parsed = parse_dates(dates)?;
    Ok(gaps(&parsed))
}
