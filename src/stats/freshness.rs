//! Days since last watering, and ranking plants by it.
//!
//! Ranking is descending: the plant that has gone longest without water
//! comes first, and plants that were never watered come before all others.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::date::format_date;
use crate::core::PlantHistory;

/// Days since a plant was last watered.
///
/// Variant order matters: the derived `Ord` puts `Never` after every `Days`
/// value, so "never watered" compares as the most overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum Freshness {
    /// Whole days from the last watering to today. Negative when the last
    /// recorded date lies in the future.
    Days(i64),
    /// No watering recorded.
    Never,
}

impl Freshness {
    /// The day count, if the plant was ever watered.
    pub fn days(&self) -> Option<i64> {
        match self {
            Freshness::Days(n) => Some(*n),
            Freshness::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Freshness::Never)
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Freshness::Days(n) => write!(f, "{}", n),
            Freshness::Never => write!(f, "Never"),
        }
    }
}

/// Freshness of a watering history as of `today`.
pub fn freshness(dates: &[NaiveDate], today: NaiveDate) -> Freshness {
    match dates.iter().max() {
        Some(last) => Freshness::Days((today - *last).num_days()),
        None => Freshness::Never,
    }
}

/// Whether the most recent watering is `today`.
pub fn watered_today(dates: &[NaiveDate], today: NaiveDate) -> bool {
    dates.iter().max() == Some(&today)
}

/// A plant with its computed freshness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlant {
    #[serde(flatten)]
    pub history: PlantHistory,
    pub freshness: Freshness,
    pub watered_today: bool,
}

impl RankedPlant {
    /// Compute freshness for one plant.
    pub fn new(history: PlantHistory, today: NaiveDate) -> Self {
        let freshness = freshness(&history.dates, today);
        let watered_today = watered_today(&history.dates, today);
        Self {
            history,
            freshness,
            watered_today,
        }
    }

    /// Main display text: the day count or `Never`.
    pub fn text(&self) -> String {
        self.freshness.to_string()
    }

    /// Secondary display text: the last watering date in parentheses, or
    /// empty when never watered.
    pub fn text_alt(&self) -> String {
        match self.history.last_watered() {
            Some(date) => format!("({})", format_date(date)),
            None => String::new(),
        }
    }
}

/// Rank plants most-overdue first.
///
/// The sort is stable, so plants with equal freshness keep their input
/// order.
pub fn rank(histories: Vec<PlantHistory>, today: NaiveDate) -> Vec<RankedPlant> {
    let mut ranked: Vec<RankedPlant> = histories
        .into_iter()
        .map(|h| RankedPlant::new(h, today))
        .collect();
    ranked.sort_by(|a, b| b.freshness.cmp(&a.freshness));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Plant;

    fn d(s: &str) -> NaiveDate {
        crate::core::date::parse_date(s).unwrap()
    }

    fn history(id: u64, dates: &[&str]) -> PlantHistory {
        PlantHistory {
            plant: Plant {
                id,
                place: 1,
                name: format!("plant-{}", id),
                hidden: false,
            },
            dates: dates.iter().map(|s| d(s)).collect(),
        }
    }

    #[test]
    fn test_freshness_example() {
        assert_eq!(
            freshness(&[d("2023-01-01")], d("2023-01-10")),
            Freshness::Days(9)
        );
    }

    #[test]
    fn test_freshness_never() {
        assert_eq!(freshness(&[], d("2023-01-10")), Freshness::Never);
        assert!(!watered_today(&[], d("2023-01-10")));
    }

    #[test]
    fn test_freshness_uses_most_recent_date() {
        let dates = [d("2023-01-01"), d("2023-01-08")];
        assert_eq!(freshness(&dates, d("2023-01-10")), Freshness::Days(2));
    }

    #[test]
    fn test_future_date_is_negative_not_clamped() {
        assert_eq!(
            freshness(&[d("2023-01-12")], d("2023-01-10")),
            Freshness::Days(-2)
        );
    }

    #[test]
    fn test_never_sorts_above_everything() {
        assert!(Freshness::Never > Freshness::Days(i64::MAX));
        assert!(Freshness::Days(10) > Freshness::Days(-3));
    }

    #[test]
    fn test_watered_today() {
        let today = d("2023-01-10");
        assert!(watered_today(&[d("2023-01-01"), today], today));
        assert!(!watered_today(&[d("2023-01-09")], today));
    }

    #[test]
    fn test_rank_descending_with_never_first() {
        let today = d("2023-01-10");
        let ranked = rank(
            vec![
                history(1, &["2023-01-09"]),
                history(2, &["2023-01-01"]),
                history(3, &[]),
                history(4, &["2023-01-12"]),
                history(5, &["2023-01-05"]),
            ],
            today,
        );
        let order: Vec<u64> = ranked.iter().map(|r| r.history.plant.id).collect();
        assert_eq!(order, vec![3, 2, 5, 1, 4]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let today = d("2023-01-10");
        let ranked = rank(
            vec![
                history(1, &["2023-01-05"]),
                history(2, &[]),
                history(3, &["2023-01-05"]),
                history(4, &[]),
            ],
            today,
        );
        let order: Vec<u64> = ranked.iter().map(|r| r.history.plant.id).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_display_texts() {
        let today = d("2023-01-10");
        let watered = RankedPlant::new(history(1, &["2023-01-07"]), today);
        assert_eq!(watered.text(), "3");
        assert_eq!(watered.text_alt(), "(2023-01-07)");

        let never = RankedPlant::new(history(2, &[]), today);
        assert_eq!(never.text(), "Never");
        assert_eq!(never.text_alt(), "");
        assert!(!never.watered_today);
    }

    #[test]
    fn test_freshness_json() {
        assert_eq!(
            serde_json::to_value(Freshness::Days(4)).unwrap(),
            serde_json::json!({"status": "days", "days": 4})
        );
        assert_eq!(
            serde_json::to_value(Freshness::Never).unwrap(),
            serde_json::json!({"status": "never"})
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Property: a never-watered plant outranks any watered plant
            #[test]
            fn prop_never_outranks_finite(days in any::<i64>()) {
                prop_assert!(Freshness::Never > Freshness::Days(days));
            }

            // Property: ranking output is sorted descending and keeps every plant
            #[test]
            fn prop_rank_sorted(offsets in prop::collection::vec(prop::option::of(-30i64..400), 0..30)) {
                let today = d("2023-06-01");
                let histories: Vec<PlantHistory> = offsets
                    .iter()
                    .enumerate()
                    .map(|(i, o)| {
                        let dates = match o {
                            Some(days) => vec![today - chrono::Duration::days(*days)],
                            None => Vec::new(),
                        };
                        PlantHistory {
                            plant: Plant { id: i as u64, place: 1, name: String::new(), hidden: false },
                            dates,
                        }
                    })
                    .collect();
                let ranked = rank(histories, today);
                prop_assert_eq!(ranked.len(), offsets.len());
                prop_assert!(ranked.windows(2).all(|w| w[0].freshness >= w[1].freshness));
            }
        }
    }
}
