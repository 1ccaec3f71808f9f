use crate::schema::{CategoryId, Entry};
use crate::utils::{parse_month_key, year_bounds};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearBuckets {
    pub values: [f64; 12],
    pub deposits: [f64; 12],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyByYear {
    pub category_id: CategoryId,
    pub years: BTreeMap<String, YearBuckets>,
}

/// Reshapes a category's entries into a year -> month matrix.
///
/// Values landing in the same month are added, not overwritten. Entries with an
/// unreadable month key are skipped. A year only appears if at least one entry
/// contributed to it.
pub fn monthly_by_year(
    category_id: CategoryId,
    entries: &[Entry],
    from_year: Option<i32>,
    to_year: Option<i32>,
) -> MonthlyByYear {
    let (lower, upper) = year_bounds(from_year, to_year);
    let mut years: BTreeMap<String, YearBuckets> = BTreeMap::new();

    for entry in entries {
        if lower.as_deref().is_some_and(|from| entry.date.as_str() < from)
            || upper.as_deref().is_some_and(|to| entry.date.as_str() > to)
        {
            continue;
        }

        let (year, month) = match parse_month_key(&entry.date) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "Skipping entry {} of category {}: invalid date '{}'",
                    entry.id, category_id, entry.date
                );
                continue;
            }
        };

        let slot = (month - 1) as usize;
        let buckets = years.entry(year.to_string()).or_default();
        buckets.values[slot] += entry.value;
        buckets.deposits[slot] += entry.deposit.unwrap_or(0.0);
    }

    debug!(
        "Monthly aggregation for category {}: {} years",
        category_id,
        years.len()
    );

    MonthlyByYear { category_id, years }
}
