use crate::config::EngineConfig;
use crate::policy::RunningTotal;
use crate::schema::{Category, CategoryId, CategoryType, Entry};
use crate::utils::is_month_key;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type EntriesByCategory = BTreeMap<CategoryId, Vec<Entry>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalValuePoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPoint {
    pub date: String,
    pub value: f64,
    pub deposits: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub name: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTimeseries {
    pub total_value_data: Vec<TotalValuePoint>,
    #[serde(rename = "sparenData")]
    pub savings_data: Vec<SavingsPoint>,
    pub category_comparison: Vec<CategoryComparison>,
}

/// Date window and type restriction for a merge. Bounds are inclusive and
/// compared as strings against the entries' month keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

impl TimeseriesFilter {
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            category_type: None,
        }
    }

    pub fn of_type(mut self, category_type: CategoryType) -> Self {
        self.category_type = Some(category_type);
        self
    }

    fn admits(&self, date: &str) -> bool {
        self.start_date.as_deref().map_or(true, |start| date >= start)
            && self.end_date.as_deref().map_or(true, |end| date <= end)
    }
}

// One category walking the date axis with a forward-only cursor
struct Track<'a> {
    category: &'a Category,
    entries: Vec<&'a Entry>,
    cursor: usize,
    running: RunningTotal,
    in_total: bool,
}

impl<'a> Track<'a> {
    fn advance_to(&mut self, date: &str) {
        while let Some(entry) = self.entries.get(self.cursor) {
            if entry.date.as_str() > date {
                break;
            }
            self.running.push(entry);
            self.cursor += 1;
        }
    }

    fn level(&self) -> f64 {
        self.running.level(self.category.category_type)
    }
}

/// Merges per-category histories onto one sorted month axis.
///
/// Savings categories contribute their as-of balance at each axis month while
/// normal categories contribute their cumulative sum, so a savings balance is
/// never counted twice. Only categories in the currency unit feed the combined
/// series; the per-category comparison covers every selected category.
pub struct TimeseriesMerger<'c> {
    config: &'c EngineConfig,
}

impl<'c> TimeseriesMerger<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    pub fn merge(
        &self,
        categories: &[Category],
        entries_by_category: &EntriesByCategory,
        filter: &TimeseriesFilter,
    ) -> DashboardTimeseries {
        let mut tracks = self.build_tracks(categories, entries_by_category, filter);

        let axis: BTreeSet<&str> = tracks
            .iter()
            .flat_map(|t| t.entries.iter().copied())
            .map(|e| e.date.as_str())
            .collect();

        let mut total_value_data = Vec::with_capacity(axis.len());
        let mut savings_data = Vec::new();

        for date in axis {
            let mut total = 0.0;
            let mut savings_value = 0.0;
            let mut savings_deposits = 0.0;

            for track in tracks.iter_mut().filter(|t| t.in_total) {
                track.advance_to(date);
                let level = track.level();
                total += level;

                if track.category.category_type.is_savings() {
                    savings_value += level;
                    savings_deposits += track.running.deposits();
                }
            }

            total_value_data.push(TotalValuePoint {
                date: date.to_string(),
                value: total,
            });

            if savings_value != 0.0 || savings_deposits != 0.0 {
                savings_data.push(SavingsPoint {
                    date: date.to_string(),
                    value: savings_value,
                    deposits: savings_deposits,
                    profit: savings_value - savings_deposits,
                });
            }
        }

        let category_comparison = tracks
            .iter()
            .map(|t| CategoryComparison {
                name: t.category.name.clone(),
                value: t
                    .category
                    .category_type
                    .total_of_sorted(t.entries.iter().copied()),
                category_type: t.category.category_type,
            })
            .collect();

        debug!(
            "Merged timeseries: {} points, {} savings points, {} categories",
            total_value_data.len(),
            savings_data.len(),
            tracks.len()
        );

        DashboardTimeseries {
            total_value_data,
            savings_data,
            category_comparison,
        }
    }

    fn build_tracks<'a>(
        &self,
        categories: &'a [Category],
        entries_by_category: &'a EntriesByCategory,
        filter: &TimeseriesFilter,
    ) -> Vec<Track<'a>> {
        categories
            .iter()
            .filter(|c| {
                filter
                    .category_type
                    .map_or(true, |wanted| c.category_type == wanted)
            })
            .map(|category| {
                let mut entries: Vec<&Entry> = entries_by_category
                    .get(&category.id)
                    .map(|list| {
                        list.iter()
                            .filter(|e| {
                                if is_month_key(&e.date) {
                                    true
                                } else {
                                    warn!(
                                        "Skipping entry {} of category {}: invalid date '{}'",
                                        e.id, category.id, e.date
                                    );
                                    false
                                }
                            })
                            .filter(|e| filter.admits(&e.date))
                            .collect()
                    })
                    .unwrap_or_default();
                entries.sort_by(|a, b| a.date.cmp(&b.date));

                Track {
                    category,
                    entries,
                    cursor: 0,
                    running: RunningTotal::new(),
                    in_total: self.config.is_currency(&category.unit),
                }
            })
            .collect()
    }
}
