use crate::config::EngineConfig;
use crate::engine::{DashboardTimeseries, EntriesByCategory, TimeseriesFilter, TimeseriesMerger};
use crate::error::Result;
use crate::monthly::{monthly_by_year, MonthlyByYear};
use crate::schema::{Category, CategoryId, CategoryType, EntryQuery};
use crate::stats::{
    category_total, overview, profit_metrics, sparkline, total_deposits, Overview, SparklinePoint,
};
use crate::storage::EntryStore;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub unit: String,
    pub total_value: f64,
    pub total_deposits: f64,
    pub entry_count: usize,
    pub sparkline_data: Vec<SparklinePoint>,
    pub profit: Option<f64>,
    pub profit_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_categories: usize,
    pub category_sums: Vec<CategorySummary>,
}

/// Fetches every category and its entries from the store in one pass.
pub fn load_entries_by_category<S: EntryStore>(
    store: &S,
) -> Result<(Vec<Category>, EntriesByCategory)> {
    let categories = store.list_categories()?;
    let mut entries = EntriesByCategory::new();
    for category in &categories {
        entries.insert(category.id, store.list_entries(category.id)?);
    }
    Ok((categories, entries))
}

/// Read side of the tracker: per-category summaries and the merged charts.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    config: EngineConfig,
}

impl Dashboard {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(
        &self,
        categories: &[Category],
        entries_by_category: &EntriesByCategory,
    ) -> DashboardStats {
        info!("Generating dashboard statistics");

        let category_sums: Vec<CategorySummary> = categories
            .iter()
            .map(|category| {
                let entries = entries_by_category
                    .get(&category.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                let total_value = category_total(category, entries);
                let deposits = total_deposits(entries);
                let metrics = profit_metrics(total_value, deposits);

                CategorySummary {
                    id: category.id,
                    name: category.name.clone(),
                    category_type: category.category_type,
                    unit: category.unit.clone(),
                    total_value,
                    total_deposits: deposits,
                    entry_count: entries.len(),
                    sparkline_data: sparkline(entries, self.config.sparkline_limit),
                    profit: metrics.profit,
                    profit_percentage: metrics.profit_percentage,
                }
            })
            .collect();

        info!("Generated statistics for {} categories", categories.len());

        DashboardStats {
            total_categories: categories.len(),
            category_sums,
        }
    }

    pub fn timeseries(
        &self,
        categories: &[Category],
        entries_by_category: &EntriesByCategory,
        filter: &TimeseriesFilter,
    ) -> DashboardTimeseries {
        info!(
            "Generating timeseries data: start={:?}, end={:?}, type={:?}",
            filter.start_date, filter.end_date, filter.category_type
        );

        let result = TimeseriesMerger::new(&self.config).merge(categories, entries_by_category, filter);

        info!(
            "Generated timeseries with {} data points and {} categories",
            result.total_value_data.len(),
            result.category_comparison.len()
        );
        result
    }

    pub fn stats_from_store<S: EntryStore>(&self, store: &S) -> Result<DashboardStats> {
        let (categories, entries) = load_entries_by_category(store)?;
        Ok(self.stats(&categories, &entries))
    }

    pub fn timeseries_from_store<S: EntryStore>(
        &self,
        store: &S,
        filter: &TimeseriesFilter,
    ) -> Result<DashboardTimeseries> {
        let (categories, entries) = load_entries_by_category(store)?;
        Ok(self.timeseries(&categories, &entries, filter))
    }
}

pub fn dashboard_stats(
    categories: &[Category],
    entries_by_category: &EntriesByCategory,
) -> DashboardStats {
    Dashboard::default().stats(categories, entries_by_category)
}

pub fn dashboard_timeseries(
    categories: &[Category],
    entries_by_category: &EntriesByCategory,
    start_date: Option<&str>,
    end_date: Option<&str>,
    category_type: Option<CategoryType>,
) -> DashboardTimeseries {
    let filter = TimeseriesFilter {
        start_date: start_date.map(str::to_string),
        end_date: end_date.map(str::to_string),
        category_type,
    };
    Dashboard::default().timeseries(categories, entries_by_category, &filter)
}

/// Overview aggregate over the entries selected by category ids and date range.
pub fn stats_overview<S: EntryStore>(store: &S, query: &EntryQuery) -> Result<Overview> {
    info!(
        "Generating overview stats: categories={:?}, from={:?}, to={:?}",
        query.category_ids, query.from_date, query.to_date
    );

    let mut selected = Vec::new();
    for category in store.list_categories()? {
        let wanted = query
            .category_ids
            .as_ref()
            .map_or(true, |ids| ids.is_empty() || ids.contains(&category.id));
        if !wanted {
            continue;
        }
        selected.extend(
            store
                .list_entries(category.id)?
                .into_iter()
                .filter(|e| query.matches_date(&e.date)),
        );
    }
    let stats = overview(&selected);

    info!("Overview stats: {} entries, sum={}", stats.count, stats.sum);
    Ok(stats)
}

pub fn monthly_stats<S: EntryStore>(
    store: &S,
    category_id: CategoryId,
    from_year: Option<i32>,
    to_year: Option<i32>,
) -> Result<MonthlyByYear> {
    info!(
        "Generating monthly stats: category={}, from={:?}, to={:?}",
        category_id, from_year, to_year
    );
    let entries = store.list_entries(category_id)?;
    let data = monthly_by_year(category_id, &entries, from_year, to_year);
    info!("Monthly stats generated for {} years", data.years.len());
    Ok(data)
}
