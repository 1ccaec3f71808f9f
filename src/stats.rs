use crate::schema::{Category, Entry};
use crate::utils::percentage_change;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparklinePoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitMetrics {
    pub profit: Option<f64>,
    pub profit_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub count: usize,
    pub sum: f64,
    pub avg: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub total_deposit: f64,
}

/// Entries ordered by month key. The sort is stable, so same-month entries keep
/// their storage order.
pub fn sorted_by_date(entries: &[Entry]) -> Vec<&Entry> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    sorted
}

/// Current aggregate of a category: the latest balance for savings, the sum otherwise.
pub fn category_total(category: &Category, entries: &[Entry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    category
        .category_type
        .total_of_sorted(sorted_by_date(entries))
}

pub fn total_deposits(entries: &[Entry]) -> f64 {
    entries.iter().filter_map(|e| e.deposit).sum()
}

pub fn sparkline(entries: &[Entry], limit: usize) -> Vec<SparklinePoint> {
    let sorted = sorted_by_date(entries);
    let skip = sorted.len().saturating_sub(limit);
    sorted
        .into_iter()
        .skip(skip)
        .map(|e| SparklinePoint {
            date: e.date.clone(),
            value: e.value,
        })
        .collect()
}

pub fn profit_metrics(total_value: f64, total_deposits: f64) -> ProfitMetrics {
    if total_deposits == 0.0 {
        return ProfitMetrics::default();
    }
    ProfitMetrics {
        profit: Some(total_value - total_deposits),
        profit_percentage: percentage_change(total_value, total_deposits, 2),
    }
}

pub fn overview<'a, I>(entries: I) -> Overview
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut total_deposit = 0.0;

    for entry in entries {
        count += 1;
        sum += entry.value;
        min = Some(min.map_or(entry.value, |m| m.min(entry.value)));
        max = Some(max.map_or(entry.value, |m| m.max(entry.value)));
        total_deposit += entry.deposit.unwrap_or(0.0);
    }

    let avg = if count == 0 { 0.0 } else { sum / count as f64 };

    Overview {
        count,
        sum,
        avg,
        min,
        max,
        total_deposit,
    }
}
