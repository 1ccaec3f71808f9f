//! The aggregation policy shared by every calculation in the crate.
//!
//! A NORMAL category is a flow: its level at any month is the cumulative sum of
//! all observations so far. A SAVINGS category is a stock: its level is the
//! latest observed balance. Totals, the merged timeseries and the monthly
//! reconciliation all go through [`RunningTotal`] and the methods on
//! [`CategoryType`] so the two rules cannot drift apart.

use crate::schema::{CategoryType, Entry};

/// Entries of one category folded in chronological order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningTotal {
    sum: f64,
    last: Option<f64>,
    deposits: f64,
    count: usize,
}

impl RunningTotal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: &Entry) {
        self.sum += entry.value;
        self.last = Some(entry.value);
        self.deposits += entry.deposit.unwrap_or(0.0);
        self.count += 1;
    }

    /// Level of the category after every pushed entry. Zero before the first one.
    pub fn level(&self, category_type: CategoryType) -> f64 {
        match category_type {
            CategoryType::Normal => self.sum,
            CategoryType::Savings => self.last.unwrap_or(0.0),
        }
    }

    pub fn deposits(&self) -> f64 {
        self.deposits
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl CategoryType {
    pub fn is_savings(&self) -> bool {
        matches!(self, CategoryType::Savings)
    }

    /// Total of entries already sorted by date ascending.
    pub fn total_of_sorted<'a, I>(&self, sorted: I) -> f64
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut running = RunningTotal::new();
        for entry in sorted {
            running.push(entry);
        }
        running.level(*self)
    }

    /// Deposit a newly materialized month inherits from the latest entry.
    pub fn carried_deposit(&self, latest: Option<&Entry>) -> Option<f64> {
        match self {
            CategoryType::Normal => None,
            CategoryType::Savings => latest.and_then(|e| e.deposit),
        }
    }
}
