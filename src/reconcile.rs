use crate::error::{Result, TrackerError};
use crate::schema::{Category, CategoryId, EntryId, NewEntry};
use crate::storage::EntryStore;
use crate::utils::{current_month, validate_month_key};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEntry {
    pub category_id: CategoryId,
    pub entry_id: EntryId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileFailure {
    pub category_id: CategoryId,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub month: String,
    pub created: Vec<CreatedEntry>,
    pub failed: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Created(EntryId),
    AlreadyPresent,
}

/// Materializes the missing month for every auto-create category.
///
/// Each category is checked and filled independently: a storage failure is
/// recorded in the report and the remaining categories are still processed.
/// Running it again for the same month creates nothing.
pub struct MonthlyReconciler<'s, S: EntryStore> {
    store: &'s mut S,
}

impl<'s, S: EntryStore> MonthlyReconciler<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    pub fn reconcile_current_month(&mut self) -> Result<ReconcileReport> {
        self.reconcile(&current_month())
    }

    pub fn reconcile(&mut self, month: &str) -> Result<ReconcileReport> {
        validate_month_key(month)?;

        let categories: Vec<Category> = self
            .store
            .list_categories()?
            .into_iter()
            .filter(|c| c.auto_create)
            .collect();

        info!(
            "Auto-creating entries for {} categories (month: {})",
            categories.len(),
            month
        );

        let mut report = ReconcileReport {
            month: month.to_string(),
            ..Default::default()
        };

        for category in &categories {
            match self.materialize(category, month) {
                Ok(Outcome::Created(entry_id)) => {
                    debug!(
                        "Created auto-entry for category {}: ID {}",
                        category.id, entry_id
                    );
                    report.created.push(CreatedEntry {
                        category_id: category.id,
                        entry_id,
                    });
                }
                Ok(Outcome::AlreadyPresent) => {
                    debug!(
                        "Entry already exists for category {} in {}, skipping",
                        category.id, month
                    );
                }
                Err(e) => {
                    error!(
                        "Failed to auto-create entry for category {} in {}: {}",
                        category.id, month, e
                    );
                    report.failed.push(ReconcileFailure {
                        category_id: category.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Auto-created {} entries ({} failed)",
            report.created.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn materialize(&mut self, category: &Category, month: &str) -> Result<Outcome> {
        if self.store.entry_exists(category.id, month)? {
            return Ok(Outcome::AlreadyPresent);
        }

        let deposit = if category.category_type.is_savings() {
            let latest = self.store.last_entry(category.id)?;
            category.category_type.carried_deposit(latest.as_ref())
        } else {
            None
        };

        let new = NewEntry {
            category_id: category.id,
            date: month.to_string(),
            value: 0.0,
            deposit,
            comment: None,
            auto_generated: true,
        };

        match self.store.create_entry(new) {
            Ok(entry) => Ok(Outcome::Created(entry.id)),
            // A concurrent writer got there first
            Err(TrackerError::DuplicateEntry { .. }) => Ok(Outcome::AlreadyPresent),
            Err(e) => Err(e),
        }
    }
}

pub fn reconcile<S: EntryStore>(store: &mut S, month: Option<&str>) -> Result<ReconcileReport> {
    let mut reconciler = MonthlyReconciler::new(store);
    match month {
        Some(month) => reconciler.reconcile(month),
        None => reconciler.reconcile_current_month(),
    }
}
