//! # Datatracker Engine
//!
//! Temporal aggregation and monthly reconciliation for a category-based
//! personal tracker. Every observation ("entry") belongs to one month and one
//! category, and the engine answers what each category amounts to today and
//! how the combined picture evolved month by month.
//!
//! ## Core Concepts
//!
//! - **Normal categories**: flows such as kilometres run. The total is the sum of all entries
//!   and the charted level grows cumulatively.
//! - **Savings categories**: stocks such as a depot balance. The total is the latest entry, the
//!   charted level carries that balance forward, and deposits are tracked separately to derive profit.
//! - **Month keys**: dates are zero-padded `YYYY-MM` strings, so string order is chronological order.
//! - **Reconciliation**: an idempotent job that creates the missing entry of a month for every
//!   category flagged `auto_create`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use datatracker_engine::*;
//!
//! let mut store = MemoryStore::new();
//! let depot = store.create_category(
//!     NewCategory::new("Depot", CategoryType::Savings, "€").with_auto_create(true),
//! )?;
//! store.create_entry(NewEntry::new(depot.id, "2024-01", 100.0).with_deposit(100.0))?;
//! store.create_entry(NewEntry::new(depot.id, "2024-02", 110.0).with_deposit(0.0))?;
//!
//! let stats = Dashboard::default().stats_from_store(&store)?;
//! assert_eq!(stats.category_sums[0].profit, Some(10.0));
//!
//! let report = reconcile(&mut store, Some("2024-03"))?;
//! assert_eq!(report.created.len(), 1);
//! ```

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod monthly;
pub mod policy;
pub mod reconcile;
pub mod schema;
pub mod stats;
pub mod storage;
pub mod utils;

pub use config::EngineConfig;
pub use dashboard::{
    dashboard_stats, dashboard_timeseries, load_entries_by_category, monthly_stats,
    stats_overview, CategorySummary, Dashboard, DashboardStats,
};
pub use engine::{
    CategoryComparison, DashboardTimeseries, EntriesByCategory, SavingsPoint, TimeseriesFilter,
    TimeseriesMerger, TotalValuePoint,
};
pub use error::{Result, TrackerError};
pub use monthly::{monthly_by_year, MonthlyByYear, YearBuckets};
pub use policy::RunningTotal;
pub use reconcile::{reconcile, CreatedEntry, MonthlyReconciler, ReconcileFailure, ReconcileReport};
pub use schema::*;
pub use stats::{
    category_total, overview, profit_metrics, sparkline, total_deposits, Overview, ProfitMetrics,
    SparklinePoint,
};
pub use storage::{EntryStore, MemoryStore};
pub use utils::*;
