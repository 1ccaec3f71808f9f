use crate::config::EngineConfig;
use crate::error::{Result, TrackerError};
use crate::schema::{
    Category, CategoryId, CategoryUpdate, Entry, EntryId, EntryQuery, EntryUpdate, NewCategory,
    NewEntry,
};
use crate::utils::validate_month_key;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Boundary to the record store that owns categories and entries.
///
/// Implementations must reject a second entry for the same
/// `(category_id, date)` pair with [`TrackerError::DuplicateEntry`]; the
/// monthly reconciliation relies on it for exactly-once creation.
pub trait EntryStore {
    fn list_categories(&self) -> Result<Vec<Category>>;
    fn list_entries(&self, category_id: CategoryId) -> Result<Vec<Entry>>;
    fn create_entry(&mut self, entry: NewEntry) -> Result<Entry>;
    fn entry_exists(&self, category_id: CategoryId, month: &str) -> Result<bool>;

    /// Chronologically last entry of a category.
    fn last_entry(&self, category_id: CategoryId) -> Result<Option<Entry>> {
        let entries = self.list_entries(category_id)?;
        Ok(entries.into_iter().max_by(|a, b| a.date.cmp(&b.date)))
    }
}

/// In-process store with the same rules a database-backed one enforces:
/// referential integrity, cascade delete and one entry per category and month.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    config: EngineConfig,
    categories: BTreeMap<CategoryId, Category>,
    entries: BTreeMap<EntryId, Entry>,
    next_category_id: CategoryId,
    next_entry_id: EntryId,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            categories: BTreeMap::new(),
            entries: BTreeMap::new(),
            next_category_id: 1,
            next_entry_id: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn create_category(&mut self, new: NewCategory) -> Result<Category> {
        validate_name(&new.name)?;

        let id = self.next_category_id;
        self.next_category_id += 1;

        let unit = if new.category_type.is_savings() {
            self.config.currency_unit.clone()
        } else {
            new.unit
        };

        let category = Category {
            id,
            name: new.name,
            icon: new.icon,
            category_type: new.category_type,
            unit,
            auto_create: new.auto_create,
        };

        info!("Created category: {} (ID: {})", category.name, id);
        self.categories.insert(id, category.clone());
        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Category> {
        self.categories
            .get(&id)
            .cloned()
            .ok_or(TrackerError::CategoryNotFound(id))
    }

    pub fn update_category(&mut self, id: CategoryId, update: CategoryUpdate) -> Result<Category> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }

        let currency = self.config.currency_unit.clone();
        let category = self
            .categories
            .get_mut(&id)
            .ok_or(TrackerError::CategoryNotFound(id))?;

        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(icon) = update.icon {
            category.icon = Some(icon);
        }
        if let Some(category_type) = update.category_type {
            category.category_type = category_type;
        }
        if let Some(unit) = update.unit {
            category.unit = unit;
        }
        if let Some(auto_create) = update.auto_create {
            category.auto_create = auto_create;
        }
        if category.category_type.is_savings() {
            category.unit = currency;
        }

        info!("Updated category: {} (ID: {})", category.name, id);
        Ok(category.clone())
    }

    /// Deletes a category together with its entries and returns how many entries went with it.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<usize> {
        let category = self
            .categories
            .remove(&id)
            .ok_or(TrackerError::CategoryNotFound(id))?;

        let before = self.entries.len();
        self.entries.retain(|_, e| e.category_id != id);
        let removed = before - self.entries.len();

        info!(
            "Deleted category: {} (ID: {}) with {} entries",
            category.name, id, removed
        );
        Ok(removed)
    }

    /// Copies a category and all of its entries under new ids.
    pub fn duplicate_category(&mut self, id: CategoryId) -> Result<Category> {
        let original = self.get_category(id)?;
        let name = format!("{}{}", original.name, self.config.duplicate_suffix);
        let copy = self.create_category(NewCategory {
            name,
            icon: original.icon.clone(),
            category_type: original.category_type,
            unit: original.unit.clone(),
            auto_create: original.auto_create,
        })?;

        let originals: Vec<Entry> = self
            .entries
            .values()
            .filter(|e| e.category_id == id)
            .cloned()
            .collect();

        for entry in &originals {
            let entry_id = self.next_entry_id;
            self.next_entry_id += 1;
            self.entries.insert(
                entry_id,
                Entry {
                    id: entry_id,
                    category_id: copy.id,
                    ..entry.clone()
                },
            );
        }

        info!(
            "Duplicated category: {} -> {} with {} entries (ID: {})",
            original.name,
            copy.name,
            originals.len(),
            copy.id
        );
        Ok(copy)
    }

    pub fn get_entry(&self, id: EntryId) -> Result<Entry> {
        self.entries
            .get(&id)
            .cloned()
            .ok_or(TrackerError::EntryNotFound(id))
    }

    pub fn update_entry(&mut self, id: EntryId, update: EntryUpdate) -> Result<Entry> {
        let current = self.get_entry(id)?;

        let category_id = update.category_id.unwrap_or(current.category_id);
        let date = update.date.unwrap_or_else(|| current.date.clone());
        validate_month_key(&date)?;

        if !self.categories.contains_key(&category_id) {
            return Err(TrackerError::CategoryNotFound(category_id));
        }
        if (category_id != current.category_id || date != current.date)
            && self.find_entry(category_id, &date).is_some()
        {
            return Err(TrackerError::DuplicateEntry {
                category_id,
                month: date,
            });
        }

        let updated = Entry {
            id,
            category_id,
            date,
            value: update.value.unwrap_or(current.value),
            deposit: update.deposit,
            comment: update.comment.or(current.comment),
            auto_generated: update.auto_generated.unwrap_or(current.auto_generated),
        };

        info!("Updated entry: ID {}", id);
        self.entries.insert(id, updated.clone());
        Ok(updated)
    }

    pub fn delete_entry(&mut self, id: EntryId) -> Result<()> {
        if self.entries.remove(&id).is_none() {
            warn!("Cannot delete - entry not found: ID {}", id);
            return Err(TrackerError::EntryNotFound(id));
        }
        info!("Deleted entry: ID {}", id);
        Ok(())
    }

    /// Entries matching every given filter, ordered by date.
    pub fn search_entries(&self, query: &EntryQuery) -> Vec<Entry> {
        let mut found: Vec<Entry> = self
            .entries
            .values()
            .filter(|e| {
                query
                    .category_ids
                    .as_ref()
                    .map_or(true, |ids| ids.is_empty() || ids.contains(&e.category_id))
            })
            .filter(|e| query.matches_date(&e.date))
            .filter(|e| {
                query.comment_contains.as_deref().map_or(true, |needle| {
                    e.comment.as_deref().is_some_and(|c| c.contains(needle))
                })
            })
            .filter(|e| {
                query.category_type.map_or(true, |wanted| {
                    self.categories
                        .get(&e.category_id)
                        .is_some_and(|c| c.category_type == wanted)
                })
            })
            .cloned()
            .collect();

        found.sort_by(|a, b| a.date.cmp(&b.date));
        debug!("Search returned {} entries", found.len());
        found
    }

    fn find_entry(&self, category_id: CategoryId, month: &str) -> Option<&Entry> {
        self.entries
            .values()
            .find(|e| e.category_id == category_id && e.date == month)
    }
}

impl EntryStore for MemoryStore {
    fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.values().cloned().collect())
    }

    fn list_entries(&self, category_id: CategoryId) -> Result<Vec<Entry>> {
        if !self.categories.contains_key(&category_id) {
            return Err(TrackerError::CategoryNotFound(category_id));
        }
        let mut entries: Vec<Entry> = self
            .entries
            .values()
            .filter(|e| e.category_id == category_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(entries)
    }

    fn create_entry(&mut self, new: NewEntry) -> Result<Entry> {
        validate_month_key(&new.date)?;

        if !self.categories.contains_key(&new.category_id) {
            return Err(TrackerError::CategoryNotFound(new.category_id));
        }
        if self.find_entry(new.category_id, &new.date).is_some() {
            warn!(
                "Rejected duplicate entry for category {} in {}",
                new.category_id, new.date
            );
            return Err(TrackerError::DuplicateEntry {
                category_id: new.category_id,
                month: new.date,
            });
        }

        let id = self.next_entry_id;
        self.next_entry_id += 1;

        let entry = Entry {
            id,
            category_id: new.category_id,
            date: new.date,
            value: new.value,
            deposit: new.deposit,
            comment: new.comment,
            auto_generated: new.auto_generated,
        };

        info!(
            "Created entry for category {}: date={}, value={}",
            entry.category_id, entry.date, entry.value
        );
        self.entries.insert(id, entry.clone());
        Ok(entry)
    }

    fn entry_exists(&self, category_id: CategoryId, month: &str) -> Result<bool> {
        Ok(self.find_entry(category_id, month).is_some())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TrackerError::Validation(
            "category name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CategoryType;

    fn store_with_category(category_type: CategoryType) -> (MemoryStore, Category) {
        let mut store = MemoryStore::new();
        let category = store
            .create_category(NewCategory::new("Depot", category_type, "km"))
            .unwrap();
        (store, category)
    }

    #[test]
    fn test_savings_category_forces_currency_unit() {
        let (_, savings) = store_with_category(CategoryType::Savings);
        assert_eq!(savings.unit, "€");

        let (mut store, normal) = store_with_category(CategoryType::Normal);
        assert_eq!(normal.unit, "km");

        let updated = store
            .update_category(
                normal.id,
                CategoryUpdate {
                    category_type: Some(CategoryType::Savings),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.unit, "€");
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = MemoryStore::new();
        let result = store.create_category(NewCategory::new("  ", CategoryType::Normal, "km"));
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_entry_uniqueness_and_validation() {
        let (mut store, category) = store_with_category(CategoryType::Normal);

        store
            .create_entry(NewEntry::new(category.id, "2024-01", 5.0))
            .unwrap();
        assert!(store.entry_exists(category.id, "2024-01").unwrap());
        assert!(!store.entry_exists(category.id, "2024-02").unwrap());

        let duplicate = store.create_entry(NewEntry::new(category.id, "2024-01", 9.0));
        assert!(matches!(duplicate, Err(TrackerError::DuplicateEntry { .. })));

        let malformed = store.create_entry(NewEntry::new(category.id, "2024-1", 1.0));
        assert!(matches!(malformed, Err(TrackerError::InvalidMonth(_))));

        let orphan = store.create_entry(NewEntry::new(99, "2024-01", 1.0));
        assert!(matches!(orphan, Err(TrackerError::CategoryNotFound(99))));
    }

    #[test]
    fn test_list_entries_sorted() {
        let (mut store, category) = store_with_category(CategoryType::Normal);
        for month in ["2024-03", "2024-01", "2024-02"] {
            store
                .create_entry(NewEntry::new(category.id, month, 1.0))
                .unwrap();
        }
        let dates: Vec<String> = store
            .list_entries(category.id)
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(
            store.last_entry(category.id).unwrap().unwrap().date,
            "2024-03"
        );
    }

    #[test]
    fn test_delete_category_cascades() {
        let (mut store, category) = store_with_category(CategoryType::Normal);
        store
            .create_entry(NewEntry::new(category.id, "2024-01", 1.0))
            .unwrap();
        store
            .create_entry(NewEntry::new(category.id, "2024-02", 1.0))
            .unwrap();

        assert_eq!(store.delete_category(category.id).unwrap(), 2);
        assert!(store.search_entries(&EntryQuery::default()).is_empty());
        assert!(matches!(
            store.delete_category(category.id),
            Err(TrackerError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_category_is_deep_copy() {
        let (mut store, category) = store_with_category(CategoryType::Savings);
        store
            .create_entry(
                NewEntry::new(category.id, "2024-01", 100.0)
                    .with_deposit(100.0)
                    .with_comment("start"),
            )
            .unwrap();

        let copy = store.duplicate_category(category.id).unwrap();
        assert_ne!(copy.id, category.id);
        assert_eq!(copy.name, "Depot (Kopie)");
        assert_eq!(copy.category_type, CategoryType::Savings);

        let copied = store.list_entries(copy.id).unwrap();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].deposit, Some(100.0));
        assert_eq!(copied[0].comment.as_deref(), Some("start"));

        // No live link: deleting the source leaves the copy intact
        store.delete_category(category.id).unwrap();
        assert_eq!(store.list_entries(copy.id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_entry() {
        let (mut store, category) = store_with_category(CategoryType::Savings);
        let jan = store
            .create_entry(NewEntry::new(category.id, "2024-01", 100.0).with_deposit(50.0))
            .unwrap();
        store
            .create_entry(NewEntry::new(category.id, "2024-02", 110.0))
            .unwrap();

        let updated = store
            .update_entry(
                jan.id,
                EntryUpdate {
                    value: Some(105.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.value, 105.0);
        assert_eq!(updated.deposit, None);
        assert_eq!(updated.date, "2024-01");

        let clash = store.update_entry(
            jan.id,
            EntryUpdate {
                date: Some("2024-02".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(clash, Err(TrackerError::DuplicateEntry { .. })));

        store.delete_entry(jan.id).unwrap();
        assert!(matches!(
            store.get_entry(jan.id),
            Err(TrackerError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_search_entries() {
        let mut store = MemoryStore::new();
        let run = store
            .create_category(NewCategory::new("Run", CategoryType::Normal, "km"))
            .unwrap();
        let depot = store
            .create_category(NewCategory::new("Depot", CategoryType::Savings, "€"))
            .unwrap();

        store
            .create_entry(NewEntry::new(run.id, "2024-01", 5.0).with_comment("park loop"))
            .unwrap();
        store
            .create_entry(NewEntry::new(run.id, "2024-03", 8.0))
            .unwrap();
        store
            .create_entry(NewEntry::new(depot.id, "2024-02", 100.0))
            .unwrap();

        let by_type = store.search_entries(&EntryQuery {
            category_type: Some(CategoryType::Savings),
            ..Default::default()
        });
        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type[0].category_id, depot.id);

        let by_comment = store.search_entries(&EntryQuery {
            comment_contains: Some("park".to_string()),
            ..Default::default()
        });
        assert_eq!(by_comment.len(), 1);

        let ranged = store.search_entries(&EntryQuery {
            category_ids: Some(vec![run.id, depot.id]),
            from_date: Some("2024-02".to_string()),
            ..Default::default()
        });
        let dates: Vec<&str> = ranged.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02", "2024-03"]);
    }
}
