use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CategoryId = i64;
pub type EntryId = i64;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    #[default]
    #[schemars(
        description = "Additive tracking (e.g. kilometres run, litres of water). The total is the sum of all observations."
    )]
    Normal,

    #[serde(rename = "sparen", alias = "savings")]
    #[schemars(
        description = "Running balance (e.g. a savings account). The total is the latest observation; deposits track contributions separately."
    )]
    Savings,
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryType::Normal => write!(f, "normal"),
            CategoryType::Savings => write!(f, "sparen"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Category {
    pub id: CategoryId,

    #[schemars(description = "Display name, never empty")]
    pub name: String,

    #[schemars(description = "Optional icon identifier for the UI")]
    #[serde(default)]
    pub icon: Option<String>,

    #[serde(rename = "type", default)]
    #[schemars(description = "Aggregation policy of this category")]
    pub category_type: CategoryType,

    #[schemars(
        description = "Free-text unit label. The currency marker qualifies the category for the combined total."
    )]
    pub unit: String,

    #[serde(default)]
    #[schemars(description = "Create a zero entry automatically every month")]
    pub auto_create: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Entry {
    pub id: EntryId,
    pub category_id: CategoryId,

    #[schemars(description = "Month in YYYY-MM format")]
    pub date: String,

    #[serde(default)]
    pub value: f64,

    #[serde(default)]
    #[schemars(description = "Amount contributed in this month (savings categories only)")]
    pub deposit: Option<f64>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    #[schemars(description = "True when created by the monthly reconciliation")]
    pub auto_generated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct NewCategory {
    pub name: String,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(rename = "type", default)]
    pub category_type: CategoryType,

    pub unit: String,

    #[serde(default)]
    pub auto_create: bool,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, category_type: CategoryType, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            category_type,
            unit: unit.into(),
            auto_create: false,
        }
    }

    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "type", default)]
    pub category_type: Option<CategoryType>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub auto_create: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct NewEntry {
    pub category_id: CategoryId,

    #[schemars(description = "Month in YYYY-MM format")]
    pub date: String,

    #[serde(default)]
    pub value: f64,

    #[serde(default)]
    pub deposit: Option<f64>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub auto_generated: bool,
}

impl NewEntry {
    pub fn new(category_id: CategoryId, date: impl Into<String>, value: f64) -> Self {
        Self {
            category_id,
            date: date.into(),
            value,
            deposit: None,
            comment: None,
            auto_generated: false,
        }
    }

    pub fn with_deposit(mut self, deposit: f64) -> Self {
        self.deposit = Some(deposit);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Partial entry update. `deposit` is always written, so `None` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct EntryUpdate {
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub deposit: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub auto_generated: Option<bool>,
}

/// Filters for entry searches and the overview aggregate. Date bounds are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct EntryQuery {
    #[serde(default)]
    pub category_ids: Option<Vec<CategoryId>>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub comment_contains: Option<String>,
    #[serde(rename = "type", default)]
    pub category_type: Option<CategoryType>,
}

impl EntryQuery {
    pub fn matches_date(&self, date: &str) -> bool {
        self.from_date.as_deref().map_or(true, |from| date >= from)
            && self.to_date.as_deref().map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrackerModel {
    pub categories: Vec<Category>,
    pub entries: Vec<Entry>,
}

impl TrackerModel {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(TrackerModel)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
