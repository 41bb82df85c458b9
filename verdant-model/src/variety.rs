use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::ids::VarietyID;

/// A catalog variety as exposed by the `varieties_search` view: the variety
/// row joined with its subcategory and category names.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarietyRecord {
    pub id: VarietyID,
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VarietyRecord {
    /// Convenience constructor for records that only carry the catalog
    /// placement. Timestamps are set to now.
    pub fn new(
        id: VarietyID,
        name: impl Into<String>,
        category_name: impl Into<String>,
        subcategory_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            category_name: category_name.into(),
            subcategory_name: subcategory_name.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Read order used when listing varieties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarietyOrder {
    /// `ORDER BY name, id`; the deterministic order duplicate scans rely on.
    #[default]
    NameThenId,
    /// `ORDER BY name` only.
    Name,
}

/// Catalog totals grouped by category name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VarietyStats {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
}
