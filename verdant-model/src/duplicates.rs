//! Duplicate consolidation plan types.
//!
//! These are derived values: they are computed by a scan, handed to the
//! caller, and sent back on confirmation. Nothing here is persisted.

use crate::ids::VarietyID;

/// Records sharing one equivalence key, in the order they were read.
///
/// `keep_id` is always `ids[0]` and `delete_ids` is `ids[1..]`; a group is
/// only ever built with at least two members.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DuplicateGroup {
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub count: usize,
    pub ids: Vec<VarietyID>,
    pub keep_id: VarietyID,
    pub delete_ids: Vec<VarietyID>,
    /// Content hash of the key and ordered member ids captured at scan time.
    pub fingerprint: String,
}

impl DuplicateGroup {
    /// Human readable `name|category|subcategory` label.
    pub fn label(&self) -> String {
        format!(
            "{}|{}|{}",
            self.name, self.category_name, self.subcategory_name
        )
    }
}

/// Every duplicate group found by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsolidationPlan {
    pub groups: Vec<DuplicateGroup>,
}

impl ConsolidationPlan {
    pub fn new(groups: Vec<DuplicateGroup>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Sum of group sizes, kept records included.
    pub fn affected_records(&self) -> usize {
        self.groups.iter().map(|group| group.ids.len()).sum()
    }
}

/// Result of a read-only duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScanReport {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub plan: ConsolidationPlan,
    pub affected_records: usize,
    pub group_count: usize,
}

impl From<ConsolidationPlan> for ScanReport {
    fn from(plan: ConsolidationPlan) -> Self {
        Self {
            affected_records: plan.affected_records(),
            group_count: plan.group_count(),
            plan,
        }
    }
}

/// Result of applying a plan: the number of ids submitted for deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ApplyOutcome {
    pub deleted_count: usize,
}
