use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::consistency::equivalence::EquivalenceKey;
use crate::database::ports::varieties::VarietiesRepository;
use crate::error::{CatalogError, Result};
use verdant_model::{
    ApplyOutcome, ConsolidationPlan, DuplicateGroup, ScanReport, VarietyID, VarietyOrder,
    VarietyRecord,
};

/// Finds varieties that share an [`EquivalenceKey`] and consolidates them by
/// keeping the first record of each group and deleting the rest.
#[derive(Clone)]
pub struct DuplicateResolver {
    varieties: Arc<dyn VarietiesRepository>,
}

impl fmt::Debug for DuplicateResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateResolver")
            .field("varieties_repo", &Arc::strong_count(&self.varieties))
            .finish()
    }
}

impl DuplicateResolver {
    pub fn new(varieties: Arc<dyn VarietiesRepository>) -> Self {
        Self { varieties }
    }

    /// Read the whole catalog and build a consolidation plan. Read-only.
    pub async fn scan(&self) -> Result<ScanReport> {
        let records = self
            .varieties
            .list_varieties(VarietyOrder::NameThenId)
            .await?;
        let plan = group_duplicates(&records);

        info!(
            scanned = records.len(),
            groups = plan.group_count(),
            affected = plan.affected_records(),
            "duplicate scan complete"
        );

        Ok(ScanReport::from(plan))
    }

    /// Delete every `delete_ids` member of `plan` in one bulk call.
    ///
    /// The plan is re-verified against the current catalog first; if any
    /// group changed since the scan nothing is deleted and
    /// [`CatalogError::StalePlan`] names the changed groups. The returned
    /// count is the number of ids submitted for deletion.
    pub async fn apply(&self, plan: &ConsolidationPlan) -> Result<ApplyOutcome> {
        check_structure(plan)?;

        let doomed = collect_delete_ids(plan);
        if doomed.is_empty() {
            debug!("consolidation plan has nothing to delete");
            return Ok(ApplyOutcome { deleted_count: 0 });
        }

        self.ensure_fresh(plan).await?;

        let affected = self.varieties.delete_varieties(&doomed).await?;
        if affected != doomed.len() as u64 {
            warn!(
                submitted = doomed.len(),
                affected, "bulk delete removed a different number of rows than submitted"
            );
        }
        info!(
            groups = plan.group_count(),
            submitted = doomed.len(),
            affected,
            "consolidated duplicate varieties"
        );

        Ok(ApplyOutcome {
            deleted_count: doomed.len(),
        })
    }

    async fn ensure_fresh(&self, plan: &ConsolidationPlan) -> Result<()> {
        let mut members = Vec::new();
        let mut seen = HashSet::new();
        for id in plan.groups.iter().flat_map(|group| group.ids.iter()) {
            if seen.insert(*id) {
                members.push(*id);
            }
        }

        let current: HashMap<VarietyID, VarietyRecord> = self
            .varieties
            .get_varieties_by_ids(&members)
            .await?
            .into_iter()
            .map(|record| (record.id, record))
            .collect();

        let stale: Vec<String> = plan
            .groups
            .iter()
            .filter(|group| !group_is_current(group, &current))
            .map(DuplicateGroup::label)
            .collect();

        if stale.is_empty() {
            Ok(())
        } else {
            warn!(stale = ?stale, "rejecting stale consolidation plan");
            Err(CatalogError::StalePlan { groups: stale })
        }
    }
}

/// Partition `records` by equivalence key, preserving read order both across
/// groups (first appearance of the key) and within each group.
pub fn group_duplicates(records: &[VarietyRecord]) -> ConsolidationPlan {
    let mut order: Vec<EquivalenceKey> = Vec::new();
    let mut members: HashMap<EquivalenceKey, Vec<VarietyID>> = HashMap::new();

    for record in records {
        let key = EquivalenceKey::of(record);
        match members.get_mut(&key) {
            Some(ids) => ids.push(record.id),
            None => {
                order.push(key.clone());
                members.insert(key, vec![record.id]);
            }
        }
    }

    let groups = order
        .into_iter()
        .filter_map(|key| {
            let ids = members.remove(&key)?;
            if ids.len() < 2 {
                return None;
            }
            let fingerprint = key.fingerprint(&ids);
            Some(DuplicateGroup {
                count: ids.len(),
                keep_id: ids[0],
                delete_ids: ids[1..].to_vec(),
                fingerprint,
                ids,
                name: key.name,
                category_name: key.category_name,
                subcategory_name: key.subcategory_name,
            })
        })
        .collect();

    ConsolidationPlan::new(groups)
}

fn collect_delete_ids(plan: &ConsolidationPlan) -> Vec<VarietyID> {
    let mut seen = HashSet::new();
    plan.groups
        .iter()
        .flat_map(|group| group.delete_ids.iter().copied())
        .filter(|id| seen.insert(*id))
        .collect()
}

// Keep records must never be deleted, whatever shape the caller sent back.
fn check_structure(plan: &ConsolidationPlan) -> Result<()> {
    let keeps: HashSet<VarietyID> = plan.groups.iter().map(|group| group.keep_id).collect();

    for group in &plan.groups {
        let well_formed = group.ids.len() >= 2
            && group.ids.first() == Some(&group.keep_id)
            && group.delete_ids.as_slice() == &group.ids[1..];
        if !well_formed {
            return Err(CatalogError::validation(format!(
                "Malformed duplicate group {}",
                group.label()
            )));
        }
        if group.delete_ids.iter().any(|id| keeps.contains(id)) {
            return Err(CatalogError::validation(format!(
                "Duplicate group {} would delete a kept record",
                group.label()
            )));
        }
    }
    Ok(())
}

fn group_is_current(group: &DuplicateGroup, current: &HashMap<VarietyID, VarietyRecord>) -> bool {
    let key = EquivalenceKey {
        name: group.name.clone(),
        category_name: group.category_name.clone(),
        subcategory_name: group.subcategory_name.clone(),
    };

    let all_present_and_matching = group.ids.iter().all(|id| {
        current
            .get(id)
            .is_some_and(|record| key.matches(record))
    });

    all_present_and_matching && key.fingerprint(&group.ids) == group.fingerprint
}
