use std::collections::BTreeMap;

use crate::database::ports::varieties::VarietiesRepository;
use crate::error::Result;
use verdant_model::{VarietyOrder, VarietyRecord, VarietyStats};

/// Totals over the full variety listing, grouped by category name.
pub async fn variety_stats(varieties: &dyn VarietiesRepository) -> Result<VarietyStats> {
    let records = varieties.list_varieties(VarietyOrder::Name).await?;
    Ok(summarize(&records))
}

pub fn summarize(records: &[VarietyRecord]) -> VarietyStats {
    let mut by_category = BTreeMap::new();
    for record in records {
        *by_category.entry(record.category_name.clone()).or_insert(0) += 1;
    }
    VarietyStats {
        total: records.len(),
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryCatalogStore;
    use uuid::Uuid;
    use verdant_model::VarietyID;

    #[tokio::test]
    async fn counts_varieties_per_category() {
        let store = InMemoryCatalogStore::new();
        store
            .seed_varieties([
                VarietyRecord::new(VarietyID(Uuid::from_u128(1)), "Kale", "Veg", "Leafy"),
                VarietyRecord::new(VarietyID(Uuid::from_u128(2)), "Basil", "Herb", "Leafy"),
                VarietyRecord::new(VarietyID(Uuid::from_u128(3)), "Chard", "Veg", "Leafy"),
            ])
            .await;

        let stats = variety_stats(&store).await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_category.get("Veg"), Some(&2));
        assert_eq!(stats.by_category.get("Herb"), Some(&1));
    }
}
