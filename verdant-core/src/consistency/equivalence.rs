use sha2::{Digest, Sha256};

use verdant_model::{VarietyID, VarietyRecord};

/// The `(name, category, subcategory)` triple two varieties must share to be
/// considered duplicates. Comparison is exact: case and whitespace count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquivalenceKey {
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
}

impl EquivalenceKey {
    pub fn of(record: &VarietyRecord) -> Self {
        Self {
            name: record.name.clone(),
            category_name: record.category_name.clone(),
            subcategory_name: record.subcategory_name.clone(),
        }
    }

    pub fn matches(&self, record: &VarietyRecord) -> bool {
        self.name == record.name
            && self.category_name == record.category_name
            && self.subcategory_name == record.subcategory_name
    }

    /// Hex SHA-256 over the key fields and the member ids in order.
    ///
    /// Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` hash
    /// differently.
    pub fn fingerprint(&self, ids: &[VarietyID]) -> String {
        let mut hasher = Sha256::new();
        for field in [&self.name, &self.category_name, &self.subcategory_name] {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        for id in ids {
            hasher.update(id.as_uuid().as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn id(raw: u128) -> VarietyID {
        VarietyID(Uuid::from_u128(raw))
    }

    #[test]
    fn matching_is_case_and_whitespace_sensitive() {
        let key = EquivalenceKey::of(&VarietyRecord::new(id(1), "Tomato", "Veg", "Nightshade"));
        assert!(key.matches(&VarietyRecord::new(id(2), "Tomato", "Veg", "Nightshade")));
        assert!(!key.matches(&VarietyRecord::new(id(3), "tomato", "Veg", "Nightshade")));
        assert!(!key.matches(&VarietyRecord::new(id(4), "Tomato ", "Veg", "Nightshade")));
    }

    #[test]
    fn fingerprint_depends_on_member_order_and_field_boundaries() {
        let key = EquivalenceKey {
            name: "ab".into(),
            category_name: "c".into(),
            subcategory_name: "d".into(),
        };
        let shifted = EquivalenceKey {
            name: "a".into(),
            category_name: "bc".into(),
            subcategory_name: "d".into(),
        };

        let forward = key.fingerprint(&[id(1), id(2)]);
        assert_eq!(forward.len(), 64);
        assert_eq!(forward, key.fingerprint(&[id(1), id(2)]));
        assert_ne!(forward, key.fingerprint(&[id(2), id(1)]));
        assert_ne!(forward, shifted.fingerprint(&[id(1), id(2)]));
    }
}
