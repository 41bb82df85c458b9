//! Field checks that run before any store call.

use crate::error::{CatalogError, Result};
use verdant_model::{FarmFields, NewFarm, NewUser, UserFields};

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

// Blank optional text is stored as NULL.
fn optional(value: &Option<String>) -> Option<String> {
    required(value.as_deref())
}

pub fn new_user(fields: &UserFields) -> Result<NewUser> {
    match (
        required(fields.name.as_deref()),
        required(fields.email.as_deref()),
    ) {
        (Some(name), Some(email)) => Ok(NewUser {
            name,
            email,
            phone: optional(&fields.phone),
        }),
        _ => Err(CatalogError::validation("Name and email are required")),
    }
}

pub fn new_farm(fields: &FarmFields) -> Result<NewFarm> {
    match (
        required(fields.name.as_deref()),
        required(fields.email.as_deref()),
    ) {
        (Some(name), Some(email)) => Ok(NewFarm {
            name,
            email,
            owner_id: fields.owner_id,
            description: optional(&fields.description),
            phone: optional(&fields.phone),
            website: optional(&fields.website),
            address: optional(&fields.address),
            owner_name: optional(&fields.owner_name),
        }),
        _ => Err(CatalogError::validation("Farm name and email are required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_requires_name_and_email() {
        let missing_email = UserFields {
            name: Some("Ada".into()),
            ..Default::default()
        };
        let blank_name = UserFields {
            name: Some("   ".into()),
            email: Some("ada@example.com".into()),
            phone: None,
        };

        assert!(matches!(new_user(&missing_email), Err(CatalogError::Validation(_))));
        assert!(matches!(new_user(&blank_name), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn user_fields_are_trimmed_and_blank_phone_dropped() {
        let user = new_user(&UserFields {
            name: Some(" Ada ".into()),
            email: Some("ada@example.com\n".into()),
            phone: Some(String::new()),
        })
        .unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.phone, None);
    }

    #[test]
    fn farm_keeps_optional_details() {
        let farm = new_farm(&FarmFields {
            name: Some("North Field".into()),
            email: Some("north@example.com".into()),
            website: Some("https://north.example.com".into()),
            address: Some(" ".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(farm.website.as_deref(), Some("https://north.example.com"));
        assert_eq!(farm.address, None);
        assert_eq!(farm.owner_id, None);
    }

    #[test]
    fn farm_without_email_is_rejected() {
        let err = new_farm(&FarmFields {
            name: Some("North Field".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, CatalogError::validation("Farm name and email are required"));
    }
}
