//! Postgres implementations of the store ports.
//!
//! The schema is owned outside this crate. The repositories expect:
//!
//! - `varieties (id uuid primary key, subcategory_id uuid, name text, description text,
//!   created_at timestamptz, updated_at timestamptz, ...)`
//! - `varieties_search`, a view joining varieties with their subcategory and category and
//!   exposing `id, name, category_name, subcategory_name, description, created_at, updated_at`
//! - `users (id uuid primary key default gen_random_uuid(), name text not null,
//!   email text not null constraint users_email_key unique, phone text,
//!   created_at timestamptz default now(), updated_at timestamptz default now())`
//! - `farms (id uuid primary key default gen_random_uuid(), name text not null,
//!   email text not null constraint farms_email_key unique,
//!   owner_id uuid references users(id), description text, phone text, website text,
//!   address text, owner_name text, created_at timestamptz default now(),
//!   updated_at timestamptz default now())`
//!
//! The unique constraints are the source of truth for email uniqueness; the
//! engine's pre-write lookup is a fast path in front of them.

pub mod repositories;

use crate::error::CatalogError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn describe_unique(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_email_key") => "User with this email already exists".to_string(),
        Some("farms_email_key") => "Farm with this email already exists".to_string(),
        Some(other) => format!("Unique constraint {other} violated"),
        None => "Unique constraint violated".to_string(),
    }
}

/// Map an insert/update failure. A foreign key violation there means the
/// referenced owner does not exist.
pub(crate) fn map_write_error(err: sqlx::Error, context: &str) -> CatalogError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return CatalogError::Conflict(describe_unique(db_err.constraint()));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return CatalogError::Validation("Referenced owner does not exist".to_string());
            }
            _ => {}
        }
    }
    CatalogError::StoreUnavailable(format!("{context}: {err}"))
}

/// Map a delete failure. A foreign key violation there means other rows
/// still reference the target.
pub(crate) fn map_delete_error(err: sqlx::Error, context: &str) -> CatalogError {
    if let Some(db_err) = err.as_database_error()
        && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    {
        return CatalogError::Conflict(format!("{context}: record is still referenced"));
    }
    CatalogError::StoreUnavailable(format!("{context}: {err}"))
}

pub(crate) fn map_read_error(err: sqlx::Error, context: &str) -> CatalogError {
    CatalogError::StoreUnavailable(format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct FakePgError {
        message: String,
        code: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseError for FakePgError {
        fn message(&self) -> &str {
            &self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                UNIQUE_VIOLATION => ErrorKind::UniqueViolation,
                FOREIGN_KEY_VIOLATION => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn pg_error(code: &'static str, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakePgError {
            message: format!("sqlstate {code}"),
            code,
            constraint,
        }))
    }

    #[test]
    fn unique_violations_name_the_record_kind() {
        let err = map_write_error(pg_error(UNIQUE_VIOLATION, Some("users_email_key")), "create");
        assert!(matches!(err, CatalogError::Conflict(ref m) if m == "User with this email already exists"));

        let err = map_write_error(pg_error(UNIQUE_VIOLATION, Some("farms_email_key")), "create");
        assert!(matches!(err, CatalogError::Conflict(ref m) if m == "Farm with this email already exists"));

        let err = map_write_error(pg_error(UNIQUE_VIOLATION, Some("farms_pkey")), "create");
        assert!(matches!(err, CatalogError::Conflict(ref m) if m == "Unique constraint farms_pkey violated"));

        let err = map_write_error(pg_error(UNIQUE_VIOLATION, None), "create");
        assert!(matches!(err, CatalogError::Conflict(ref m) if m == "Unique constraint violated"));
    }

    #[test]
    fn foreign_key_violation_on_write_is_a_missing_owner() {
        let err = map_write_error(pg_error(FOREIGN_KEY_VIOLATION, Some("farms_owner_id_fkey")), "create farm");
        assert!(matches!(err, CatalogError::Validation(ref m) if m == "Referenced owner does not exist"));
    }

    #[test]
    fn foreign_key_violation_on_delete_is_a_conflict() {
        let err = map_delete_error(pg_error(FOREIGN_KEY_VIOLATION, Some("farms_owner_id_fkey")), "Failed to delete user");
        assert!(
            matches!(err, CatalogError::Conflict(ref m) if m == "Failed to delete user: record is still referenced")
        );
    }

    #[test]
    fn other_failures_are_store_unavailable() {
        let err = map_write_error(pg_error("23514", Some("users_name_check")), "Failed to create user");
        assert!(matches!(err, CatalogError::StoreUnavailable(ref m) if m.starts_with("Failed to create user: ")));

        let err = map_write_error(sqlx::Error::PoolTimedOut, "Failed to update farm");
        assert!(matches!(err, CatalogError::StoreUnavailable(_)));

        // A unique violation while deleting is not an email conflict.
        let err = map_delete_error(pg_error(UNIQUE_VIOLATION, None), "Failed to delete farms");
        assert!(matches!(err, CatalogError::StoreUnavailable(_)));

        let err = map_delete_error(sqlx::Error::PoolTimedOut, "Failed to delete varieties");
        assert!(matches!(err, CatalogError::StoreUnavailable(_)));
    }
}
