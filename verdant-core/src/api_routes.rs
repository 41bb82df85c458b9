macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

pub const HEALTH: &str = "/health";

/// Versioned admin API routes shared by the server and its clients.
pub mod v1 {
    pub const ROOT: &str = "/api/v1";

    pub mod duplicates {
        pub const COLLECTION: &str = v1_path!("/duplicates");
    }

    pub mod users {
        pub const COLLECTION: &str = v1_path!("/users");
        pub const ITEM: &str = v1_path!("/users/{id}");
    }

    pub mod farms {
        pub const COLLECTION: &str = v1_path!("/farms");
        pub const ITEM: &str = v1_path!("/farms/{id}");
    }

    pub mod varieties {
        pub const STATS: &str = v1_path!("/varieties/stats");
    }
}

pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(route: &str, param: &str, value: impl AsRef<str>) -> String {
        route.replace(param, value.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_routes_expand_ids() {
        assert_eq!(
            utils::replace_param(v1::users::ITEM, "{id}", "abc"),
            "/api/v1/users/abc"
        );
        assert!(v1::varieties::STATS.starts_with(v1::ROOT));
    }
}
