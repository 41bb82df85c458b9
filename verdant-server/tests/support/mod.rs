#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use verdant_core::{AppUnitOfWork, database::InMemoryCatalogStore};
use verdant_server::{
    AppState,
    infra::config::{Config, ConfigMetadata, CorsConfig, DatabaseConfig, ServerConfig},
    routes::create_app,
};

pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryCatalogStore,
    pub state: AppState,
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://verdant@localhost/verdant_test".into(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            allowed_methods: vec!["GET".into(), "POST".into(), "PUT".into(), "DELETE".into()],
            allowed_headers: vec!["Content-Type".into()],
            allow_credentials: false,
        },
        dev_mode: false,
        metadata: ConfigMetadata::default(),
    }
}

/// Router over a fresh in-memory store.
pub fn build_test_app() -> Result<TestApp> {
    let store = InMemoryCatalogStore::new();
    let unit_of_work = Arc::new(AppUnitOfWork::in_memory(store.clone()));
    let state = AppState::new(Arc::new(test_config()), unit_of_work, None);

    let server = TestServer::builder()
        .http_transport()
        .build(create_app(state.clone()))
        .map_err(|err| anyhow!("failed to start test server: {err}"))?;

    Ok(TestApp {
        server,
        store,
        state,
    })
}
