use std::fs;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use tempfile::TempDir;
use verdant_core::{AppUnitOfWork, database::InMemoryCatalogStore};
use verdant_server::{
    AppState,
    infra::config::{
        ConfigGuardRailError, ConfigLoadError, ConfigLoader,
        sources::{EnvConfig, FileConfig},
    },
    routes::create_app,
};

fn write_config(dir: &TempDir, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join("verdant.toml");
    fs::write(&path, contents)?;
    Ok(path)
}

fn env_with_url(url: &str) -> EnvConfig {
    EnvConfig {
        database_url: Some(url.to_string()),
        ..Default::default()
    }
}

#[test]
fn defaults_apply_when_only_the_database_url_is_set() -> Result<()> {
    let load = ConfigLoader::new()
        .with_env(env_with_url("postgres://verdant@localhost/verdant"))
        .load()?;

    let config = load.config;
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.database.acquire_timeout_secs, 30);
    assert!(!config.dev_mode);
    assert!(config.metadata.config_path.is_none());
    assert!(
        load.warnings
            .items
            .iter()
            .any(|warning| warning.message.contains("No verdant.toml"))
    );
    Ok(())
}

#[test]
fn file_values_are_overridden_by_environment() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_config(
        &dir,
        r#"
dev_mode = false

[server]
host = "127.0.0.1"
port = 8080

[database]
url = "postgresql://file@db/verdant"
max_connections = 4

[cors]
allowed_origins = ["https://admin.example.com"]
"#,
    )?;

    let env = EnvConfig {
        server_port: Some(9090),
        ..env_with_url("postgres://env@db/verdant")
    };
    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env)
        .load()?
        .config;

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.database.url, "postgres://env@db/verdant");
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.cors.allowed_origins, vec!["https://admin.example.com"]);
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    Ok(())
}

#[test]
fn missing_database_url_is_an_error() {
    let err = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingDatabaseUrl));
}

#[test]
fn non_postgres_urls_are_rejected() {
    let err = ConfigLoader::new()
        .with_env(env_with_url("mysql://root@localhost/verdant"))
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::UnsupportedDatabaseScheme { ref scheme } if scheme == "mysql"
    ));
}

#[test]
fn explicit_config_path_must_exist() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env(env_with_url("postgres://verdant@localhost/verdant"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    Ok(())
}

#[test]
fn wildcard_cors_requires_dev_mode() -> Result<()> {
    let env = EnvConfig {
        cors_allowed_origins: Some(vec!["*".into()]),
        ..env_with_url("postgres://verdant@localhost/verdant")
    };

    let err = ConfigLoader::new().with_env(env.clone()).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::GuardRail(_)));

    let dev = EnvConfig {
        dev_mode: Some(true),
        ..env
    };
    assert!(ConfigLoader::new().with_env(dev).load()?.config.dev_mode);
    Ok(())
}

#[test]
fn database_url_can_come_from_a_secret_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let secret = dir.path().join("database_url");
    fs::write(&secret, "postgres://secret@db/verdant\n")?;

    let env = EnvConfig {
        database_url_file: Some(secret),
        ..Default::default()
    };
    let config = ConfigLoader::new().with_env(env).load()?.config;
    assert_eq!(config.database.url, "postgres://secret@db/verdant");
    Ok(())
}

#[test]
fn redacted_view_hides_the_password() -> Result<()> {
    let config = ConfigLoader::new()
        .with_env(env_with_url("postgres://verdant:hunter2@db:5432/verdant"))
        .load()?
        .config;

    let rendered = toml::to_string_pretty(&FileConfig::redacted(&config))?;
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("****"));
    Ok(())
}

fn credentialed_env() -> EnvConfig {
    EnvConfig {
        cors_allowed_origins: Some(vec!["https://admin.example.com".into()]),
        cors_allow_credentials: Some(true),
        ..env_with_url("postgres://verdant@localhost/verdant")
    }
}

fn assert_invalid_cors(env: EnvConfig) {
    let err = ConfigLoader::new().with_env(env).load().unwrap_err();
    assert!(
        matches!(
            err,
            ConfigLoadError::GuardRail(ConfigGuardRailError::InvalidCorsConfig { .. })
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn credentials_reject_wildcard_headers() {
    assert_invalid_cors(EnvConfig {
        cors_allowed_headers: Some(vec!["*".into()]),
        ..credentialed_env()
    });
}

#[test]
fn credentials_reject_wildcard_methods() {
    assert_invalid_cors(EnvConfig {
        cors_allowed_methods: Some(vec!["GET".into(), "*".into()]),
        ..credentialed_env()
    });
}

#[test]
fn credentials_require_an_origin_list() {
    assert_invalid_cors(EnvConfig {
        cors_allowed_origins: Some(Vec::new()),
        ..credentialed_env()
    });
}

#[test]
fn unparseable_origins_are_rejected() {
    assert_invalid_cors(EnvConfig {
        cors_allowed_origins: Some(vec!["https://bad\norigin".into()]),
        ..credentialed_env()
    });
}

#[tokio::test]
async fn accepted_credentialed_config_builds_the_router() -> Result<()> {
    let config = ConfigLoader::new().with_env(credentialed_env()).load()?.config;
    assert!(config.cors.allow_credentials);

    let unit_of_work = Arc::new(AppUnitOfWork::in_memory(InMemoryCatalogStore::new()));
    let state = AppState::new(Arc::new(config), unit_of_work, None);
    let server = TestServer::builder()
        .build(create_app(state))
        .map_err(|err| anyhow!("failed to start test server: {err}"))?;

    server.get("/health").await.assert_status_ok();
    Ok(())
}

#[test]
fn env_file_is_loaded_from_an_explicit_path() -> Result<()> {
    let dir = TempDir::new()?;
    let env_file = dir.path().join("verdant.env");
    fs::write(&env_file, "DATABASE_URL=postgres://verdant@localhost/verdant\n")?;

    let load = ConfigLoader::new()
        .with_config_path(write_config(&dir, "")?)
        .with_env_file(&env_file)
        .load()?;
    assert!(load.config.metadata.env_file_loaded);
    Ok(())
}
