use axum::http::{HeaderValue, Method, header::HeaderName};
use thiserror::Error;

use super::models::{Config, CorsConfig};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
    #[error("database max_connections must be at least 1")]
    EmptyPool,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.database.max_connections == 0 {
        return Err(ConfigGuardRailError::EmptyPool);
    }

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }

    validate_cors(&config.cors)?;

    if config.dev_mode {
        warnings.push_with_hint(
            "DEV_MODE is enabled; CORS is permissive",
            "Unset DEV_MODE before exposing the admin API",
        );
    }

    if !config.dev_mode && config.cors.allow_credentials {
        validate_credentialed_cors(&config.cors)?;
    }

    Ok(warnings)
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "CORS_ALLOWED_METHODS must include at least one HTTP method".into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid HTTP method `{method}` in CORS_ALLOWED_METHODS"),
            }
        })?;
    }

    for origin in &cors.allowed_origins {
        HeaderValue::from_str(origin).map_err(|_| ConfigGuardRailError::InvalidCorsConfig {
            reason: format!("invalid origin `{origin}` in CORS_ALLOWED_ORIGINS"),
        })?;
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid header name `{header}` in CORS_ALLOWED_HEADERS"),
            }
        })?;
    }

    Ok(())
}

// tower-http refuses to combine credentials with any wildcard and panics
// while building the layer.
fn validate_credentialed_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_origins.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "CORS_ALLOW_CREDENTIALS requires an explicit origin list".into(),
        });
    }

    let is_wildcard = |value: &String| value.trim() == "*";
    if cors.allowed_headers.iter().any(is_wildcard) {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "CORS_ALLOW_CREDENTIALS cannot be combined with CORS_ALLOWED_HEADERS=*".into(),
        });
    }
    if cors.allowed_methods.iter().any(is_wildcard) {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "CORS_ALLOW_CREDENTIALS cannot be combined with CORS_ALLOWED_METHODS=*".into(),
        });
    }

    Ok(())
}
