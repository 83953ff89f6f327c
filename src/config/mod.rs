use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Longest token lifetime accepted from `JWT_EXPIRY_MINUTES` (one year).
pub const MAX_JWT_EXPIRY_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiry_minutes: i64,
    pub cors_origins: Vec<String>,
    /// Report another citizen's complaint as missing rather than forbidden.
    pub conceal_foreign_complaints: bool,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_expiry_minutes", &self.jwt_expiry_minutes)
            .field("cors_origins", &self.cors_origins)
            .field("conceal_foreign_complaints", &self.conceal_foreign_complaints)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl AppConfig {
    /// Builds the configuration once at startup: environment preset first, then per-key overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?
        .validated()?;

        config.with_signing_secret()
    }

    /// Rejects values the server cannot run with.
    fn validated(self) -> Result<Self, ConfigError> {
        if self.environment != Environment::Development && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let expiry = self.security.jwt_expiry_minutes;
        if !(1..=MAX_JWT_EXPIRY_MINUTES).contains(&expiry) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY_MINUTES",
                value: expiry.to_string(),
            });
        }

        let pagination = &self.pagination;
        if pagination.max_limit < 1 {
            return Err(ConfigError::Invalid {
                key: "PAGINATION_MAX_LIMIT",
                value: pagination.max_limit.to_string(),
            });
        }
        if pagination.default_limit < 1 || pagination.default_limit > pagination.max_limit {
            return Err(ConfigError::Invalid {
                key: "PAGINATION_DEFAULT_LIMIT",
                value: pagination.default_limit.to_string(),
            });
        }

        Ok(self)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(v) = parse_var("PORT")? {
            self.server.port = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = parse_var("DATABASE_MAX_CONNECTIONS")? {
            self.database.max_connections = v;
        }
        if let Some(v) = parse_var("DATABASE_CONNECTION_TIMEOUT")? {
            self.database.connection_timeout = v;
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Some(v) = parse_var("JWT_EXPIRY_MINUTES")? {
            self.security.jwt_expiry_minutes = v;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let Some(v) = parse_var("SECURITY_CONCEAL_FOREIGN_COMPLAINTS")? {
            self.security.conceal_foreign_complaints = v;
        }

        // Pagination overrides
        if let Some(v) = parse_var("PAGINATION_DEFAULT_LIMIT")? {
            self.pagination.default_limit = v;
        }
        if let Some(v) = parse_var("PAGINATION_MAX_LIMIT")? {
            self.pagination.max_limit = v;
        }

        Ok(self)
    }

    fn with_signing_secret(mut self) -> Result<Self, ConfigError> {
        if !self.security.jwt_secret.trim().is_empty() {
            return Ok(self);
        }
        if self.environment != Environment::Development {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        tracing::warn!("JWT_SECRET not set; generated an ephemeral secret, tokens will not survive a restart");
        self.security.jwt_secret = format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
        Ok(self)
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "complaints-api".to_string(),
                jwt_expiry_minutes: 60 * 24 * 7, // 1 week
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                conceal_foreign_complaints: false,
            },
            pagination: PaginationConfig {
                default_limit: 100,
                max_limit: 1000,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "complaints-api".to_string(),
                jwt_expiry_minutes: 60 * 24,
                cors_origins: vec![],
                conceal_foreign_complaints: false,
            },
            pagination: PaginationConfig {
                default_limit: 100,
                max_limit: 500,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "complaints-api".to_string(),
                jwt_expiry_minutes: 60 * 4,
                cors_origins: vec![],
                conceal_foreign_complaints: false,
            },
            pagination: PaginationConfig {
                default_limit: 100,
                max_limit: 100,
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}
