use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub import: ImportConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    pub options_cache_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub superadmin: SuperAdminConfig,
}

/// Bootstrap account created when the database holds no admin yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuperAdminConfig {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub email: Option<String>,
    /// DD/MM/YYYY
    pub dob: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub max_rows: usize,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_limit: i64,
    pub max_limit: i64,
    pub export_max_limit: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("API_OPTIONS_CACHE_SECS") {
            self.api.options_cache_secs = v.parse().unwrap_or(self.api.options_cache_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        self.security.superadmin = SuperAdminConfig {
            username: non_empty_var("SUPERADMIN_USERNAME"),
            password: non_empty_var("SUPERADMIN_PASSWORD"),
            email: non_empty_var("SUPERADMIN_EMAIL"),
            dob: non_empty_var("SUPERADMIN_DOB"),
        };

        // Import overrides
        if let Ok(v) = env::var("IMPORT_MAX_ROWS") {
            self.import.max_rows = v.parse().unwrap_or(self.import.max_rows);
        }
        if let Ok(v) = env::var("IMPORT_BATCH_SIZE") {
            self.import.batch_size = ImportConfig::batch_size_from(&v, self.import.batch_size);
        }

        // List overrides
        if let Ok(v) = env::var("LIST_DEFAULT_LIMIT") {
            self.list.default_limit = v.parse().unwrap_or(self.list.default_limit);
        }
        if let Ok(v) = env::var("LIST_MAX_LIMIT") {
            self.list.max_limit = v.parse().unwrap_or(self.list.max_limit);
        }
        if let Ok(v) = env::var("LIST_EXPORT_MAX_LIMIT") {
            self.list.export_max_limit = v.parse().unwrap_or(self.list.export_max_limit);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                options_cache_secs: 3600 * 24 * 7,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:9000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                bcrypt_cost: 10,
                superadmin: SuperAdminConfig::default(),
            },
            import: ImportConfig::default(),
            list: ListConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
                options_cache_secs: 3600 * 24 * 7,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                bcrypt_cost: 10,
                superadmin: SuperAdminConfig::default(),
            },
            import: ImportConfig::default(),
            list: ListConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
                options_cache_secs: 3600 * 24 * 7,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                bcrypt_cost: 12,
                superadmin: SuperAdminConfig::default(),
            },
            import: ImportConfig::default(),
            list: ListConfig::default(),
        }
    }
}

/// Each imported user row binds 13 parameters and PostgreSQL caps a statement
/// at 65535 of them.
pub const MAX_IMPORT_BATCH_SIZE: usize = 5000;

impl ImportConfig {
    /// Parse a batch size override, keeping `fallback` when it is not a
    /// number and clamping into `1..=MAX_IMPORT_BATCH_SIZE`.
    pub fn batch_size_from(value: &str, fallback: usize) -> usize {
        value
            .trim()
            .parse::<usize>()
            .unwrap_or(fallback)
            .clamp(1, MAX_IMPORT_BATCH_SIZE)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_rows: 500,
            batch_size: 100,
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 100,
            export_max_limit: 500,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
