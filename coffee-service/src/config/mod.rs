use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_CLUSTER: &str = "cluster0.wibzr.mongodb.net";

#[derive(Debug, Clone, Deserialize)]
pub struct CoffeeConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub storage: StorageConfig,
    pub coffee: CoffeeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    /// Full connection string. When unset, one is built from the
    /// credentials and cluster host below.
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<Secret<String>>,
    pub cluster: String,
    pub database: String,
    pub collection: String,
    /// Pin Stable API v1 with strict mode and deprecation errors.
    pub strict_api: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoffeeSettings {
    /// Write the update body's `category` under `categorya`, the field name
    /// older deployments stored.
    pub legacy_category_field: bool,
}

impl CoffeeConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and PORT)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend = get_env("STORAGE_BACKEND", Some("mongo"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(CoffeeConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: env::var("MONGODB_URI").ok(),
                user: env::var("DB_USER").ok(),
                password: env::var("DB_PASS").ok().map(Secret::new),
                cluster: get_env("MONGODB_CLUSTER", Some(DEFAULT_CLUSTER), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("coffeeDB"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("coffee"), is_prod)?,
                strict_api: parse_flag(&get_env("MONGODB_STRICT_API", Some("true"), is_prod)?)?,
            },
            storage: StorageConfig { backend },
            coffee: CoffeeSettings {
                legacy_category_field: parse_flag(&get_env(
                    "COFFEE_LEGACY_CATEGORY_FIELD",
                    Some("false"),
                    is_prod,
                )?)?,
            },
        })
    }
}

impl MongoConfig {
    /// Connection string to hand to the driver.
    ///
    /// Contains the password; never log it.
    pub fn connection_uri(&self) -> Result<Secret<String>, AppError> {
        if let Some(uri) = &self.uri {
            return Ok(Secret::new(uri.clone()));
        }

        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Ok(Secret::new(format!(
                "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                user,
                password.expose_secret(),
                self.cluster
            ))),
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "MONGODB_URI or both DB_USER and DB_PASS must be set"
            ))),
        }
    }

    /// Host part of the connection target, safe for logs.
    pub fn display_host(&self) -> String {
        match &self.uri {
            Some(uri) => uri
                .rsplit_once('@')
                .map(|(_, host)| host.to_string())
                .unwrap_or_else(|| uri.clone()),
            None => self.cluster.clone(),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "Invalid boolean value: {}",
            other
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
