use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::asset::AssetPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_timeout_secs() -> u64 {
    8
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root of the upload tree. Collections live in subdirectories of it.
    pub root: PathBuf,
    /// Request body limit for upload routes, in bytes.
    pub max_upload_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub media: AssetPolicy,
    pub documents: AssetPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.root", "./uploads")?
            .set_default("storage.max_upload_size", 64 * 1024 * 1024)?;
        let builder = policy_defaults(builder, "media", &AssetPolicy::media())?;
        let builder = policy_defaults(builder, "documents", &AssetPolicy::documents())?;

        let s = builder
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CMS__DATABASE__URL)
            .add_source(
                Environment::with_prefix("CMS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .with_list_parse_key("media.allowed_mime_types")
                    .with_list_parse_key("documents.allowed_mime_types"),
            )
            .build()?;

        s.try_deserialize()
    }
}

fn policy_defaults(
    builder: ConfigBuilder<DefaultState>,
    section: &str,
    policy: &AssetPolicy,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = builder
        .set_default(format!("{section}.subdirectory"), policy.subdirectory.clone())?
        .set_default(
            format!("{section}.delete_blob_on_remove"),
            policy.delete_blob_on_remove,
        )?
        .set_default(format!("{section}.keep_extension"), policy.keep_extension)?
        .set_default(
            format!("{section}.record_original_name"),
            policy.record_original_name,
        )?
        .set_default(
            format!("{section}.resolve_content_type"),
            policy.resolve_content_type,
        )?;
    if let Some(types) = &policy.allowed_mime_types {
        builder = builder.set_default(format!("{section}.allowed_mime_types"), types.clone())?;
    }
    Ok(builder)
}
