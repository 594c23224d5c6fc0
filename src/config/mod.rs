pub mod defaults;
mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::backend::BackendId;

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub backend: BackendId,
    pub log_level: String,
    pub firebase: FirebaseConfig,
    pub database: Option<DatabaseConfig>,
    pub default_password: String,
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub credentials_path: PathBuf,
    /// Database location; its host prefix names the project when the key
    /// file does not.
    pub database_url: String,
    pub firestore_emulator_host: Option<String>,
    pub auth_emulator_host: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl SeedConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env from crate root (falls back to current dir if missing)
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend = get("SEED_BACKEND")
            .unwrap_or_else(|| defaults::DEFAULT_BACKEND.to_string())
            .parse::<BackendId>()
            .map_err(|err| anyhow!(err))
            .context("SEED_BACKEND is invalid")?;

        let database = get("DATABASE_URL").map(|url| DatabaseConfig { url });

        let cfg = Self {
            backend,
            log_level: get("RUST_LOG").unwrap_or_else(|| defaults::DEFAULT_RUST_LOG.to_string()),
            firebase: FirebaseConfig {
                credentials_path: get("SEED_CREDENTIALS_PATH")
                    .unwrap_or_else(|| defaults::DEFAULT_CREDENTIALS_PATH.to_string())
                    .into(),
                database_url: get("SEED_DATABASE_URL")
                    .unwrap_or_else(|| defaults::DEFAULT_DATABASE_URL.to_string()),
                firestore_emulator_host: get("FIRESTORE_EMULATOR_HOST"),
                auth_emulator_host: get("FIREBASE_AUTH_EMULATOR_HOST"),
            },
            database,
            default_password: get("SEED_DEFAULT_PASSWORD")
                .unwrap_or_else(|| defaults::DEFAULT_PASSWORD.to_string()),
        };

        validate::validate(&cfg)?;
        Ok(cfg)
    }
}
