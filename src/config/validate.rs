use anyhow::{Result, bail};

use super::SeedConfig;
use crate::{backend::BackendId, identity::password::MIN_PASSWORD_LEN};

pub fn validate(cfg: &SeedConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.backend == BackendId::Firestore {
        let emulated = cfg.firebase.firestore_emulator_host.is_some()
            && cfg.firebase.auth_emulator_host.is_some();
        if !emulated && cfg.firebase.credentials_path.as_os_str().is_empty() {
            errors.push("SEED_CREDENTIALS_PATH must not be empty".to_string());
        }

        if cfg.firebase.database_url.trim().is_empty() {
            errors.push("SEED_DATABASE_URL must not be empty".to_string());
        }
    }

    if cfg.backend == BackendId::Sql && cfg.database.is_none() {
        errors.push("DATABASE_URL is required for the sql backend".to_string());
    }

    if cfg.default_password.len() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "SEED_DEFAULT_PASSWORD must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid seed config:\n- {}", errors.join("\n- "))
}
