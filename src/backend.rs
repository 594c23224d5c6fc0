//! Connection bootstrap: turns a `SeedConfig` into a ready store and
//! identity service. Any failure here is fatal and happens before the first
//! write.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    clock::{Clock, SystemClock},
    config::{FirebaseConfig, SeedConfig},
    db::connection,
    google::{self, CLOUD_PLATFORM_SCOPE, ServiceAccountKey, TokenSource},
    identity::{
        FirebaseIdentityProvider, IdentityProvider, MemoryIdentityProvider, SqlIdentityProvider,
    },
    seed::Seeder,
    store::{DocumentStore, FirestoreStore, MemoryStore, SqlDocumentStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    Firestore,
    Sql,
    Memory,
}

impl BackendId {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendId::Firestore => "firestore",
            BackendId::Sql => "sql",
            BackendId::Memory => "memory",
        }
    }
}

impl std::str::FromStr for BackendId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(BackendId::Firestore),
            "sql" => Ok(BackendId::Sql),
            "memory" => Ok(BackendId::Memory),
            other => Err(format!("unsupported seed backend: {}", other)),
        }
    }
}

pub struct SeedContext {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub clock: Arc<dyn Clock>,
    /// Set for the memory backend so a dry run can report what it wrote.
    pub memory: Option<Arc<MemoryStore>>,
}

impl SeedContext {
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let memory = Arc::new(MemoryStore::new(clock.clone()));
        Self {
            store: memory.clone(),
            identity: Arc::new(MemoryIdentityProvider::new()),
            clock,
            memory: Some(memory),
        }
    }

    pub fn seeder(&self, default_password: &str) -> Seeder {
        Seeder::new(
            self.store.clone(),
            self.identity.clone(),
            self.clock.clone(),
            default_password,
        )
    }

    pub fn log_dry_run_summary(&self) {
        let Some(memory) = self.memory.as_ref() else {
            return;
        };
        for (collection, count) in memory.summary() {
            info!(collection = %collection, count, "dry run");
        }
    }
}

pub async fn connect(cfg: &SeedConfig) -> Result<SeedContext> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    info!(backend = cfg.backend.as_str(), "connecting");

    match cfg.backend {
        BackendId::Memory => Ok(SeedContext::in_memory(clock)),
        BackendId::Sql => {
            let database = cfg
                .database
                .as_ref()
                .context("DATABASE_URL is required for the sql backend")?;
            let db = connection::connect(database).await?;
            Ok(SeedContext {
                store: Arc::new(SqlDocumentStore::new(db.clone(), clock.clone())),
                identity: Arc::new(SqlIdentityProvider::new(db)),
                clock,
                memory: None,
            })
        }
        BackendId::Firestore => connect_firebase(&cfg.firebase, clock).await,
    }
}

async fn connect_firebase(cfg: &FirebaseConfig, clock: Arc<dyn Clock>) -> Result<SeedContext> {
    let http = reqwest::Client::new();
    let fully_emulated = cfg.firestore_emulator_host.is_some() && cfg.auth_emulator_host.is_some();

    let (project_id, tokens) = if fully_emulated {
        let project_id = google::project_from_database_url(&cfg.database_url)
            .with_context(|| format!("no project id in {}", cfg.database_url))?;
        (project_id, None)
    } else {
        let key = ServiceAccountKey::from_file(&cfg.credentials_path)
            .context("failed to load service-account credentials")?;
        let project_id = key.project_id_or(&cfg.database_url)?;
        let tokens = authenticate(http.clone(), key, &cfg.credentials_path).await?;
        (project_id, Some(tokens))
    };
    info!(project = %project_id, "using firebase project");

    let store: Arc<dyn DocumentStore> = match cfg.firestore_emulator_host.as_deref() {
        Some(host) => {
            info!(host, "using firestore emulator");
            Arc::new(FirestoreStore::emulator(http.clone(), host, &project_id))
        }
        None => Arc::new(FirestoreStore::new(
            http.clone(),
            &project_id,
            loaded(&tokens)?,
        )),
    };

    let identity: Arc<dyn IdentityProvider> = match cfg.auth_emulator_host.as_deref() {
        Some(host) => {
            info!(host, "using auth emulator");
            Arc::new(FirebaseIdentityProvider::emulator(http, host, &project_id))
        }
        None => Arc::new(FirebaseIdentityProvider::new(
            http,
            &project_id,
            loaded(&tokens)?,
        )),
    };

    Ok(SeedContext {
        store,
        identity,
        clock,
        memory: None,
    })
}

/// Fetches the first access token up front so a bad credential stops the
/// run before anything is written.
async fn authenticate(
    http: reqwest::Client,
    key: ServiceAccountKey,
    path: &Path,
) -> Result<Arc<TokenSource>> {
    let client_email = key.client_email.clone();
    let tokens = TokenSource::new(http, key, CLOUD_PLATFORM_SCOPE)
        .with_context(|| format!("invalid private key in {}", path.display()))?;
    tokens
        .token()
        .await
        .with_context(|| format!("service account {client_email} was not authorised"))?;
    info!(account = %client_email, "authenticated");
    Ok(Arc::new(tokens))
}

fn loaded(tokens: &Option<Arc<TokenSource>>) -> Result<Arc<TokenSource>> {
    tokens
        .clone()
        .context("service-account credentials were not loaded")
}
