use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use uuid::Uuid;

use super::{IdentityError, IdentityProvider, NewIdentity, password::hash_password};

#[derive(Debug, Clone)]
pub struct MemoryAccount {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub disabled: bool,
}

/// In-process identity service keyed by lowercase email.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, MemoryAccount>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, email: &str) -> Option<MemoryAccount> {
        self.lock().get(&email.to_ascii_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MemoryAccount>> {
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_identity(&self, identity: &NewIdentity) -> Result<String, IdentityError> {
        let password_hash = hash_password(&identity.password)?;
        let key = identity.email.trim().to_ascii_lowercase();

        let mut accounts = self.lock();
        let Entry::Vacant(slot) = accounts.entry(key) else {
            return Err(IdentityError::EmailExists {
                email: identity.email.clone(),
            });
        };

        let id = Uuid::new_v4().simple().to_string();
        slot.insert(MemoryAccount {
            id: id.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            password_hash,
            disabled: identity.disabled,
        });
        Ok(id)
    }
}
