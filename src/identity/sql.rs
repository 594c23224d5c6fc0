use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{IdentityError, IdentityProvider, NewIdentity, password::hash_password};
use crate::db::entities::{account, prelude::Account};

/// Accounts kept next to the documents in the relational database.
#[derive(Clone)]
pub struct SqlIdentityProvider {
    db: DatabaseConnection,
}

impl SqlIdentityProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<account::Model>, IdentityError> {
        Ok(Account::find()
            .filter(account::Column::Email.eq(email.trim().to_ascii_lowercase()))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl IdentityProvider for SqlIdentityProvider {
    fn backend(&self) -> &'static str {
        "sql"
    }

    async fn create_identity(&self, identity: &NewIdentity) -> Result<String, IdentityError> {
        if self.find_by_email(&identity.email).await?.is_some() {
            return Err(IdentityError::EmailExists {
                email: identity.email.clone(),
            });
        }

        let password_hash = hash_password(&identity.password)?;
        let model = account::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(identity.email.trim().to_ascii_lowercase()),
            password_hash: Set(password_hash),
            display_name: Set(identity.display_name.clone()),
            disabled: Set(identity.disabled),
            ..Default::default()
        };
        let account = model.insert(&self.db).await?;
        Ok(account.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::SqlIdentityProvider;
    use crate::{
        db::entities::account,
        identity::{IdentityError, IdentityProvider, NewIdentity},
    };

    fn account_row(email: &str) -> account::Model {
        account::Model {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            display_name: "Ana Garcia".to_string(),
            disabled: false,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn identity() -> NewIdentity {
        NewIdentity {
            email: "admin@test.com".to_string(),
            password: "password123".to_string(),
            display_name: "Ana Garcia".to_string(),
            disabled: false,
        }
    }

    #[tokio::test]
    async fn rejects_existing_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![account_row("admin@test.com")]])
            .into_connection();
        let provider = SqlIdentityProvider::new(db);

        let err = provider
            .create_identity(&identity())
            .await
            .expect_err("existing email should be rejected");
        assert!(matches!(err, IdentityError::EmailExists { .. }));
    }

    #[tokio::test]
    async fn returns_inserted_account_id() {
        let inserted = account_row("admin@test.com");
        let expected = inserted.id.to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<account::Model>::new()])
            .append_query_results([vec![inserted]])
            .into_connection();
        let provider = SqlIdentityProvider::new(db);

        let id = provider
            .create_identity(&identity())
            .await
            .expect("new account should be created");
        assert_eq!(id, expected);
    }
}
