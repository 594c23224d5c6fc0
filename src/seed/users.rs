use tracing::{info, warn};

use super::{Seeder, UserTally};
use crate::{error::SeedResult, fixtures, identity::NewIdentity, models::collections};

impl Seeder {
    /// Creates an identity per fixture user, then its profile document keyed
    /// by the identity id. A user whose identity cannot be created is logged
    /// and skipped; a failed profile write aborts the stage.
    pub async fn seed_users(&self) -> SeedResult<UserTally> {
        info!("creating users");
        let mut tally = UserTally::default();

        for user in &fixtures::USERS {
            let identity = NewIdentity {
                email: user.email.to_string(),
                password: self.default_password.clone(),
                display_name: user.name.to_string(),
                disabled: false,
            };

            let uid = match self.identity.create_identity(&identity).await {
                Ok(uid) => uid,
                Err(err) => {
                    warn!(email = user.email, "skipping user: {err}");
                    tally.skipped.push(user.email.to_string());
                    continue;
                }
            };

            self.store
                .set(collections::USERS, &uid, user.to_profile_document())
                .await?;
            info!(email = user.email, role = user.role.as_str(), "user created");
            tally.created.push(uid);
        }

        info!(
            created = tally.created.len(),
            skipped = tally.skipped.len(),
            "users done"
        );
        Ok(tally)
    }
}
