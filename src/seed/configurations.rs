use tracing::info;

use super::Seeder;
use crate::{error::SeedResult, fixtures, models::collections};

impl Seeder {
    /// Upserts the fixed configuration documents. Safe to re-run: only the
    /// `updatedAt` stamps change.
    pub async fn seed_configurations(&self) -> SeedResult<usize> {
        info!("writing configurations");
        let configurations = fixtures::configurations();
        for configuration in &configurations {
            self.store
                .set(
                    collections::CONFIGURATIONS,
                    configuration.key,
                    configuration.to_document(),
                )
                .await?;
        }
        info!(count = configurations.len(), "configurations written");
        Ok(configurations.len())
    }
}
