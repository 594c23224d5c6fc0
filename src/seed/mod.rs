//! The seeding pipeline.
//!
//! Stages run strictly one after another and every write is awaited before
//! the next one is issued. Later stages read back what earlier stages wrote,
//! so a `Seeder` must be pointed at a store with read-after-write consistency.

mod catalog;
mod configurations;
mod report;
mod reservations;
mod users;

use std::sync::Arc;

use tracing::info;

use crate::{clock::Clock, error::SeedResult, identity::IdentityProvider, store::DocumentStore};

pub use report::{ReservationTally, SeedReport, UserTally};

pub struct Seeder {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
    default_password: String,
}

impl Seeder {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        default_password: impl Into<String>,
    ) -> Self {
        Self {
            store,
            identity,
            clock,
            default_password: default_password.into(),
        }
    }

    /// Runs every stage in order. Documents written before a failing stage
    /// stay in the store.
    pub async fn run(&self) -> SeedResult<SeedReport> {
        info!(
            store = self.store.backend(),
            identity = self.identity.backend(),
            "seeding MobiEvent sample data"
        );

        let configurations = self.seed_configurations().await?;
        let users = self.seed_users().await?;
        let items = self.seed_items().await?;
        let bundles = self.seed_bundles().await?;
        let reservations = self.seed_reservations().await?;

        let report = SeedReport {
            configurations,
            users_created: users.created.len(),
            users_skipped: users.skipped.len(),
            items: items.len(),
            bundles: bundles.len(),
            reservations: reservations.reservations.len(),
            transports: reservations.transports.len(),
        };
        info!("seeding finished: {report}");
        Ok(report)
    }
}
