use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{info, warn};

use super::{ReservationTally, Seeder};
use crate::{
    error::SeedResult,
    fixtures::{self, DateAnchor, ReservationPlan},
    models::{Delivery, Reservation, Role, collections},
    store::{StoredDocument, Value},
};

const CUSTOMER_LIMIT: usize = 2;
const BUNDLE_LIMIT: usize = 2;

impl Seeder {
    /// Books the sample reservations for the first stored customer and
    /// writes a transport record for each delivered one.
    ///
    /// With no customer or no bundle stored nothing is written.
    pub async fn seed_reservations(&self) -> SeedResult<ReservationTally> {
        info!("writing reservations");
        let mut tally = ReservationTally::default();

        let customers = self
            .store
            .find_eq(
                collections::USERS,
                "role",
                &Value::from(Role::Customer.as_str()),
                Some(CUSTOMER_LIMIT),
            )
            .await?;
        let bundles = self
            .store
            .list(collections::BUNDLES, Some(BUNDLE_LIMIT))
            .await?;

        let Some(customer) = customers.first() else {
            warn!("no customers stored, skipping reservations");
            return Ok(tally);
        };
        if bundles.is_empty() {
            warn!("no bundles stored, skipping reservations");
            return Ok(tally);
        }

        let now = self.clock.now();
        for plan in &fixtures::RESERVATIONS {
            let Some(bundle) = bundles.get(plan.bundle_slot) else {
                warn!(
                    slot = plan.bundle_slot,
                    found = bundles.len(),
                    "not enough bundles, skipping reservation"
                );
                continue;
            };

            let reservation = reservation_from_plan(plan, customer, bundle, now);
            let id = self
                .store
                .add(collections::RESERVATIONS, reservation.to_document())
                .await?;
            info!(id = %id, status = reservation.status.as_str(), "reservation created");

            if let Some(transport) = reservation.transport(&id) {
                let transport_id = self
                    .store
                    .add(collections::TRANSPORT, transport.to_document())
                    .await?;
                info!(id = %transport_id, reservation = %id, "transport created");
                tally.transports.push(transport_id);
            }
            tally.reservations.push(id);
        }

        info!(
            reservations = tally.reservations.len(),
            transports = tally.transports.len(),
            "reservations done"
        );
        Ok(tally)
    }
}

fn reservation_from_plan(
    plan: &ReservationPlan,
    customer: &StoredDocument,
    bundle: &StoredDocument,
    now: DateTime<Utc>,
) -> Reservation {
    let anchor = match plan.anchor {
        DateAnchor::Now => now,
        DateAnchor::StartOfDay => now.date_naive().and_time(NaiveTime::MIN).and_utc(),
    };

    Reservation {
        customer_id: customer.id.clone(),
        bundle_id: bundle.id.clone(),
        start: anchor + Duration::days(plan.start_offset_days),
        end: anchor + Duration::days(plan.end_offset_days),
        status: plan.status,
        total_cost: plan.total_cost,
        deposit_paid: plan.deposit_paid,
        contract_signed: plan.contract_signed,
        delivery: plan.delivery.map(|delivery| Delivery {
            address: delivery.address.to_string(),
            distance_km: delivery.distance_km,
            transport_cost: delivery.transport_cost(),
            contact: delivery.contact.to_string(),
            time: delivery.time.to_string(),
        }),
        notes: plan.notes.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::reservation_from_plan;
    use crate::{
        fixtures::RESERVATIONS,
        store::{Document, StoredDocument},
    };

    fn stored(id: &str) -> StoredDocument {
        StoredDocument {
            id: id.to_string(),
            data: Document::new(),
        }
    }

    #[test]
    fn dates_follow_their_anchor() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();

        let first = reservation_from_plan(&RESERVATIONS[0], &stored("c"), &stored("b1"), now);
        assert_eq!(first.start, now + Duration::days(7));
        assert_eq!(first.end, first.start + Duration::days(2));
        assert_eq!(first.delivery.as_ref().map(|d| d.transport_cost), Some(125.0));

        let second = reservation_from_plan(&RESERVATIONS[1], &stored("c"), &stored("b2"), now);
        assert_eq!(second.start, midnight + Duration::days(14));
        assert_eq!(second.end, midnight + Duration::days(16));
        assert_eq!(second.bundle_id, "b2");
        assert!(second.delivery.is_none());
    }
}
