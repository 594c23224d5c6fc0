use std::{
    io,
    sync::{Arc, Mutex},
};

use chrono::{Duration, TimeZone, Utc};
use tracing_subscriber::fmt;

use mobievent_seed::{
    clock::{Clock, ManualClock},
    error::SeedError,
    fixtures::{BUNDLES, ITEMS},
    identity::{IdentityProvider, MemoryIdentityProvider, NewIdentity},
    models::collections,
    seed::Seeder,
    store::{Document, DocumentStore, MemoryStore, Value},
};

struct Harness {
    clock: Arc<ManualClock>,
    store: Arc<MemoryStore>,
    identity: Arc<MemoryIdentityProvider>,
    seeder: Seeder,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 5, 20, 10, 30, 0).unwrap(),
    ));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let identity = Arc::new(MemoryIdentityProvider::new());
    let seeder = Seeder::new(
        store.clone(),
        identity.clone(),
        clock.clone(),
        "password123",
    );
    Harness {
        clock,
        store,
        identity,
        seeder,
    }
}

/// Log sink for the fmt subscriber, readable after the run.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines_with(&self, needle: &str) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn without(doc: &Document, field: &str) -> Vec<(String, Value)> {
    doc.iter()
        .filter(|(name, _)| name.as_str() != field)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[tokio::test]
async fn configurations_are_upserted_in_place() {
    let h = harness();

    assert_eq!(h.seeder.seed_configurations().await.unwrap(), 4);
    let first = h.store.documents(collections::CONFIGURATIONS);
    h.clock.advance(Duration::minutes(5));
    h.seeder.seed_configurations().await.unwrap();
    let second = h.store.documents(collections::CONFIGURATIONS);

    assert_eq!(second.len(), 4);
    let keys: Vec<&str> = second.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(keys, ["rates", "policies", "itemRates", "company"]);

    for (before, after) in first.iter().zip(&second) {
        assert_eq!(before.id, after.id);
        assert_eq!(without(&before.data, "updatedAt"), without(&after.data, "updatedAt"));
        assert_eq!(
            after.data.get("updatedAt"),
            Some(&Value::Timestamp(h.clock.now()))
        );
        assert_ne!(before.data.get("updatedAt"), after.data.get("updatedAt"));
    }
}

#[tokio::test]
async fn existing_email_skips_only_that_user_with_one_warning() {
    let logs = CapturedLogs::default();
    let subscriber = fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let h = harness();
    h.identity
        .create_identity(&NewIdentity {
            email: "empleado@test.com".into(),
            password: "already-there".into(),
            display_name: "Carlos".into(),
            disabled: false,
        })
        .await
        .unwrap();

    let tally = h.seeder.seed_users().await.unwrap();

    assert_eq!(tally.created.len(), 3);
    assert_eq!(tally.skipped, ["empleado@test.com"]);
    assert_eq!(h.store.count(collections::USERS), 3);

    let warnings = logs.lines_with("WARN");
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("empleado@test.com"));

    for uid in &tally.created {
        let profile = h.store.get(collections::USERS, uid).expect("profile keyed by uid");
        assert!(profile.contains("registeredAt"));
    }
    let created = h.identity.account("cliente1@test.com").unwrap();
    let profile = h.store.get(collections::USERS, &created.id).unwrap();
    assert_eq!(profile.get("role"), Some(&Value::from("customer")));
    assert_eq!(profile.get("name"), Some(&Value::from("Juan Perez")));
}

#[tokio::test]
async fn items_start_fully_available() {
    let h = harness();

    let ids = h.seeder.seed_items().await.unwrap();

    assert_eq!(ids.len(), 9);
    let items = h.store.documents(collections::ITEMS);
    assert_eq!(items.len(), 9);
    for item in &items {
        let total = item.data.get("totalQuantity").and_then(Value::as_i64);
        assert!(total.is_some());
        assert_eq!(item.data.get("availableQuantity").and_then(Value::as_i64), total);
    }
}

#[tokio::test]
async fn bundles_reference_items_by_name() {
    let h = harness();
    let item_ids = h.seeder.seed_items().await.unwrap();

    let bundle_ids = h.seeder.seed_bundles().await.unwrap();
    assert_eq!(bundle_ids.len(), 4);

    let basic = h.store.get(collections::BUNDLES, &bundle_ids[0]).unwrap();
    let Some(Value::Map(items)) = basic.get("items") else {
        panic!("bundle items should be a map");
    };
    assert_eq!(items.len(), 2);
    // round table first, banquet chair third
    assert_eq!(items.get(&item_ids[0]), Some(&Value::Integer(10)));
    assert_eq!(items.get(&item_ids[2]), Some(&Value::Integer(50)));

    for id in &bundle_ids {
        let bundle = h.store.get(collections::BUNDLES, id).unwrap();
        let Some(Value::Map(items)) = bundle.get("items") else {
            panic!("bundle items should be a map");
        };
        for (item_id, _) in items.iter() {
            assert!(item_ids.contains(item_id), "dangling item reference {item_id}");
        }
    }
}

#[tokio::test]
async fn under_supplied_items_abort_before_any_bundle_is_written() {
    let h = harness();
    for item in &ITEMS[..5] {
        h.store
            .add(collections::ITEMS, item.to_document())
            .await
            .unwrap();
    }

    let err = h.seeder.seed_bundles().await.unwrap_err();

    assert!(matches!(
        err,
        SeedError::MissingItem { ref bundle, ref item }
            if bundle == BUNDLES[1].name && item == "Centro de Mesa Floral"
    ));
    assert_eq!(h.store.count(collections::BUNDLES), 0);
}

#[tokio::test]
async fn reservations_need_a_customer_and_a_bundle() {
    let h = harness();
    h.seeder.seed_items().await.unwrap();
    h.seeder.seed_bundles().await.unwrap();

    let tally = h.seeder.seed_reservations().await.unwrap();
    assert!(tally.reservations.is_empty());
    assert_eq!(h.store.count(collections::RESERVATIONS), 0);
    assert_eq!(h.store.count(collections::TRANSPORT), 0);

    let h = harness();
    h.seeder.seed_users().await.unwrap();

    let tally = h.seeder.seed_reservations().await.unwrap();
    assert!(tally.reservations.is_empty());
    assert_eq!(h.store.count(collections::RESERVATIONS), 0);
}

#[tokio::test]
async fn two_bundles_give_two_reservations_and_one_transport() {
    let h = harness();
    h.seeder.seed_users().await.unwrap();
    let mut bundle_ids = Vec::new();
    for name in ["Lote A", "Lote B"] {
        bundle_ids.push(
            h.store
                .add(collections::BUNDLES, Document::new().with("name", name))
                .await
                .unwrap(),
        );
    }

    let tally = h.seeder.seed_reservations().await.unwrap();

    assert_eq!(tally.reservations.len(), 2);
    assert_eq!(tally.transports.len(), 1);
    assert_eq!(h.store.count(collections::RESERVATIONS), 2);
    assert_eq!(h.store.count(collections::TRANSPORT), 1);

    let customer = h.identity.account("cliente1@test.com").unwrap();
    let first = h
        .store
        .get(collections::RESERVATIONS, &tally.reservations[0])
        .unwrap();
    assert_eq!(first.get("customerId"), Some(&Value::from(customer.id.as_str())));
    assert_eq!(first.get("bundleId"), Some(&Value::from(bundle_ids[0].as_str())));
    assert_eq!(first.get("status"), Some(&Value::from("confirmed")));
    assert_eq!(first.get("transportCost"), Some(&Value::Double(125.0)));
    assert_eq!(
        first.get("startDate"),
        Some(&Value::Timestamp(h.clock.now() + Duration::days(7)))
    );

    let second = h
        .store
        .get(collections::RESERVATIONS, &tally.reservations[1])
        .unwrap();
    assert_eq!(second.get("bundleId"), Some(&Value::from(bundle_ids[1].as_str())));
    assert_eq!(second.get("status"), Some(&Value::from("pending")));
    assert!(!second.contains("deliveryAddress"));

    let transport = h
        .store
        .get(collections::TRANSPORT, &tally.transports[0])
        .unwrap();
    assert_eq!(
        transport.get("reservationId"),
        Some(&Value::from(tally.reservations[0].as_str()))
    );
    assert_eq!(transport.get("assignedVehicle"), Some(&Value::Null));
    assert_eq!(transport.get("estimatedDelivery"), first.get("startDate"));
}

#[tokio::test]
async fn a_single_bundle_books_only_the_first_reservation() {
    let h = harness();
    h.seeder.seed_users().await.unwrap();
    h.store
        .add(collections::BUNDLES, Document::new().with("name", "Lote A"))
        .await
        .unwrap();

    let tally = h.seeder.seed_reservations().await.unwrap();

    assert_eq!(tally.reservations.len(), 1);
    assert_eq!(tally.transports.len(), 1);
}

#[tokio::test]
async fn full_run_reports_every_stage() {
    let h = harness();

    let report = h.seeder.run().await.unwrap();

    assert_eq!(report.configurations, 4);
    assert_eq!(report.users_created, 4);
    assert_eq!(report.users_skipped, 0);
    assert_eq!(report.items, 9);
    assert_eq!(report.bundles, 4);
    assert_eq!(report.reservations, 2);
    assert_eq!(report.transports, 1);
    assert_eq!(h.identity.len(), 4);
}

#[tokio::test]
async fn rerun_duplicates_everything_but_configurations_and_users() {
    let h = harness();
    h.seeder.run().await.unwrap();
    h.clock.advance(Duration::hours(1));

    let report = h.seeder.run().await.unwrap();

    assert_eq!(report.users_created, 0);
    assert_eq!(report.users_skipped, 4);
    assert_eq!(h.store.count(collections::CONFIGURATIONS), 4);
    assert_eq!(h.store.count(collections::USERS), 4);
    assert_eq!(h.store.count(collections::ITEMS), 18);
    assert_eq!(h.store.count(collections::BUNDLES), 8);
    assert_eq!(h.store.count(collections::RESERVATIONS), 4);
    assert_eq!(h.store.count(collections::TRANSPORT), 2);
}
