//! Unit-of-work and repository behaviour against the in-process store.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use pagination::PageRequest;
use rust_decimal::Decimal;

use backend::domain::ports::{StoreError, TransactionalStore};
use backend::domain::{
    AuthId, Package, PackageId, Truck, TruckManager, UnitOfWork, UnitOfWorkFactory,
};
use backend::outbound::MemoryStore;

fn factory() -> UnitOfWorkFactory {
    let store: Arc<dyn TransactionalStore> = Arc::new(MemoryStore::new());
    UnitOfWorkFactory::new(store)
}

fn owner() -> AuthId {
    AuthId::new("auth0|abc123").expect("subject")
}

async fn begin(factory: &UnitOfWorkFactory) -> UnitOfWork {
    factory.begin().await.expect("transaction opens")
}

#[tokio::test]
async fn truck_package_ids_round_trip_exactly() {
    let factory = factory();

    let mut uow = begin(&factory).await;
    let mut truck = Truck::new("Box truck", 20, 2, owner());
    let expected: BTreeSet<PackageId> =
        [938, 26, 407].iter().map(|n| PackageId::new(*n)).collect();
    for id in &expected {
        truck.assign_package_id(*id);
    }
    let id = uow.trucks().add(&truck).await.expect("staged");
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    let stored = uow
        .trucks()
        .get(id)
        .await
        .expect("fetch")
        .expect("round-trips");
    assert_eq!(stored.package_ids(), &expected);
    assert_eq!(stored.truck_type(), "Box truck");
    assert_eq!(stored.owner(), &owner());
}

#[tokio::test]
async fn package_weight_and_date_round_trip_as_exact_text() {
    let factory = factory();
    let weight = Decimal::new(50, 1);
    let date = NaiveDate::from_ymd_opt(2022, 6, 25).expect("valid date");

    let mut uow = begin(&factory).await;
    let package = Package::new("overnight", weight, date);
    let id = uow.packages().add(&package).await.expect("staged");
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    let stored = uow
        .packages()
        .get(id)
        .await
        .expect("fetch")
        .expect("round-trips");
    assert_eq!(stored.weight(), weight);
    assert_eq!(stored.weight().to_string(), "5.0");
    assert_eq!(stored.shipping_date(), date);
    assert!(stored.carrier_id().is_none());
}

#[tokio::test]
async fn get_list_pages_are_disjoint_and_flag_the_final_page() {
    let factory = factory();

    let mut uow = begin(&factory).await;
    for n in 0..7 {
        let package = Package::new(
            format!("type-{n}"),
            Decimal::new(i64::from(n), 0),
            NaiveDate::from_ymd_opt(2022, 6, 25).expect("valid date"),
        );
        uow.packages().add(&package).await.expect("staged");
    }
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    let first = uow
        .packages()
        .get_list(PageRequest::new(5, 0))
        .await
        .expect("page");
    let second = uow
        .packages()
        .get_list(PageRequest::new(5, 5))
        .await
        .expect("page");

    assert_eq!(first.items().len(), 5);
    assert!(first.has_more());
    assert_eq!(second.items().len(), 2);
    assert!(!second.has_more());

    let first_ids: Vec<_> = first.items().iter().filter_map(Package::id).collect();
    assert!(
        second
            .items()
            .iter()
            .filter_map(Package::id)
            .all(|id| !first_ids.contains(&id))
    );
}

#[tokio::test]
async fn remove_reports_deleted_id_or_nothing_to_delete() {
    let factory = factory();

    let mut uow = begin(&factory).await;
    let truck = Truck::new("Flatbed", 30, 3, owner());
    let id = uow.trucks().add(&truck).await.expect("staged");
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    assert_eq!(uow.trucks().remove(id).await.expect("remove"), Some(id));
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    assert_eq!(uow.trucks().remove(id).await.expect("remove"), None);
    uow.commit().await.expect("commit is still clean");
}

#[tokio::test]
async fn dropping_without_commit_preserves_committed_state() {
    let factory = factory();

    {
        let mut uow = begin(&factory).await;
        let truck = Truck::new("Box truck", 20, 2, owner());
        uow.trucks().add(&truck).await.expect("staged");
        // No commit: the scope exits and the writes must vanish.
    }

    let mut uow = begin(&factory).await;
    let page = uow
        .trucks()
        .get_list(PageRequest::default())
        .await
        .expect("page");
    assert!(page.items().is_empty());
    assert!(!page.has_more());
}

#[tokio::test]
async fn rollback_is_idempotent_and_blocks_commit() {
    let factory = factory();
    let mut uow = begin(&factory).await;
    let truck = Truck::new("Box truck", 20, 2, owner());
    uow.trucks().add(&truck).await.expect("staged");

    uow.rollback();
    uow.rollback();
    assert!(!uow.is_active());
    assert_eq!(
        uow.commit().await.expect_err("commit after rollback fails"),
        StoreError::TransactionFinished
    );
}

#[tokio::test]
async fn manager_truck_set_is_derived_from_truck_owners() {
    let factory = factory();
    let subject = owner();

    let mut uow = begin(&factory).await;
    let manager_id = uow
        .managers()
        .add(&TruckManager::new(subject.clone()))
        .await
        .expect("staged");
    let first = uow
        .trucks()
        .add(&Truck::new("Box truck", 20, 2, subject.clone()))
        .await
        .expect("staged");
    let second = uow
        .trucks()
        .add(&Truck::new("Flatbed", 30, 3, subject.clone()))
        .await
        .expect("staged");
    let foreign = AuthId::new("auth0|someone-else").expect("subject");
    uow.trucks()
        .add(&Truck::new("Tanker", 25, 2, foreign))
        .await
        .expect("staged");
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    let manager = uow
        .managers()
        .get(manager_id)
        .await
        .expect("fetch")
        .expect("present");
    let expected: BTreeSet<_> = [first, second].into_iter().collect();
    assert_eq!(manager.truck_ids(), &expected);
    assert!(manager.has_assigned_trucks());

    let by_subject = uow
        .managers()
        .find_by_auth_id(&subject)
        .await
        .expect("query")
        .expect("present");
    assert_eq!(by_subject.id(), Some(manager_id));
}

#[tokio::test]
async fn manager_rows_can_be_removed() {
    let factory = factory();

    let mut uow = begin(&factory).await;
    let id = uow
        .managers()
        .add(&TruckManager::new(owner()))
        .await
        .expect("staged");
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    assert_eq!(uow.managers().remove(id).await.expect("remove"), Some(id));
    uow.commit().await.expect("committed");

    let mut uow = begin(&factory).await;
    assert!(uow.managers().get(id).await.expect("fetch").is_none());
}
