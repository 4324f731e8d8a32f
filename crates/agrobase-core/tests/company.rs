use agrobase_core::company::create_company;
use agrobase_core::error::CompanyError;
use agrobase_core::memory::MemoryStore;
use agrobase_core::rows::Table;
use agrobase_core::store::StoreError;

#[tokio::test]
async fn new_company_is_seeded() {
    let store = MemoryStore::new();

    let company = create_company(&store, "  Finca La Esperanza ").await.unwrap();
    assert_eq!(company.name, "Finca La Esperanza");
    assert_eq!(store.company(company.id).await, Some(company.clone()));

    let counts = store.counts(company.id).await;
    assert!(counts.values().all(|count| *count > 0));
}

#[tokio::test]
async fn blank_name_is_rejected_without_touching_the_store() {
    let store = MemoryStore::new();

    let err = create_company(&store, "   ").await.unwrap_err();
    assert!(matches!(err, CompanyError::EmptyName));
    assert!(store.calls().await.is_empty());
}

#[tokio::test]
async fn seed_failure_does_not_fail_company_creation() {
    let store = MemoryStore::new().fail_on(Table::Cultivars);

    let company = create_company(&store, "Vivero Andino").await.unwrap();
    assert!(store.company(company.id).await.is_some());

    let counts = store.counts(company.id).await;
    assert!(counts[&Table::CropTypes] > 0);
    assert_eq!(counts[&Table::Cultivars], 0);
}

#[tokio::test]
async fn company_insert_failure_is_returned() {
    let store = MemoryStore::new().offline();

    let err = create_company(&store, "Agro Sabana").await.unwrap_err();
    assert!(matches!(
        err,
        CompanyError::Store(StoreError::Unavailable(_))
    ));
}

#[tokio::test]
async fn companies_get_distinct_tenants() {
    let store = MemoryStore::new();

    let first = create_company(&store, "Cultivos del Norte").await.unwrap();
    let second = create_company(&store, "Cultivos del Norte").await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(store.counts(first.id).await, store.counts(second.id).await);
}
