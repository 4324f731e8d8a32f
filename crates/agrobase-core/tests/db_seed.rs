use std::env;

use agrobase_core::company::create_company;
use agrobase_core::config::DatabaseConfig;
use agrobase_core::postgres::PgTenantStore;
use agrobase_core::seed::{run_seed, SeedOutcome};
use agrobase_core::store::TenantStore;
use agrobase_core::{db, rows::Table};
use anyhow::Result;

#[tokio::test]
async fn db_seed_is_idempotent_when_database_available() -> Result<()> {
    let database_url = match env::var("AGROBASE_TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping db_seed test because AGROBASE_TEST_DATABASE_URL is not set");
            return Ok(());
        }
    };

    let config = DatabaseConfig {
        url: Some(database_url),
        ..DatabaseConfig::default()
    };
    let pool = db::connect(&config).await?;
    db::run_migrations(&pool).await?;
    let store = PgTenantStore::new(pool);

    let company = create_company(&store, "Integration Farm").await?;
    let categories = store
        .count_where(Table::ResourceCategories, company.id)
        .await?;
    assert!(categories > 0, "company creation should seed the tenant");

    let mut counts = Vec::new();
    for table in Table::ALL {
        counts.push(store.count_where(table, company.id).await?);
    }
    assert!(counts.iter().all(|count| *count > 0));

    // second run should be a no-op
    match run_seed(&store, company.id).await {
        SeedOutcome::AlreadySeeded { existing } => assert_eq!(existing, categories),
        other => panic!("expected AlreadySeeded, got {other:?}"),
    }
    for (table, before) in Table::ALL.into_iter().zip(counts) {
        assert_eq!(store.count_where(table, company.id).await?, before, "{table}");
    }

    let structures = store.zone_structures(company.id).await?;
    assert!(!structures.is_empty());
    for structure in &structures {
        assert_eq!(
            structure.max_positions(),
            structure.levels * structure.positions_per_level
        );
    }

    let zone_totals: Vec<(uuid::Uuid, i32)> =
        sqlx::query_as("SELECT id, total_positions FROM zones WHERE tenant_id = $1")
            .bind(company.id)
            .fetch_all(store.pool())
            .await?;
    for (zone_id, total) in zone_totals {
        let expected: i32 = structures
            .iter()
            .filter(|s| s.zone_id == zone_id)
            .map(|s| s.max_positions())
            .sum();
        assert_eq!(total, expected);
    }

    Ok(())
}
