use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::CompanyError;
use crate::seed::seed_tenant;
use crate::store::TenantStore;

/// A tenant. Every seeded row carries its `id` as `tenant_id`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct NewCompany {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Create a company and seed its starter data.
///
/// Only the company insert can fail this call. Seeding runs afterwards and
/// its outcome is logged, never returned.
pub async fn create_company<S>(store: &S, name: &str) -> Result<NewCompany, CompanyError>
where
    S: TenantStore + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(CompanyError::EmptyName);
    }

    let company = NewCompany {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: Utc::now(),
    };
    store.insert_company(&company).await?;
    info!(tenant_id = %company.id, name = %company.name, "Created company");

    seed_tenant(store, company.id).await;
    Ok(company)
}
