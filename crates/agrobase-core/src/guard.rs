use uuid::Uuid;

use crate::rows::Table;
use crate::store::{StoreError, TenantStore};

/// The table whose rows mark a tenant as seeded.
pub const GUARD_TABLE: Table = Table::ResourceCategories;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    Clear,
    AlreadySeeded { existing: i64 },
}

/// Any resource category owned by the tenant counts as "seeded", whether or
/// not the run that wrote it finished.
pub async fn check<S>(store: &S, tenant_id: Uuid) -> Result<GuardStatus, StoreError>
where
    S: TenantStore + ?Sized,
{
    let existing = store.count_where(GUARD_TABLE, tenant_id).await?;
    Ok(if existing > 0 {
        GuardStatus::AlreadySeeded { existing }
    } else {
        GuardStatus::Clear
    })
}
