use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::company::NewCompany;
use crate::rows::{Batch, Table};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate key '{key}' in {table}")]
    UniqueViolation { table: Table, key: String },

    #[error("foreign key violation on {table}: {detail}")]
    ForeignKey { table: Table, detail: String },

    #[error("constraint violation on {table}: {reason}")]
    Constraint { table: Table, reason: String },

    #[error("company {0} already exists")]
    DuplicateCompany(Uuid),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to encode row: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The relational store the seeder writes through.
///
/// Implementations scope every row to its `tenant_id`, enforce uniqueness and
/// foreign keys, and compute derived columns themselves. Each `apply` call is
/// atomic on its own; nothing spans calls.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Number of `table` rows owned by `tenant_id`.
    async fn count_where(&self, table: Table, tenant_id: Uuid) -> Result<i64, StoreError>;

    /// Insert the batch's rows (or apply its link updates) and report how many
    /// rows were written.
    async fn apply(&self, batch: &Batch) -> Result<u64, StoreError>;

    async fn insert_company(&self, company: &NewCompany) -> Result<(), StoreError>;
}
