// crates/agrobase-core/src/error.rs

use thiserror::Error;

use crate::plan::PlanError;
use crate::rows::Table;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("idempotency check failed: {0}")]
    Guard(#[source] StoreError),

    #[error("writing {table} failed: {source}")]
    Store {
        table: Table,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("seeding panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum CompanyError {
    #[error("company name must not be empty")]
    EmptyName,

    #[error("failed to create company: {0}")]
    Store(#[from] StoreError),
}
