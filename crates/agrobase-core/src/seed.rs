//! Entry point for bootstrapping a tenant's starter data.
//!
//! [`run_seed`] reports exactly what happened as a [`SeedOutcome`].
//! [`seed_tenant`] is what tenant creation calls: it logs the outcome and
//! never fails, so a seeding defect leaves the tenant usable but empty.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{error, info};
use uuid::Uuid;

use crate::builders::SeedData;
use crate::error::SeedError;
use crate::executor::{execute, LayerFailure, SeedReport};
use crate::guard::{self, GuardStatus};
use crate::ids::IdMap;
use crate::plan::{seed_plan, Step};
use crate::store::TenantStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Guard,
    Planning,
    Layer { index: usize, step: Step },
    Panicked,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Guard => f.write_str("guard"),
            FailureStage::Planning => f.write_str("planning"),
            FailureStage::Layer { index, step } => write!(f, "layer {index} ({step})"),
            FailureStage::Panicked => f.write_str("panicked"),
        }
    }
}

#[derive(Debug)]
pub enum SeedOutcome {
    Seeded(SeedReport),
    AlreadySeeded { existing: i64 },
    FailedAt { stage: FailureStage, cause: SeedError },
}

/// Seed `tenant_id` unless it already has starter data. Panics raised while
/// seeding are caught and reported as [`FailureStage::Panicked`].
pub async fn run_seed<S>(store: &S, tenant_id: Uuid) -> SeedOutcome
where
    S: TenantStore + ?Sized,
{
    match AssertUnwindSafe(seed_run(store, tenant_id)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => SeedOutcome::FailedAt {
            stage: FailureStage::Panicked,
            cause: SeedError::Panicked(panic_message(payload.as_ref())),
        },
    }
}

/// Best-effort seeding for a freshly created tenant. Every outcome is logged;
/// none is returned.
pub async fn seed_tenant<S>(store: &S, tenant_id: Uuid)
where
    S: TenantStore + ?Sized,
{
    match run_seed(store, tenant_id).await {
        SeedOutcome::Seeded(report) => info!(
            tenant_id = %tenant_id,
            layers = report.layers.len(),
            rows = report.total_rows,
            "Seeded tenant starter data"
        ),
        SeedOutcome::AlreadySeeded { existing } => info!(
            tenant_id = %tenant_id,
            existing,
            "Tenant already has starter data; skipping seed"
        ),
        SeedOutcome::FailedAt { stage, cause } => error!(
            tenant_id = %tenant_id,
            stage = %stage,
            error = %cause,
            "Tenant seeding failed; tenant left partially seeded"
        ),
    }
}

async fn seed_run<S>(store: &S, tenant_id: Uuid) -> SeedOutcome
where
    S: TenantStore + ?Sized,
{
    match guard::check(store, tenant_id).await {
        Ok(GuardStatus::Clear) => {}
        Ok(GuardStatus::AlreadySeeded { existing }) => {
            return SeedOutcome::AlreadySeeded { existing }
        }
        Err(source) => {
            return SeedOutcome::FailedAt {
                stage: FailureStage::Guard,
                cause: SeedError::Guard(source),
            }
        }
    }

    let plan = match seed_plan() {
        Ok(plan) => plan,
        Err(err) => {
            return SeedOutcome::FailedAt {
                stage: FailureStage::Planning,
                cause: err.into(),
            }
        }
    };

    let ids = IdMap::allocate();
    let work = SeedData::build(tenant_id, &ids).into_work();

    match execute(store, tenant_id, plan, work).await {
        Ok(report) => SeedOutcome::Seeded(report),
        Err(LayerFailure { index, step, cause }) => SeedOutcome::FailedAt {
            stage: FailureStage::Layer { index, step },
            cause,
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
