//! Runs a [`SeedPlan`] against a store: layers strictly in order, the steps of
//! one layer concurrently.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SeedError;
use crate::plan::{SeedPlan, Step};
use crate::rows::Batch;
use crate::store::TenantStore;

#[derive(Debug, Clone, Serialize)]
pub struct LayerReport {
    pub index: usize,
    pub steps: Vec<Step>,
    pub rows: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub tenant_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub layers: Vec<LayerReport>,
    pub total_rows: u64,
}

/// The first step that failed. Later layers never started.
#[derive(Debug, Error)]
#[error("layer {index} step {step} failed: {cause}")]
pub struct LayerFailure {
    pub index: usize,
    pub step: Step,
    #[source]
    pub cause: SeedError,
}

pub async fn execute<S>(
    store: &S,
    tenant_id: Uuid,
    plan: &SeedPlan,
    mut work: BTreeMap<Step, Vec<Batch>>,
) -> Result<SeedReport, LayerFailure>
where
    S: TenantStore + ?Sized,
{
    let started_at = Utc::now();
    let mut layers = Vec::with_capacity(plan.len());

    for (offset, steps) in plan.layers().iter().enumerate() {
        let index = offset + 1;
        info!(tenant_id = %tenant_id, layer = index, steps = ?steps, "Starting seed layer");

        let runs = steps.iter().map(|step| {
            let batches = work.remove(step).unwrap_or_default();
            run_step(store, *step, batches)
        });
        let written = try_join_all(runs)
            .await
            .map_err(|(step, cause)| LayerFailure { index, step, cause })?;

        let rows: u64 = written.iter().sum();
        info!(tenant_id = %tenant_id, layer = index, rows, "Seed layer complete");
        layers.push(LayerReport {
            index,
            steps: steps.clone(),
            rows,
        });
    }

    let total_rows = layers.iter().map(|layer| layer.rows).sum();
    Ok(SeedReport {
        tenant_id,
        started_at,
        finished_at: Utc::now(),
        layers,
        total_rows,
    })
}

/// A step's batches go to the store one after another, so sub-records always
/// follow the rows they hang off.
async fn run_step<S>(store: &S, step: Step, batches: Vec<Batch>) -> Result<u64, (Step, SeedError)>
where
    S: TenantStore + ?Sized,
{
    let mut written = 0;
    for batch in batches {
        if batch.is_empty() {
            continue;
        }
        let table = batch.table();
        let rows = store
            .apply(&batch)
            .await
            .map_err(|source| (step, SeedError::Store { table, source }))?;
        debug!(step = %step, table = %table, rows, "Applied seed batch");
        written += rows;
    }
    Ok(written)
}
