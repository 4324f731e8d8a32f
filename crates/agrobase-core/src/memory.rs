//! An in-process [`TenantStore`].
//!
//! Enforces the same rules the Postgres schema does (tenant-scoped foreign
//! keys, per-tenant unique codes, store-computed capacity columns) and records
//! every `apply` call with logical start and finish ticks. Tests use it as the
//! store double; the CLI uses it for dry runs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::company::NewCompany;
use crate::rows::{Batch, BatchKind, Link, Table, ZoneStructureRecord};
use crate::store::{StoreError, TenantStore};

/// One recorded `apply` call.
#[derive(Debug, Clone, Serialize)]
pub struct StoreCall {
    pub table: Table,
    pub kind: BatchKind,
    pub rows: usize,
    pub started: u64,
    pub finished: u64,
    pub failed: bool,
}

#[derive(Debug, Clone)]
struct StoredRow {
    id: Uuid,
    tenant_id: Uuid,
    value: Value,
}

#[derive(Debug, Default)]
struct State {
    companies: BTreeMap<Uuid, NewCompany>,
    tables: HashMap<Table, Vec<StoredRow>>,
    calls: Vec<StoreCall>,
    fail_on: HashSet<Table>,
    panic_on: HashSet<Table>,
    fail_on_call: Option<usize>,
    offline: bool,
}

impl State {
    fn rows(&self, table: Table) -> &[StoredRow] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn find(&self, table: Table, tenant_id: Uuid, id: Uuid) -> Option<&StoredRow> {
        self.rows(table)
            .iter()
            .find(|row| row.id == id && row.tenant_id == tenant_id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    clock: AtomicU64,
    applies: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `apply` against `table` fails with [`StoreError::Unavailable`].
    pub fn fail_on(mut self, table: Table) -> Self {
        self.state.get_mut().fail_on.insert(table);
        self
    }

    /// The zero-based `call`-th `apply` fails with
    /// [`StoreError::Unavailable`], whatever it writes.
    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.state.get_mut().fail_on_call = Some(call);
        self
    }

    /// Every `apply` against `table` panics.
    pub fn panic_on(mut self, table: Table) -> Self {
        self.state.get_mut().panic_on.insert(table);
        self
    }

    /// Every call, guard counts included, fails with
    /// [`StoreError::Unavailable`].
    pub fn offline(mut self) -> Self {
        self.state.get_mut().offline = true;
        self
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn rows(&self, table: Table, tenant_id: Uuid) -> Vec<Value> {
        let state = self.state.lock().await;
        state
            .rows(table)
            .iter()
            .filter(|row| row.tenant_id == tenant_id)
            .map(|row| row.value.clone())
            .collect()
    }

    /// Row counts for every table, zero included.
    pub async fn counts(&self, tenant_id: Uuid) -> BTreeMap<Table, usize> {
        let state = self.state.lock().await;
        Table::ALL
            .iter()
            .map(|table| {
                let count = state
                    .rows(*table)
                    .iter()
                    .filter(|row| row.tenant_id == tenant_id)
                    .count();
                (*table, count)
            })
            .collect()
    }

    pub async fn zone_structures(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<ZoneStructureRecord>, StoreError> {
        self.rows(Table::ZoneStructures, tenant_id)
            .await
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }

    pub async fn company(&self, id: Uuid) -> Option<NewCompany> {
        self.state.lock().await.companies.get(&id).cloned()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn count_where(&self, table: Table, tenant_id: Uuid) -> Result<i64, StoreError> {
        let state = self.state.lock().await;
        if state.offline {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        let count = state
            .rows(table)
            .iter()
            .filter(|row| row.tenant_id == tenant_id)
            .count();
        Ok(count as i64)
    }

    async fn apply(&self, batch: &Batch) -> Result<u64, StoreError> {
        let call = self.applies.fetch_add(1, Ordering::SeqCst);
        let started = self.tick();
        // Let sibling steps of the same layer interleave with this one.
        tokio::task::yield_now().await;

        let mut state = self.state.lock().await;
        let table = batch.table();
        if state.panic_on.contains(&table) {
            panic!("injected panic writing {table}");
        }

        let result = if state.offline {
            Err(StoreError::Unavailable("memory store is offline".into()))
        } else if state.fail_on.contains(&table) {
            Err(StoreError::Unavailable(format!("injected failure writing {table}")))
        } else if state.fail_on_call == Some(call) {
            Err(StoreError::Unavailable(format!("injected failure on call {call}")))
        } else {
            match batch.kind() {
                BatchKind::Insert => insert(&mut state, batch),
                BatchKind::Link => link(&mut state, batch),
            }
        };

        let finished = self.tick();
        state.calls.push(StoreCall {
            table,
            kind: batch.kind(),
            rows: batch.len(),
            started,
            finished,
            failed: result.is_err(),
        });
        result
    }

    async fn insert_company(&self, company: &NewCompany) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        if state.companies.contains_key(&company.id) {
            return Err(StoreError::DuplicateCompany(company.id));
        }
        state.companies.insert(company.id, company.clone());
        Ok(())
    }
}

fn check_references(state: &State, batch: &Batch) -> Result<(), StoreError> {
    let table = batch.table();
    for reference in batch.references() {
        if state
            .find(reference.table, reference.tenant_id, reference.id)
            .is_none()
        {
            return Err(StoreError::ForeignKey {
                table,
                detail: format!(
                    "{} = {} has no matching {} row for tenant {}",
                    reference.column, reference.id, reference.table, reference.tenant_id
                ),
            });
        }
    }
    Ok(())
}

/// Validates the whole batch before writing any of it.
fn insert(state: &mut State, batch: &Batch) -> Result<u64, StoreError> {
    let table = batch.table();
    check_references(state, batch)?;

    let ids = batch.inserted_ids();
    let values = batch.encode()?;

    let mut seen_ids: HashSet<Uuid> = state.rows(table).iter().map(|row| row.id).collect();
    let mut seen_keys: HashSet<(Uuid, String)> = state
        .rows(table)
        .iter()
        .filter_map(|row| {
            unique_key(table, &row.value).map(|key| (row.tenant_id, key))
        })
        .collect();

    let mut staged = Vec::with_capacity(values.len());
    for (id, value) in ids.into_iter().zip(values) {
        let tenant_id = uuid_field(&value, "tenant_id")?;
        if !seen_ids.insert(id) {
            return Err(StoreError::UniqueViolation {
                table,
                key: id.to_string(),
            });
        }
        if let Some(key) = unique_key(table, &value) {
            if !seen_keys.insert((tenant_id, key.clone())) {
                return Err(StoreError::UniqueViolation { table, key });
            }
        }
        staged.push(StoredRow {
            id,
            tenant_id,
            value,
        });
    }

    if table == Table::ZoneStructures {
        for row in &mut staged {
            set_max_positions(row)?;
        }
    }

    let written = staged.len() as u64;
    state.tables.entry(table).or_default().extend(staged);

    if table == Table::ZoneStructures {
        refresh_position_totals(state);
    }
    Ok(written)
}

fn link(state: &mut State, batch: &Batch) -> Result<u64, StoreError> {
    let table = batch.table();
    check_references(state, batch)?;

    let links = batch.links();
    for link in &links {
        check_link(state, table, link)?;
    }

    let rows = state.tables.entry(table).or_default();
    for link in &links {
        if let Some(row) = rows
            .iter_mut()
            .find(|row| row.id == link.row_id && row.tenant_id == link.tenant_id)
        {
            if let Value::Object(fields) = &mut row.value {
                fields.insert(
                    link.column.to_string(),
                    Value::String(link.target.to_string()),
                );
            }
        }
    }
    Ok(links.len() as u64)
}

fn check_link(state: &State, table: Table, link: &Link) -> Result<(), StoreError> {
    if link.row_id == link.target {
        return Err(StoreError::Constraint {
            table,
            reason: format!("{} of {} points at itself", link.column, link.row_id),
        });
    }

    if table == Table::ProductionPhases {
        let crop_of = |id| {
            state
                .find(table, link.tenant_id, id)
                .and_then(|row| row.value.get("crop_type_id").cloned())
        };
        if crop_of(link.row_id) != crop_of(link.target) {
            return Err(StoreError::Constraint {
                table,
                reason: format!(
                    "phase {} depends on {} from another crop type",
                    link.row_id, link.target
                ),
            });
        }
    }
    Ok(())
}

/// The per-tenant natural key of a row, when its table has one.
fn unique_key(table: Table, value: &Value) -> Option<String> {
    let fields: &[&str] = match table {
        Table::Products => &["sku"],
        Table::ActivityTemplatePhases => &["template_id", "phase_id"],
        Table::ActivityTemplateChecklist => &["template_id", "step_order"],
        Table::RegulatoryRequirements => &["document_type_id", "target", "context"],
        Table::PhaseProductFlows | Table::ActivityTemplateResources => return None,
        _ => &["code"],
    };
    let parts: Vec<String> = fields
        .iter()
        .map(|field| value.get(*field).map(Value::to_string).unwrap_or_default())
        .collect();
    Some(parts.join("/"))
}

fn uuid_field(value: &Value, field: &str) -> Result<Uuid, StoreError> {
    let raw = value.get(field).cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(raw)?)
}

fn int_field(value: &Value, field: &str) -> i64 {
    value.get(field).and_then(Value::as_i64).unwrap_or_default()
}

fn set_max_positions(row: &mut StoredRow) -> Result<(), StoreError> {
    let max_positions =
        int_field(&row.value, "levels") * int_field(&row.value, "positions_per_level");
    match &mut row.value {
        Value::Object(fields) => {
            fields.insert("max_positions".to_string(), Value::from(max_positions));
            Ok(())
        }
        _ => Err(StoreError::Constraint {
            table: Table::ZoneStructures,
            reason: format!("row {} is not an object", row.id),
        }),
    }
}

/// Zones sum their structures' capacity; facilities sum their zones'.
fn refresh_position_totals(state: &mut State) {
    let mut zone_totals: HashMap<Uuid, i64> = HashMap::new();
    for structure in state.rows(Table::ZoneStructures) {
        if let Ok(zone_id) = uuid_field(&structure.value, "zone_id") {
            *zone_totals.entry(zone_id).or_default() +=
                int_field(&structure.value, "max_positions");
        }
    }

    let mut facility_totals: HashMap<Uuid, i64> = HashMap::new();
    for zone in state.tables.entry(Table::Zones).or_default().iter_mut() {
        let total = zone_totals.get(&zone.id).copied().unwrap_or_default();
        set_field(&mut zone.value, "total_positions", total);
        if let Ok(facility_id) = uuid_field(&zone.value, "facility_id") {
            *facility_totals.entry(facility_id).or_default() += total;
        }
    }

    for facility in state.tables.entry(Table::Facilities).or_default().iter_mut() {
        let total = facility_totals.get(&facility.id).copied().unwrap_or_default();
        set_field(&mut facility.value, "total_positions", total);
    }
}

fn set_field(value: &mut Value, field: &str, number: i64) {
    if let Value::Object(fields) = value {
        fields.insert(field.to_string(), Value::from(number));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::rows::{NewZoneStructure, StructureKind};

    #[test]
    fn natural_key_joins_fields() {
        let mut value = Map::new();
        value.insert("code".into(), Value::from("GH-VEG"));
        assert_eq!(
            unique_key(Table::Zones, &Value::Object(value)).as_deref(),
            Some("\"GH-VEG\"")
        );
        assert_eq!(unique_key(Table::PhaseProductFlows, &Value::Null), None);
    }

    #[tokio::test]
    async fn structure_without_zone_is_rejected() {
        let store = MemoryStore::new();
        let tenant_id = Uuid::new_v4();
        let batch = Batch::ZoneStructures(vec![NewZoneStructure {
            id: Uuid::new_v4(),
            tenant_id,
            zone_id: Uuid::new_v4(),
            code: "ORPHAN".into(),
            name: "Orphan".into(),
            kind: StructureKind::Rack,
            length_m: 1.0,
            width_m: 1.0,
            levels: 2,
            positions_per_level: 3,
        }]);

        let err = store.apply(&batch).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { .. }));
        assert!(store.calls().await[0].failed);
        assert_eq!(store.counts(tenant_id).await[&Table::ZoneStructures], 0);
    }
}
