use std::collections::{BTreeSet, HashMap};

use agrobase_core::memory::{MemoryStore, StoreCall};
use agrobase_core::plan::{seed_plan, Step};
use agrobase_core::rows::{BatchKind, Table};
use agrobase_core::seed::{run_seed, seed_tenant, FailureStage, SeedOutcome};
use serde_json::Value;
use uuid::Uuid;

fn uuid(value: &Value, field: &str) -> Option<Uuid> {
    value.get(field)?.as_str()?.parse().ok()
}

/// Tables written by steps in the given one-based layer range.
fn tables_in_layers(range: std::ops::RangeInclusive<usize>) -> BTreeSet<Table> {
    let plan = seed_plan().unwrap();
    plan.layers()
        .iter()
        .enumerate()
        .filter(|(offset, _)| range.contains(&(offset + 1)))
        .flat_map(|(_, steps)| steps.iter())
        .flat_map(|step| step.writes().iter().map(|(table, _)| *table))
        .collect()
}

#[tokio::test]
async fn fresh_tenant_gets_the_full_catalog() {
    let store = MemoryStore::new();
    let tenant = Uuid::new_v4();

    let outcome = run_seed(&store, tenant).await;
    let report = match outcome {
        SeedOutcome::Seeded(report) => report,
        other => panic!("expected Seeded, got {other:?}"),
    };
    assert_eq!(report.layers.len(), 9);

    let counts = store.counts(tenant).await;
    for (table, count) in &counts {
        assert!(*count > 0, "{table} is empty");
    }
    assert_eq!(counts[&Table::CropTypes], 2);

    let inserted: usize = store
        .calls()
        .await
        .iter()
        .filter(|call| call.kind == BatchKind::Insert)
        .map(|call| call.rows)
        .sum();
    assert_eq!(inserted, counts.values().sum::<usize>());
}

#[tokio::test]
async fn phases_form_one_chain_per_crop_type() {
    let store = MemoryStore::new();
    let tenant = Uuid::new_v4();
    seed_tenant(&store, tenant).await;

    let mut by_crop: HashMap<Uuid, Vec<Value>> = HashMap::new();
    for phase in store.rows(Table::ProductionPhases, tenant).await {
        let crop = uuid(&phase, "crop_type_id").unwrap();
        by_crop.entry(crop).or_default().push(phase);
    }
    assert_eq!(by_crop.len(), 2);

    for phases in by_crop.values_mut() {
        phases.sort_by_key(|phase| phase["sort_order"].as_i64().unwrap());
        assert!(uuid(&phases[0], "depends_on_phase_id").is_none());
        for pair in phases.windows(2) {
            assert_eq!(
                uuid(&pair[1], "depends_on_phase_id"),
                uuid(&pair[0], "id"),
                "{} should depend on {}",
                pair[1]["code"],
                pair[0]["code"]
            );
        }
    }
}

#[tokio::test]
async fn cultivars_carry_a_duration_for_every_phase_of_their_crop() {
    let store = MemoryStore::new();
    let tenant = Uuid::new_v4();
    seed_tenant(&store, tenant).await;

    let mut phases_by_crop: HashMap<Uuid, BTreeSet<String>> = HashMap::new();
    for phase in store.rows(Table::ProductionPhases, tenant).await {
        phases_by_crop
            .entry(uuid(&phase, "crop_type_id").unwrap())
            .or_default()
            .insert(phase["id"].as_str().unwrap().to_string());
    }

    let cultivars = store.rows(Table::Cultivars, tenant).await;
    assert!(!cultivars.is_empty());
    for cultivar in cultivars {
        let crop = uuid(&cultivar, "crop_type_id").unwrap();
        let durations = cultivar["phase_durations"].as_object().unwrap();
        let keys: BTreeSet<String> = durations.keys().cloned().collect();
        assert_eq!(keys, phases_by_crop[&crop], "{}", cultivar["code"]);
        assert!(durations.values().all(|days| days.as_i64().unwrap() > 0));
    }
}

#[tokio::test]
async fn store_computes_structure_capacity_and_zone_totals() {
    let store = MemoryStore::new();
    let tenant = Uuid::new_v4();
    seed_tenant(&store, tenant).await;

    let structures = store.zone_structures(tenant).await.unwrap();
    assert!(!structures.is_empty());
    let mut per_zone: HashMap<Uuid, i64> = HashMap::new();
    for structure in &structures {
        assert_eq!(
            structure.max_positions(),
            structure.levels * structure.positions_per_level
        );
        *per_zone.entry(structure.zone_id).or_default() += i64::from(structure.max_positions());
    }

    for zone in store.rows(Table::Zones, tenant).await {
        let id = uuid(&zone, "id").unwrap();
        let expected = per_zone.get(&id).copied().unwrap_or_default();
        assert_eq!(zone["total_positions"].as_i64(), Some(expected));
    }
}

#[tokio::test]
async fn seeding_twice_changes_nothing() {
    let store = MemoryStore::new();
    let tenant = Uuid::new_v4();

    seed_tenant(&store, tenant).await;
    let counts = store.counts(tenant).await;
    let calls = store.calls().await.len();

    seed_tenant(&store, tenant).await;
    assert_eq!(store.counts(tenant).await, counts);
    assert_eq!(store.calls().await.len(), calls, "second run issued writes");
}

#[tokio::test]
async fn guard_short_circuits_before_any_write() {
    let store = MemoryStore::new();
    let tenant = Uuid::new_v4();
    seed_tenant(&store, tenant).await;
    let categories = store.counts(tenant).await[&Table::ResourceCategories];
    let calls = store.calls().await.len();

    match run_seed(&store, tenant).await {
        SeedOutcome::AlreadySeeded { existing } => assert_eq!(existing, categories as i64),
        other => panic!("expected AlreadySeeded, got {other:?}"),
    }
    assert_eq!(store.calls().await.len(), calls);
}

#[tokio::test]
async fn tenants_are_seeded_independently() {
    let store = MemoryStore::new();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    seed_tenant(&store, first).await;
    seed_tenant(&store, second).await;

    assert_eq!(store.counts(first).await, store.counts(second).await);
    let first_codes: BTreeSet<String> = store
        .rows(Table::CropTypes, first)
        .await
        .into_iter()
        .map(|row| row["code"].to_string())
        .collect();
    assert_eq!(first_codes.len(), 2);
}

#[tokio::test]
async fn layers_never_overlap() {
    let store = MemoryStore::new();
    seed_tenant(&store, Uuid::new_v4()).await;

    let plan = seed_plan().unwrap();
    let mut calls: Vec<StoreCall> = store.calls().await;
    calls.sort_by_key(|call| call.started);

    let mut rest = calls.as_slice();
    let mut previous_finish: Option<u64> = None;
    for (offset, steps) in plan.layers().iter().enumerate() {
        let expected: Vec<(Table, BatchKind)> = steps
            .iter()
            .flat_map(|step| step.writes().iter().copied())
            .collect();
        let (layer, tail) = rest.split_at(expected.len());
        rest = tail;

        let mut got: Vec<String> = layer
            .iter()
            .map(|c| format!("{}:{:?}", c.table, c.kind))
            .collect();
        let mut want: Vec<String> = expected.iter().map(|(t, k)| format!("{t}:{k:?}")).collect();
        got.sort();
        want.sort();
        assert_eq!(got, want, "layer {}", offset + 1);

        let start = layer.iter().map(|c| c.started).min().unwrap();
        if let Some(finish) = previous_finish {
            assert!(
                finish < start,
                "layer {} started before layer {} finished",
                offset + 1,
                offset
            );
        }
        previous_finish = layer.iter().map(|c| c.finished).max();
    }
    assert!(rest.is_empty());
}

#[tokio::test]
async fn any_single_failing_table_is_contained() {
    for table in Table::ALL {
        let store = MemoryStore::new().fail_on(table);
        let tenant = Uuid::new_v4();

        // Must return normally.
        seed_tenant(&store, tenant).await;

        let store = MemoryStore::new().fail_on(table);
        match run_seed(&store, tenant).await {
            SeedOutcome::FailedAt {
                stage: FailureStage::Layer { step, .. },
                ..
            } => assert!(
                step.writes().iter().any(|(written, _)| *written == table),
                "{step} does not write {table}"
            ),
            other => panic!("{table}: expected a layer failure, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn any_single_failing_call_is_contained() {
    let clean = MemoryStore::new();
    seed_tenant(&clean, Uuid::new_v4()).await;
    let total = clean.calls().await.len();
    assert_eq!(total, 23);

    let plan = seed_plan().unwrap();
    for call in 0..total {
        // Must return normally.
        seed_tenant(&MemoryStore::new().fail_on_call(call), Uuid::new_v4()).await;

        let store = MemoryStore::new().fail_on_call(call);
        let (index, step) = match run_seed(&store, Uuid::new_v4()).await {
            SeedOutcome::FailedAt {
                stage: FailureStage::Layer { index, step },
                ..
            } => (index, step),
            other => panic!("call {call}: expected a layer failure, got {other:?}"),
        };
        assert_eq!(plan.layer_of(step), Some(index), "call {call}");

        let calls = store.calls().await;
        let failed: Vec<&StoreCall> = calls.iter().filter(|c| c.failed).collect();
        assert_eq!(failed.len(), 1, "call {call}");
        let failed = failed[0];
        assert!(
            step.writes().contains(&(failed.table, failed.kind)),
            "call {call}: {step} does not write {}:{:?}",
            failed.table,
            failed.kind
        );
        assert!(
            calls.iter().all(|c| c.started < failed.finished),
            "call {call}: a write started after the failure"
        );
    }
}

#[tokio::test]
async fn failing_cultivars_keeps_the_first_three_layers() {
    let store = MemoryStore::new().fail_on(Table::Cultivars);
    let tenant = Uuid::new_v4();

    match run_seed(&store, tenant).await {
        SeedOutcome::FailedAt {
            stage: FailureStage::Layer { index, step },
            ..
        } => {
            assert_eq!(index, 4);
            assert_eq!(step, Step::Cultivars);
        }
        other => panic!("expected failure in layer 4, got {other:?}"),
    }

    let counts = store.counts(tenant).await;
    let early = tables_in_layers(1..=3);
    let late: BTreeSet<Table> = tables_in_layers(4..=9).difference(&early).copied().collect();
    for table in &early {
        assert!(counts[table] > 0, "{table} should be seeded");
    }
    for table in &late {
        assert_eq!(counts[table], 0, "{table} should be empty");
    }

    // Requirements span layers 3 and 9; only the category-level ones landed.
    for requirement in store.rows(Table::RegulatoryRequirements, tenant).await {
        assert_eq!(requirement["target"]["kind"], "category");
    }

    let calls = store.calls().await;
    assert!(calls.iter().all(|call| call.table != Table::Products));
    assert_eq!(calls.iter().filter(|call| call.failed).count(), 1);
}

#[tokio::test]
async fn partially_seeded_tenant_is_not_resumed() {
    let tenant = Uuid::new_v4();
    let store = MemoryStore::new().fail_on(Table::Products);
    seed_tenant(&store, tenant).await;
    let counts = store.counts(tenant).await;
    assert_eq!(counts[&Table::Products], 0);
    assert!(counts[&Table::ResourceCategories] > 0);

    let calls = store.calls().await.len();
    assert!(matches!(
        run_seed(&store, tenant).await,
        SeedOutcome::AlreadySeeded { .. }
    ));
    assert_eq!(store.calls().await.len(), calls);
    assert_eq!(store.counts(tenant).await, counts);
}

#[tokio::test]
async fn unreachable_store_fails_at_the_guard() {
    let store = MemoryStore::new().offline();
    let tenant = Uuid::new_v4();

    seed_tenant(&store, tenant).await;
    match run_seed(&store, tenant).await {
        SeedOutcome::FailedAt { stage, .. } => assert_eq!(stage, FailureStage::Guard),
        other => panic!("expected guard failure, got {other:?}"),
    }
    assert!(store.calls().await.is_empty());
}

#[tokio::test]
async fn panics_are_caught_and_reported() {
    let store = MemoryStore::new().panic_on(Table::Zones);
    let tenant = Uuid::new_v4();

    let outcome = run_seed(&store, tenant).await;
    assert!(matches!(
        outcome,
        SeedOutcome::FailedAt {
            stage: FailureStage::Panicked,
            ..
        }
    ));

    let counts = store.counts(tenant).await;
    assert!(counts[&Table::Suppliers] > 0);
    assert_eq!(counts[&Table::Zones], 0);
    assert_eq!(counts[&Table::ZoneStructures], 0);
}
