use std::collections::{BTreeSet, HashSet};

use agrobase_core::builders::SeedData;
use agrobase_core::ids::IdMap;
use agrobase_core::plan::seed_plan;
use agrobase_core::rows::{Batch, BatchKind, ItemRef, Table};
use uuid::Uuid;

fn dataset() -> (Uuid, SeedData) {
    let tenant = Uuid::new_v4();
    (tenant, SeedData::build(tenant, &IdMap::allocate()))
}

#[test]
fn references_resolve_to_earlier_layers_or_earlier_batches_of_the_step() {
    let (_, data) = dataset();
    let mut work = data.into_work();
    let plan = seed_plan().unwrap();

    let mut committed: HashSet<(Table, Uuid)> = HashSet::new();
    for (offset, steps) in plan.layers().iter().enumerate() {
        let mut layer_rows = Vec::new();
        for step in steps {
            let mut step_rows: HashSet<(Table, Uuid)> = HashSet::new();
            for batch in work.remove(step).unwrap_or_default() {
                for reference in batch.references() {
                    let key = (reference.table, reference.id);
                    assert!(
                        committed.contains(&key) || step_rows.contains(&key),
                        "layer {} {step}: {}.{} points at a missing {} row",
                        offset + 1,
                        batch.table(),
                        reference.column,
                        reference.table
                    );
                }
                for id in batch.inserted_ids() {
                    step_rows.insert((batch.table(), id));
                }
            }
            layer_rows.extend(step_rows);
        }
        committed.extend(layer_rows);
    }
    assert!(work.is_empty());
}

#[test]
fn every_row_belongs_to_the_tenant() {
    let (tenant, data) = dataset();
    for batch in data.into_work().into_values().flatten() {
        for reference in batch.references() {
            assert_eq!(reference.tenant_id, tenant);
        }
        if batch.kind() == BatchKind::Insert {
            for row in batch.encode().unwrap() {
                assert_eq!(row["tenant_id"], tenant.to_string());
            }
        }
    }
}

#[test]
fn inserted_ids_are_unique_across_the_dataset() {
    let (_, data) = dataset();
    let mut seen = HashSet::new();
    for batch in data.into_work().into_values().flatten() {
        for id in batch.inserted_ids() {
            assert!(seen.insert(id), "{id} inserted twice");
        }
    }
}

#[test]
fn requirements_target_products_and_categories() {
    let (_, data) = dataset();
    let category_level: Vec<_> = data.category_requirements.iter().map(|r| r.target).collect();
    let product_level: Vec<_> = data.product_requirements.iter().map(|r| r.target).collect();

    assert!(!category_level.is_empty());
    assert!(!product_level.is_empty());
    assert!(category_level.iter().all(|t| matches!(t, ItemRef::Category(_))));
    assert!(product_level.iter().all(|t| matches!(t, ItemRef::Product(_))));

    for row in Batch::Requirements(data.product_requirements).encode().unwrap() {
        assert_eq!(row["target"]["kind"], "product");
    }
}

#[test]
fn zone_structure_payloads_leave_capacity_to_the_store() {
    let (_, data) = dataset();
    let rows = Batch::ZoneStructures(data.zone_structures).encode().unwrap();
    assert!(!rows.is_empty());
    for row in rows {
        assert!(row.get("max_positions").is_none());
        assert!(row["levels"].as_i64().unwrap() > 0);
        assert!(row["positions_per_level"].as_i64().unwrap() > 0);
    }
}

#[test]
fn template_resources_never_name_a_product() {
    let (_, data) = dataset();
    assert!(data.template_resources.iter().all(|r| r.product_id.is_none()));
}

#[test]
fn schedules_cover_every_phase_of_their_crop_in_order() {
    let (_, data) = dataset();
    for schedule in &data.schedules {
        let cultivar = data
            .cultivars
            .iter()
            .find(|c| c.id == schedule.cultivar_id)
            .unwrap();
        let mut crop_phases: Vec<_> = data
            .phases
            .iter()
            .filter(|p| p.crop_type_id == cultivar.crop_type_id)
            .collect();
        crop_phases.sort_by_key(|p| p.sort_order);

        let scheduled: Vec<Uuid> = schedule.phases.iter().map(|p| p.phase_id).collect();
        let expected: Vec<Uuid> = crop_phases.iter().map(|p| p.id).collect();
        assert_eq!(scheduled, expected, "{}", schedule.code);

        let total: i32 = schedule.phases.iter().map(|p| p.duration_days).sum();
        assert_eq!(total, schedule.total_days);
        for phase in &schedule.phases {
            assert_eq!(cultivar.phase_durations[&phase.phase_id], phase.duration_days);
        }
    }
}

#[test]
fn checklist_order_is_explicit_and_unique_per_template() {
    let (_, data) = dataset();
    let mut seen = BTreeSet::new();
    for step in &data.checklist_steps {
        assert!(step.step_order >= 1);
        assert!(seen.insert((step.template_id, step.step_order)));
    }
}

#[test]
fn codes_are_unique_within_each_table() {
    let (_, data) = dataset();
    for batch in data.into_work().into_values().flatten() {
        if batch.kind() == BatchKind::Link {
            continue;
        }
        let table = batch.table();
        let mut codes = HashSet::new();
        for row in batch.encode().unwrap() {
            if let Some(code) = row.get("code").or_else(|| row.get("sku")) {
                assert!(codes.insert(code.to_string()), "{table}: duplicate {code}");
            }
        }
    }
}
