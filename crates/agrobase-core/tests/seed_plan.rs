use std::collections::BTreeSet;

use agrobase_core::plan::{seed_plan, SeedPlan, Step};

#[test]
fn derived_plan_has_the_nine_expected_layers() {
    use Step::*;

    let plan = seed_plan().unwrap();
    let expected: Vec<BTreeSet<Step>> = vec![
        BTreeSet::from([Categories, Units, ActivityTypes, CropTypes, DocumentTypes]),
        BTreeSet::from([CategoryHierarchy, UnitConversions, Phases]),
        BTreeSet::from([PhaseDependencies, CategoryRequirements]),
        BTreeSet::from([Cultivars]),
        BTreeSet::from([PhaseFlows, ActivityTemplates]),
        BTreeSet::from([Schedules]),
        BTreeSet::from([Suppliers, Facilities]),
        BTreeSet::from([Products, Zones]),
        BTreeSet::from([ProductRequirements, ZoneStructures]),
    ];
    let layers: Vec<BTreeSet<Step>> = plan
        .layers()
        .iter()
        .map(|layer| layer.iter().copied().collect())
        .collect();
    assert_eq!(layers, expected);
}

#[test]
fn every_step_is_placed_exactly_once() {
    let plan = seed_plan().unwrap();
    let placed: Vec<Step> = plan.layers().iter().flatten().copied().collect();
    assert_eq!(placed.len(), Step::ALL.len());
    let unique: BTreeSet<Step> = placed.into_iter().collect();
    assert_eq!(unique.len(), Step::ALL.len());
}

#[test]
fn prerequisites_sit_in_strictly_earlier_layers() {
    let plan = seed_plan().unwrap();
    for step in Step::ALL {
        let layer = plan.layer_of(step).unwrap();
        for prereq in step.prerequisites() {
            let earlier = plan.layer_of(prereq).unwrap();
            assert!(earlier < layer, "{step} (layer {layer}) needs {prereq} (layer {earlier})");
        }
    }
}

#[test]
fn each_step_sits_right_after_its_latest_prerequisite() {
    let plan = seed_plan().unwrap();
    for step in Step::ALL {
        let latest = step
            .prerequisites()
            .into_iter()
            .filter_map(|prereq| plan.layer_of(prereq))
            .max()
            .unwrap_or(0);
        assert_eq!(plan.layer_of(step), Some(latest + 1), "{step}");
    }
}

#[test]
fn derivation_is_stable() {
    let derived = SeedPlan::derive().unwrap();
    assert_eq!(&derived, seed_plan().unwrap());
    assert_eq!(derived.len(), 9);
}
