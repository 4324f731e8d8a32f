use std::collections::BTreeMap;

use uuid::Uuid;

use crate::ids::{IdMap, SeedKey};
use crate::rows::{
    CropLifecycle, FlowDirection, FlowRole, ItemRef, NewCropType, NewCultivar, NewPhase,
    NewPhaseFlow, PhaseDependencyLink,
};

static CROP_TYPE_SEEDS: &[(SeedKey, &str, &str, &str, CropLifecycle)] = &[
    (
        SeedKey::CropCannabis,
        "CANNABIS",
        "Cannabis",
        "Cannabis sativa L.",
        CropLifecycle::Annual,
    ),
    (
        SeedKey::CropCoffee,
        "COFFEE",
        "Coffee",
        "Coffea arabica L.",
        CropLifecycle::Perennial,
    ),
];

#[derive(Debug)]
struct PhaseSeed {
    key: SeedKey,
    crop: SeedKey,
    code: &'static str,
    name: &'static str,
    sort_order: i32,
    default_days: i32,
    depends_on: Option<SeedKey>,
}

static PHASE_SEEDS: &[PhaseSeed] = &[
    PhaseSeed {
        key: SeedKey::PhaseCannabisGermination,
        crop: SeedKey::CropCannabis,
        code: "CAN_GERMINATION",
        name: "Germination",
        sort_order: 1,
        default_days: 7,
        depends_on: None,
    },
    PhaseSeed {
        key: SeedKey::PhaseCannabisPropagation,
        crop: SeedKey::CropCannabis,
        code: "CAN_PROPAGATION",
        name: "Propagation",
        sort_order: 2,
        default_days: 14,
        depends_on: Some(SeedKey::PhaseCannabisGermination),
    },
    PhaseSeed {
        key: SeedKey::PhaseCannabisVegetative,
        crop: SeedKey::CropCannabis,
        code: "CAN_VEGETATIVE",
        name: "Vegetative",
        sort_order: 3,
        default_days: 28,
        depends_on: Some(SeedKey::PhaseCannabisPropagation),
    },
    PhaseSeed {
        key: SeedKey::PhaseCannabisFlowering,
        crop: SeedKey::CropCannabis,
        code: "CAN_FLOWERING",
        name: "Flowering",
        sort_order: 4,
        default_days: 63,
        depends_on: Some(SeedKey::PhaseCannabisVegetative),
    },
    PhaseSeed {
        key: SeedKey::PhaseCannabisHarvest,
        crop: SeedKey::CropCannabis,
        code: "CAN_HARVEST",
        name: "Harvest",
        sort_order: 5,
        default_days: 2,
        depends_on: Some(SeedKey::PhaseCannabisFlowering),
    },
    PhaseSeed {
        key: SeedKey::PhaseCannabisDrying,
        crop: SeedKey::CropCannabis,
        code: "CAN_DRYING",
        name: "Drying",
        sort_order: 6,
        default_days: 10,
        depends_on: Some(SeedKey::PhaseCannabisHarvest),
    },
    PhaseSeed {
        key: SeedKey::PhaseCannabisCuring,
        crop: SeedKey::CropCannabis,
        code: "CAN_CURING",
        name: "Curing",
        sort_order: 7,
        default_days: 21,
        depends_on: Some(SeedKey::PhaseCannabisDrying),
    },
    PhaseSeed {
        key: SeedKey::PhaseCoffeeGermination,
        crop: SeedKey::CropCoffee,
        code: "COF_GERMINATION",
        name: "Germination",
        sort_order: 1,
        default_days: 60,
        depends_on: None,
    },
    PhaseSeed {
        key: SeedKey::PhaseCoffeeNursery,
        crop: SeedKey::CropCoffee,
        code: "COF_NURSERY",
        name: "Nursery",
        sort_order: 2,
        default_days: 180,
        depends_on: Some(SeedKey::PhaseCoffeeGermination),
    },
    PhaseSeed {
        key: SeedKey::PhaseCoffeeGrowth,
        crop: SeedKey::CropCoffee,
        code: "COF_GROWTH",
        name: "Vegetative growth",
        sort_order: 3,
        default_days: 540,
        depends_on: Some(SeedKey::PhaseCoffeeNursery),
    },
    PhaseSeed {
        key: SeedKey::PhaseCoffeeFlowering,
        crop: SeedKey::CropCoffee,
        code: "COF_FLOWERING",
        name: "Flowering",
        sort_order: 4,
        default_days: 30,
        depends_on: Some(SeedKey::PhaseCoffeeGrowth),
    },
    PhaseSeed {
        key: SeedKey::PhaseCoffeeHarvest,
        crop: SeedKey::CropCoffee,
        code: "COF_HARVEST",
        name: "Harvest",
        sort_order: 5,
        default_days: 90,
        depends_on: Some(SeedKey::PhaseCoffeeFlowering),
    },
    PhaseSeed {
        key: SeedKey::PhaseCoffeeProcessing,
        crop: SeedKey::CropCoffee,
        code: "COF_PROCESSING",
        name: "Wet processing",
        sort_order: 6,
        default_days: 3,
        depends_on: Some(SeedKey::PhaseCoffeeHarvest),
    },
    PhaseSeed {
        key: SeedKey::PhaseCoffeeDrying,
        crop: SeedKey::CropCoffee,
        code: "COF_DRYING",
        name: "Drying",
        sort_order: 7,
        default_days: 14,
        depends_on: Some(SeedKey::PhaseCoffeeProcessing),
    },
];

#[derive(Debug)]
struct CultivarSeed {
    key: SeedKey,
    crop: SeedKey,
    code: &'static str,
    name: &'static str,
    breeder: Option<&'static str>,
    yield_per_plant_g: Option<f64>,
    /// Phase durations that differ from the phase default.
    overrides: &'static [(SeedKey, i32)],
}

static CULTIVAR_SEEDS: &[CultivarSeed] = &[
    CultivarSeed {
        key: SeedKey::CultivarOgKush,
        crop: SeedKey::CropCannabis,
        code: "OG_KUSH",
        name: "OG Kush",
        breeder: None,
        yield_per_plant_g: Some(450.0),
        overrides: &[(SeedKey::PhaseCannabisFlowering, 56)],
    },
    CultivarSeed {
        key: SeedKey::CultivarBlueDream,
        crop: SeedKey::CropCannabis,
        code: "BLUE_DREAM",
        name: "Blue Dream",
        breeder: None,
        yield_per_plant_g: Some(550.0),
        overrides: &[
            (SeedKey::PhaseCannabisVegetative, 35),
            (SeedKey::PhaseCannabisFlowering, 67),
        ],
    },
    CultivarSeed {
        key: SeedKey::CultivarCharlottesWeb,
        crop: SeedKey::CropCannabis,
        code: "CHARLOTTES_WEB",
        name: "Charlotte's Web",
        breeder: Some("Stanley Brothers"),
        yield_per_plant_g: Some(400.0),
        overrides: &[(SeedKey::PhaseCannabisFlowering, 60)],
    },
    CultivarSeed {
        key: SeedKey::CultivarCastillo,
        crop: SeedKey::CropCoffee,
        code: "CASTILLO",
        name: "Castillo",
        breeder: Some("Cenicafé"),
        yield_per_plant_g: Some(2500.0),
        overrides: &[(SeedKey::PhaseCoffeeGrowth, 510)],
    },
    CultivarSeed {
        key: SeedKey::CultivarCaturra,
        crop: SeedKey::CropCoffee,
        code: "CATURRA",
        name: "Caturra",
        breeder: None,
        yield_per_plant_g: Some(2000.0),
        overrides: &[
            (SeedKey::PhaseCoffeeGrowth, 570),
            (SeedKey::PhaseCoffeeHarvest, 75),
        ],
    },
];

#[derive(Debug)]
struct FlowSeed {
    crop: SeedKey,
    phase: SeedKey,
    direction: FlowDirection,
    role: FlowRole,
    category: SeedKey,
    unit: SeedKey,
    yield_pct: Option<f64>,
}

// Applied to every cultivar of `crop`.
static FLOW_SEEDS: &[FlowSeed] = &[
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisGermination,
        direction: FlowDirection::Input,
        role: FlowRole::Primary,
        category: SeedKey::CategorySeeds,
        unit: SeedKey::UnitEach,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisPropagation,
        direction: FlowDirection::Input,
        role: FlowRole::Secondary,
        category: SeedKey::CategorySubstrates,
        unit: SeedKey::UnitLiter,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisHarvest,
        direction: FlowDirection::Output,
        role: FlowRole::Primary,
        category: SeedKey::CategoryFreshFlower,
        unit: SeedKey::UnitGram,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisHarvest,
        direction: FlowDirection::Output,
        role: FlowRole::Byproduct,
        category: SeedKey::CategoryWaste,
        unit: SeedKey::UnitGram,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisDrying,
        direction: FlowDirection::Input,
        role: FlowRole::Primary,
        category: SeedKey::CategoryFreshFlower,
        unit: SeedKey::UnitGram,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisDrying,
        direction: FlowDirection::Output,
        role: FlowRole::Primary,
        category: SeedKey::CategoryDriedFlower,
        unit: SeedKey::UnitGram,
        yield_pct: Some(22.0),
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisDrying,
        direction: FlowDirection::Output,
        role: FlowRole::Waste,
        category: SeedKey::CategoryWaste,
        unit: SeedKey::UnitGram,
        yield_pct: Some(78.0),
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisCuring,
        direction: FlowDirection::Input,
        role: FlowRole::Primary,
        category: SeedKey::CategoryDriedFlower,
        unit: SeedKey::UnitGram,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCannabis,
        phase: SeedKey::PhaseCannabisCuring,
        direction: FlowDirection::Output,
        role: FlowRole::Primary,
        category: SeedKey::CategoryDriedFlower,
        unit: SeedKey::UnitGram,
        yield_pct: Some(97.5),
    },
    FlowSeed {
        crop: SeedKey::CropCoffee,
        phase: SeedKey::PhaseCoffeeGermination,
        direction: FlowDirection::Input,
        role: FlowRole::Primary,
        category: SeedKey::CategorySeeds,
        unit: SeedKey::UnitGram,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCoffee,
        phase: SeedKey::PhaseCoffeeHarvest,
        direction: FlowDirection::Output,
        role: FlowRole::Primary,
        category: SeedKey::CategoryCoffeeCherry,
        unit: SeedKey::UnitKilogram,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCoffee,
        phase: SeedKey::PhaseCoffeeProcessing,
        direction: FlowDirection::Input,
        role: FlowRole::Primary,
        category: SeedKey::CategoryCoffeeCherry,
        unit: SeedKey::UnitKilogram,
        yield_pct: None,
    },
    FlowSeed {
        crop: SeedKey::CropCoffee,
        phase: SeedKey::PhaseCoffeeProcessing,
        direction: FlowDirection::Output,
        role: FlowRole::Byproduct,
        category: SeedKey::CategoryWaste,
        unit: SeedKey::UnitKilogram,
        yield_pct: Some(41.0),
    },
    FlowSeed {
        crop: SeedKey::CropCoffee,
        phase: SeedKey::PhaseCoffeeDrying,
        direction: FlowDirection::Output,
        role: FlowRole::Primary,
        category: SeedKey::CategoryGreenCoffee,
        unit: SeedKey::UnitKilogram,
        yield_pct: Some(18.5),
    },
];

pub fn crop_types(tenant_id: Uuid, ids: &IdMap) -> Vec<NewCropType> {
    CROP_TYPE_SEEDS
        .iter()
        .map(|(key, code, name, scientific_name, lifecycle)| NewCropType {
            id: ids[*key],
            tenant_id,
            code: code.to_string(),
            name: name.to_string(),
            scientific_name: scientific_name.to_string(),
            lifecycle: *lifecycle,
        })
        .collect()
}

pub fn phases(tenant_id: Uuid, ids: &IdMap) -> Vec<NewPhase> {
    PHASE_SEEDS
        .iter()
        .map(|seed| NewPhase {
            id: ids[seed.key],
            tenant_id,
            crop_type_id: ids[seed.crop],
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            sort_order: seed.sort_order,
            default_duration_days: seed.default_days,
        })
        .collect()
}

pub fn phase_dependencies(tenant_id: Uuid, ids: &IdMap) -> Vec<PhaseDependencyLink> {
    PHASE_SEEDS
        .iter()
        .filter_map(|seed| {
            seed.depends_on.map(|earlier| PhaseDependencyLink {
                tenant_id,
                phase_id: ids[seed.key],
                depends_on_phase_id: ids[earlier],
            })
        })
        .collect()
}

/// Cultivar rows with one duration per phase of their crop type, taken from
/// the already-built phase rows.
pub fn cultivars(tenant_id: Uuid, ids: &IdMap, phases: &[NewPhase]) -> Vec<NewCultivar> {
    CULTIVAR_SEEDS
        .iter()
        .map(|seed| {
            let crop_type_id = ids[seed.crop];
            let phase_durations = phases
                .iter()
                .filter(|phase| phase.crop_type_id == crop_type_id)
                .map(|phase| {
                    let days = seed
                        .overrides
                        .iter()
                        .find(|(key, _)| ids[*key] == phase.id)
                        .map(|(_, days)| *days)
                        .unwrap_or(phase.default_duration_days);
                    (phase.id, days)
                })
                .collect::<BTreeMap<_, _>>();

            NewCultivar {
                id: ids[seed.key],
                tenant_id,
                crop_type_id,
                code: seed.code.to_string(),
                name: seed.name.to_string(),
                breeder: seed.breeder.map(str::to_string),
                expected_yield_per_plant_g: seed.yield_per_plant_g,
                phase_durations,
            }
        })
        .collect()
}

pub fn phase_flows(tenant_id: Uuid, ids: &IdMap) -> Vec<NewPhaseFlow> {
    let mut rows = Vec::new();
    for cultivar in CULTIVAR_SEEDS {
        let flows = FLOW_SEEDS.iter().filter(|flow| flow.crop == cultivar.crop);
        for (index, flow) in flows.enumerate() {
            let discriminator = format!(
                "flow/{}/{}/{}/{}",
                flow.phase.name(),
                flow.direction,
                flow.role,
                flow.category.name()
            );
            rows.push(NewPhaseFlow {
                id: ids.child(cultivar.key, &discriminator),
                tenant_id,
                cultivar_id: ids[cultivar.key],
                phase_id: ids[flow.phase],
                direction: flow.direction,
                role: flow.role,
                item: ItemRef::Category(ids[flow.category]),
                unit_id: ids[flow.unit],
                expected_yield_pct: flow.yield_pct,
                sort_order: index as i32 + 1,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_stay_within_one_crop() {
        for seed in PHASE_SEEDS {
            if let Some(earlier) = seed.depends_on {
                let target = PHASE_SEEDS.iter().find(|p| p.key == earlier).expect("seeded");
                assert_eq!(target.crop, seed.crop, "{} crosses crops", seed.code);
                assert!(target.sort_order < seed.sort_order);
            }
        }
    }

    #[test]
    fn overrides_name_phases_of_the_cultivar_crop() {
        for cultivar in CULTIVAR_SEEDS {
            for (phase, _) in cultivar.overrides {
                let seed = PHASE_SEEDS.iter().find(|p| p.key == *phase).expect("seeded");
                assert_eq!(seed.crop, cultivar.crop, "{}", cultivar.code);
            }
        }
    }

    #[test]
    fn flows_only_touch_phases_of_their_crop() {
        for flow in FLOW_SEEDS {
            let phase = PHASE_SEEDS.iter().find(|p| p.key == flow.phase).expect("seeded");
            assert_eq!(phase.crop, flow.crop);
            if flow.direction == FlowDirection::Input {
                assert!(flow.yield_pct.is_none());
            }
        }
    }
}
