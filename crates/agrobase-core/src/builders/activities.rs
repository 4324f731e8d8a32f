use uuid::Uuid;

use crate::ids::{IdMap, SeedKey};
use crate::rows::{
    NewActivityTemplate, NewChecklistStep, NewCultivar, NewPhase, NewSchedule,
    NewTemplateResource, QuantityBasis, SchedulePhase, TemplatePhaseLink,
};

#[derive(Debug)]
struct ResourceSeed {
    category: SeedKey,
    unit: SeedKey,
    quantity: f64,
    basis: QuantityBasis,
}

#[derive(Debug)]
struct ChecklistSeed {
    instruction: &'static str,
    critical: bool,
    photo: bool,
}

#[derive(Debug)]
struct TemplateSeed {
    key: SeedKey,
    activity: SeedKey,
    code: &'static str,
    name: &'static str,
    minutes: i32,
    phases: &'static [SeedKey],
    resources: &'static [ResourceSeed],
    checklist: &'static [ChecklistSeed],
}

static TEMPLATE_SEEDS: &[TemplateSeed] = &[
    TemplateSeed {
        key: SeedKey::TemplateDailyIrrigation,
        activity: SeedKey::ActivityIrrigation,
        code: "DAILY_IRRIGATION",
        name: "Daily irrigation",
        minutes: 30,
        phases: &[
            SeedKey::PhaseCannabisPropagation,
            SeedKey::PhaseCannabisVegetative,
            SeedKey::PhaseCannabisFlowering,
        ],
        resources: &[],
        checklist: &[
            ChecklistSeed {
                instruction: "Check runoff EC and pH",
                critical: false,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Confirm every dripper is flowing",
                critical: true,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Record volume applied",
                critical: true,
                photo: false,
            },
        ],
    },
    TemplateSeed {
        key: SeedKey::TemplateFertigation,
        activity: SeedKey::ActivityFertigation,
        code: "FERTIGATION",
        name: "Fertigation",
        minutes: 45,
        phases: &[
            SeedKey::PhaseCannabisVegetative,
            SeedKey::PhaseCannabisFlowering,
            SeedKey::PhaseCoffeeNursery,
            SeedKey::PhaseCoffeeGrowth,
        ],
        resources: &[ResourceSeed {
            category: SeedKey::CategoryFertilizers,
            unit: SeedKey::UnitGram,
            quantity: 2.5,
            basis: QuantityBasis::PerPlant,
        }],
        checklist: &[
            ChecklistSeed {
                instruction: "Calibrate the EC meter",
                critical: true,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Mix nutrient solution to target EC",
                critical: true,
                photo: true,
            },
            ChecklistSeed {
                instruction: "Record batch and volume",
                critical: true,
                photo: false,
            },
        ],
    },
    TemplateSeed {
        key: SeedKey::TemplateCanopyPruning,
        activity: SeedKey::ActivityPruning,
        code: "CANOPY_PRUNING",
        name: "Canopy pruning",
        minutes: 60,
        phases: &[SeedKey::PhaseCannabisVegetative, SeedKey::PhaseCannabisFlowering],
        resources: &[],
        checklist: &[
            ChecklistSeed {
                instruction: "Disinfect shears between plants",
                critical: true,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Remove growth below the trellis net",
                critical: false,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Photograph the canopy after pruning",
                critical: false,
                photo: true,
            },
        ],
    },
    TemplateSeed {
        key: SeedKey::TemplateIpmSpray,
        activity: SeedKey::ActivityCropProtection,
        code: "IPM_SPRAY",
        name: "Preventive IPM spray",
        minutes: 40,
        phases: &[
            SeedKey::PhaseCannabisPropagation,
            SeedKey::PhaseCannabisVegetative,
            SeedKey::PhaseCoffeeNursery,
            SeedKey::PhaseCoffeeGrowth,
        ],
        resources: &[ResourceSeed {
            category: SeedKey::CategoryCropProtection,
            unit: SeedKey::UnitMilliliter,
            quantity: 1.5,
            basis: QuantityBasis::PerSquareMeter,
        }],
        checklist: &[
            ChecklistSeed {
                instruction: "Wear full protective equipment",
                critical: true,
                photo: true,
            },
            ChecklistSeed {
                instruction: "Post re-entry interval signage",
                critical: true,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Record product lot and dose",
                critical: true,
                photo: false,
            },
        ],
    },
    TemplateSeed {
        key: SeedKey::TemplateTransplant,
        activity: SeedKey::ActivityTransplant,
        code: "TRANSPLANT",
        name: "Transplant",
        minutes: 90,
        phases: &[SeedKey::PhaseCannabisPropagation, SeedKey::PhaseCoffeeNursery],
        resources: &[ResourceSeed {
            category: SeedKey::CategorySubstrates,
            unit: SeedKey::UnitLiter,
            quantity: 11.0,
            basis: QuantityBasis::PerPlant,
        }],
        checklist: &[
            ChecklistSeed {
                instruction: "Inspect roots for rot",
                critical: true,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Label each pot with its batch code",
                critical: true,
                photo: false,
            },
        ],
    },
    TemplateSeed {
        key: SeedKey::TemplateHarvestCut,
        activity: SeedKey::ActivityHarvest,
        code: "HARVEST_CUT",
        name: "Harvest cut",
        minutes: 120,
        phases: &[SeedKey::PhaseCannabisHarvest],
        resources: &[],
        checklist: &[
            ChecklistSeed {
                instruction: "Confirm pre-harvest inspection passed",
                critical: true,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Weigh wet biomass per plant",
                critical: true,
                photo: true,
            },
            ChecklistSeed {
                instruction: "Tag the harvest batch",
                critical: true,
                photo: false,
            },
        ],
    },
    TemplateSeed {
        key: SeedKey::TemplateCherryPicking,
        activity: SeedKey::ActivityHarvest,
        code: "CHERRY_PICKING",
        name: "Selective cherry picking",
        minutes: 480,
        phases: &[SeedKey::PhaseCoffeeHarvest],
        resources: &[],
        checklist: &[
            ChecklistSeed {
                instruction: "Pick only fully ripe cherries",
                critical: false,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Weigh baskets at the collection point",
                critical: true,
                photo: true,
            },
        ],
    },
    TemplateSeed {
        key: SeedKey::TemplateWeeklyInspection,
        activity: SeedKey::ActivityInspection,
        code: "WEEKLY_INSPECTION",
        name: "Weekly pest and disease inspection",
        minutes: 20,
        phases: &[
            SeedKey::PhaseCannabisVegetative,
            SeedKey::PhaseCannabisFlowering,
            SeedKey::PhaseCannabisDrying,
            SeedKey::PhaseCannabisCuring,
            SeedKey::PhaseCoffeeGrowth,
            SeedKey::PhaseCoffeeFlowering,
        ],
        resources: &[],
        checklist: &[
            ChecklistSeed {
                instruction: "Scout for pests and disease",
                critical: true,
                photo: false,
            },
            ChecklistSeed {
                instruction: "Photograph any anomaly",
                critical: false,
                photo: true,
            },
        ],
    },
];

#[derive(Debug)]
struct ScheduleSeed {
    key: SeedKey,
    cultivar: SeedKey,
    code: &'static str,
    name: &'static str,
    templates: &'static [SeedKey],
}

static SCHEDULE_SEEDS: &[ScheduleSeed] = &[
    ScheduleSeed {
        key: SeedKey::ScheduleOgKushIndoor,
        cultivar: SeedKey::CultivarOgKush,
        code: "OG_KUSH_INDOOR",
        name: "OG Kush indoor cycle",
        templates: &[
            SeedKey::TemplateDailyIrrigation,
            SeedKey::TemplateFertigation,
            SeedKey::TemplateCanopyPruning,
            SeedKey::TemplateIpmSpray,
            SeedKey::TemplateTransplant,
            SeedKey::TemplateHarvestCut,
            SeedKey::TemplateWeeklyInspection,
        ],
    },
    ScheduleSeed {
        key: SeedKey::ScheduleBlueDreamIndoor,
        cultivar: SeedKey::CultivarBlueDream,
        code: "BLUE_DREAM_INDOOR",
        name: "Blue Dream indoor cycle",
        templates: &[
            SeedKey::TemplateDailyIrrigation,
            SeedKey::TemplateFertigation,
            SeedKey::TemplateIpmSpray,
            SeedKey::TemplateTransplant,
            SeedKey::TemplateHarvestCut,
            SeedKey::TemplateWeeklyInspection,
        ],
    },
    ScheduleSeed {
        key: SeedKey::ScheduleCastilloField,
        cultivar: SeedKey::CultivarCastillo,
        code: "CASTILLO_FIELD",
        name: "Castillo field establishment",
        templates: &[
            SeedKey::TemplateFertigation,
            SeedKey::TemplateIpmSpray,
            SeedKey::TemplateTransplant,
            SeedKey::TemplateCherryPicking,
            SeedKey::TemplateWeeklyInspection,
        ],
    },
];

pub fn templates(tenant_id: Uuid, ids: &IdMap) -> Vec<NewActivityTemplate> {
    TEMPLATE_SEEDS
        .iter()
        .map(|seed| NewActivityTemplate {
            id: ids[seed.key],
            tenant_id,
            activity_type_id: ids[seed.activity],
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            estimated_minutes: seed.minutes,
        })
        .collect()
}

pub fn template_phases(tenant_id: Uuid, ids: &IdMap) -> Vec<TemplatePhaseLink> {
    TEMPLATE_SEEDS
        .iter()
        .flat_map(|seed| {
            seed.phases.iter().map(move |phase| TemplatePhaseLink {
                id: ids.child(seed.key, &format!("phase/{}", phase.name())),
                tenant_id,
                template_id: ids[seed.key],
                phase_id: ids[*phase],
            })
        })
        .collect()
}

pub fn template_resources(tenant_id: Uuid, ids: &IdMap) -> Vec<NewTemplateResource> {
    TEMPLATE_SEEDS
        .iter()
        .flat_map(|seed| {
            seed.resources.iter().map(move |resource| NewTemplateResource {
                id: ids.child(seed.key, &format!("resource/{}", resource.category.name())),
                tenant_id,
                template_id: ids[seed.key],
                category_id: ids[resource.category],
                // Products are written after templates.
                product_id: None,
                unit_id: ids[resource.unit],
                quantity: resource.quantity,
                basis: resource.basis,
            })
        })
        .collect()
}

pub fn checklist_steps(tenant_id: Uuid, ids: &IdMap) -> Vec<NewChecklistStep> {
    TEMPLATE_SEEDS
        .iter()
        .flat_map(|seed| {
            seed.checklist.iter().enumerate().map(move |(index, item)| {
                let step_order = index as i32 + 1;
                NewChecklistStep {
                    id: ids.child(seed.key, &format!("step/{step_order}")),
                    tenant_id,
                    template_id: ids[seed.key],
                    step_order,
                    instruction: item.instruction.to_string(),
                    is_critical: item.critical,
                    requires_photo: item.photo,
                }
            })
        })
        .collect()
}

/// Schedules walk every phase of the cultivar's crop in sort order, taking the
/// duration from the cultivar row and attaching the schedule's templates that
/// apply to that phase.
pub fn schedules(
    tenant_id: Uuid,
    ids: &IdMap,
    phases: &[NewPhase],
    cultivars: &[NewCultivar],
) -> Vec<NewSchedule> {
    SCHEDULE_SEEDS
        .iter()
        .filter_map(|seed| {
            let cultivar = cultivars.iter().find(|c| c.id == ids[seed.cultivar])?;

            let mut crop_phases: Vec<&NewPhase> = phases
                .iter()
                .filter(|phase| phase.crop_type_id == cultivar.crop_type_id)
                .collect();
            crop_phases.sort_by_key(|phase| phase.sort_order);

            let schedule_phases: Vec<SchedulePhase> = crop_phases
                .into_iter()
                .map(|phase| SchedulePhase {
                    phase_id: phase.id,
                    duration_days: cultivar
                        .phase_durations
                        .get(&phase.id)
                        .copied()
                        .unwrap_or(phase.default_duration_days),
                    template_ids: seed
                        .templates
                        .iter()
                        .filter_map(|key| TEMPLATE_SEEDS.iter().find(|t| t.key == *key))
                        .filter(|template| {
                            template.phases.iter().any(|p| ids[*p] == phase.id)
                        })
                        .map(|template| ids[template.key])
                        .collect(),
                })
                .collect();

            Some(NewSchedule {
                id: ids[seed.key],
                tenant_id,
                cultivar_id: cultivar.id,
                code: seed.code.to_string(),
                name: seed.name.to_string(),
                total_days: schedule_phases.iter().map(|p| p.duration_days).sum(),
                phases: schedule_phases,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_templates_apply_to_some_phase_of_the_crop() {
        let ids = IdMap::allocate();
        let tenant = Uuid::new_v4();
        let phases = super::super::crops::phases(tenant, &ids);
        let cultivars = super::super::crops::cultivars(tenant, &ids, &phases);

        for schedule in schedules(tenant, &ids, &phases, &cultivars) {
            let seed = SCHEDULE_SEEDS.iter().find(|s| ids[s.key] == schedule.id).unwrap();
            for template in seed.templates {
                let used = schedule
                    .phases
                    .iter()
                    .any(|p| p.template_ids.contains(&ids[*template]));
                assert!(used, "{} never uses {}", seed.code, template.name());
            }
        }
    }

    #[test]
    fn checklist_orders_start_at_one_per_template() {
        let ids = IdMap::allocate();
        let steps = checklist_steps(Uuid::new_v4(), &ids);
        for seed in TEMPLATE_SEEDS {
            let mut orders: Vec<i32> = steps
                .iter()
                .filter(|s| s.template_id == ids[seed.key])
                .map(|s| s.step_order)
                .collect();
            orders.sort();
            let expected: Vec<i32> = (1..=seed.checklist.len() as i32).collect();
            assert_eq!(orders, expected, "{}", seed.code);
        }
    }
}
