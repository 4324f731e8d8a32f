//! The starter dataset a new tenant receives, built as in-memory rows before
//! anything is written.

mod activities;
mod catalogs;
mod crops;
mod operations;
mod regulatory;

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::ids::IdMap;
use crate::plan::Step;
use crate::rows::{
    BaseUnitLink, Batch, NewActivityTemplate, NewActivityType, NewCategory, NewChecklistStep,
    NewCropType, NewCultivar, NewDocumentType, NewFacility, NewPhase, NewPhaseFlow, NewProduct,
    NewRequirement, NewSchedule, NewSupplier, NewTemplateResource, NewUnit, NewZone,
    NewZoneStructure, ParentLink, PhaseDependencyLink, TemplatePhaseLink,
};

/// Every row of the starter dataset for one tenant.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub categories: Vec<NewCategory>,
    pub category_parents: Vec<ParentLink>,
    pub units: Vec<NewUnit>,
    pub unit_base_units: Vec<BaseUnitLink>,
    pub activity_types: Vec<NewActivityType>,
    pub crop_types: Vec<NewCropType>,
    pub document_types: Vec<NewDocumentType>,
    pub phases: Vec<NewPhase>,
    pub phase_dependencies: Vec<PhaseDependencyLink>,
    pub category_requirements: Vec<NewRequirement>,
    pub cultivars: Vec<NewCultivar>,
    pub phase_flows: Vec<NewPhaseFlow>,
    pub templates: Vec<NewActivityTemplate>,
    pub template_phases: Vec<TemplatePhaseLink>,
    pub template_resources: Vec<NewTemplateResource>,
    pub checklist_steps: Vec<NewChecklistStep>,
    pub schedules: Vec<NewSchedule>,
    pub suppliers: Vec<NewSupplier>,
    pub facilities: Vec<NewFacility>,
    pub products: Vec<NewProduct>,
    pub zones: Vec<NewZone>,
    pub product_requirements: Vec<NewRequirement>,
    pub zone_structures: Vec<NewZoneStructure>,
}

impl SeedData {
    /// Build the whole dataset for `tenant_id`, pointing every reference at an
    /// identifier from `ids`.
    pub fn build(tenant_id: Uuid, ids: &IdMap) -> Self {
        let phases = crops::phases(tenant_id, ids);
        let cultivars = crops::cultivars(tenant_id, ids, &phases);
        let schedules = activities::schedules(tenant_id, ids, &phases, &cultivars);

        Self {
            categories: catalogs::categories(tenant_id, ids),
            category_parents: catalogs::category_parents(tenant_id, ids),
            units: catalogs::units(tenant_id, ids),
            unit_base_units: catalogs::unit_base_units(tenant_id, ids),
            activity_types: catalogs::activity_types(tenant_id, ids),
            crop_types: crops::crop_types(tenant_id, ids),
            document_types: catalogs::document_types(tenant_id, ids),
            phase_dependencies: crops::phase_dependencies(tenant_id, ids),
            phases,
            category_requirements: regulatory::category_requirements(tenant_id, ids),
            phase_flows: crops::phase_flows(tenant_id, ids),
            cultivars,
            templates: activities::templates(tenant_id, ids),
            template_phases: activities::template_phases(tenant_id, ids),
            template_resources: activities::template_resources(tenant_id, ids),
            checklist_steps: activities::checklist_steps(tenant_id, ids),
            schedules,
            suppliers: operations::suppliers(tenant_id, ids),
            facilities: operations::facilities(tenant_id, ids),
            products: operations::products(tenant_id, ids),
            zones: operations::zones(tenant_id, ids),
            product_requirements: regulatory::product_requirements(tenant_id, ids),
            zone_structures: operations::zone_structures(tenant_id, ids),
        }
    }

    /// The dataset split into store calls, grouped by the step that makes them.
    /// Each step's batches follow [`Step::writes`].
    pub fn into_work(self) -> BTreeMap<Step, Vec<Batch>> {
        BTreeMap::from([
            (Step::Categories, vec![Batch::Categories(self.categories)]),
            (Step::Units, vec![Batch::Units(self.units)]),
            (Step::ActivityTypes, vec![Batch::ActivityTypes(self.activity_types)]),
            (Step::CropTypes, vec![Batch::CropTypes(self.crop_types)]),
            (Step::DocumentTypes, vec![Batch::DocumentTypes(self.document_types)]),
            (
                Step::CategoryHierarchy,
                vec![Batch::CategoryParents(self.category_parents)],
            ),
            (
                Step::UnitConversions,
                vec![Batch::UnitBaseUnits(self.unit_base_units)],
            ),
            (Step::Phases, vec![Batch::Phases(self.phases)]),
            (
                Step::PhaseDependencies,
                vec![Batch::PhaseDependencies(self.phase_dependencies)],
            ),
            (
                Step::CategoryRequirements,
                vec![Batch::Requirements(self.category_requirements)],
            ),
            (Step::Cultivars, vec![Batch::Cultivars(self.cultivars)]),
            (Step::PhaseFlows, vec![Batch::PhaseFlows(self.phase_flows)]),
            (
                Step::ActivityTemplates,
                vec![
                    Batch::Templates(self.templates),
                    Batch::TemplatePhases(self.template_phases),
                    Batch::TemplateResources(self.template_resources),
                    Batch::ChecklistSteps(self.checklist_steps),
                ],
            ),
            (Step::Schedules, vec![Batch::Schedules(self.schedules)]),
            (Step::Suppliers, vec![Batch::Suppliers(self.suppliers)]),
            (Step::Facilities, vec![Batch::Facilities(self.facilities)]),
            (Step::Products, vec![Batch::Products(self.products)]),
            (Step::Zones, vec![Batch::Zones(self.zones)]),
            (
                Step::ProductRequirements,
                vec![Batch::Requirements(self.product_requirements)],
            ),
            (
                Step::ZoneStructures,
                vec![Batch::ZoneStructures(self.zone_structures)],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_matches_declared_writes() {
        let work = SeedData::build(Uuid::new_v4(), &IdMap::allocate()).into_work();
        for step in Step::ALL {
            let batches = &work[&step];
            let shapes: Vec<_> = batches.iter().map(|b| (b.table(), b.kind())).collect();
            assert_eq!(shapes, step.writes(), "{step}");
        }
    }

    #[test]
    fn every_step_has_rows() {
        let work = SeedData::build(Uuid::new_v4(), &IdMap::allocate()).into_work();
        for (step, batches) in &work {
            assert!(batches.iter().all(|b| !b.is_empty()), "{step} has an empty batch");
        }
    }
}
