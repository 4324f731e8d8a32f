//! Seed steps, their declared prerequisites, and the layer plan derived from
//! them.
//!
//! A step lands in layer `1 + max(layer of its prerequisites)`. Adding an
//! entity type means adding a step and naming what it needs; its layer
//! follows from that.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use crate::rows::{BatchKind, Table};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("seed steps form a dependency cycle: {0:?}")]
    Cycle(Vec<Step>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Categories,
    Units,
    ActivityTypes,
    CropTypes,
    DocumentTypes,
    CategoryHierarchy,
    UnitConversions,
    Phases,
    PhaseDependencies,
    CategoryRequirements,
    Cultivars,
    PhaseFlows,
    ActivityTemplates,
    Schedules,
    Suppliers,
    Facilities,
    Products,
    Zones,
    ProductRequirements,
    ZoneStructures,
}

impl Step {
    pub const ALL: [Step; 20] = [
        Step::Categories,
        Step::Units,
        Step::ActivityTypes,
        Step::CropTypes,
        Step::DocumentTypes,
        Step::CategoryHierarchy,
        Step::UnitConversions,
        Step::Phases,
        Step::PhaseDependencies,
        Step::CategoryRequirements,
        Step::Cultivars,
        Step::PhaseFlows,
        Step::ActivityTemplates,
        Step::Schedules,
        Step::Suppliers,
        Step::Facilities,
        Step::Products,
        Step::Zones,
        Step::ProductRequirements,
        Step::ZoneStructures,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Categories => "categories",
            Step::Units => "units",
            Step::ActivityTypes => "activity_types",
            Step::CropTypes => "crop_types",
            Step::DocumentTypes => "document_types",
            Step::CategoryHierarchy => "category_hierarchy",
            Step::UnitConversions => "unit_conversions",
            Step::Phases => "phases",
            Step::PhaseDependencies => "phase_dependencies",
            Step::CategoryRequirements => "category_requirements",
            Step::Cultivars => "cultivars",
            Step::PhaseFlows => "phase_flows",
            Step::ActivityTemplates => "activity_templates",
            Step::Schedules => "schedules",
            Step::Suppliers => "suppliers",
            Step::Facilities => "facilities",
            Step::Products => "products",
            Step::Zones => "zones",
            Step::ProductRequirements => "product_requirements",
            Step::ZoneStructures => "zone_structures",
        }
    }

    /// Steps whose rows this step's rows point at.
    pub fn requires(self) -> &'static [Step] {
        use Step::*;

        match self {
            Categories | Units | ActivityTypes | CropTypes | DocumentTypes => &[],
            CategoryHierarchy => &[Categories],
            UnitConversions => &[Units],
            Phases => &[CropTypes],
            PhaseDependencies => &[Phases],
            CategoryRequirements => &[DocumentTypes, Categories],
            Cultivars => &[CropTypes, Phases],
            PhaseFlows => &[Cultivars, Phases, Categories, Units],
            ActivityTemplates => &[ActivityTypes, Phases, Categories, Units],
            Schedules => &[Cultivars, Phases, ActivityTemplates],
            Suppliers | Facilities => &[],
            Products => &[Categories, Units, Cultivars, Suppliers],
            Zones => &[Facilities],
            ProductRequirements => &[DocumentTypes, Products],
            ZoneStructures => &[Zones],
        }
    }

    /// Ordering-only prerequisites: steps that must be complete first even
    /// though no column points at their rows.
    ///
    /// Catalog links finish before anything attaches to them, cultivars see a
    /// finished phase graph, templates follow cultivars, and the operational
    /// records (suppliers, facilities and what hangs off them) are only laid
    /// down once the crop catalog is complete.
    pub fn follows(self) -> &'static [Step] {
        use Step::*;

        match self {
            CategoryRequirements => &[CategoryHierarchy],
            Cultivars => &[PhaseDependencies],
            PhaseFlows => &[CategoryHierarchy, UnitConversions],
            ActivityTemplates => &[CategoryHierarchy, UnitConversions, Cultivars],
            Suppliers | Facilities => &[Schedules],
            Products => &[CategoryHierarchy, UnitConversions],
            ProductRequirements => &[CategoryRequirements],
            _ => &[],
        }
    }

    pub fn prerequisites(self) -> Vec<Step> {
        let mut all: Vec<Step> = self.requires().to_vec();
        all.extend_from_slice(self.follows());
        all.sort();
        all.dedup();
        all
    }

    /// Store calls the step makes, in order.
    pub fn writes(self) -> &'static [(Table, BatchKind)] {
        use BatchKind::{Insert, Link};

        match self {
            Step::Categories => &[(Table::ResourceCategories, Insert)],
            Step::Units => &[(Table::UnitsOfMeasure, Insert)],
            Step::ActivityTypes => &[(Table::ActivityTypes, Insert)],
            Step::CropTypes => &[(Table::CropTypes, Insert)],
            Step::DocumentTypes => &[(Table::RegulatoryDocumentTypes, Insert)],
            Step::CategoryHierarchy => &[(Table::ResourceCategories, Link)],
            Step::UnitConversions => &[(Table::UnitsOfMeasure, Link)],
            Step::Phases => &[(Table::ProductionPhases, Insert)],
            Step::PhaseDependencies => &[(Table::ProductionPhases, Link)],
            Step::CategoryRequirements => &[(Table::RegulatoryRequirements, Insert)],
            Step::Cultivars => &[(Table::Cultivars, Insert)],
            Step::PhaseFlows => &[(Table::PhaseProductFlows, Insert)],
            Step::ActivityTemplates => &[
                (Table::ActivityTemplates, Insert),
                (Table::ActivityTemplatePhases, Insert),
                (Table::ActivityTemplateResources, Insert),
                (Table::ActivityTemplateChecklist, Insert),
            ],
            Step::Schedules => &[(Table::CultivationSchedules, Insert)],
            Step::Suppliers => &[(Table::Suppliers, Insert)],
            Step::Facilities => &[(Table::Facilities, Insert)],
            Step::Products => &[(Table::Products, Insert)],
            Step::Zones => &[(Table::Zones, Insert)],
            Step::ProductRequirements => &[(Table::RegulatoryRequirements, Insert)],
            Step::ZoneStructures => &[(Table::ZoneStructures, Insert)],
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Steps grouped into layers; layer N only depends on layers before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedPlan {
    layers: Vec<Vec<Step>>,
}

impl SeedPlan {
    pub fn derive() -> Result<Self, PlanError> {
        let layers = layer_nodes(&Step::ALL, Step::prerequisites).map_err(PlanError::Cycle)?;
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Vec<Step>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// One-based layer index of `step`.
    pub fn layer_of(&self, step: Step) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.contains(&step))
            .map(|offset| offset + 1)
    }
}

static SEED_PLAN: Lazy<Result<SeedPlan, PlanError>> = Lazy::new(SeedPlan::derive);

/// The process-wide plan, derived on first use.
pub fn seed_plan() -> Result<&'static SeedPlan, PlanError> {
    SEED_PLAN.as_ref().map_err(Clone::clone)
}

/// Kahn's algorithm run in rounds: each round is one layer, holding every node
/// whose prerequisites all sit in earlier rounds. Prerequisites outside
/// `nodes` are ignored. On a cycle, returns the nodes that never became ready.
fn layer_nodes<N, F>(nodes: &[N], prerequisites: F) -> Result<Vec<Vec<N>>, Vec<N>>
where
    N: Copy + Ord,
    F: Fn(N) -> Vec<N>,
{
    let known: BTreeSet<N> = nodes.iter().copied().collect();
    let mut pending: BTreeMap<N, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<N, Vec<N>> = BTreeMap::new();

    for &node in &known {
        let declared = prerequisites(node);
        if declared.contains(&node) {
            return Err(vec![node]);
        }
        let prereqs: BTreeSet<N> = declared.into_iter().filter(|p| known.contains(p)).collect();
        pending.insert(node, prereqs.len());
        for prereq in prereqs {
            dependents.entry(prereq).or_default().push(node);
        }
    }

    let mut ready: Vec<N> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| *node)
        .collect();
    let mut layers = Vec::new();
    let mut placed = 0;

    while !ready.is_empty() {
        let mut next = Vec::new();
        for node in &ready {
            for dependent in dependents.get(node).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        next.push(*dependent);
                    }
                }
            }
        }
        placed += ready.len();
        next.sort();
        layers.push(std::mem::replace(&mut ready, next));
    }

    if placed < known.len() {
        let stuck = pending
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(node, _)| node)
            .collect();
        return Err(stuck);
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(edges: &'static [(u8, &'static [u8])]) -> impl Fn(u8) -> Vec<u8> {
        move |node| {
            edges
                .iter()
                .find(|(n, _)| *n == node)
                .map(|(_, d)| d.to_vec())
                .unwrap_or_default()
        }
    }

    #[test]
    fn layers_follow_longest_path() {
        // 4 needs 1 directly and 3 via 2, so it lands after 3.
        let layers =
            layer_nodes(&[1, 2, 3, 4], deps(&[(2, &[1]), (3, &[2]), (4, &[1, 3])])).unwrap();
        assert_eq!(layers, vec![vec![1], vec![2], vec![3], vec![4]]);
    }

    #[test]
    fn independent_nodes_share_a_layer() {
        let layers = layer_nodes(&[3, 1, 2], deps(&[(3, &[1])])).unwrap();
        assert_eq!(layers, vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn cycle_reports_stuck_nodes() {
        let err = layer_nodes(&[1, 2, 3, 4], deps(&[(2, &[1, 4]), (3, &[2]), (4, &[3])]))
            .unwrap_err();
        assert_eq!(err, vec![2, 3, 4]);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let err = layer_nodes(&[1, 2], deps(&[(2, &[2])])).unwrap_err();
        assert_eq!(err, vec![2]);
    }

    #[test]
    fn unknown_prerequisites_are_ignored() {
        let layers = layer_nodes(&[1, 2], deps(&[(2, &[1, 9])])).unwrap();
        assert_eq!(layers, vec![vec![1], vec![2]]);
    }
}
