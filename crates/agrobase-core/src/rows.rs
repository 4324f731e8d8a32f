//! Insert payloads for every seeded entity type and the batches that carry
//! them to a [`TenantStore`](crate::store::TenantStore).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(
    /// Entity tables written by the seeder.
    Table {
        ResourceCategories => "resource_categories",
        UnitsOfMeasure => "units_of_measure",
        ActivityTypes => "activity_types",
        CropTypes => "crop_types",
        RegulatoryDocumentTypes => "regulatory_document_types",
        ProductionPhases => "production_phases",
        Cultivars => "cultivars",
        PhaseProductFlows => "phase_product_flows",
        ActivityTemplates => "activity_templates",
        ActivityTemplatePhases => "activity_template_phases",
        ActivityTemplateResources => "activity_template_resources",
        ActivityTemplateChecklist => "activity_template_checklist",
        CultivationSchedules => "cultivation_schedules",
        RegulatoryRequirements => "regulatory_requirements",
        Suppliers => "suppliers",
        Facilities => "facilities",
        Products => "products",
        Zones => "zones",
        ZoneStructures => "zone_structures",
    }
);

impl Table {
    pub const ALL: [Table; 19] = [
        Table::ResourceCategories,
        Table::UnitsOfMeasure,
        Table::ActivityTypes,
        Table::CropTypes,
        Table::RegulatoryDocumentTypes,
        Table::ProductionPhases,
        Table::Cultivars,
        Table::PhaseProductFlows,
        Table::ActivityTemplates,
        Table::ActivityTemplatePhases,
        Table::ActivityTemplateResources,
        Table::ActivityTemplateChecklist,
        Table::CultivationSchedules,
        Table::RegulatoryRequirements,
        Table::Suppliers,
        Table::Facilities,
        Table::Products,
        Table::Zones,
        Table::ZoneStructures,
    ];
}

text_enum!(CategoryKind {
    Input => "input",
    PlantMaterial => "plant_material",
    Harvest => "harvest",
    Waste => "waste",
});

text_enum!(UnitDimension {
    Mass => "mass",
    Volume => "volume",
    Count => "count",
    Area => "area",
});

text_enum!(CropLifecycle {
    Annual => "annual",
    Perennial => "perennial",
});

text_enum!(FieldKind {
    Text => "text",
    Number => "number",
    Date => "date",
    Boolean => "boolean",
    File => "file",
});

text_enum!(FlowDirection {
    Input => "input",
    Output => "output",
});

text_enum!(FlowRole {
    Primary => "primary",
    Secondary => "secondary",
    Byproduct => "byproduct",
    Waste => "waste",
});

text_enum!(QuantityBasis {
    PerPlant => "per_plant",
    PerSquareMeter => "per_square_meter",
    PerZone => "per_zone",
});

text_enum!(RequirementContext {
    Production => "production",
    Shipment => "shipment",
});

text_enum!(FacilityType {
    Greenhouse => "greenhouse",
    Indoor => "indoor",
    OpenField => "open_field",
});

text_enum!(Procurement {
    Purchased => "purchased",
    Produced => "produced",
});

text_enum!(ZonePurpose {
    Propagation => "propagation",
    Vegetative => "vegetative",
    Flowering => "flowering",
    Drying => "drying",
    Field => "field",
});

text_enum!(StructureKind {
    Rack => "rack",
    RollingBench => "rolling_bench",
    FixedBench => "fixed_bench",
    FieldRow => "field_row",
});

/// Something a flow or a regulatory requirement points at: one product or
/// one whole category, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    Product(Uuid),
    Category(Uuid),
}

impl ItemRef {
    pub fn product_id(&self) -> Option<Uuid> {
        match self {
            ItemRef::Product(id) => Some(*id),
            ItemRef::Category(_) => None,
        }
    }

    pub fn category_id(&self) -> Option<Uuid> {
        match self {
            ItemRef::Category(id) => Some(*id),
            ItemRef::Product(_) => None,
        }
    }

    fn reference(&self, tenant_id: Uuid, column: &'static str) -> Reference {
        match self {
            ItemRef::Product(id) => Reference::new(tenant_id, column, Table::Products, *id),
            ItemRef::Category(id) => {
                Reference::new(tenant_id, column, Table::ResourceCategories, *id)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub kind: CategoryKind,
}

/// Points a category at its parent once both rows exist.
#[derive(Debug, Clone, Serialize)]
pub struct ParentLink {
    pub tenant_id: Uuid,
    pub category_id: Uuid,
    pub parent_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUnit {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub dimension: UnitDimension,
    pub to_base_factor: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaseUnitLink {
    pub tenant_id: Uuid,
    pub unit_id: Uuid,
    pub base_unit_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewActivityType {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCropType {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub scientific_name: String,
    pub lifecycle: CropLifecycle,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDocumentType {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub issuing_authority: Option<String>,
    pub fields: Vec<FormField>,
}

/// Phase rows are inserted without their `depends_on` link; see
/// [`PhaseDependencyLink`].
#[derive(Debug, Clone, Serialize)]
pub struct NewPhase {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub crop_type_id: Uuid,
    pub code: String,
    pub name: String,
    pub sort_order: i32,
    pub default_duration_days: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseDependencyLink {
    pub tenant_id: Uuid,
    pub phase_id: Uuid,
    pub depends_on_phase_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCultivar {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub crop_type_id: Uuid,
    pub code: String,
    pub name: String,
    pub breeder: Option<String>,
    pub expected_yield_per_plant_g: Option<f64>,
    /// Days spent in each phase of the cultivar's crop type, keyed by phase id.
    pub phase_durations: BTreeMap<Uuid, i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPhaseFlow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cultivar_id: Uuid,
    pub phase_id: Uuid,
    pub direction: FlowDirection,
    pub role: FlowRole,
    pub item: ItemRef,
    pub unit_id: Uuid,
    pub expected_yield_pct: Option<f64>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewActivityTemplate {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub activity_type_id: Uuid,
    pub code: String,
    pub name: String,
    pub estimated_minutes: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplatePhaseLink {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub template_id: Uuid,
    pub phase_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTemplateResource {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub template_id: Uuid,
    pub category_id: Uuid,
    pub product_id: Option<Uuid>,
    pub unit_id: Uuid,
    pub quantity: f64,
    pub basis: QuantityBasis,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewChecklistStep {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub template_id: Uuid,
    pub step_order: i32,
    pub instruction: String,
    pub is_critical: bool,
    pub requires_photo: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulePhase {
    pub phase_id: Uuid,
    pub duration_days: i32,
    pub template_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSchedule {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cultivar_id: Uuid,
    pub code: String,
    pub name: String,
    pub total_days: i32,
    pub phases: Vec<SchedulePhase>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRequirement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub document_type_id: Uuid,
    pub target: ItemRef,
    pub context: RequirementContext,
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSupplier {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub tax_id: String,
    pub contact_email: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFacility {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub facility_type: FacilityType,
    pub municipality: String,
    pub area_m2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub sku: String,
    pub name: String,
    pub category_id: Uuid,
    pub unit_id: Uuid,
    pub cultivar_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub procurement: Procurement,
    pub lot_tracked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewZone {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub facility_id: Uuid,
    pub code: String,
    pub name: String,
    pub purpose: ZonePurpose,
    pub area_m2: f64,
    pub climate_controlled: bool,
}

/// Zone structure payload. The maximum position count is derived by the
/// store from `levels` and `positions_per_level` and has no field here.
#[derive(Debug, Clone, Serialize)]
pub struct NewZoneStructure {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub zone_id: Uuid,
    pub code: String,
    pub name: String,
    pub kind: StructureKind,
    pub length_m: f64,
    pub width_m: f64,
    pub levels: i32,
    pub positions_per_level: i32,
}

/// Zone structure as read back from a store, store-computed columns included.
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct ZoneStructureRecord {
    pub id: Uuid,
    pub zone_id: Uuid,
    pub code: String,
    pub levels: i32,
    pub positions_per_level: i32,
    max_positions: i32,
}

impl ZoneStructureRecord {
    pub fn max_positions(&self) -> i32 {
        self.max_positions
    }
}

/// A foreign key carried by a row: `column` must name an existing `table` row
/// of the same tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub tenant_id: Uuid,
    pub column: &'static str,
    pub table: Table,
    pub id: Uuid,
}

impl Reference {
    fn new(tenant_id: Uuid, column: &'static str, table: Table, id: Uuid) -> Self {
        Self {
            tenant_id,
            column,
            table,
            id,
        }
    }
}

/// A single-column update setting `column` on row `row_id` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub tenant_id: Uuid,
    pub row_id: Uuid,
    pub column: &'static str,
    pub target: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    Insert,
    Link,
}

/// One store call: many rows of one entity type, or one set of link updates.
#[derive(Debug, Clone)]
pub enum Batch {
    Categories(Vec<NewCategory>),
    CategoryParents(Vec<ParentLink>),
    Units(Vec<NewUnit>),
    UnitBaseUnits(Vec<BaseUnitLink>),
    ActivityTypes(Vec<NewActivityType>),
    CropTypes(Vec<NewCropType>),
    DocumentTypes(Vec<NewDocumentType>),
    Phases(Vec<NewPhase>),
    PhaseDependencies(Vec<PhaseDependencyLink>),
    Cultivars(Vec<NewCultivar>),
    PhaseFlows(Vec<NewPhaseFlow>),
    Templates(Vec<NewActivityTemplate>),
    TemplatePhases(Vec<TemplatePhaseLink>),
    TemplateResources(Vec<NewTemplateResource>),
    ChecklistSteps(Vec<NewChecklistStep>),
    Schedules(Vec<NewSchedule>),
    Requirements(Vec<NewRequirement>),
    Suppliers(Vec<NewSupplier>),
    Facilities(Vec<NewFacility>),
    Products(Vec<NewProduct>),
    Zones(Vec<NewZone>),
    ZoneStructures(Vec<NewZoneStructure>),
}

impl Batch {
    pub fn table(&self) -> Table {
        match self {
            Batch::Categories(_) | Batch::CategoryParents(_) => Table::ResourceCategories,
            Batch::Units(_) | Batch::UnitBaseUnits(_) => Table::UnitsOfMeasure,
            Batch::ActivityTypes(_) => Table::ActivityTypes,
            Batch::CropTypes(_) => Table::CropTypes,
            Batch::DocumentTypes(_) => Table::RegulatoryDocumentTypes,
            Batch::Phases(_) | Batch::PhaseDependencies(_) => Table::ProductionPhases,
            Batch::Cultivars(_) => Table::Cultivars,
            Batch::PhaseFlows(_) => Table::PhaseProductFlows,
            Batch::Templates(_) => Table::ActivityTemplates,
            Batch::TemplatePhases(_) => Table::ActivityTemplatePhases,
            Batch::TemplateResources(_) => Table::ActivityTemplateResources,
            Batch::ChecklistSteps(_) => Table::ActivityTemplateChecklist,
            Batch::Schedules(_) => Table::CultivationSchedules,
            Batch::Requirements(_) => Table::RegulatoryRequirements,
            Batch::Suppliers(_) => Table::Suppliers,
            Batch::Facilities(_) => Table::Facilities,
            Batch::Products(_) => Table::Products,
            Batch::Zones(_) => Table::Zones,
            Batch::ZoneStructures(_) => Table::ZoneStructures,
        }
    }

    pub fn kind(&self) -> BatchKind {
        match self {
            Batch::CategoryParents(_) | Batch::UnitBaseUnits(_) | Batch::PhaseDependencies(_) => {
                BatchKind::Link
            }
            _ => BatchKind::Insert,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Batch::Categories(rows) => rows.len(),
            Batch::CategoryParents(rows) => rows.len(),
            Batch::Units(rows) => rows.len(),
            Batch::UnitBaseUnits(rows) => rows.len(),
            Batch::ActivityTypes(rows) => rows.len(),
            Batch::CropTypes(rows) => rows.len(),
            Batch::DocumentTypes(rows) => rows.len(),
            Batch::Phases(rows) => rows.len(),
            Batch::PhaseDependencies(rows) => rows.len(),
            Batch::Cultivars(rows) => rows.len(),
            Batch::PhaseFlows(rows) => rows.len(),
            Batch::Templates(rows) => rows.len(),
            Batch::TemplatePhases(rows) => rows.len(),
            Batch::TemplateResources(rows) => rows.len(),
            Batch::ChecklistSteps(rows) => rows.len(),
            Batch::Schedules(rows) => rows.len(),
            Batch::Requirements(rows) => rows.len(),
            Batch::Suppliers(rows) => rows.len(),
            Batch::Facilities(rows) => rows.len(),
            Batch::Products(rows) => rows.len(),
            Batch::Zones(rows) => rows.len(),
            Batch::ZoneStructures(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers of the rows this batch inserts. Empty for link batches.
    pub fn inserted_ids(&self) -> Vec<Uuid> {
        match self {
            Batch::Categories(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Units(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::ActivityTypes(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::CropTypes(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::DocumentTypes(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Phases(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Cultivars(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::PhaseFlows(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Templates(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::TemplatePhases(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::TemplateResources(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::ChecklistSteps(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Schedules(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Requirements(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Suppliers(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Facilities(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Products(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::Zones(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::ZoneStructures(rows) => rows.iter().map(|r| r.id).collect(),
            Batch::CategoryParents(_) | Batch::UnitBaseUnits(_) | Batch::PhaseDependencies(_) => {
                Vec::new()
            }
        }
    }

    /// Every foreign key carried by the batch's rows. Link batches also
    /// reference the row they update.
    pub fn references(&self) -> Vec<Reference> {
        use Table as T;

        let mut refs = Vec::new();
        match self {
            Batch::Categories(_)
            | Batch::Units(_)
            | Batch::ActivityTypes(_)
            | Batch::CropTypes(_)
            | Batch::DocumentTypes(_)
            | Batch::Suppliers(_)
            | Batch::Facilities(_) => {}
            Batch::CategoryParents(_) | Batch::UnitBaseUnits(_) | Batch::PhaseDependencies(_) => {
                let table = self.table();
                for link in self.links() {
                    refs.push(Reference::new(link.tenant_id, "id", table, link.row_id));
                    refs.push(Reference::new(link.tenant_id, link.column, table, link.target));
                }
            }
            Batch::Phases(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "crop_type_id",
                        T::CropTypes,
                        row.crop_type_id,
                    ));
                }
            }
            Batch::Cultivars(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "crop_type_id",
                        T::CropTypes,
                        row.crop_type_id,
                    ));
                    for phase_id in row.phase_durations.keys() {
                        refs.push(Reference::new(
                            row.tenant_id,
                            "phase_durations",
                            T::ProductionPhases,
                            *phase_id,
                        ));
                    }
                }
            }
            Batch::PhaseFlows(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "cultivar_id",
                        T::Cultivars,
                        row.cultivar_id,
                    ));
                    refs.push(Reference::new(
                        row.tenant_id,
                        "phase_id",
                        T::ProductionPhases,
                        row.phase_id,
                    ));
                    refs.push(row.item.reference(row.tenant_id, "item"));
                    refs.push(Reference::new(
                        row.tenant_id,
                        "unit_id",
                        T::UnitsOfMeasure,
                        row.unit_id,
                    ));
                }
            }
            Batch::Templates(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "activity_type_id",
                        T::ActivityTypes,
                        row.activity_type_id,
                    ));
                }
            }
            Batch::TemplatePhases(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "template_id",
                        T::ActivityTemplates,
                        row.template_id,
                    ));
                    refs.push(Reference::new(
                        row.tenant_id,
                        "phase_id",
                        T::ProductionPhases,
                        row.phase_id,
                    ));
                }
            }
            Batch::TemplateResources(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "template_id",
                        T::ActivityTemplates,
                        row.template_id,
                    ));
                    refs.push(Reference::new(
                        row.tenant_id,
                        "category_id",
                        T::ResourceCategories,
                        row.category_id,
                    ));
                    refs.push(Reference::new(
                        row.tenant_id,
                        "unit_id",
                        T::UnitsOfMeasure,
                        row.unit_id,
                    ));
                    if let Some(product_id) = row.product_id {
                        refs.push(Reference::new(
                            row.tenant_id,
                            "product_id",
                            T::Products,
                            product_id,
                        ));
                    }
                }
            }
            Batch::ChecklistSteps(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "template_id",
                        T::ActivityTemplates,
                        row.template_id,
                    ));
                }
            }
            Batch::Schedules(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "cultivar_id",
                        T::Cultivars,
                        row.cultivar_id,
                    ));
                    for phase in &row.phases {
                        refs.push(Reference::new(
                            row.tenant_id,
                            "phases.phase_id",
                            T::ProductionPhases,
                            phase.phase_id,
                        ));
                        for template_id in &phase.template_ids {
                            refs.push(Reference::new(
                                row.tenant_id,
                                "phases.template_ids",
                                T::ActivityTemplates,
                                *template_id,
                            ));
                        }
                    }
                }
            }
            Batch::Requirements(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "document_type_id",
                        T::RegulatoryDocumentTypes,
                        row.document_type_id,
                    ));
                    refs.push(row.target.reference(row.tenant_id, "target"));
                }
            }
            Batch::Products(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "category_id",
                        T::ResourceCategories,
                        row.category_id,
                    ));
                    refs.push(Reference::new(
                        row.tenant_id,
                        "unit_id",
                        T::UnitsOfMeasure,
                        row.unit_id,
                    ));
                    if let Some(cultivar_id) = row.cultivar_id {
                        refs.push(Reference::new(
                            row.tenant_id,
                            "cultivar_id",
                            T::Cultivars,
                            cultivar_id,
                        ));
                    }
                    if let Some(supplier_id) = row.supplier_id {
                        refs.push(Reference::new(
                            row.tenant_id,
                            "supplier_id",
                            T::Suppliers,
                            supplier_id,
                        ));
                    }
                }
            }
            Batch::Zones(rows) => {
                for row in rows {
                    refs.push(Reference::new(
                        row.tenant_id,
                        "facility_id",
                        T::Facilities,
                        row.facility_id,
                    ));
                }
            }
            Batch::ZoneStructures(rows) => {
                for row in rows {
                    refs.push(Reference::new(row.tenant_id, "zone_id", T::Zones, row.zone_id));
                }
            }
        }
        refs
    }

    /// Column updates applied by a link batch. Empty for insert batches.
    pub fn links(&self) -> Vec<Link> {
        match self {
            Batch::CategoryParents(rows) => rows
                .iter()
                .map(|r| Link {
                    tenant_id: r.tenant_id,
                    row_id: r.category_id,
                    column: "parent_id",
                    target: r.parent_id,
                })
                .collect(),
            Batch::UnitBaseUnits(rows) => rows
                .iter()
                .map(|r| Link {
                    tenant_id: r.tenant_id,
                    row_id: r.unit_id,
                    column: "base_unit_id",
                    target: r.base_unit_id,
                })
                .collect(),
            Batch::PhaseDependencies(rows) => rows
                .iter()
                .map(|r| Link {
                    tenant_id: r.tenant_id,
                    row_id: r.phase_id,
                    column: "depends_on_phase_id",
                    target: r.depends_on_phase_id,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Rows of an insert batch as JSON objects. Empty for link batches.
    pub fn encode(&self) -> Result<Vec<Value>, serde_json::Error> {
        match self {
            Batch::Categories(rows) => encode_rows(rows),
            Batch::Units(rows) => encode_rows(rows),
            Batch::ActivityTypes(rows) => encode_rows(rows),
            Batch::CropTypes(rows) => encode_rows(rows),
            Batch::DocumentTypes(rows) => encode_rows(rows),
            Batch::Phases(rows) => encode_rows(rows),
            Batch::Cultivars(rows) => encode_rows(rows),
            Batch::PhaseFlows(rows) => encode_rows(rows),
            Batch::Templates(rows) => encode_rows(rows),
            Batch::TemplatePhases(rows) => encode_rows(rows),
            Batch::TemplateResources(rows) => encode_rows(rows),
            Batch::ChecklistSteps(rows) => encode_rows(rows),
            Batch::Schedules(rows) => encode_rows(rows),
            Batch::Requirements(rows) => encode_rows(rows),
            Batch::Suppliers(rows) => encode_rows(rows),
            Batch::Facilities(rows) => encode_rows(rows),
            Batch::Products(rows) => encode_rows(rows),
            Batch::Zones(rows) => encode_rows(rows),
            Batch::ZoneStructures(rows) => encode_rows(rows),
            Batch::CategoryParents(_) | Batch::UnitBaseUnits(_) | Batch::PhaseDependencies(_) => {
                Ok(Vec::new())
            }
        }
    }
}

fn encode_rows<T: Serialize>(rows: &[T]) -> Result<Vec<Value>, serde_json::Error> {
    rows.iter().map(serde_json::to_value).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn tables_order_by_declaration() {
        let sorted: BTreeSet<Table> = Table::ALL.iter().copied().collect();
        let sorted: Vec<Table> = sorted.into_iter().collect();
        assert_eq!(sorted, Table::ALL.to_vec());
        assert!(Table::ResourceCategories < Table::ZoneStructures);
    }
}
