use uuid::Uuid;

use crate::ids::{IdMap, SeedKey};
use crate::rows::{
    BaseUnitLink, CategoryKind, FieldKind, FormField, NewActivityType, NewCategory,
    NewDocumentType, NewUnit, ParentLink, UnitDimension,
};

#[derive(Debug)]
struct CategorySeed {
    key: SeedKey,
    code: &'static str,
    name: &'static str,
    kind: CategoryKind,
    parent: Option<SeedKey>,
}

static CATEGORY_SEEDS: &[CategorySeed] = &[
    CategorySeed {
        key: SeedKey::CategoryInputs,
        code: "INPUTS",
        name: "Agricultural inputs",
        kind: CategoryKind::Input,
        parent: None,
    },
    CategorySeed {
        key: SeedKey::CategoryFertilizers,
        code: "FERTILIZERS",
        name: "Fertilizers",
        kind: CategoryKind::Input,
        parent: Some(SeedKey::CategoryInputs),
    },
    CategorySeed {
        key: SeedKey::CategoryCropProtection,
        code: "CROP_PROTECTION",
        name: "Crop protection",
        kind: CategoryKind::Input,
        parent: Some(SeedKey::CategoryInputs),
    },
    CategorySeed {
        key: SeedKey::CategorySubstrates,
        code: "SUBSTRATES",
        name: "Substrates",
        kind: CategoryKind::Input,
        parent: Some(SeedKey::CategoryInputs),
    },
    CategorySeed {
        key: SeedKey::CategoryPlantMaterial,
        code: "PLANT_MATERIAL",
        name: "Plant material",
        kind: CategoryKind::PlantMaterial,
        parent: None,
    },
    CategorySeed {
        key: SeedKey::CategorySeeds,
        code: "SEEDS",
        name: "Seeds",
        kind: CategoryKind::PlantMaterial,
        parent: Some(SeedKey::CategoryPlantMaterial),
    },
    CategorySeed {
        key: SeedKey::CategoryClones,
        code: "CLONES",
        name: "Clones and cuttings",
        kind: CategoryKind::PlantMaterial,
        parent: Some(SeedKey::CategoryPlantMaterial),
    },
    CategorySeed {
        key: SeedKey::CategoryHarvest,
        code: "HARVEST",
        name: "Harvested product",
        kind: CategoryKind::Harvest,
        parent: None,
    },
    CategorySeed {
        key: SeedKey::CategoryFreshFlower,
        code: "FRESH_FLOWER",
        name: "Fresh flower",
        kind: CategoryKind::Harvest,
        parent: Some(SeedKey::CategoryHarvest),
    },
    CategorySeed {
        key: SeedKey::CategoryDriedFlower,
        code: "DRIED_FLOWER",
        name: "Dried flower",
        kind: CategoryKind::Harvest,
        parent: Some(SeedKey::CategoryHarvest),
    },
    CategorySeed {
        key: SeedKey::CategoryCoffeeCherry,
        code: "COFFEE_CHERRY",
        name: "Coffee cherry",
        kind: CategoryKind::Harvest,
        parent: Some(SeedKey::CategoryHarvest),
    },
    CategorySeed {
        key: SeedKey::CategoryGreenCoffee,
        code: "GREEN_COFFEE",
        name: "Green coffee",
        kind: CategoryKind::Harvest,
        parent: Some(SeedKey::CategoryHarvest),
    },
    CategorySeed {
        key: SeedKey::CategoryWaste,
        code: "PLANT_WASTE",
        name: "Plant waste",
        kind: CategoryKind::Waste,
        parent: None,
    },
];

#[derive(Debug)]
struct UnitSeed {
    key: SeedKey,
    code: &'static str,
    name: &'static str,
    dimension: UnitDimension,
    base: Option<SeedKey>,
    to_base_factor: f64,
}

static UNIT_SEEDS: &[UnitSeed] = &[
    UnitSeed {
        key: SeedKey::UnitGram,
        code: "g",
        name: "Gram",
        dimension: UnitDimension::Mass,
        base: None,
        to_base_factor: 1.0,
    },
    UnitSeed {
        key: SeedKey::UnitKilogram,
        code: "kg",
        name: "Kilogram",
        dimension: UnitDimension::Mass,
        base: Some(SeedKey::UnitGram),
        to_base_factor: 1000.0,
    },
    UnitSeed {
        key: SeedKey::UnitMilliliter,
        code: "mL",
        name: "Milliliter",
        dimension: UnitDimension::Volume,
        base: None,
        to_base_factor: 1.0,
    },
    UnitSeed {
        key: SeedKey::UnitLiter,
        code: "L",
        name: "Liter",
        dimension: UnitDimension::Volume,
        base: Some(SeedKey::UnitMilliliter),
        to_base_factor: 1000.0,
    },
    UnitSeed {
        key: SeedKey::UnitEach,
        code: "un",
        name: "Unit",
        dimension: UnitDimension::Count,
        base: None,
        to_base_factor: 1.0,
    },
    UnitSeed {
        key: SeedKey::UnitSquareMeter,
        code: "m2",
        name: "Square meter",
        dimension: UnitDimension::Area,
        base: None,
        to_base_factor: 1.0,
    },
];

static ACTIVITY_TYPE_SEEDS: &[(SeedKey, &str, &str, &str)] = &[
    (
        SeedKey::ActivityIrrigation,
        "IRRIGATION",
        "Irrigation",
        "Water applied without nutrients",
    ),
    (
        SeedKey::ActivityFertigation,
        "FERTIGATION",
        "Fertigation",
        "Nutrient solution applied through the irrigation system",
    ),
    (
        SeedKey::ActivityPruning,
        "PRUNING",
        "Pruning",
        "Canopy management and removal of plant tissue",
    ),
    (
        SeedKey::ActivityCropProtection,
        "CROP_PROTECTION",
        "Crop protection",
        "Preventive or curative phytosanitary applications",
    ),
    (
        SeedKey::ActivityTransplant,
        "TRANSPLANT",
        "Transplant",
        "Moving plants to a larger container or to the field",
    ),
    (
        SeedKey::ActivityHarvest,
        "HARVEST",
        "Harvest",
        "Cutting or picking of the harvestable product",
    ),
    (
        SeedKey::ActivityInspection,
        "INSPECTION",
        "Inspection",
        "Scouting and quality checks",
    ),
];

#[derive(Debug)]
struct FieldSeed {
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
}

#[derive(Debug)]
struct DocumentTypeSeed {
    key: SeedKey,
    code: &'static str,
    name: &'static str,
    issuing_authority: Option<&'static str>,
    fields: &'static [FieldSeed],
}

static DOCUMENT_TYPE_SEEDS: &[DocumentTypeSeed] = &[
    DocumentTypeSeed {
        key: SeedKey::DocPhytosanitaryCertificate,
        code: "PHYTOSANITARY_CERTIFICATE",
        name: "Phytosanitary certificate",
        issuing_authority: Some("National plant health agency"),
        fields: &[
            FieldSeed {
                key: "certificate_number",
                label: "Certificate number",
                kind: FieldKind::Text,
                required: true,
            },
            FieldSeed {
                key: "issue_date",
                label: "Issue date",
                kind: FieldKind::Date,
                required: true,
            },
            FieldSeed {
                key: "expiry_date",
                label: "Expiry date",
                kind: FieldKind::Date,
                required: true,
            },
            FieldSeed {
                key: "inspector_name",
                label: "Inspector",
                kind: FieldKind::Text,
                required: false,
            },
            FieldSeed {
                key: "scan",
                label: "Scanned certificate",
                kind: FieldKind::File,
                required: true,
            },
        ],
    },
    DocumentTypeSeed {
        key: SeedKey::DocCertificateOfAnalysis,
        code: "CERTIFICATE_OF_ANALYSIS",
        name: "Certificate of analysis",
        issuing_authority: None,
        fields: &[
            FieldSeed {
                key: "laboratory",
                label: "Laboratory",
                kind: FieldKind::Text,
                required: true,
            },
            FieldSeed {
                key: "sample_id",
                label: "Sample ID",
                kind: FieldKind::Text,
                required: true,
            },
            FieldSeed {
                key: "analysis_date",
                label: "Analysis date",
                kind: FieldKind::Date,
                required: true,
            },
            FieldSeed {
                key: "thc_pct",
                label: "THC (%)",
                kind: FieldKind::Number,
                required: false,
            },
            FieldSeed {
                key: "cbd_pct",
                label: "CBD (%)",
                kind: FieldKind::Number,
                required: false,
            },
            FieldSeed {
                key: "report",
                label: "Lab report",
                kind: FieldKind::File,
                required: true,
            },
        ],
    },
    DocumentTypeSeed {
        key: SeedKey::DocHarvestRecord,
        code: "HARVEST_RECORD",
        name: "Harvest record",
        issuing_authority: None,
        fields: &[
            FieldSeed {
                key: "harvest_date",
                label: "Harvest date",
                kind: FieldKind::Date,
                required: true,
            },
            FieldSeed {
                key: "wet_weight_kg",
                label: "Wet weight (kg)",
                kind: FieldKind::Number,
                required: true,
            },
            FieldSeed {
                key: "plants_harvested",
                label: "Plants harvested",
                kind: FieldKind::Number,
                required: true,
            },
            FieldSeed {
                key: "supervisor",
                label: "Supervisor",
                kind: FieldKind::Text,
                required: true,
            },
        ],
    },
    DocumentTypeSeed {
        key: SeedKey::DocTransportManifest,
        code: "TRANSPORT_MANIFEST",
        name: "Transport manifest",
        issuing_authority: None,
        fields: &[
            FieldSeed {
                key: "manifest_number",
                label: "Manifest number",
                kind: FieldKind::Text,
                required: true,
            },
            FieldSeed {
                key: "carrier",
                label: "Carrier",
                kind: FieldKind::Text,
                required: true,
            },
            FieldSeed {
                key: "vehicle_plate",
                label: "Vehicle plate",
                kind: FieldKind::Text,
                required: true,
            },
            FieldSeed {
                key: "departure_date",
                label: "Departure date",
                kind: FieldKind::Date,
                required: true,
            },
            FieldSeed {
                key: "sealed",
                label: "Cargo sealed",
                kind: FieldKind::Boolean,
                required: true,
            },
        ],
    },
];

pub fn categories(tenant_id: Uuid, ids: &IdMap) -> Vec<NewCategory> {
    CATEGORY_SEEDS
        .iter()
        .map(|seed| NewCategory {
            id: ids[seed.key],
            tenant_id,
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            kind: seed.kind,
        })
        .collect()
}

pub fn category_parents(tenant_id: Uuid, ids: &IdMap) -> Vec<ParentLink> {
    CATEGORY_SEEDS
        .iter()
        .filter_map(|seed| {
            seed.parent.map(|parent| ParentLink {
                tenant_id,
                category_id: ids[seed.key],
                parent_id: ids[parent],
            })
        })
        .collect()
}

pub fn units(tenant_id: Uuid, ids: &IdMap) -> Vec<NewUnit> {
    UNIT_SEEDS
        .iter()
        .map(|seed| NewUnit {
            id: ids[seed.key],
            tenant_id,
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            dimension: seed.dimension,
            to_base_factor: seed.to_base_factor,
        })
        .collect()
}

pub fn unit_base_units(tenant_id: Uuid, ids: &IdMap) -> Vec<BaseUnitLink> {
    UNIT_SEEDS
        .iter()
        .filter_map(|seed| {
            seed.base.map(|base| BaseUnitLink {
                tenant_id,
                unit_id: ids[seed.key],
                base_unit_id: ids[base],
            })
        })
        .collect()
}

pub fn activity_types(tenant_id: Uuid, ids: &IdMap) -> Vec<NewActivityType> {
    ACTIVITY_TYPE_SEEDS
        .iter()
        .map(|(key, code, name, description)| NewActivityType {
            id: ids[*key],
            tenant_id,
            code: code.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
}

pub fn document_types(tenant_id: Uuid, ids: &IdMap) -> Vec<NewDocumentType> {
    DOCUMENT_TYPE_SEEDS
        .iter()
        .map(|seed| NewDocumentType {
            id: ids[seed.key],
            tenant_id,
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            issuing_authority: seed.issuing_authority.map(str::to_string),
            fields: seed
                .fields
                .iter()
                .map(|field| FormField {
                    key: field.key.to_string(),
                    label: field.label.to_string(),
                    kind: field.kind,
                    required: field.required,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_are_roots_of_the_same_kind() {
        for seed in CATEGORY_SEEDS.iter().filter(|s| s.parent.is_some()) {
            let parent = CATEGORY_SEEDS
                .iter()
                .find(|p| Some(p.key) == seed.parent)
                .expect("parent is seeded");
            assert!(parent.parent.is_none(), "{} nests too deep", seed.code);
            assert_eq!(parent.kind, seed.kind, "{} kind mismatch", seed.code);
        }
    }

    #[test]
    fn base_units_share_dimension_and_are_bases() {
        for seed in UNIT_SEEDS.iter().filter(|s| s.base.is_some()) {
            let base = UNIT_SEEDS
                .iter()
                .find(|b| Some(b.key) == seed.base)
                .expect("base unit is seeded");
            assert_eq!(base.dimension, seed.dimension);
            assert!(base.base.is_none());
            assert_eq!(base.to_base_factor, 1.0);
        }
    }
}
