use uuid::Uuid;

use crate::ids::{IdMap, SeedKey};
use crate::rows::{
    FacilityType, NewFacility, NewProduct, NewSupplier, NewZone, NewZoneStructure, Procurement,
    StructureKind, ZonePurpose,
};

static SUPPLIER_SEEDS: &[(SeedKey, &str, &str, &str, &str)] = &[
    (
        SeedKey::SupplierAgroInsumos,
        "AGROINSUMOS",
        "AgroInsumos del Valle S.A.S.",
        "900123456-7",
        "ventas@agroinsumos.example",
    ),
    (
        SeedKey::SupplierAndeanGenetics,
        "ANDEAN_GENETICS",
        "Andean Genetics Lab",
        "901234567-1",
        "pedidos@andeangenetics.example",
    ),
    (
        SeedKey::SupplierSustratos,
        "SUSTRATOS",
        "Sustratos La Sabana",
        "800765432-9",
        "info@sustratos.example",
    ),
];

static FACILITY_SEEDS: &[(SeedKey, &str, &str, FacilityType, &str, f64)] = &[
    (
        SeedKey::FacilityGreenhouse,
        "MAIN_GREENHOUSE",
        "Main greenhouse",
        FacilityType::Greenhouse,
        "Rionegro",
        2400.0,
    ),
    (
        SeedKey::FacilityFarm,
        "LA_ESPERANZA",
        "La Esperanza farm",
        FacilityType::OpenField,
        "Chinchiná",
        50000.0,
    ),
];

#[derive(Debug)]
struct ProductSeed {
    key: SeedKey,
    sku: &'static str,
    name: &'static str,
    category: SeedKey,
    unit: SeedKey,
    cultivar: Option<SeedKey>,
    supplier: Option<SeedKey>,
    procurement: Procurement,
    lot_tracked: bool,
}

static PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        key: SeedKey::ProductNpkFertilizer,
        sku: "FERT-NPK-151515",
        name: "NPK 15-15-15",
        category: SeedKey::CategoryFertilizers,
        unit: SeedKey::UnitKilogram,
        cultivar: None,
        supplier: Some(SeedKey::SupplierAgroInsumos),
        procurement: Procurement::Purchased,
        lot_tracked: false,
    },
    ProductSeed {
        key: SeedKey::ProductCalMag,
        sku: "FERT-CALMAG",
        name: "Cal-Mag supplement",
        category: SeedKey::CategoryFertilizers,
        unit: SeedKey::UnitLiter,
        cultivar: None,
        supplier: Some(SeedKey::SupplierAgroInsumos),
        procurement: Procurement::Purchased,
        lot_tracked: false,
    },
    ProductSeed {
        key: SeedKey::ProductNeemOil,
        sku: "CP-NEEM-70",
        name: "Neem oil 70%",
        category: SeedKey::CategoryCropProtection,
        unit: SeedKey::UnitLiter,
        cultivar: None,
        supplier: Some(SeedKey::SupplierAgroInsumos),
        procurement: Procurement::Purchased,
        lot_tracked: true,
    },
    ProductSeed {
        key: SeedKey::ProductCocoCoir,
        sku: "SUB-COCO-5KG",
        name: "Coco coir block",
        category: SeedKey::CategorySubstrates,
        unit: SeedKey::UnitEach,
        cultivar: None,
        supplier: Some(SeedKey::SupplierSustratos),
        procurement: Procurement::Purchased,
        lot_tracked: false,
    },
    ProductSeed {
        key: SeedKey::ProductOgKushSeeds,
        sku: "SEED-OGK",
        name: "OG Kush seeds",
        category: SeedKey::CategorySeeds,
        unit: SeedKey::UnitEach,
        cultivar: Some(SeedKey::CultivarOgKush),
        supplier: Some(SeedKey::SupplierAndeanGenetics),
        procurement: Procurement::Purchased,
        lot_tracked: true,
    },
    ProductSeed {
        key: SeedKey::ProductBlueDreamClones,
        sku: "CLONE-BDR",
        name: "Blue Dream clones",
        category: SeedKey::CategoryClones,
        unit: SeedKey::UnitEach,
        cultivar: Some(SeedKey::CultivarBlueDream),
        supplier: None,
        procurement: Procurement::Produced,
        lot_tracked: true,
    },
    ProductSeed {
        key: SeedKey::ProductOgKushDriedFlower,
        sku: "FLOWER-OGK-DRY",
        name: "OG Kush dried flower",
        category: SeedKey::CategoryDriedFlower,
        unit: SeedKey::UnitGram,
        cultivar: Some(SeedKey::CultivarOgKush),
        supplier: None,
        procurement: Procurement::Produced,
        lot_tracked: true,
    },
    ProductSeed {
        key: SeedKey::ProductCastilloSeed,
        sku: "SEED-CAST",
        name: "Castillo seed",
        category: SeedKey::CategorySeeds,
        unit: SeedKey::UnitKilogram,
        cultivar: Some(SeedKey::CultivarCastillo),
        supplier: Some(SeedKey::SupplierAndeanGenetics),
        procurement: Procurement::Purchased,
        lot_tracked: true,
    },
    ProductSeed {
        key: SeedKey::ProductCastilloGreenCoffee,
        sku: "COF-CAST-GREEN",
        name: "Castillo green coffee",
        category: SeedKey::CategoryGreenCoffee,
        unit: SeedKey::UnitKilogram,
        cultivar: Some(SeedKey::CultivarCastillo),
        supplier: None,
        procurement: Procurement::Produced,
        lot_tracked: true,
    },
];

#[derive(Debug)]
struct ZoneSeed {
    key: SeedKey,
    facility: SeedKey,
    code: &'static str,
    name: &'static str,
    purpose: ZonePurpose,
    area_m2: f64,
    climate_controlled: bool,
}

static ZONE_SEEDS: &[ZoneSeed] = &[
    ZoneSeed {
        key: SeedKey::ZonePropagation,
        facility: SeedKey::FacilityGreenhouse,
        code: "GH-PROP",
        name: "Propagation room",
        purpose: ZonePurpose::Propagation,
        area_m2: 120.0,
        climate_controlled: true,
    },
    ZoneSeed {
        key: SeedKey::ZoneVegetative,
        facility: SeedKey::FacilityGreenhouse,
        code: "GH-VEG",
        name: "Vegetative room",
        purpose: ZonePurpose::Vegetative,
        area_m2: 400.0,
        climate_controlled: true,
    },
    ZoneSeed {
        key: SeedKey::ZoneFlowering,
        facility: SeedKey::FacilityGreenhouse,
        code: "GH-FLOWER",
        name: "Flowering room",
        purpose: ZonePurpose::Flowering,
        area_m2: 900.0,
        climate_controlled: true,
    },
    ZoneSeed {
        key: SeedKey::ZoneDrying,
        facility: SeedKey::FacilityGreenhouse,
        code: "GH-DRY",
        name: "Drying room",
        purpose: ZonePurpose::Drying,
        area_m2: 80.0,
        climate_controlled: true,
    },
    ZoneSeed {
        key: SeedKey::ZoneCoffeeLot,
        facility: SeedKey::FacilityFarm,
        code: "FARM-LOT1",
        name: "Lot 1 hillside",
        purpose: ZonePurpose::Field,
        area_m2: 20000.0,
        climate_controlled: false,
    },
];

#[derive(Debug)]
struct StructureSeed {
    key: SeedKey,
    zone: SeedKey,
    code: &'static str,
    name: &'static str,
    kind: StructureKind,
    length_m: f64,
    width_m: f64,
    levels: i32,
    positions_per_level: i32,
}

static STRUCTURE_SEEDS: &[StructureSeed] = &[
    StructureSeed {
        key: SeedKey::StructurePropagationRack,
        zone: SeedKey::ZonePropagation,
        code: "PROP-RACK-1",
        name: "Propagation rack",
        kind: StructureKind::Rack,
        length_m: 2.4,
        width_m: 0.6,
        levels: 4,
        positions_per_level: 72,
    },
    StructureSeed {
        key: SeedKey::StructureVegBenchA,
        zone: SeedKey::ZoneVegetative,
        code: "VEG-BENCH-A",
        name: "Vegetative bench A",
        kind: StructureKind::RollingBench,
        length_m: 10.0,
        width_m: 1.8,
        levels: 1,
        positions_per_level: 60,
    },
    StructureSeed {
        key: SeedKey::StructureVegBenchB,
        zone: SeedKey::ZoneVegetative,
        code: "VEG-BENCH-B",
        name: "Vegetative bench B",
        kind: StructureKind::RollingBench,
        length_m: 10.0,
        width_m: 1.8,
        levels: 1,
        positions_per_level: 60,
    },
    StructureSeed {
        key: SeedKey::StructureFlowerBenchA,
        zone: SeedKey::ZoneFlowering,
        code: "FLOWER-BENCH-A",
        name: "Flowering bench A",
        kind: StructureKind::RollingBench,
        length_m: 12.0,
        width_m: 1.8,
        levels: 1,
        positions_per_level: 48,
    },
    StructureSeed {
        key: SeedKey::StructureFlowerBenchB,
        zone: SeedKey::ZoneFlowering,
        code: "FLOWER-BENCH-B",
        name: "Flowering bench B",
        kind: StructureKind::RollingBench,
        length_m: 12.0,
        width_m: 1.8,
        levels: 1,
        positions_per_level: 48,
    },
    StructureSeed {
        key: SeedKey::StructureDryingRack,
        zone: SeedKey::ZoneDrying,
        code: "DRY-RACK-1",
        name: "Drying rack",
        kind: StructureKind::Rack,
        length_m: 2.0,
        width_m: 0.8,
        levels: 8,
        positions_per_level: 10,
    },
    StructureSeed {
        key: SeedKey::StructureCoffeeRow,
        zone: SeedKey::ZoneCoffeeLot,
        code: "LOT1-ROW-1",
        name: "Lot 1 row 1",
        kind: StructureKind::FieldRow,
        length_m: 200.0,
        width_m: 1.5,
        levels: 1,
        positions_per_level: 130,
    },
];

pub fn suppliers(tenant_id: Uuid, ids: &IdMap) -> Vec<NewSupplier> {
    SUPPLIER_SEEDS
        .iter()
        .map(|(key, code, name, tax_id, email)| NewSupplier {
            id: ids[*key],
            tenant_id,
            code: code.to_string(),
            name: name.to_string(),
            tax_id: tax_id.to_string(),
            contact_email: email.to_string(),
            country_code: "CO".to_string(),
        })
        .collect()
}

pub fn facilities(tenant_id: Uuid, ids: &IdMap) -> Vec<NewFacility> {
    FACILITY_SEEDS
        .iter()
        .map(
            |(key, code, name, facility_type, municipality, area_m2)| NewFacility {
                id: ids[*key],
                tenant_id,
                code: code.to_string(),
                name: name.to_string(),
                facility_type: *facility_type,
                municipality: municipality.to_string(),
                area_m2: *area_m2,
            },
        )
        .collect()
}

pub fn products(tenant_id: Uuid, ids: &IdMap) -> Vec<NewProduct> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| NewProduct {
            id: ids[seed.key],
            tenant_id,
            sku: seed.sku.to_string(),
            name: seed.name.to_string(),
            category_id: ids[seed.category],
            unit_id: ids[seed.unit],
            cultivar_id: seed.cultivar.map(|key| ids[key]),
            supplier_id: seed.supplier.map(|key| ids[key]),
            procurement: seed.procurement,
            lot_tracked: seed.lot_tracked,
        })
        .collect()
}

pub fn zones(tenant_id: Uuid, ids: &IdMap) -> Vec<NewZone> {
    ZONE_SEEDS
        .iter()
        .map(|seed| NewZone {
            id: ids[seed.key],
            tenant_id,
            facility_id: ids[seed.facility],
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            purpose: seed.purpose,
            area_m2: seed.area_m2,
            climate_controlled: seed.climate_controlled,
        })
        .collect()
}

pub fn zone_structures(tenant_id: Uuid, ids: &IdMap) -> Vec<NewZoneStructure> {
    STRUCTURE_SEEDS
        .iter()
        .map(|seed| NewZoneStructure {
            id: ids[seed.key],
            tenant_id,
            zone_id: ids[seed.zone],
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            kind: seed.kind,
            length_m: seed.length_m,
            width_m: seed.width_m,
            levels: seed.levels,
            positions_per_level: seed.positions_per_level,
        })
        .collect()
}
