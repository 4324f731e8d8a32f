use uuid::Uuid;

use crate::ids::{IdMap, SeedKey};
use crate::rows::{ItemRef, NewRequirement, RequirementContext};

#[derive(Debug)]
struct RequirementSeed {
    document: SeedKey,
    target: SeedKey,
    context: RequirementContext,
    mandatory: bool,
}

static CATEGORY_REQUIREMENT_SEEDS: &[RequirementSeed] = &[
    RequirementSeed {
        document: SeedKey::DocPhytosanitaryCertificate,
        target: SeedKey::CategorySeeds,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocPhytosanitaryCertificate,
        target: SeedKey::CategoryClones,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocPhytosanitaryCertificate,
        target: SeedKey::CategoryGreenCoffee,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocCertificateOfAnalysis,
        target: SeedKey::CategoryDriedFlower,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocHarvestRecord,
        target: SeedKey::CategoryFreshFlower,
        context: RequirementContext::Production,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocHarvestRecord,
        target: SeedKey::CategoryCoffeeCherry,
        context: RequirementContext::Production,
        mandatory: false,
    },
    RequirementSeed {
        document: SeedKey::DocTransportManifest,
        target: SeedKey::CategoryHarvest,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
];

static PRODUCT_REQUIREMENT_SEEDS: &[RequirementSeed] = &[
    RequirementSeed {
        document: SeedKey::DocCertificateOfAnalysis,
        target: SeedKey::ProductOgKushDriedFlower,
        context: RequirementContext::Production,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocCertificateOfAnalysis,
        target: SeedKey::ProductOgKushDriedFlower,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocPhytosanitaryCertificate,
        target: SeedKey::ProductBlueDreamClones,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
    RequirementSeed {
        document: SeedKey::DocTransportManifest,
        target: SeedKey::ProductCastilloGreenCoffee,
        context: RequirementContext::Shipment,
        mandatory: true,
    },
];

pub fn category_requirements(tenant_id: Uuid, ids: &IdMap) -> Vec<NewRequirement> {
    build(tenant_id, ids, CATEGORY_REQUIREMENT_SEEDS, ItemRef::Category)
}

pub fn product_requirements(tenant_id: Uuid, ids: &IdMap) -> Vec<NewRequirement> {
    build(tenant_id, ids, PRODUCT_REQUIREMENT_SEEDS, ItemRef::Product)
}

fn build(
    tenant_id: Uuid,
    ids: &IdMap,
    seeds: &[RequirementSeed],
    target: fn(Uuid) -> ItemRef,
) -> Vec<NewRequirement> {
    seeds
        .iter()
        .map(|seed| NewRequirement {
            id: ids.child(
                seed.document,
                &format!("requirement/{}/{}", seed.context, seed.target.name()),
            ),
            tenant_id,
            document_type_id: ids[seed.document],
            target: target(ids[seed.target]),
            context: seed.context,
            is_mandatory: seed.mandatory,
        })
        .collect()
}
