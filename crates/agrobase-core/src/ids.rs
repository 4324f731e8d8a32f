//! Identifier allocation for a seeding run.
//!
//! Every record the starter dataset references is named by a [`SeedKey`].
//! [`IdMap::allocate`] hands out one fresh UUID per key before anything is
//! written, so rows in later layers can point at rows from earlier layers
//! without reading generated keys back from the store.

use std::ops::Index;

use uuid::Uuid;

macro_rules! seed_keys {
    ($($key:ident),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SeedKey {
            $($key),+
        }

        impl SeedKey {
            pub const ALL: &'static [SeedKey] = &[$(SeedKey::$key),+];
            pub const COUNT: usize = [$(stringify!($key)),+].len();

            pub fn name(self) -> &'static str {
                match self {
                    $(SeedKey::$key => stringify!($key)),+
                }
            }
        }
    };
}

seed_keys! {
    // resource categories
    CategoryInputs,
    CategoryFertilizers,
    CategoryCropProtection,
    CategorySubstrates,
    CategoryPlantMaterial,
    CategorySeeds,
    CategoryClones,
    CategoryHarvest,
    CategoryFreshFlower,
    CategoryDriedFlower,
    CategoryCoffeeCherry,
    CategoryGreenCoffee,
    CategoryWaste,
    // units of measure
    UnitGram,
    UnitKilogram,
    UnitMilliliter,
    UnitLiter,
    UnitEach,
    UnitSquareMeter,
    // activity types
    ActivityIrrigation,
    ActivityFertigation,
    ActivityPruning,
    ActivityCropProtection,
    ActivityTransplant,
    ActivityHarvest,
    ActivityInspection,
    // crop types
    CropCannabis,
    CropCoffee,
    // regulatory document types
    DocPhytosanitaryCertificate,
    DocCertificateOfAnalysis,
    DocHarvestRecord,
    DocTransportManifest,
    // production phases
    PhaseCannabisGermination,
    PhaseCannabisPropagation,
    PhaseCannabisVegetative,
    PhaseCannabisFlowering,
    PhaseCannabisHarvest,
    PhaseCannabisDrying,
    PhaseCannabisCuring,
    PhaseCoffeeGermination,
    PhaseCoffeeNursery,
    PhaseCoffeeGrowth,
    PhaseCoffeeFlowering,
    PhaseCoffeeHarvest,
    PhaseCoffeeProcessing,
    PhaseCoffeeDrying,
    // cultivars
    CultivarOgKush,
    CultivarBlueDream,
    CultivarCharlottesWeb,
    CultivarCastillo,
    CultivarCaturra,
    // activity templates
    TemplateDailyIrrigation,
    TemplateFertigation,
    TemplateCanopyPruning,
    TemplateIpmSpray,
    TemplateTransplant,
    TemplateHarvestCut,
    TemplateCherryPicking,
    TemplateWeeklyInspection,
    // cultivation schedules
    ScheduleOgKushIndoor,
    ScheduleBlueDreamIndoor,
    ScheduleCastilloField,
    // suppliers
    SupplierAgroInsumos,
    SupplierAndeanGenetics,
    SupplierSustratos,
    // facilities
    FacilityGreenhouse,
    FacilityFarm,
    // products
    ProductNpkFertilizer,
    ProductCalMag,
    ProductNeemOil,
    ProductCocoCoir,
    ProductOgKushSeeds,
    ProductBlueDreamClones,
    ProductOgKushDriedFlower,
    ProductCastilloSeed,
    ProductCastilloGreenCoffee,
    // zones
    ZonePropagation,
    ZoneVegetative,
    ZoneFlowering,
    ZoneDrying,
    ZoneCoffeeLot,
    // zone structures
    StructurePropagationRack,
    StructureVegBenchA,
    StructureVegBenchB,
    StructureFlowerBenchA,
    StructureFlowerBenchB,
    StructureDryingRack,
    StructureCoffeeRow,
}

/// Pre-allocated identifiers for one seeding run. Read-only once built.
#[derive(Debug, Clone)]
pub struct IdMap {
    ids: [Uuid; SeedKey::COUNT],
}

impl IdMap {
    pub fn allocate() -> Self {
        Self {
            ids: std::array::from_fn(|_| Uuid::new_v4()),
        }
    }

    pub fn get(&self, key: SeedKey) -> Uuid {
        self.ids[key as usize]
    }

    /// Stable identifier for a leaf record hanging off `parent`.
    ///
    /// Leaf rows (flows, template sub-records, requirement links) are never
    /// referenced by other rows, so they are derived from their parent's id
    /// instead of getting a key of their own.
    pub fn child(&self, parent: SeedKey, discriminator: &str) -> Uuid {
        Uuid::new_v5(&self.get(parent), discriminator.as_bytes())
    }
}

impl Index<SeedKey> for IdMap {
    type Output = Uuid;

    fn index(&self, key: SeedKey) -> &Uuid {
        &self.ids[key as usize]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_key_gets_a_distinct_id() {
        let ids = IdMap::allocate();
        let unique: HashSet<Uuid> = SeedKey::ALL.iter().map(|key| ids[*key]).collect();
        assert_eq!(unique.len(), SeedKey::COUNT);
        assert_eq!(SeedKey::ALL.len(), SeedKey::COUNT);
    }

    #[test]
    fn child_ids_are_stable_per_parent() {
        let ids = IdMap::allocate();
        let first = ids.child(SeedKey::TemplateIpmSpray, "step/1");
        assert_eq!(first, ids.child(SeedKey::TemplateIpmSpray, "step/1"));
        assert_ne!(first, ids.child(SeedKey::TemplateIpmSpray, "step/2"));
        assert_ne!(first, ids.child(SeedKey::TemplateTransplant, "step/1"));
    }

    #[test]
    fn separate_runs_do_not_share_ids() {
        let a = IdMap::allocate();
        let b = IdMap::allocate();
        assert_ne!(a[SeedKey::CropCannabis], b[SeedKey::CropCannabis]);
    }
}
